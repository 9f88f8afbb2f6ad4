//! Connected-component bounding boxes over binary masks

use crate::gray::GrayBuffer;
use vodsig_core::Roi;

/// Bounding boxes of all 4-connected foreground components.
///
/// Row-major scan, iterative flood fill, each pixel visited once.
/// Every component is returned regardless of size; size filtering and
/// left-to-right ordering are caller policy.
pub fn connected_components(mask: &GrayBuffer) -> Vec<Roi> {
    let width = mask.width();
    let height = mask.height();
    let pixels = mask.pixels();
    let mut visited = vec![false; pixels.len()];
    let mut boxes = Vec::new();
    let mut stack: Vec<u32> = Vec::new();

    for start in 0..pixels.len() as u32 {
        if pixels[start as usize] == 0 || visited[start as usize] {
            continue;
        }
        visited[start as usize] = true;
        stack.push(start);

        let mut min_x = start % width;
        let mut max_x = min_x;
        let mut min_y = start / width;
        let mut max_y = min_y;

        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            // von Neumann neighborhood; diagonals do not connect
            let neighbors = [
                (x > 0).then(|| idx - 1),
                (x + 1 < width).then(|| idx + 1),
                (y > 0).then(|| idx - width),
                (y + 1 < height).then(|| idx + width),
            ];
            for n in neighbors.into_iter().flatten() {
                if pixels[n as usize] != 0 && !visited[n as usize] {
                    visited[n as usize] = true;
                    stack.push(n);
                }
            }
        }

        boxes.push(Roi::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1));
    }

    boxes
}
