//! Production queue icon recognition over a fixed slot layout

use crate::error::Result;
use crate::gray::GrayBuffer;
use crate::template::QueueTemplate;
use crate::template::matcher::match_score;
use image::RgbImage;
use serde::Serialize;
use vodsig_core::{Roi, SlotLayout};

/// Default minimum confidence for a slot hit
pub const MIN_QUEUE_CONF: f64 = 0.6;

/// An icon recognized in one queue slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueHit {
    pub slot: u32,
    pub item_id: String,
    pub conf: f64,
}

/// Recognize the icon occupying each slot of the queue strip.
///
/// Each slot crop is resized to a candidate template's size when they
/// differ; the best fixed-position match wins, accepted only at
/// `min_conf` or above. At most one hit per slot. Templates are
/// iterated in their load order (sorted by id), which fixes the
/// tie-break deterministically.
pub fn read_queue_icons(
    frame: &RgbImage,
    queue: &Roi,
    layout: &SlotLayout,
    templates: &[QueueTemplate],
    min_conf: f64,
) -> Result<Vec<QueueHit>> {
    if templates.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();
    for slot in 0..layout.count {
        let roi = layout.slot_roi(queue, slot);
        let crop = GrayBuffer::from_rgb(frame, Some(&roi))?;

        let mut best: Option<(&QueueTemplate, f64)> = None;
        for template in templates {
            let sized;
            let target = if crop.width() == template.image.width()
                && crop.height() == template.image.height()
            {
                &crop
            } else {
                sized = crop.resized(template.image.width(), template.image.height());
                &sized
            };
            let conf = match_score(target, &template.image)?;
            if best.as_ref().is_none_or(|(_, c)| conf > *c) {
                best = Some((template, conf));
            }
        }

        if let Some((template, conf)) = best {
            if conf >= min_conf {
                hits.push(QueueHit {
                    slot,
                    item_id: template.id.clone(),
                    conf,
                });
            }
        }
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOT: u32 = 8;

    fn layout(count: u32) -> SlotLayout {
        SlotLayout {
            count,
            slot_w: SLOT,
            slot_h: SLOT,
            gap: 2,
            start_x: 1,
            start_y: 1,
        }
    }

    fn icon(id: &str, value: u8) -> QueueTemplate {
        QueueTemplate {
            id: id.to_string(),
            image: GrayBuffer::from_raw(SLOT, SLOT, vec![value; (SLOT * SLOT) as usize]),
        }
    }

    fn frame_with_slot_values(values: &[u8]) -> (RgbImage, Roi) {
        let queue = Roi::new(4, 4, 60, 12);
        let mut img = RgbImage::new(70, 20);
        let l = layout(values.len() as u32);
        for (i, &v) in values.iter().enumerate() {
            let roi = l.slot_roi(&queue, i as u32);
            for y in roi.y..roi.bottom() {
                for x in roi.x..roi.right() {
                    img.put_pixel(x, y, image::Rgb([v, v, v]));
                }
            }
        }
        (img, queue)
    }

    #[test]
    fn test_slots_match_their_icons() {
        let (frame, queue) = frame_with_slot_values(&[40, 220]);
        let templates = vec![icon("barracks", 40), icon("refinery", 220)];
        let hits = read_queue_icons(&frame, &queue, &layout(2), &templates, MIN_QUEUE_CONF).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item_id, "barracks");
        assert_eq!(hits[0].slot, 0);
        assert_eq!(hits[1].item_id, "refinery");
        assert!(hits[1].conf > 0.9);
    }

    #[test]
    fn test_low_confidence_slot_produces_no_hit() {
        // Slot brightness far from every template
        let (frame, queue) = frame_with_slot_values(&[200]);
        let templates = vec![icon("barracks", 0)];
        let hits = read_queue_icons(&frame, &queue, &layout(1), &templates, MIN_QUEUE_CONF).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_empty_template_set_is_silent() {
        let (frame, queue) = frame_with_slot_values(&[100]);
        let hits = read_queue_icons(&frame, &queue, &layout(1), &[], MIN_QUEUE_CONF).unwrap();
        assert!(hits.is_empty());
    }
}
