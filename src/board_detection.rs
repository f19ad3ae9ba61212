//! Yellow sticky-board localization.
//!
//! Trap photos usually include background (bench, soil, hands) around the
//! board itself. Cropping to the board before classification keeps the
//! classifier input dominated by the catch surface. Detection is a plain
//! color segmentation: threshold in HSV, take the largest connected blob of
//! board-colored pixels, and use its bounding box.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::BTreeMap;

// Inclusive HSV thresholds for board-yellow, in the 8-bit convention where
// hue spans 0-179 (degrees halved) and saturation/value span 0-255.
const HUE_MIN: u8 = 15;
const HUE_MAX: u8 = 40;
const SAT_MIN: u8 = 70;
const VAL_MIN: u8 = 70;

/// Bounding box of the detected board, in original image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Number of board-colored pixels inside the region.
    pub pixel_area: u32,
}

#[derive(Debug, Clone, Copy)]
struct RegionBounds {
    pixel_count: u32,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

/// Convert an RGB pixel to HSV using the 8-bit convention above.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 {
        0.0
    } else {
        255.0 * delta / max
    };

    let h = if delta == 0.0 {
        0.0
    } else {
        let degrees = if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    };

    let mut h_scaled = (h / 2.0).round() as u16;
    if h_scaled >= 180 {
        h_scaled = 0;
    }
    (h_scaled as u8, s.round() as u8, v.round() as u8)
}

fn is_board_pixel(r: u8, g: u8, b: u8) -> bool {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    (HUE_MIN..=HUE_MAX).contains(&h) && s >= SAT_MIN && v >= VAL_MIN
}

/// Binary mask of board-colored pixels: 255 for board yellow, 0 elsewhere.
fn board_mask(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let pixel = rgb.get_pixel(x, y);
        if is_board_pixel(pixel[0], pixel[1], pixel[2]) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Find the bounding box of the largest blob of board-colored pixels.
///
/// Returns `None` when no pixel matches the board color at all. Area ties
/// go to the blob encountered first in raster order.
pub fn locate_board(img: &DynamicImage) -> Option<BoardRegion> {
    let mask = board_mask(img);
    let labelled = connected_components(&mask, Connectivity::Eight, Luma([0u8]));

    // Labels are assigned in raster order, so the BTreeMap keeps blobs in
    // first-encountered order for deterministic tie-breaking.
    let mut blobs: BTreeMap<u32, RegionBounds> = BTreeMap::new();
    for (x, y, pixel) in labelled.enumerate_pixels() {
        let label = pixel[0];
        if label == 0 {
            continue;
        }
        blobs
            .entry(label)
            .and_modify(|bounds| {
                bounds.pixel_count += 1;
                bounds.min_x = bounds.min_x.min(x);
                bounds.min_y = bounds.min_y.min(y);
                bounds.max_x = bounds.max_x.max(x);
                bounds.max_y = bounds.max_y.max(y);
            })
            .or_insert(RegionBounds {
                pixel_count: 1,
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            });
    }

    let mut best: Option<RegionBounds> = None;
    for bounds in blobs.into_values() {
        match best {
            Some(current) if bounds.pixel_count <= current.pixel_count => {}
            _ => best = Some(bounds),
        }
    }

    best.map(|bounds| BoardRegion {
        x: bounds.min_x,
        y: bounds.min_y,
        width: bounds.max_x - bounds.min_x + 1,
        height: bounds.max_y - bounds.min_y + 1,
        pixel_area: bounds.pixel_count,
    })
}

/// Crop the photo to the detected board region.
pub fn crop_to_board(img: &DynamicImage, region: &BoardRegion) -> DynamicImage {
    img.crop_imm(region.x, region.y, region.width, region.height)
}
