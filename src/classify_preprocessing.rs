use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::{Array, IxDyn};

/// Input edge length expected by the classifier.
pub const CLASSIFY_INPUT_SIZE: u32 = 224;

/// Convert an image to the classifier's input tensor.
///
/// The image is resized (not letterboxed) to `target_size` x `target_size`,
/// then laid out as NCHW float32 with values scaled to `[0, 1]`.
pub fn preprocess_image(img: &DynamicImage, target_size: u32) -> Result<Array<f32, IxDyn>> {
    let resized = img
        .resize_exact(target_size, target_size, FilterType::Triangle)
        .to_rgb8();

    let size = target_size as usize;
    let mut input_data = Vec::with_capacity(3 * size * size);
    for c in 0..3 {
        for y in 0..target_size {
            for x in 0..target_size {
                let pixel = resized.get_pixel(x, y);
                input_data.push(pixel[c] as f32 / 255.0);
            }
        }
    }

    let input = Array::from_shape_vec(IxDyn(&[1, 3, size, size]), input_data)?;
    Ok(input)
}
