use image::{imageops, GrayImage, Luma, RgbImage};

/// Hue range of the half-circle 8-bit HSV convention
pub const HUE_SCALE_MAX: f64 = 180.0;

/// A rectangular sub-region of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Central region spanning 25%-75% of each dimension (integer division).
///
/// All analyzers that crop use this same definition so their classifications
/// share a frame of reference. When a dimension is too small to quarter the
/// full axis is used instead, so the region is never empty for a non-empty
/// image.
pub fn central_crop_region(width: u32, height: u32) -> CropRegion {
    let x0 = width / 4;
    let x1 = 3 * width / 4;
    let y0 = height / 4;
    let y1 = 3 * height / 4;

    let (x, crop_width) = if x1 > x0 { (x0, x1 - x0) } else { (0, width) };
    let (y, crop_height) = if y1 > y0 { (y0, y1 - y0) } else { (0, height) };

    CropRegion {
        x,
        y,
        width: crop_width,
        height: crop_height,
    }
}

/// Convert an RGB image to grayscale using ITU-R BT.601 luminance
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let p = image.get_pixel(x, y);
            let luma =
                (0.299 * p.0[0] as f32 + 0.587 * p.0[1] as f32 + 0.114 * p.0[2] as f32) as u8;
            gray.put_pixel(x, y, Luma([luma]));
        }
    }

    gray
}

/// Copy a sub-region of a grayscale image into its own buffer
pub fn crop_gray(image: &GrayImage, region: &CropRegion) -> GrayImage {
    imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image()
}

/// Convert one RGB pixel to the 8-bit HSV convention: hue in [0, 180),
/// saturation and value in [0, 255]
pub fn rgb_pixel_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let rf = r as f64;
    let gf = g as f64;
    let bf = b as f64;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let hue = if delta > 0.0 {
        let h = if max == rf {
            30.0 * (gf - bf) / delta
        } else if max == gf {
            60.0 + 30.0 * (bf - rf) / delta
        } else {
            120.0 + 30.0 * (rf - gf) / delta
        };
        if h < 0.0 {
            h + HUE_SCALE_MAX
        } else {
            h
        }
    } else {
        0.0
    };

    (hue, saturation, value)
}

/// Arithmetic mean of each HSV channel over a region of an RGB image.
/// Returns (0, 0, 0) for an empty region.
pub fn mean_hsv_over_region(image: &RgbImage, region: &CropRegion) -> (f64, f64, f64) {
    let mut hue_sum = 0.0;
    let mut saturation_sum = 0.0;
    let mut value_sum = 0.0;
    let mut count = 0u64;

    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let p = image.get_pixel(x, y);
            let (h, s, v) = rgb_pixel_to_hsv(p.0[0], p.0[1], p.0[2]);
            hue_sum += h;
            saturation_sum += s;
            value_sum += v;
            count += 1;
        }
    }

    if count == 0 {
        return (0.0, 0.0, 0.0);
    }

    let n = count as f64;
    (hue_sum / n, saturation_sum / n, value_sum / n)
}

/// Mean pixel intensity of a grayscale image. 0.0 for an empty image.
pub fn mean_intensity(image: &GrayImage) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0u64;

    for pixel in image.pixels() {
        sum += pixel.0[0] as f64;
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }

    sum / count as f64
}

/// Population standard deviation of pixel intensity. 0.0 for an empty image.
pub fn intensity_std_dev(image: &GrayImage) -> f64 {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for pixel in image.pixels() {
        let val = pixel.0[0] as f64;
        sum += val;
        sum_sq += val * val;
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }

    let n = count as f64;
    let mean = sum / n;
    let variance = (sum_sq / n) - (mean * mean);
    variance.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use image::Rgb;

    #[test]
    fn central_crop_covers_middle_half() {
        let region = central_crop_region(100, 200);
        assert_eq!(region, CropRegion { x: 25, y: 50, width: 50, height: 100 });
    }

    #[test]
    fn central_crop_falls_back_to_full_axis_when_tiny() {
        let region = central_crop_region(2, 200);
        assert_eq!(region.x, 0);
        assert_eq!(region.width, 2);
        assert_eq!(region.y, 50);
        assert_eq!(region.height, 100);

        let degenerate = central_crop_region(1, 1);
        assert_eq!(degenerate, CropRegion { x: 0, y: 0, width: 1, height: 1 });
    }

    #[test]
    fn primary_colors_map_to_expected_hues() {
        let (h, s, v) = rgb_pixel_to_hsv(255, 0, 0);
        assert_approx_eq!(h, 0.0);
        assert_approx_eq!(s, 255.0);
        assert_approx_eq!(v, 255.0);

        let (h, _, _) = rgb_pixel_to_hsv(0, 255, 0);
        assert_approx_eq!(h, 60.0);

        let (h, _, _) = rgb_pixel_to_hsv(0, 0, 255);
        assert_approx_eq!(h, 120.0);
    }

    #[test]
    fn gray_pixel_has_zero_saturation() {
        let (h, s, v) = rgb_pixel_to_hsv(128, 128, 128);
        assert_approx_eq!(h, 0.0);
        assert_approx_eq!(s, 0.0);
        assert_approx_eq!(v, 128.0);
    }

    #[test]
    fn negative_hue_wraps_into_half_circle_range() {
        // Magenta-ish pixel: max = red, green < blue, so the raw hue is negative
        let (h, _, _) = rgb_pixel_to_hsv(255, 0, 128);
        assert!(h >= 0.0 && h < HUE_SCALE_MAX, "hue out of range: {}", h);
        assert!(h > 150.0, "expected wrapped hue near the top of the range, was {}", h);
    }

    #[test]
    fn flat_image_statistics() {
        let rgb = RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]));
        let gray = rgb_to_gray(&rgb);
        assert_approx_eq!(mean_intensity(&gray), 200.0);
        assert_approx_eq!(intensity_std_dev(&gray), 0.0);
    }

    #[test]
    fn two_level_image_std_dev() {
        let mut gray = GrayImage::from_pixel(2, 1, Luma([0]));
        gray.put_pixel(1, 0, Luma([100]));
        assert_approx_eq!(mean_intensity(&gray), 50.0);
        assert_approx_eq!(intensity_std_dev(&gray), 50.0);
    }

    #[test]
    fn crop_gray_extracts_region() {
        let mut gray = GrayImage::from_pixel(4, 4, Luma([0]));
        gray.put_pixel(1, 1, Luma([255]));
        let region = central_crop_region(4, 4);
        let center = crop_gray(&gray, &region);
        assert_eq!(center.dimensions(), (2, 2));
        assert_eq!(center.get_pixel(0, 0).0, [255]);
    }
}
