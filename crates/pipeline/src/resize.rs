use ferropix_core::ResizeMode;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Fill color for the letterbox bars in the pad modes.
const PAD_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Apply the resize policy for `mode` against a `target_w` x `target_h`
/// target. Callers guarantee strictly positive target dimensions.
pub fn apply_mode(
    image: DynamicImage,
    target_w: u32,
    target_h: u32,
    mode: ResizeMode,
) -> DynamicImage {
    match mode {
        // Fills the target exactly, center-cropping whatever overflows.
        ResizeMode::Crop => image.resize_to_fill(target_w, target_h, RESIZE_FILTER),

        ResizeMode::Stretch => image.resize_exact(target_w, target_h, RESIZE_FILTER),

        // Fit within the target, but never scale up.
        ResizeMode::Max => {
            if image.width() <= target_w && image.height() <= target_h {
                image
            } else {
                image.resize(target_w, target_h, RESIZE_FILTER)
            }
        }

        // Cover the target: both dimensions end up at least as large as
        // requested, aspect preserved.
        ResizeMode::Min => {
            let (w, h) = cover_dimensions(image.width(), image.height(), target_w, target_h);
            image.resize_exact(w, h, RESIZE_FILTER)
        }

        // Contain-scale (up or down), then letterbox to the exact target.
        ResizeMode::Pad => {
            let scaled = image.resize(target_w, target_h, RESIZE_FILTER);
            onto_canvas(&scaled, target_w, target_h)
        }

        // Like Pad, but a source that already fits is centered unscaled.
        ResizeMode::BoxPad => {
            if image.width() <= target_w && image.height() <= target_h {
                onto_canvas(&image, target_w, target_h)
            } else {
                let scaled = image.resize(target_w, target_h, RESIZE_FILTER);
                onto_canvas(&scaled, target_w, target_h)
            }
        }
    }
}

/// Smallest aspect-preserving scale of `(src_w, src_h)` where both dimensions
/// are >= the target.
fn cover_dimensions(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let scale = f64::max(
        target_w as f64 / src_w as f64,
        target_h as f64 / src_h as f64,
    );
    let w = ((src_w as f64 * scale).round() as u32).max(target_w);
    let h = ((src_h as f64 * scale).round() as u32).max(target_h);
    (w, h)
}

/// Center `image` on a `target_w` x `target_h` canvas filled with
/// [`PAD_FILL`].
fn onto_canvas(image: &DynamicImage, target_w: u32, target_h: u32) -> DynamicImage {
    let mut canvas = RgbaImage::from_pixel(target_w, target_h, PAD_FILL);
    let x = (target_w.saturating_sub(image.width()) / 2) as i64;
    let y = (target_h.saturating_sub(image.height()) / 2) as i64;
    imageops::overlay(&mut canvas, &image.to_rgba8(), x, y);
    DynamicImage::ImageRgba8(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(w: u32, h: u32) -> DynamicImage {
        DynamicImage::new_rgb8(w, h)
    }

    #[test]
    fn crop_fills_target_exactly() {
        let out = apply_mode(source(400, 400), 200, 100, ResizeMode::Crop);
        assert_eq!((out.width(), out.height()), (200, 100));
    }

    #[test]
    fn stretch_ignores_aspect() {
        let out = apply_mode(source(400, 300), 50, 500, ResizeMode::Stretch);
        assert_eq!((out.width(), out.height()), (50, 500));
    }

    #[test]
    fn pad_reaches_exact_target() {
        let out = apply_mode(source(400, 400), 200, 100, ResizeMode::Pad);
        assert_eq!((out.width(), out.height()), (200, 100));
    }

    #[test]
    fn pad_letterboxes_instead_of_cropping() {
        // A 400x400 source contained in 200x100 scales to 100x100; the bars
        // on the left and right must carry the fill color while the center
        // carries source content.
        let src = RgbaImage::from_pixel(400, 400, Rgba([255, 255, 255, 255]));
        let out = apply_mode(DynamicImage::ImageRgba8(src), 200, 100, ResizeMode::Pad);
        let rgba = out.to_rgba8();
        assert_eq!(rgba.get_pixel(5, 50), &PAD_FILL);
        assert_eq!(rgba.get_pixel(100, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn boxpad_never_upsizes_smaller_sources() {
        // 40x40 source centered on a 200x100 canvas, unscaled.
        let src = RgbaImage::from_pixel(40, 40, Rgba([0, 255, 0, 255]));
        let out = apply_mode(DynamicImage::ImageRgba8(src), 200, 100, ResizeMode::BoxPad);
        assert_eq!((out.width(), out.height()), (200, 100));
        let rgba = out.to_rgba8();
        // Center pixel comes from the source; the corner is fill.
        assert_eq!(rgba.get_pixel(100, 50), &Rgba([0, 255, 0, 255]));
        assert_eq!(rgba.get_pixel(0, 0), &PAD_FILL);
    }

    #[test]
    fn boxpad_downscales_larger_sources() {
        let out = apply_mode(source(800, 800), 200, 100, ResizeMode::BoxPad);
        assert_eq!((out.width(), out.height()), (200, 100));
    }

    #[test]
    fn max_fits_within_target_preserving_aspect() {
        let out = apply_mode(source(400, 200), 100, 100, ResizeMode::Max);
        assert!(out.width() <= 100 && out.height() <= 100);
        assert_eq!((out.width(), out.height()), (100, 50));
    }

    #[test]
    fn max_never_upsizes() {
        let out = apply_mode(source(50, 30), 200, 200, ResizeMode::Max);
        assert_eq!((out.width(), out.height()), (50, 30));
    }

    #[test]
    fn min_covers_target_preserving_aspect() {
        let out = apply_mode(source(400, 200), 100, 100, ResizeMode::Min);
        assert!(out.width() >= 100 && out.height() >= 100);
        // Aspect preserved within rounding tolerance.
        let src_aspect = 400.0 / 200.0;
        let out_aspect = out.width() as f64 / out.height() as f64;
        assert!((src_aspect - out_aspect).abs() < 0.05);
    }

    #[test]
    fn min_upsizes_when_source_is_smaller() {
        let out = apply_mode(source(50, 50), 100, 200, ResizeMode::Min);
        assert!(out.width() >= 100 && out.height() >= 200);
    }

    #[test]
    fn cover_dimensions_bounds() {
        assert_eq!(cover_dimensions(400, 200, 100, 100), (200, 100));
        assert_eq!(cover_dimensions(100, 100, 300, 150), (300, 300));
    }
}
