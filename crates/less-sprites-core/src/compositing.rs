use image::{Rgba, RgbaImage};

/// Blit all of `src` into `canvas` with its top-left corner at (dx, dy).
/// Pixels that would land outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        if dy + yy >= ch {
            break;
        }
        for xx in 0..sw {
            if dx + xx >= cw {
                break;
            }
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
        }
    }
}

/// Allocate a `width`x`height` canvas filled with `background` and carry over
/// the top-left `keep` region of `old`.
pub fn grow_canvas(
    old: &RgbaImage,
    width: u32,
    height: u32,
    keep: (u32, u32),
    background: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    let (ow, oh) = old.dimensions();
    let kw = keep.0.min(ow).min(width);
    let kh = keep.1.min(oh).min(height);
    for yy in 0..kh {
        for xx in 0..kw {
            canvas.put_pixel(xx, yy, *old.get_pixel(xx, yy));
        }
    }
    canvas
}
