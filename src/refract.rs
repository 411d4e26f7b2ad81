// The per-pixel refraction kernel: bends the camera image along the slopes of
// the height field, adds a specular glint on crests and tints the strongly
// displaced water toward the theme colour.
// Visual: this *is* the effect you see. A flat field gives back the plain
// (mirrored) camera image.

use crate::constants::{
    DISPLACEMENT_SCALE, HIGHLIGHT_GAIN, HIGHLIGHT_THRESHOLD, TINT_DIVISOR, TINT_THRESHOLD, TINT_WEIGHT,
};
use crate::error::Error;
use crate::theme::ThemeConfig;
use crate::types::Dimensions;
use image::RgbaImage;

/// Render one frame into `out` from the post-propagation `grid` and `texture`.
///
/// Pure: reads `grid`, `texture` and `theme`, writes every byte of `out`.
/// All three buffers must match `dims`; a mismatch is rejected before any
/// pixel is written. Border pixels have no gradient, so they get the raw
/// texture colour.
pub fn render(
    grid: &[i32],
    texture: &RgbaImage,
    theme: &ThemeConfig,
    dims: Dimensions,
    out: &mut RgbaImage,
) -> Result<(), Error> {
    dims.check_len(grid.len())?;
    check_image(texture, dims)?;
    check_image(out, dims)?;

    let w = dims.width;
    let h = dims.height;
    let src: &[u8] = texture.as_raw();
    let dst: &mut [u8] = out;

    let k = DISPLACEMENT_SCALE * theme.shimmer;
    let highlight = theme.highlight_color.channels().map(|c| c as f32 / 255.0);
    let base = theme.base_color.channels().map(|c| c as f32);

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let o = i * 4;

            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                dst[o..o + 3].copy_from_slice(&src[o..o + 3]);
                dst[o + 3] = 255;
                continue;
            }

            // 1) slopes of the water surface
            let gx = grid[i - 1] - grid[i + 1];
            let gy = grid[i - w] - grid[i + w];

            // 2-3) displaced, clamped sample position
            let dx = (gx as f32 * k).floor() as i32;
            let dy = (gy as f32 * k).floor() as i32;
            let sx = (x as i32 + dx).clamp(0, w as i32 - 1) as usize;
            let sy = (y as i32 + dy).clamp(0, h as i32 - 1) as usize;
            let s = (sy * w + sx) * 4;

            // 4) refracted base colour
            let mut rgb = [src[s] as f32, src[s + 1] as f32, src[s + 2] as f32];

            // 5) specular glint on crests facing the light
            let shading = gx.saturating_sub(gy);
            if shading > HIGHLIGHT_THRESHOLD {
                let intensity = shading.saturating_mul(HIGHLIGHT_GAIN).min(255) as f32;
                for c in 0..3 {
                    rgb[c] = (rgb[c] + intensity * highlight[c]).min(255.0);
                }
            }

            // 6) liquid tint, blended from the post-glint colour
            let tint = ((dx.unsigned_abs() + dy.unsigned_abs()) as f32 / TINT_DIVISOR).min(1.0);
            if tint > TINT_THRESHOLD {
                let wgt = tint * TINT_WEIGHT;
                for c in 0..3 {
                    rgb[c] = rgb[c] * (1.0 - wgt) + base[c] * wgt;
                }
            }

            dst[o] = to_byte(rgb[0]);
            dst[o + 1] = to_byte(rgb[1]);
            dst[o + 2] = to_byte(rgb[2]);
            dst[o + 3] = 255;
        }
    }
    Ok(())
}

#[inline]
fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn check_image(img: &RgbaImage, dims: Dimensions) -> Result<(), Error> {
    let (iw, ih) = img.dimensions();
    if iw as usize != dims.width || ih as usize != dims.height {
        return Err(Error::DimensionMismatch {
            expected: dims.len(),
            actual: iw as usize * ih as usize,
        });
    }
    Ok(())
}
