// Per-frame video texture: the camera image resampled to the field size and
// mirrored, or a solid fill while the camera has nothing to show yet.
// Visual: with the mirror, moving your hand right moves the ripples right.

use crate::constants::FALLBACK_RGB;
use crate::types::{Dimensions, VideoSource};
use image::imageops;
use image::{Rgba, RgbaImage};

pub struct VideoTexture {
    image: RgbaImage,
}

impl VideoTexture {
    /// Texture at `dims`, starting as the fallback fill.
    pub fn new(dims: Dimensions) -> Self {
        Self { image: fallback_image(dims) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pull the newest frame from `source` into the texture at `dims`.
    /// Returns `false` (and fills with the fallback colour) when the source is
    /// not ready; that is a normal outcome, the next frame asks again.
    /// The pixel buffer is only reallocated when `dims` changes.
    pub fn refresh(&mut self, source: &mut dyn VideoSource, dims: Dimensions) -> bool {
        self.fit(dims);
        match source.poll_frame() {
            Some(frame) if frame.width() > 0 && frame.height() > 0 => {
                resample_mirrored_into(frame, &mut self.image);
                true
            }
            _ => {
                let [r, g, b] = FALLBACK_RGB;
                for p in self.image.pixels_mut() {
                    *p = Rgba([r, g, b, 255]);
                }
                false
            }
        }
    }

    fn fit(&mut self, dims: Dimensions) {
        if self.image.width() as usize != dims.width || self.image.height() as usize != dims.height {
            self.image = fallback_image(dims);
        }
    }
}

/// Write `frame`, flipped left-to-right, into `out` at `out`'s size.
/// Same-size frames are copied and flipped in place; anything else is
/// bilinear-sampled straight into `out`.
pub fn resample_mirrored_into(frame: &RgbaImage, out: &mut RgbaImage) {
    let (w, h) = out.dimensions();
    if frame.dimensions() == (w, h) {
        out.copy_from_slice(frame.as_raw());
        imageops::flip_horizontal_in_place(out);
        return;
    }
    for y in 0..h {
        let v = (y as f32 + 0.5) / h as f32;
        for x in 0..w {
            // mirrored: output column x reads source column (w - 1 - x)
            let u = (w as f32 - x as f32 - 0.5) / w as f32;
            if let Some(p) = imageops::sample_bilinear(frame, u, v) {
                out.put_pixel(x, y, p);
            }
        }
    }
}

fn fallback_image(dims: Dimensions) -> RgbaImage {
    let [r, g, b] = FALLBACK_RGB;
    RgbaImage::from_pixel(dims.width as u32, dims.height as u32, Rgba([r, g, b, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Still(Option<RgbaImage>);

    impl VideoSource for Still {
        fn poll_frame(&mut self) -> Option<&RgbaImage> {
            self.0.as_ref()
        }
    }

    fn dims(w: usize, h: usize) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    #[test]
    fn not_ready_fills_fallback() {
        let mut tex = VideoTexture::new(dims(3, 2));
        assert!(!tex.refresh(&mut Still(None), dims(4, 4)));
        assert_eq!(tex.image().dimensions(), (4, 4));
        let [r, g, b] = FALLBACK_RGB;
        assert!(tex.image().pixels().all(|p| p.0 == [r, g, b, 255]));
    }

    #[test]
    fn same_size_frame_is_only_mirrored() {
        let frame = RgbaImage::from_fn(3, 1, |x, _| Rgba([x as u8, 0, 0, 255]));
        let mut tex = VideoTexture::new(dims(3, 1));
        assert!(tex.refresh(&mut Still(Some(frame)), dims(3, 1)));
        let reds: Vec<u8> = tex.image().pixels().map(|p| p.0[0]).collect();
        assert_eq!(reds, vec![2, 1, 0]);
    }

    #[test]
    fn larger_frame_is_resampled_to_field_size() {
        let frame = RgbaImage::from_pixel(64, 48, Rgba([9, 8, 7, 255]));
        let mut tex = VideoTexture::new(dims(1, 1));
        assert!(tex.refresh(&mut Still(Some(frame)), dims(32, 24)));
        assert_eq!(tex.image().dimensions(), (32, 24));
        assert_eq!(tex.image().get_pixel(10, 10).0, [9, 8, 7, 255]);
    }

    #[test]
    fn refresh_reuses_the_pixel_buffer() {
        let mut tex = VideoTexture::new(dims(32, 24));
        let buf = tex.image().as_raw().as_ptr();

        let same = RgbaImage::from_pixel(32, 24, Rgba([1, 2, 3, 255]));
        assert!(tex.refresh(&mut Still(Some(same)), dims(32, 24)));
        assert_eq!(tex.image().as_raw().as_ptr(), buf);

        let larger = RgbaImage::from_pixel(64, 48, Rgba([4, 5, 6, 255]));
        assert!(tex.refresh(&mut Still(Some(larger)), dims(32, 24)));
        assert_eq!(tex.image().as_raw().as_ptr(), buf);

        assert!(!tex.refresh(&mut Still(None), dims(32, 24)));
        assert_eq!(tex.image().as_raw().as_ptr(), buf);
    }

    #[test]
    fn resampling_mirrors_columns() {
        // left half red, right half blue: after mirroring the left half is blue
        let frame = RgbaImage::from_fn(40, 10, |x, _| if x < 20 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) });
        let mut tex = VideoTexture::new(dims(20, 5));
        assert!(tex.refresh(&mut Still(Some(frame)), dims(20, 5)));
        assert_eq!(tex.image().get_pixel(2, 2).0, [0, 0, 255, 255]);
        assert_eq!(tex.image().get_pixel(17, 2).0, [255, 0, 0, 255]);
    }
}
