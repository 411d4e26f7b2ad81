// Core types shared by the field, the injector, the renderer and the scheduler.

use crate::constants::RENDER_SCALE;
use crate::error::Error;
use image::RgbaImage;

/// Field resolution. Both amplitude grids, the video texture and the output
/// frame always share exactly these dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    /// `None` when either side is zero (e.g. a minimised window).
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Field size for a display of `display_w × display_h`, scaled down by
    /// [`RENDER_SCALE`] and floored.
    pub fn from_display(display_w: usize, display_h: usize) -> Option<Self> {
        let w = (display_w as f32 * RENDER_SCALE).floor() as usize;
        let h = (display_h as f32 * RENDER_SCALE).floor() as usize;
        Self::new(w, h)
    }

    /// Number of cells (`w*h`).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Reject a buffer whose length does not match `w*h`.
    pub fn check_len(&self, actual: usize) -> Result<(), Error> {
        if actual != self.len() {
            return Err(Error::DimensionMismatch { expected: self.len(), actual });
        }
        Ok(())
    }
}

/// Latest known interaction state, in normalized `[0,1]` coordinates.
/// Overwritten by every new event; it has no identity of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionPoint {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

impl InteractionPoint {
    pub fn active(x: f32, y: f32) -> Self {
        Self { x, y, active: true }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Plain 8-bit RGB triple used for theme colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Readable RGBA capability: where the camera (or anything else) plugs in.
pub trait VideoSource {
    /// The newest frame, at whatever resolution the source produces.
    /// `None` means "not ready yet" and is not an error. Must not block.
    fn poll_frame(&mut self) -> Option<&RgbaImage>;
}

/// Writable RGBA capability: where the rendered frame goes (a window, a test).
pub trait FrameSink {
    fn present(&mut self, frame: &RgbaImage) -> Result<(), Error>;
}

/// Why a tick did no physics/render work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No valid dimensions yet (zero-sized display).
    NoDimensions,
    /// A buffer no longer matches the current dimensions.
    StaleBuffers,
}

/// What one scheduler tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Skipped(SkipReason),
}
