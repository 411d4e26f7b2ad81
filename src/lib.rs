//! Liquid mirror: touch-driven ripples that refract and tint a live video feed.
//!
//! The core is a small software pipeline run once per display refresh:
//!
//! 1. [`inject`](inject::inject) stamps a splash into the current height grid,
//! 2. [`WaveField`](wave::WaveField) propagates the damped wave into the other grid,
//! 3. [`render`](refract::render) bends and tints the mirrored camera image along the slopes,
//! 4. [`FrameScheduler`](scheduler::FrameScheduler) presents the result and swaps grid roles.
//!
//! Camera and window live outside the core behind the [`VideoSource`] and
//! [`FrameSink`] traits.

pub mod constants;
pub mod error;
pub mod inject;
pub mod refract;
pub mod scheduler;
pub mod texture;
pub mod theme;
pub mod types;
pub mod wave;

pub use error::Error;
pub use scheduler::FrameScheduler;
pub use theme::ThemeConfig;
pub use types::{Dimensions, FrameOutcome, FrameSink, InteractionPoint, Rgb, SkipReason, VideoSource};
