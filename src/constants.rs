// Fixed tuning values for the ripple pipeline.
// Visual: changing these changes how big/strong a touch is and how hard the
// water bends the camera image. Theme values (damping, shimmer, colours) live
// in theme.rs instead because they may change between frames.

/// The field runs at half the display resolution.
pub const RENDER_SCALE: f32 = 0.5;

/// Touch splash radius in field pixels (exclusive: dx, dy in [-R, R) and dx²+dy² < R²).
pub const INJECT_RADIUS: i32 = 4;
/// Amplitude written into every cell of the splash (overwrites, never adds).
pub const INJECT_STRENGTH: i32 = 600;

/// Gradient -> displacement scale, multiplied by the theme's shimmer.
pub const DISPLACEMENT_SCALE: f32 = 0.05;

/// Specular highlight only where `gx - gy` exceeds this.
pub const HIGHLIGHT_THRESHOLD: i32 = 10;
pub const HIGHLIGHT_GAIN: i32 = 2;

/// `|dx| + |dy|` divided by this gives the tint factor (capped at 1).
pub const TINT_DIVISOR: f32 = 20.0;
/// Tint factors at or below this leave the pixel untouched.
pub const TINT_THRESHOLD: f32 = 0.05;
/// Tint factor 1 blends halfway toward the theme's base colour.
pub const TINT_WEIGHT: f32 = 0.5;

/// Solid fill used when the video source has no frame yet (dark slate).
pub const FALLBACK_RGB: [u8; 3] = [0x10, 0x14, 0x1c];

/// Shimmer is meaningful in this range; theme loading clamps into it.
pub const SHIMMER_MIN: f32 = 1.0;
pub const SHIMMER_MAX: f32 = 20.0;
/// Damping lives in the open interval (0,1): 0 would wipe the field every
/// step, 1.0 or more never settles. Loading clamps into [MIN, MAX].
pub const DAMPING_MIN: f32 = 0.01;
pub const DAMPING_MAX: f32 = 0.999;
