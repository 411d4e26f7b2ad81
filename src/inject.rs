// Touch -> splash: stamps a disc of fixed amplitude into the current grid.
// Visual: a ring of ripples starts wherever the pointer is held.

use crate::constants::{INJECT_RADIUS, INJECT_STRENGTH};
use crate::types::{Dimensions, InteractionPoint};

/// Set every cell of the disc around `point` to [`INJECT_STRENGTH`].
///
/// Offsets run over `[-R, R)` on both axes and keep `dx² + dy² < R²` (an
/// offset of ±R never passes that test). Cells are overwritten, not
/// accumulated, which makes repeated injections at one spot idempotent.
/// Inactive points and cells outside the grid are ignored.
pub fn inject(grid: &mut [i32], point: &InteractionPoint, dims: Dimensions) {
    if !point.active {
        return;
    }
    let w = dims.width as i32;
    let h = dims.height as i32;
    let cx = (point.x * w as f32).floor() as i32;
    let cy = (point.y * h as f32).floor() as i32;

    let r = INJECT_RADIUS;
    for dy in -r..r {
        for dx in -r..r {
            if dx * dx + dy * dy >= r * r {
                continue;
            }
            let px = cx + dx;
            let py = cy + dy;
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let idx = py as usize * dims.width + px as usize;
            if let Some(cell) = grid.get_mut(idx) {
                *cell = INJECT_STRENGTH;
            }
        }
    }
}
