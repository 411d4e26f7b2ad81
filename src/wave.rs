// The ripple height field: two same-size integer grids that trade places
// ("current" / "previous") every frame.
// Visual: nothing on its own; the renderer reads the slopes of this field
// to bend and tint the camera image.

use crate::error::Error;
use crate::types::Dimensions;

pub struct WaveField {
    dims: Dimensions,
    grids: [Vec<i32>; 2],
    current: usize, // index into `grids`; the other one is "previous"
}

impl WaveField {
    /// Both grids zero-filled at `dims`.
    pub fn new(dims: Dimensions) -> Self {
        Self { dims, grids: [vec![0; dims.len()], vec![0; dims.len()]], current: 0 }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Drop all amplitude and reallocate both grids zero-filled at `dims`.
    pub fn resize(&mut self, dims: Dimensions) {
        self.dims = dims;
        self.grids = [vec![0; dims.len()], vec![0; dims.len()]];
        self.current = 0;
    }

    /// Flatten the water without reallocating.
    pub fn clear(&mut self) {
        for g in &mut self.grids {
            g.fill(0);
        }
    }

    pub fn current(&self) -> &[i32] {
        &self.grids[self.current]
    }

    /// The grid the injector writes into.
    pub fn current_mut(&mut self) -> &mut [i32] {
        &mut self.grids[self.current]
    }

    pub fn previous(&self) -> &[i32] {
        &self.grids[1 - self.current]
    }

    /// Both grids still hold exactly `w*h` cells.
    pub fn check(&self) -> Result<(), Error> {
        self.dims.check_len(self.grids[0].len())?;
        self.dims.check_len(self.grids[1].len())
    }

    /// One propagation step. The next state is written over the "previous"
    /// grid (each `next[i]` only needs `prev[i]` from it), which is returned.
    /// Call [`swap`](Self::swap) after rendering to make it current.
    pub fn step(&mut self, damping: f32) -> Result<&[i32], Error> {
        self.check()?;
        let w = self.dims.width;
        let h = self.dims.height;
        let [a, b] = &mut self.grids;
        let (cur, prev) = if self.current == 0 { (&*a, b) } else { (&*b, a) };
        propagate(prev, cur, w, h, damping);
        Ok(&self.grids[1 - self.current])
    }

    /// Flip roles: the freshly propagated grid becomes "current".
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

/// Discrete damped wave step over the interior cells, in place over `prev`:
///
/// ```text
/// next = (left + right + up + down) / 2 - prev
/// next = next * damping
/// ```
///
/// Both the halving and the damping truncate toward zero. This only differs
/// from flooring for negative odd sums (`-3 / 2` is `-1`, floor gives `-2`)
/// and negative damped products (`-0.9` becomes `0`, floor gives `-1`);
/// flooring would leave a `-1` residue that never settles. The 1-pixel border
/// of `prev` is never written, so it keeps whatever was last stored there.
/// Lengths must both be `w*h`.
pub fn propagate(prev: &mut [i32], cur: &[i32], w: usize, h: usize, damping: f32) {
    debug_assert_eq!(prev.len(), w * h);
    debug_assert_eq!(cur.len(), w * h);
    if w < 3 || h < 3 {
        return; // no interior
    }
    for y in 1..h - 1 {
        let row = y * w;
        for x in 1..w - 1 {
            let i = row + x;
            let neighbours = cur[i - 1] + cur[i + 1] + cur[i - w] + cur[i + w];
            let next = neighbours / 2 - prev[i];
            prev[i] = (next as f32 * damping) as i32;
        }
    }
}
