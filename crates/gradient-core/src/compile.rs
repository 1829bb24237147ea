//! Gradient-to-geometry compiler.
//!
//! Turns a [`StopCollection`] into a horizontal strip in clip space whose
//! per-vertex colors, interpolated linearly across triangles, reproduce the
//! left-to-right gradient.
//!
//! Layout of the emitted buffers:
//! - two rows of `stop_count + 2` vertices, top row (`y = +1`) first
//! - within a row: left boundary extension, one vertex per stop in canonical
//!   order, right boundary extension
//! - both rows carry identical x and color values, so the strip has no
//!   vertical variation

use crate::collection::StopCollection;
use crate::stop::Stop;

/// Width of the normalized strip (clip space spans `[-1, 1]`).
pub const CLIP_SPACE_SIZE: f32 = 2.0;
pub const CLIP_SPACE_HALF: f32 = CLIP_SPACE_SIZE * 0.5;

/// Output of one compile. Superseded wholesale by the next compile.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGeometry {
    /// Clip-space `(x, y)` per vertex.
    pub positions: Vec<[f32; 2]>,
    /// Linear RGB per vertex; `colors[i]` belongs to `positions[i]`.
    pub colors: Vec<[f32; 3]>,
    /// Number of stops the geometry was compiled from.
    pub stop_count: usize,
}

impl CompiledGeometry {
    /// Vertices per row: every stop plus the two boundary extensions.
    #[inline]
    pub fn vertices_per_row(&self) -> usize {
        self.stop_count + 2
    }

    /// Column (segment) count of the strip subdivision.
    #[inline]
    pub fn columns(&self) -> usize {
        self.stop_count + 1
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn top_row(&self) -> &[[f32; 2]] {
        &self.positions[..self.vertices_per_row()]
    }

    pub fn bottom_row(&self) -> &[[f32; 2]] {
        &self.positions[self.vertices_per_row()..]
    }

    /// Triangle-list indices matching this geometry's vertex layout.
    pub fn indices(&self) -> Vec<u32> {
        strip_indices(self.columns())
    }

    fn push_row(&mut self, sorted: &[Stop], y: f32) {
        let last = sorted.len() - 1;
        for (index, stop) in sorted.iter().enumerate() {
            let x = stop.clip_x();
            let color = stop.color.to_array();

            // Boundary extensions: flat fill to the strip edge, or out to the
            // stop itself when it already sits beyond the edge. A stop lying
            // exactly on the edge yields a zero-width duplicate; that is kept.
            if index == 0 {
                self.push_vertex([x.min(-CLIP_SPACE_HALF), y], color);
            }

            self.push_vertex([x, y], color);

            if index == last {
                self.push_vertex([x.max(CLIP_SPACE_HALF), y], color);
            }
        }
    }

    #[inline]
    fn push_vertex(&mut self, position: [f32; 2], color: [f32; 3]) {
        self.positions.push(position);
        self.colors.push(color);
    }
}

/// Compiles `stops` into strip geometry.
///
/// Returns `None` for an empty collection; callers keep whatever geometry
/// they already display.
pub fn compile(stops: &StopCollection) -> Option<CompiledGeometry> {
    if stops.is_empty() {
        return None;
    }

    let sorted = stops.sorted();
    let per_row = sorted.len() + 2;

    let mut geometry = CompiledGeometry {
        positions: Vec::with_capacity(per_row * 2),
        colors: Vec::with_capacity(per_row * 2),
        stop_count: sorted.len(),
    };
    geometry.push_row(&sorted, CLIP_SPACE_HALF);
    geometry.push_row(&sorted, -CLIP_SPACE_HALF);

    debug_assert_eq!(geometry.positions.len(), per_row * 2);
    debug_assert_eq!(geometry.colors.len(), per_row * 2);

    log::trace!(
        "compiled {} stops into {} vertices",
        geometry.stop_count,
        geometry.vertex_count()
    );

    Some(geometry)
}

/// Triangle-list indices for a `columns x 1` grid.
///
/// The top row is vertices `0..=columns`, the bottom row follows immediately.
/// Each column contributes two counter-clockwise triangles.
pub fn strip_indices(columns: usize) -> Vec<u32> {
    let row = columns as u32 + 1;
    let mut out = Vec::with_capacity(columns * 6);
    for i in 0..columns as u32 {
        let top_left = i;
        let top_right = i + 1;
        let bottom_left = row + i;
        let bottom_right = row + i + 1;
        out.extend_from_slice(&[
            top_left,
            bottom_left,
            top_right,
            top_right,
            bottom_left,
            bottom_right,
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::stop::StopId;

    fn collection(stops: &[(u32, f32, Rgb)]) -> StopCollection {
        stops
            .iter()
            .map(|&(id, p, c)| Stop::new(StopId(id), p, c))
            .collect()
    }

    fn xs(row: &[[f32; 2]]) -> Vec<f32> {
        row.iter().map(|p| p[0]).collect()
    }

    // ── trivial cases ─────────────────────────────────────────────────────

    #[test]
    fn empty_collection_compiles_to_nothing() {
        assert!(compile(&StopCollection::new()).is_none());
    }

    #[test]
    fn vertex_counts_match_stop_count_plus_extensions() {
        for n in 1..=6u32 {
            let stops: StopCollection = (1..=n)
                .map(|i| Stop::new(StopId(i), i as f32 * 10.0, Rgb::WHITE))
                .collect();
            let g = compile(&stops).unwrap();
            let expected = 2 * (n as usize + 2);
            assert_eq!(g.positions.len(), expected);
            assert_eq!(g.colors.len(), expected);
            assert_eq!(g.columns(), n as usize + 1);
        }
    }

    #[test]
    fn compiling_twice_is_bit_identical() {
        let stops = collection(&[
            (4, 33.3, Rgb::new(0.1, 0.2, 0.3)),
            (1, -12.5, Rgb::BLUE),
            (9, 71.0, Rgb::RED),
        ]);
        let a = compile(&stops).unwrap();
        let b = compile(&stops).unwrap();
        let bits = |g: &CompiledGeometry| {
            let p: Vec<u32> = g.positions.iter().flatten().map(|v| v.to_bits()).collect();
            let c: Vec<u32> = g.colors.iter().flatten().map(|v| v.to_bits()).collect();
            (p, c)
        };
        assert_eq!(bits(&a), bits(&b));
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn default_stops_span_the_strip_blue_to_red() {
        let g = compile(&StopCollection::with_defaults()).unwrap();

        assert_eq!(xs(g.top_row()), vec![-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(xs(g.bottom_row()), vec![-1.0, -1.0, 1.0, 1.0]);
        assert!(g.top_row().iter().all(|p| p[1] == 1.0));
        assert!(g.bottom_row().iter().all(|p| p[1] == -1.0));

        let blue = Rgb::BLUE.to_array();
        let red = Rgb::RED.to_array();
        assert_eq!(g.colors[..4], [blue, blue, red, red]);
        assert_eq!(g.colors[4..], [blue, blue, red, red]);
    }

    #[test]
    fn ties_are_emitted_in_identity_order() {
        let a = Rgb::new(0.1, 0.0, 0.0);
        let b = Rgb::new(0.2, 0.0, 0.0);
        let c = Rgb::new(0.3, 0.0, 0.0);
        let g = compile(&collection(&[(3, 50.0, c), (1, 50.0, a), (2, 10.0, b)])).unwrap();

        // extension, id 2, id 1, id 3, extension
        let row: Vec<[f32; 3]> = g.colors[..5].to_vec();
        assert_eq!(row, vec![b.to_array(), b.to_array(), a.to_array(), c.to_array(), c.to_array()]);
        assert_eq!(xs(g.top_row()), vec![-1.0, -0.8, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn inner_stops_extend_flat_to_the_edges() {
        let g = compile(&collection(&[(1, 25.0, Rgb::BLUE), (2, 75.0, Rgb::RED)])).unwrap();
        assert_eq!(xs(g.top_row()), vec![-1.0, -0.5, 0.5, 1.0]);
        assert_eq!(g.colors[0], Rgb::BLUE.to_array());
        assert_eq!(g.colors[3], Rgb::RED.to_array());
    }

    #[test]
    fn off_screen_stops_keep_their_position() {
        let g = compile(&collection(&[(1, -50.0, Rgb::BLUE), (2, 150.0, Rgb::RED)])).unwrap();
        assert_eq!(xs(g.top_row()), vec![-2.0, -2.0, 2.0, 2.0]);
    }

    #[test]
    fn single_stop_beyond_range_still_covers_the_strip() {
        let color = Rgb::new(0.25, 0.5, 0.75);
        let g = compile(&collection(&[(1, 200.0, color)])).unwrap();

        assert_eq!(g.vertices_per_row(), 3);
        assert_eq!(xs(g.top_row()), vec![-1.0, 3.0, 3.0]);

        let min = g.positions.iter().map(|p| p[0]).fold(f32::INFINITY, f32::min);
        let max = g.positions.iter().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max);
        assert!(min <= -CLIP_SPACE_HALF);
        assert!(max >= CLIP_SPACE_HALF);
        assert!(g.colors.iter().all(|c| *c == color.to_array()));
    }

    #[test]
    fn rows_differ_only_in_y() {
        let g = compile(&collection(&[
            (1, 10.0, Rgb::BLUE),
            (2, 40.0, Rgb::WHITE),
            (3, 90.0, Rgb::RED),
        ]))
        .unwrap();
        let n = g.vertices_per_row();
        for i in 0..n {
            assert_eq!(g.positions[i][0], g.positions[n + i][0]);
            assert_eq!(g.colors[i], g.colors[n + i]);
            assert_eq!(g.positions[i][1], -g.positions[n + i][1]);
        }
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn strip_indices_cover_every_column() {
        let idx = strip_indices(2);
        assert_eq!(idx, vec![0, 3, 1, 1, 3, 4, 1, 4, 2, 2, 4, 5]);
    }

    #[test]
    fn indices_reference_only_emitted_vertices() {
        let g = compile(&StopCollection::with_defaults()).unwrap();
        let idx = g.indices();
        assert_eq!(idx.len(), g.columns() * 6);
        assert!(idx.iter().all(|&i| (i as usize) < g.vertex_count()));
    }
}
