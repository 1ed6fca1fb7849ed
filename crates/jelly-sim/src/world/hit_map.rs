//! A generation-stamped occupancy grid.

use aquamath::Point3D;

/// A square grid over the horizontal plane, centered on the origin, marking the cells near a set of
/// points.
///
/// Each cell stores the generation in which it was last marked, and a cell is hit when that matches
/// the current generation. [`HitMap::clear`] only advances the generation, so clearing is O(1) except
/// once every `u32::MAX` clears, when the counter wraps and every cell is reset.
#[must_use]
#[derive(Debug, Clone)]
pub struct HitMap {
    /// The number of cells along each side.
    size: usize,
    /// The radius, in cells, of the disc marked around each point.
    radius: usize,
    /// The side length of a cell.
    cell_size: f64,
    /// The current generation. Never `0`, which marks cells that were never hit.
    id: u32,
    /// The generation in which each cell was last marked, row by row.
    cells: Vec<u32>,
}

impl HitMap {
    /// Creates an empty `size × size` map of unit cells that marks a disc of `radius` cells around each
    /// point.
    ///
    /// # Errors
    ///
    /// - If `size` is zero.
    pub fn new(size: usize, radius: usize) -> Result<Self, String> {
        if size == 0 {
            return Err("A HitMap needs at least one cell.".to_string());
        }
        ftlog::debug!("Created a {size}x{size} HitMap with a marking radius of {radius}");
        Ok(Self {
            size,
            radius,
            cell_size: 1.0,
            id: 1,
            cells: vec![0; size * size],
        })
    }

    /// Sets the side length of a cell.
    ///
    /// # Errors
    ///
    /// - If `cell_size` is not a positive finite number.
    pub fn with_cell_size(mut self, cell_size: f64) -> Result<Self, String> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(format!("Cell size must be positive and finite, got {cell_size}."));
        }
        self.cell_size = cell_size;
        Ok(self)
    }

    /// The number of cells along each side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The radius, in cells, of the disc marked around each point.
    #[must_use]
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// The side length of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The current generation.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.id
    }

    /// The cell containing `(x, y)`, if it lies within `radius` cells of the map.
    ///
    /// Non-finite coordinates have no cell.
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn cell_of(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        let (size, reach) = (self.size as f64, self.radius as f64);
        let to_cell = |v: f64| {
            let c = (v / self.cell_size + size / 2.0).floor();
            (c >= -reach && c < size + reach).then_some(c as i64)
        };
        Some((to_cell(x)?, to_cell(y)?))
    }

    /// The index of cell `(cx, cy)`, if it lies on the map.
    fn index(&self, cx: i64, cy: i64) -> Option<usize> {
        let (cx, cy) = (usize::try_from(cx).ok()?, usize::try_from(cy).ok()?);
        (cx < self.size && cy < self.size).then_some(cy * self.size + cx)
    }

    /// Marks every cell within `radius` cells of each point, in the current generation.
    ///
    /// Only the horizontal coordinates of the points are used. Cells off the map are ignored, as are
    /// points with non-finite coordinates.
    #[expect(clippy::cast_possible_wrap)]
    pub fn add_points(&mut self, points: &[Point3D]) {
        let r = self.radius as i64;
        for p in points {
            let Some((cx, cy)) = self.cell_of(p.x, p.y) else {
                continue;
            };
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    if let Some(i) = self.index(cx + dx, cy + dy) {
                        self.cells[i] = self.id;
                    }
                }
            }
        }
    }

    /// Whether the cell containing `(x, y)` was marked in the current generation.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        self.cell_of(x, y)
            .and_then(|(cx, cy)| self.index(cx, cy))
            .is_some_and(|i| self.cells[i] == self.id)
    }

    /// Unmarks every cell.
    pub fn clear(&mut self) {
        self.id = self.id.wrapping_add(1);
        if self.id == 0 {
            ftlog::debug!("HitMap generation wrapped around; resetting all cells");
            self.cells.fill(0);
            self.id = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_around_resets_cells() -> Result<(), String> {
        let mut map = HitMap::new(8, 1)?;
        map.id = u32::MAX;
        map.add_points(&[Point3D::ZERO]);
        assert!(map.hit_test(0.0, 0.0));

        map.clear();
        assert_eq!(map.generation(), 1);
        assert!(map.cells.iter().all(|&c| c == 0));
        assert!(!map.hit_test(0.0, 0.0));

        // A stale stamp from generation 1 would otherwise reappear here.
        map.cells[0] = 1;
        map.id = u32::MAX;
        map.clear();
        assert!(!map.hit_test(-4.0, -4.0));
        Ok(())
    }

    #[test]
    fn cells_are_centered() -> Result<(), String> {
        let map = HitMap::new(4, 0)?.with_cell_size(0.5)?;
        assert_eq!(map.cell_of(0.0, 0.0), Some((2, 2)));
        assert_eq!(map.cell_of(-0.01, 0.0), Some((1, 2)));
        assert_eq!(map.cell_of(-1.0, -1.0), Some((0, 0)));
        assert_eq!(map.cell_of(1.0, 0.0), None);
        assert_eq!(map.index(4, 0), None);
        assert_eq!(map.index(-1, 0), None);
        Ok(())
    }

    #[test]
    fn cells_within_reach_of_the_map() -> Result<(), String> {
        let map = HitMap::new(4, 2)?;
        assert_eq!(map.cell_of(-4.0, 3.5), Some((-2, 5)));
        assert_eq!(map.cell_of(-4.01, 0.0), None);
        assert_eq!(map.cell_of(0.0, 4.0), None);
        assert_eq!(map.cell_of(f64::NAN, 0.0), None);
        assert_eq!(map.cell_of(0.0, f64::NEG_INFINITY), None);
        Ok(())
    }
}
