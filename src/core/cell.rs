/// One square of the grid.
///
/// A cell stores arena indices: positions of entities in the slice the grid was populated
/// from. Its extent is `[i * size, (i + 1) * size) x [j * size, (j + 1) * size)`.
#[derive(Debug, Clone)]
pub struct Cell {
    i: usize,
    j: usize,
    size: f64,
    entities: Vec<usize>,
}

impl Cell {
    pub(crate) fn new(i: usize, j: usize, size: f64) -> Self {
        Self {
            i,
            j,
            size,
            entities: Vec::new(),
        }
    }

    /// Column index (x axis).
    #[inline]
    pub fn i(&self) -> usize {
        self.i
    }

    /// Row index (y axis).
    #[inline]
    pub fn j(&self) -> usize {
        self.j
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Arena indices placed in this cell, in placement order.
    #[inline]
    pub fn entities(&self) -> &[usize] {
        &self.entities
    }

    /// Whether nothing has been placed here.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn place(&mut self, entity: usize) {
        self.entities.push(entity);
    }

    /// Lower-left corner of the cell.
    #[inline]
    pub fn origin(&self) -> (f64, f64) {
        (self.i as f64 * self.size, self.j as f64 * self.size)
    }

    /// Whether the cell's box intersects the closed disk of radius `r` centered at `(x, y)`.
    pub fn intersect_circle(&self, x: f64, y: f64, r: f64) -> bool {
        let (min_x, min_y) = self.origin();
        box_intersects_circle(min_x, min_y, self.size, x, y, r)
    }
}

/// Box `[min_x, min_x + size] x [min_y, min_y + size]` against a closed disk.
/// A negative or NaN radius describes no disk and intersects nothing.
pub(crate) fn box_intersects_circle(min_x: f64, min_y: f64, size: f64, x: f64, y: f64, r: f64) -> bool {
    if r.is_nan() || r < 0.0 {
        return false;
    }
    let nearest_x = x.clamp(min_x, min_x + size);
    let nearest_y = y.clamp(min_y, min_y + size);
    let dx = x - nearest_x;
    let dy = y - nearest_y;
    dx * dx + dy * dy <= r * r
}
