//! Generic grid for spatial data

use crate::core::types::{GridPos, Vec2};

/// Generic 2D grid with configurable cell size, anchored at the world origin
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    pub fn in_bounds(&self, cell: GridPos) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Row-major index, `y * width + x`
    #[inline]
    pub fn index(&self, cell: GridPos) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width + cell.x as usize)
    }

    #[inline]
    pub fn get(&self, cell: GridPos) -> Option<&T> {
        self.index(cell).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, cell: GridPos) -> Option<&mut T> {
        self.index(cell).map(move |i| &mut self.data[i])
    }

    /// Write a cell; out-of-range cells are ignored
    #[inline]
    pub fn set(&mut self, cell: GridPos, value: T) {
        if let Some(i) = self.index(cell) {
            self.data[i] = value;
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Convert a world position to the cell containing it (floored, unclamped)
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> GridPos {
        GridPos::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Cell center in world coordinates
    pub fn cell_center(&self, cell: GridPos) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// In-bounds 4-connected neighbors, in N, E, S, W order
    pub fn neighbors4(&self, cell: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        const OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        OFFSETS
            .iter()
            .map(move |(dx, dy)| GridPos::new(cell.x + dx, cell.y + dy))
            .filter(move |n| self.in_bounds(*n))
    }
}
