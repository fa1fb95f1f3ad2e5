//! Grid packing: choose rows, columns and a square cell size so that `n`
//! cells fit a container, keeping the grid close to the container's aspect.

use serde::{Deserialize, Serialize};

use crate::geometry::{Padding, Size, Vec2};

/// Result of packing `cell_count` square cells into a container.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cell_count: usize,
    pub rows: usize,
    pub columns: usize,
    /// Side of a square cell in pixels, spacing already subtracted. `None` when
    /// there is nothing to size (no cells, or a container with no area).
    pub cell_size: Option<f32>,
}

impl GridLayout {
    pub const EMPTY: GridLayout = GridLayout {
        cell_count: 0,
        rows: 0,
        columns: 0,
        cell_size: None,
    };

    /// Uniform scale for the item drawn inside a cell.
    pub fn item_scale(&self, item_scale: f32) -> Option<f32> {
        self.cell_size.map(|cell| cell * item_scale)
    }

    /// Top-left corner of cell `index`, filling rows left to right.
    pub fn cell_origin(&self, index: usize, padding: Padding, spacing: f32) -> Option<Vec2> {
        let cell = self.cell_size?;
        if index >= self.cell_count || self.columns == 0 {
            return None;
        }
        let stride = cell + spacing;
        let column = index % self.columns;
        let row = index / self.columns;
        Some(Vec2::new(
            padding.left + column as f32 * stride,
            padding.top + row as f32 * stride,
        ))
    }
}

/// Stateless grid sizing.
#[derive(Copy, Clone, Debug, Default)]
pub struct GridPacker;

impl GridPacker {
    /// Pack `cell_count` cells into `container` minus `padding`, leaving
    /// `spacing` pixels between cells.
    pub fn pack(cell_count: usize, container: Size, padding: Padding, spacing: f32) -> GridLayout {
        if cell_count == 0 {
            return GridLayout::EMPTY;
        }
        let usable = padding.shrink(container);
        let degenerate = usable.is_degenerate();
        let aspect = if degenerate { 1.0 } else { usable.aspect() };

        let n = cell_count as f32;
        let mut columns = (n * aspect).sqrt().floor() as usize;
        let mut rows = (n / aspect).sqrt().floor() as usize;

        // the rough estimate may fall short; grow the smaller side first
        while columns * rows < cell_count {
            if columns > rows {
                rows += 1;
            } else {
                columns += 1;
            }
        }

        let cell_size = if degenerate {
            None
        } else {
            let from_width = usable.width / columns as f32;
            let from_height = usable.height / rows as f32;
            Some((from_width.min(from_height) - spacing).max(0.0))
        };

        GridLayout {
            cell_count,
            rows,
            columns,
            cell_size,
        }
    }
}
