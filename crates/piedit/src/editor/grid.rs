//! Overview layout: top-level menus in a centred grid followed by the add button.

use super::drop::DropHint;
use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub rows: usize,
    pub offset: Point,
    pub cell: f64,
}

/// Horizontal displacement that opens a gap around a pending drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushApart {
    pub range: u32,
    pub strength: f64,
}

/// Where a slot's entity comes from when it first appears, and where it belongs now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTarget {
    pub from: Point,
    pub to: Point,
}

impl GridGeometry {
    /// `item_count` excludes the trailing add button, which always gets a slot.
    pub fn compute(item_count: usize, width: f64, height: f64, cell: f64) -> Self {
        let slots = item_count + 1;
        let mut columns = ((width / cell).floor() as usize).max(1);
        let rows = slots.div_ceil(columns);

        // don't stretch a single row across the whole width
        if rows == 1 {
            columns = slots;
        }

        let offset = Point::new(
            (width - columns as f64 * cell) / 2.0,
            (height - rows as f64 * cell) / 2.0,
        );

        Self {
            columns,
            rows,
            offset,
            cell,
        }
    }

    /// `(row, column)` of a slot.
    pub fn slot(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    pub fn slot_origin(&self, index: usize) -> Point {
        let (row, column) = self.slot(index);
        Point::new(
            self.offset.x + column as f64 * self.cell,
            self.offset.y + row as f64 * self.cell,
        )
    }

    /// Entities slide in from half a cell to the left of their slot.
    pub fn slide_in_origin(&self, index: usize) -> Point {
        self.slot_origin(index).offset(-self.cell / 2.0, 0.0)
    }

    /// One target per slot, the last one being the add button.
    pub fn targets(
        &self,
        item_count: usize,
        hint: Option<&DropHint>,
        push: PushApart,
    ) -> Vec<SlotTarget> {
        (0..=item_count)
            .map(|i| {
                let (row, column) = self.slot(i);
                let dx = push_apart(row, column, hint, push);
                SlotTarget {
                    from: self.slide_in_origin(i),
                    to: self.slot_origin(i).offset(dx, 0.0),
                }
            })
            .collect()
    }
}

/// Items left of the drop column move left, the others move right. The offset
/// shrinks by `strength` per column of distance and vanishes after `range` columns.
pub fn push_apart(row: usize, column: usize, hint: Option<&DropHint>, push: PushApart) -> f64 {
    let Some(hint) = hint.filter(|h| h.row == row) else {
        return 0.0;
    };

    let range = i64::from(push.range);
    let (column, drop_column) = (column as i64, hint.column as i64);

    if column < drop_column {
        -((range - (drop_column - column) + 1).max(0) as f64) * push.strength
    } else {
        (range - (column - drop_column)).max(0) as f64 * push.strength
    }
}

/// Natural width of the editor surface, four cells.
pub fn preferred_width(cell: f64) -> f64 {
    cell * 4.0
}

/// Height the overview needs at the given width, add button included.
pub fn preferred_height(item_count: usize, for_width: f64, cell: f64) -> f64 {
    let columns = ((for_width / cell).floor() as usize).max(1);
    (item_count + 1).div_ceil(columns) as f64 * cell
}
