//! Turning pointer positions during a drag into drop targets.

use super::geometry::Point;
use super::grid::GridGeometry;
use piekit::{ItemCatalog, ItemConfig};
use thiserror::Error;

/// Where a pending overview drop would be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropHint {
    pub row: usize,
    pub column: usize,
    pub index: usize,
}

/// What a pending drop would land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// An insertion slot of the overview grid.
    Slot(DropHint),
    /// The container item at this index.
    Item(usize),
}

/// Data arriving at the editor surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// A serialized item config dragged out of this editor.
    Internal(String),
    /// Text from another application. `uri_list` marks `text/uri-list` content,
    /// which carries one entry per line.
    External { text: String, uri_list: bool },
}

impl DropPayload {
    /// The individual pieces of external data, empty lines dropped.
    pub fn data_entries(text: &str, uri_list: bool) -> Vec<String> {
        if uri_list {
            text.lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            vec![text.to_string()]
        }
    }
}

/// Why a drop was refused. `Display` is the notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropRejection {
    #[error("Actions cannot be turned into toplevel menus.")]
    ActionAsTopLevel,
    #[error("You can only create new Action items inside of Custom Menus.")]
    ExternalAtTopLevel,
    #[error("Drop items onto a Custom Menu to move them there.")]
    NoContainerTarget,
    #[error("The dragged item could not be read.")]
    MalformedPayload,
    #[error("An item cannot be dropped into itself.")]
    IntoItself,
    #[error("Nothing to drop onto here.")]
    OutsideDropZone,
}

impl DropRejection {
    /// Some rejections are just a drop released over empty space.
    pub fn is_user_facing(self) -> bool {
        !matches!(self, Self::OutsideDropZone | Self::IntoItself)
    }
}

/// Only containers take drops, and never the centre item of a submenu.
pub fn accept_drop_into(target: &ItemConfig, is_center: bool, catalog: &dyn ItemCatalog) -> bool {
    !is_center && catalog.is_container(target)
}

/// Resolves an overview insertion slot. Only positions close to a column boundary
/// count; the inside of a cell yields `None`.
pub fn resolve_grid_hint(
    pointer: Point,
    grid: &GridGeometry,
    item_count: usize,
    drop_zone: f64,
) -> Option<DropHint> {
    let cell = grid.cell;
    let x = (pointer.x - grid.offset.x).clamp(0.0, grid.columns as f64 * cell);
    let y = (pointer.y - grid.offset.y).clamp(0.0, grid.rows as f64 * cell);

    let within = x.rem_euclid(cell);
    if within >= drop_zone && within <= cell - drop_zone {
        return None;
    }

    let column = (x / cell + 0.5).floor() as usize;
    let row = (y / cell).floor() as usize;

    Some(DropHint {
        row,
        column,
        index: item_count.min(grid.columns * row + column),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        pointer: Point,
        target: Option<DropTarget>,
    },
    Dropped {
        pointer: Point,
        target: Option<DropTarget>,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Motion(Point),
    Drop(Point),
    Leave,
}

/// What the resolver needs to know about the current layout.
#[derive(Debug, Clone, Copy)]
pub struct DropContext<'a> {
    /// `None` in submenu mode, where drops go into items instead of slots.
    pub grid: Option<&'a GridGeometry>,
    pub item_count: usize,
    pub drop_zone: f64,
    /// The item under the pointer, if it accepts drops.
    pub container: Option<usize>,
}

impl DropContext<'_> {
    /// A grid slot wins over the item beneath it.
    fn target_at(&self, pointer: Point) -> Option<DropTarget> {
        self.grid
            .and_then(|grid| resolve_grid_hint(pointer, grid, self.item_count, self.drop_zone))
            .map(DropTarget::Slot)
            .or(self.container.map(DropTarget::Item))
    }
}

impl DragState {
    pub fn next(self, event: DragEvent, ctx: &DropContext) -> Self {
        match event {
            DragEvent::Motion(pointer) => Self::Dragging {
                pointer,
                target: ctx.target_at(pointer),
            },
            DragEvent::Drop(pointer) => Self::Dropped {
                pointer,
                target: ctx.target_at(pointer),
            },
            DragEvent::Leave => Self::Cancelled,
        }
    }

    /// The target to visualize; only a live drag has one.
    pub fn target(&self) -> Option<DropTarget> {
        match self {
            Self::Dragging { target, .. } => *target,
            _ => None,
        }
    }

    /// The grid slot of a live drag, which also drives the push-apart layout.
    pub fn hint(&self) -> Option<DropHint> {
        match self.target() {
            Some(DropTarget::Slot(hint)) => Some(hint),
            _ => None,
        }
    }
}
