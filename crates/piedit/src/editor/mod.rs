//! The menu editing surface: layout, animation and drag & drop, independent of
//! any toolkit. The GTK front end feeds pointer input in and draws `placements`.

pub mod animation;
pub mod angles;
pub mod drop;
pub mod geometry;
pub mod grid;
pub mod radial;
pub mod session;

pub use animation::{AnimatedPoint, AnimatedValue};
pub use drop::{DragState, DropHint, DropPayload, DropRejection, DropTarget};
pub use geometry::{Point, Rect};
pub use session::{EditorSession, Hit, Item, ItemId, Placement, PlacementKind};

use derive_more::Display;
use strum::Display as StrumDisplay;

/// Margin between a grid cell and the add button drawn inside it.
pub const ADD_BUTTON_MARGIN: f64 = 32.0;

/// Determines an item's size and which layout positions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum ItemState {
    Grid,
    Center,
    Child,
}

/// Addresses the centre item or a position in the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemSlot {
    #[display("center")]
    Center,
    #[display("{_0}")]
    Index(usize),
}

/// Signals emitted towards whoever owns the menu tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Select(ItemSlot),
    Edit(usize),
    Remove(usize),
    DropItem { payload: String, index: usize },
    DropData { text: String, index: usize },
    DropItemInto { payload: String, target: usize },
    DropDataInto { text: String, target: usize },
    RequestAdd(Rect),
    Notification(DropRejection),
}

impl From<DropRejection> for EditorEvent {
    fn from(rejection: DropRejection) -> Self {
        Self::Notification(rejection)
    }
}
