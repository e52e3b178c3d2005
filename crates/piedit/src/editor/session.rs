use super::animation::AnimatedPoint;
use super::drop::{
    DragEvent, DragState, DropContext, DropPayload, DropRejection, DropTarget,
    accept_drop_into,
};
use super::geometry::{Point, Rect};
use super::grid::{self, GridGeometry, PushApart};
use super::radial::RingLayout;
use super::{ADD_BUTTON_MARGIN, EditorEvent, ItemSlot, ItemState};
use crate::config::EditorSettings;
use derive_more::{Display, From};
use piekit::item::peek_type;
use piekit::{ItemCatalog, ItemConfig};

/// Stable handle of an item for as long as it is part of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct ItemId(u64);

#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub config: ItemConfig,
    pub state: ItemState,
    /// Set by the first layout pass.
    pub position: Option<AnimatedPoint>,
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Item(usize),
    Center,
    AddButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Item(ItemId),
    AddButton,
}

/// Where to draw one entity at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PlacementKind,
    pub state: ItemState,
    pub rect: Rect,
    pub selected: bool,
    pub dragged: bool,
}

/// Grid columns and drop cell of the previous overview pass.
type GridKey = (usize, Option<(usize, usize)>);

/// State of one editor surface.
///
/// The presence of a centre item switches between the overview grid and the
/// submenu ring. Every structural change requests a fresh animation which the next
/// [`EditorSession::allocate`] starts from wherever the items currently are.
pub struct EditorSession {
    settings: EditorSettings,
    catalog: Box<dyn ItemCatalog>,
    items: Vec<Item>,
    center: Option<Item>,
    add_button: Option<AnimatedPoint>,
    selected: Option<ItemId>,
    next_id: u64,
    drag: DragState,
    dragged: Option<ItemId>,
    grid: Option<GridGeometry>,
    size: Option<(f64, f64)>,
    restart_animation: bool,
    last_grid_key: Option<GridKey>,
    animating: bool,
}

impl EditorSession {
    pub fn new(settings: EditorSettings, catalog: impl ItemCatalog + 'static) -> Self {
        Self {
            settings,
            catalog: Box::new(catalog),
            items: Vec::new(),
            center: None,
            add_button: None,
            selected: None,
            next_id: 0,
            drag: DragState::Idle,
            dragged: None,
            grid: None,
            size: None,
            restart_animation: false,
            last_grid_key: None,
            animating: false,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
        self.restart_animation = true;
    }

    pub fn catalog(&self) -> &dyn ItemCatalog {
        self.catalog.as_ref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn center(&self) -> Option<&Item> {
        self.center.as_ref()
    }

    /// True while showing top-level menus rather than a submenu.
    pub fn is_overview(&self) -> bool {
        self.center.is_none()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items
            .iter()
            .chain(self.center.iter())
            .find(|item| item.id == id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .chain(self.center.iter_mut())
            .find(|item| item.id == id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn is_center(&self, id: ItemId) -> bool {
        self.center.as_ref().is_some_and(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<ItemSlot> {
        let id = self.selected?;
        if self.is_center(id) {
            return Some(ItemSlot::Center);
        }
        self.index_of(id).map(ItemSlot::Index)
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drag.target()
    }

    pub fn grid(&self) -> Option<&GridGeometry> {
        self.grid.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    fn create_item(&mut self, config: ItemConfig, state: ItemState) -> Item {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        Item {
            id,
            config,
            state,
            position: None,
        }
    }

    fn mode_state(&self) -> ItemState {
        if self.is_overview() {
            ItemState::Grid
        } else {
            ItemState::Child
        }
    }

    /// Replaces everything on the surface. A `parent` switches to the submenu ring
    /// with the parent in the middle.
    pub fn set_items(
        &mut self,
        configs: Vec<ItemConfig>,
        parent: Option<ItemConfig>,
        selected: Option<ItemSlot>,
    ) {
        let state = if parent.is_some() {
            ItemState::Child
        } else {
            ItemState::Grid
        };

        let items: Vec<Item> = configs
            .into_iter()
            .map(|config| self.create_item(config, state))
            .collect();
        let center = parent.map(|config| self.create_item(config, ItemState::Center));

        self.selected = match selected {
            Some(ItemSlot::Center) => center.as_ref().map(|c| c.id),
            Some(ItemSlot::Index(i)) => items.get(i).map(|item| item.id),
            None => None,
        };
        self.items = items;
        self.center = center;
        self.drag = DragState::Idle;
        self.dragged = None;
        self.restart_animation = true;

        log::debug!(
            "Showing {} items in {} mode",
            self.items.len(),
            if self.is_overview() { "overview" } else { "submenu" }
        );
    }

    /// Inserts a new item and selects it.
    ///
    /// # Panics
    /// If `at > items().len()`.
    pub fn add(&mut self, config: ItemConfig, at: usize) -> ItemId {
        let item = self.create_item(config, self.mode_state());
        let id = item.id;
        self.items.insert(at, item);
        self.selected = Some(id);
        self.restart_animation = true;
        log::debug!("Added item {} at {}", id, at);
        id
    }

    /// Takes an item off the surface and hands it back so that whatever was
    /// attached to its id can be released.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Item {
        let removed = self.items.remove(index);
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        if self.dragged == Some(removed.id) {
            self.dragged = None;
        }
        self.restart_animation = true;
        log::debug!("Removed item {} from {}", removed.id, index);
        removed
    }

    /// Swaps the config of the selected item, keeping its place and animation.
    pub fn update_selected(&mut self, config: ItemConfig) -> Option<ItemId> {
        let id = self.selected?;
        let item = self.item_mut(id)?;
        item.config = config;
        Some(id)
    }

    /// Lays everything out for a surface of the given size. Returns true when a new
    /// animation was started and the caller has to (re)arm its tick timer.
    pub fn allocate(&mut self, width: f64, height: f64, now: f64) -> bool {
        self.size = Some((width, height));
        let cell = self.settings.grid_item_size;
        let duration = self.settings.animation_ms;

        if self.is_overview() {
            let grid = GridGeometry::compute(self.items.len(), width, height, cell);
            let hint = self.drag.hint();

            let key = (grid.columns, hint.map(|h| (h.row, h.column)));
            if self.last_grid_key != Some(key) {
                self.last_grid_key = Some(key);
                self.restart_animation = true;
            }
            let restart = self.restart_animation;

            let push = PushApart {
                range: self.settings.push_range,
                strength: self.settings.push_strength,
            };
            let targets = grid.targets(self.items.len(), hint.as_ref(), push);

            if let Some((add_target, item_targets)) = targets.split_last() {
                for (item, target) in self.items.iter_mut().zip(item_targets) {
                    place(&mut item.position, target.from, target.to, now, duration, restart);
                }
                place(
                    &mut self.add_button,
                    add_target.from,
                    add_target.to,
                    now,
                    duration,
                    restart,
                );
            }

            self.grid = Some(grid);
        } else {
            let ring = RingLayout::compute(width, height, cell, self.settings.ring_radius());
            let fixed: Vec<Option<f64>> = self
                .items
                .iter()
                .map(|item| item.config.fixed_angle())
                .collect();
            let restart = self.restart_animation;

            for (item, target) in self.items.iter_mut().zip(ring.targets(&fixed)) {
                place(&mut item.position, target, target, now, duration, restart);
            }
            if let Some(center) = &mut self.center {
                place(
                    &mut center.position,
                    ring.center,
                    ring.center,
                    now,
                    duration,
                    restart,
                );
            }

            self.grid = None;
            self.last_grid_key = None;
        }

        let restart = std::mem::take(&mut self.restart_animation);
        if restart {
            self.animating = true;
        }
        log::trace!("Layout pass {}x{} (restart: {})", width, height, restart);
        restart
    }

    /// Size the surface asks for. In the overview the height follows the width,
    /// so that every row stays visible.
    pub fn preferred_size(&self) -> (f64, f64) {
        let cell = self.settings.grid_item_size;
        let width = grid::preferred_width(cell);
        if !self.is_overview() {
            return (width, width);
        }
        let for_width = self.size.map_or(width, |(w, _)| w);
        (width, grid::preferred_height(self.items.len(), for_width, cell))
    }

    /// Lays out again at the last known size.
    pub fn relayout(&mut self, now: f64) -> bool {
        match self.size {
            Some((width, height)) => self.allocate(width, height, now),
            None => false,
        }
    }

    /// Animation tick. Returns true once nothing moves anymore.
    pub fn update_positions(&mut self, now: f64) -> bool {
        let finished = self
            .items
            .iter()
            .chain(self.center.iter())
            .filter_map(|item| item.position.as_ref())
            .chain(self.add_button.iter())
            .all(|position| position.is_finished(now));

        if finished {
            self.animating = false;
        }
        finished
    }

    pub fn placements(&self, now: f64) -> Vec<Placement> {
        let cell = self.settings.grid_item_size;

        let mut placements: Vec<Placement> = self
            .items
            .iter()
            .chain(self.center.iter())
            .filter_map(|item| {
                let position = item.position.as_ref()?;
                let size = self.settings.item_size(item.state);
                let inset = (cell - size) / 2.0;
                Some(Placement {
                    kind: PlacementKind::Item(item.id),
                    state: item.state,
                    rect: Rect::square(position.get(now).offset(inset, inset), size),
                    selected: self.selected == Some(item.id),
                    dragged: self.dragged == Some(item.id),
                })
            })
            .collect();

        if let Some(rect) = self.add_button_cell(now) {
            let size = cell - 2.0 * ADD_BUTTON_MARGIN;
            placements.push(Placement {
                kind: PlacementKind::AddButton,
                state: ItemState::Grid,
                rect: Rect::new(
                    rect.x + ADD_BUTTON_MARGIN,
                    rect.y + ADD_BUTTON_MARGIN,
                    size,
                    size,
                ),
                selected: false,
                dragged: false,
            });
        }

        placements
    }

    fn add_button_cell(&self, now: f64) -> Option<Rect> {
        if !self.is_overview() {
            return None;
        }
        self.add_button
            .as_ref()
            .map(|position| Rect::square(position.get(now), self.settings.grid_item_size))
    }

    pub fn hit_test(&self, pointer: Point, now: f64) -> Option<Hit> {
        let placement = self
            .placements(now)
            .into_iter()
            .rev()
            .find(|p| p.rect.contains(pointer))?;

        match placement.kind {
            PlacementKind::AddButton => Some(Hit::AddButton),
            PlacementKind::Item(id) if self.is_center(id) => Some(Hit::Center),
            PlacementKind::Item(id) => self.index_of(id).map(Hit::Item),
        }
    }

    pub fn click(&mut self, hit: Hit, now: f64) -> Option<EditorEvent> {
        match hit {
            Hit::Item(index) => {
                self.selected = Some(self.items.get(index)?.id);
                Some(EditorEvent::Select(ItemSlot::Index(index)))
            }
            Hit::Center => {
                self.selected = Some(self.center.as_ref()?.id);
                Some(EditorEvent::Select(ItemSlot::Center))
            }
            Hit::AddButton => self.add_button_cell(now).map(EditorEvent::RequestAdd),
        }
    }

    /// Long presses open containers for editing.
    pub fn long_press(&mut self, hit: Hit) -> Option<EditorEvent> {
        let Hit::Item(index) = hit else {
            return None;
        };
        let item = self.items.get(index)?;
        if !self.catalog.is_container(&item.config) {
            return None;
        }
        self.selected = Some(item.id);
        Some(EditorEvent::Edit(index))
    }

    /// Starts dragging an item and returns its payload. The centre item and the
    /// add button cannot be dragged.
    pub fn prepare_drag(&mut self, hit: Hit) -> Option<String> {
        let Hit::Item(index) = hit else {
            return None;
        };
        let item = self.items.get(index)?;
        match item.config.to_payload() {
            Ok(payload) => {
                self.dragged = Some(item.id);
                Some(payload)
            }
            Err(e) => {
                log::error!("Failed to serialize item {}: {}", item.id, e);
                None
            }
        }
    }

    /// The item under the pointer if it would take the drop.
    fn container_at(&self, pointer: Point, now: f64) -> Option<usize> {
        let Some(Hit::Item(index)) = self.hit_test(pointer, now) else {
            return None;
        };
        let item = &self.items[index];
        let accepts = self.dragged != Some(item.id)
            && accept_drop_into(&item.config, self.is_center(item.id), self.catalog());
        accepts.then_some(index)
    }

    fn drop_context(&self, pointer: Point, now: f64) -> DropContext<'_> {
        DropContext {
            grid: self.grid.as_ref(),
            item_count: self.items.len(),
            drop_zone: self.settings.drop_zone(),
            container: self.container_at(pointer, now),
        }
    }

    /// Pointer moved during a drag. Returns true when the drop target changed.
    pub fn drag_motion(&mut self, pointer: Point, now: f64) -> bool {
        let before = self.drag.target();
        let next = self
            .drag
            .next(DragEvent::Motion(pointer), &self.drop_context(pointer, now));
        self.drag = next;
        before != self.drag.target()
    }

    /// The drag left the surface. Returns true when a target was cleared.
    pub fn drag_leave(&mut self) -> bool {
        let before = self.drag.target();
        self.drag = DragState::Idle;
        before.is_some()
    }

    /// A drag was released over the surface. On success the returned events
    /// describe what the owner of the menu tree has to do; nothing is changed here
    /// apart from the selection.
    pub fn drop(
        &mut self,
        payload: DropPayload,
        pointer: Point,
        now: f64,
    ) -> Result<Vec<EditorEvent>, DropRejection> {
        let dropped = self
            .drag
            .next(DragEvent::Drop(pointer), &self.drop_context(pointer, now));
        self.drag = DragState::Idle;
        let target = match dropped {
            DragState::Dropped { target, .. } => target,
            _ => None,
        };

        let result = match target {
            Some(DropTarget::Slot(hint)) => self.drop_at(payload, hint.index),
            Some(DropTarget::Item(index)) => self.drop_into(payload, index),
            // the dragged item itself or something that takes no drops
            None => match self.hit_test(pointer, now) {
                Some(Hit::Item(index)) => self.drop_into(payload, index),
                _ if self.is_overview() => Err(DropRejection::OutsideDropZone),
                _ => Err(DropRejection::NoContainerTarget),
            },
        };

        if let Err(rejection) = &result {
            log::warn!("Drop rejected: {}", rejection);
        }
        result
    }

    /// Inserting into the displayed level itself.
    fn drop_at(
        &self,
        payload: DropPayload,
        index: usize,
    ) -> Result<Vec<EditorEvent>, DropRejection> {
        match payload {
            DropPayload::Internal(payload) => {
                let kind = peek_type(&payload).map_err(|_| DropRejection::MalformedPayload)?;
                if self.is_overview() && !self.catalog.is_menu_type(&kind) {
                    return Err(DropRejection::ActionAsTopLevel);
                }
                Ok(vec![EditorEvent::DropItem { payload, index }])
            }
            DropPayload::External { .. } if self.is_overview() => {
                Err(DropRejection::ExternalAtTopLevel)
            }
            DropPayload::External { text, uri_list } => {
                Ok(DropPayload::data_entries(&text, uri_list)
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| EditorEvent::DropData {
                        text,
                        index: index + i,
                    })
                    .collect())
            }
        }
    }

    fn drop_into(
        &mut self,
        payload: DropPayload,
        target: usize,
    ) -> Result<Vec<EditorEvent>, DropRejection> {
        let item = &self.items[target];
        let id = item.id;
        if self.dragged == Some(id) {
            return Err(DropRejection::IntoItself);
        }
        if !accept_drop_into(&item.config, self.is_center(id), self.catalog()) {
            return Err(DropRejection::NoContainerTarget);
        }

        let events = match payload {
            DropPayload::Internal(payload) => {
                peek_type(&payload).map_err(|_| DropRejection::MalformedPayload)?;
                vec![EditorEvent::DropItemInto { payload, target }]
            }
            DropPayload::External { text, uri_list } => {
                DropPayload::data_entries(&text, uri_list)
                    .into_iter()
                    .map(|text| EditorEvent::DropDataInto { text, target })
                    .collect()
            }
        };

        self.selected = Some(id);
        Ok(events)
    }

    /// The drag source is done. A move removes the dragged item from its current
    /// position, wherever earlier drops may have shifted it.
    pub fn drag_finished(&mut self, delete: bool) -> Option<EditorEvent> {
        self.drag = DragState::Idle;
        let id = self.dragged.take()?;
        if !delete {
            return None;
        }
        let index = self.index_of(id)?;
        self.remove(index);
        Some(EditorEvent::Remove(index))
    }
}

fn place(
    slot: &mut Option<AnimatedPoint>,
    from: Point,
    to: Point,
    now: f64,
    duration: f64,
    restart: bool,
) {
    match slot {
        Some(point) => point.retarget(to, now, duration, restart),
        None => {
            let mut point = AnimatedPoint::appear(from, to);
            if restart {
                point.restart_window(now, duration);
            }
            *slot = Some(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::DropHint;
    use piekit::item::ItemName;
    use piekit::{BuiltinCatalog, ItemKind};

    const S: f64 = 128.0;

    fn menu(name: &str) -> ItemConfig {
        let mut config = ItemKind::CustomMenu.new_config();
        config.name = ItemName::new(name);
        config
    }

    fn action(name: &str) -> ItemConfig {
        let mut config = ItemKind::Command.new_config();
        config.name = ItemName::new(name);
        config
    }

    fn session() -> EditorSession {
        EditorSession::new(EditorSettings::default(), BuiltinCatalog)
    }

    fn overview(count: usize) -> EditorSession {
        let mut session = session();
        let menus = (0..count).map(|i| menu(&format!("menu {}", i))).collect();
        session.set_items(menus, None, None);
        session
    }

    fn submenu(children: Vec<ItemConfig>) -> EditorSession {
        let mut session = session();
        session.set_items(children, Some(menu("parent")), Some(ItemSlot::Center));
        session
    }

    fn names(session: &EditorSession) -> Vec<&str> {
        session
            .items()
            .iter()
            .map(|item| item.config.name.as_str())
            .collect()
    }

    fn center_of(session: &EditorSession, index: usize, now: f64) -> Point {
        let id = session.items()[index].id;
        session
            .placements(now)
            .iter()
            .find(|p| p.kind == PlacementKind::Item(id))
            .map(|p| p.rect.center())
            .unwrap()
    }

    #[test]
    fn test_add_then_remove() {
        let mut session = overview(4);
        let cfg = menu("new");

        session.add(cfg.clone(), 2);
        assert_eq!(session.items().len(), 5);
        assert_eq!(session.items()[2].config, cfg);
        assert_eq!(session.selected(), Some(ItemSlot::Index(2)));
        assert_eq!(session.items()[2].state, ItemState::Grid);

        let removed = session.remove(2);
        assert_eq!(removed.config, cfg);
        assert_eq!(session.items().len(), 4);
        assert_eq!(session.selected(), None);
    }

    #[test]
    #[should_panic]
    fn test_remove_out_of_range_panics() {
        let mut session = overview(2);
        session.remove(2);
    }

    #[test]
    fn test_set_items_selection() {
        let mut session = submenu(vec![action("a"), action("b")]);
        assert_eq!(session.selected(), Some(ItemSlot::Center));
        assert_eq!(session.center().map(|c| c.state), Some(ItemState::Center));
        assert!(session.items().iter().all(|i| i.state == ItemState::Child));

        session.set_items(vec![menu("x"), menu("y")], None, Some(ItemSlot::Index(1)));
        assert!(session.is_overview());
        assert_eq!(session.selected(), Some(ItemSlot::Index(1)));

        session.set_items(vec![menu("x")], None, Some(ItemSlot::Center));
        assert_eq!(session.selected(), None);

        session.set_items(vec![menu("x")], None, Some(ItemSlot::Index(7)));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_add_in_submenu_creates_child() {
        let mut session = submenu(vec![action("a")]);
        session.add(action("b"), 1);
        assert_eq!(session.items()[1].state, ItemState::Child);
        assert_eq!(session.selected(), Some(ItemSlot::Index(1)));
    }

    #[test]
    fn test_update_selected_in_place() {
        let mut session = overview(3);
        assert_eq!(session.update_selected(menu("nothing")), None);

        session.click(Hit::Item(1), 0.0);
        let id = session.items()[1].id;
        assert_eq!(session.update_selected(menu("renamed")), Some(id));
        assert_eq!(names(&session), vec!["menu 0", "renamed", "menu 2"]);
        assert_eq!(session.items()[1].id, id);
    }

    #[test]
    fn test_first_layout_slides_in() {
        let mut session = overview(2);
        assert!(session.allocate(3.0 * S, S, 0.0));

        let start = center_of(&session, 0, 0.0);
        let end = center_of(&session, 0, 200.0);
        assert_eq!(start, Point::new(0.0, S / 2.0));
        assert_eq!(end, Point::new(S / 2.0, S / 2.0));
        assert!(session.is_animating());

        assert!(!session.update_positions(100.0));
        assert!(session.update_positions(200.0));
        assert!(!session.is_animating());
    }

    #[test]
    fn test_restart_only_when_grid_changes() {
        let mut session = overview(5);
        assert!(session.allocate(3.5 * S, 3.0 * S, 0.0));
        assert!(!session.allocate(3.5 * S, 3.0 * S, 10.0));
        // same column count
        assert!(!session.allocate(3.9 * S, 3.0 * S, 20.0));
        assert!(session.allocate(4.0 * S, 3.0 * S, 30.0));
    }

    #[test]
    fn test_hint_change_restarts_from_current_position() {
        let mut session = overview(5);
        session.allocate(3.0 * S, 2.0 * S, 0.0);
        assert_eq!(session.grid().map(|g| g.columns), Some(3));

        let before = center_of(&session, 1, 100.0);
        assert!(session.drag_motion(Point::new(S, 10.0), 100.0));
        assert!(matches!(
            session.drop_target(),
            Some(DropTarget::Slot(DropHint { index: 1, .. }))
        ));
        assert!(session.allocate(3.0 * S, 2.0 * S, 100.0));
        assert_eq!(center_of(&session, 1, 100.0), before);

        // item 1 sits right of the drop column and moves right
        let settled = center_of(&session, 1, 300.0);
        assert_eq!(settled.x, 1.5 * S + 45.0);

        // moving within the same boundary band changes nothing
        assert!(!session.drag_motion(Point::new(S + 5.0, 20.0), 110.0));
        assert!(!session.allocate(3.0 * S, 2.0 * S, 120.0));

        assert!(session.drag_leave());
        assert_eq!(session.drop_target(), None);
        assert!(session.allocate(3.0 * S, 2.0 * S, 130.0));
    }

    #[test]
    fn test_preferred_size_follows_width() {
        let mut session = overview(7);
        assert_eq!(session.preferred_size(), (4.0 * S, 2.0 * S));

        session.allocate(3.0 * S, S, 0.0);
        assert_eq!(session.preferred_size(), (4.0 * S, 3.0 * S));
        assert!(session.grid().is_some_and(|g| g.offset.y < 0.0));

        // laid out at the height it asked for, nothing sticks out
        session.allocate(3.0 * S, 3.0 * S, 0.0);
        assert_eq!(session.grid().map(|g| g.offset.y), Some(0.0));

        let session = submenu(vec![action("a")]);
        assert_eq!(session.preferred_size(), (4.0 * S, 4.0 * S));
    }

    #[test]
    fn test_radial_layout() {
        let mut session = submenu(vec![action("left"), action("right").with_angle(90.0)]);
        session.allocate(600.0, 600.0, 0.0);

        let id = session.center().map(|c| c.id).unwrap();
        let center = session
            .placements(0.0)
            .into_iter()
            .find(|p| p.kind == PlacementKind::Item(id))
            .unwrap();
        assert_eq!(center.rect, Rect::new(250.0, 250.0, 100.0, 100.0));
        assert!(center.selected);

        let radius = (1.1 * S).round();
        let right = center_of(&session, 1, 0.0);
        assert_eq!(right, Point::new(300.0 + radius, 300.0));
        let left = center_of(&session, 0, 0.0);
        assert_eq!(left, Point::new(300.0 - radius, 300.0));
        assert!(session.placements(0.0).iter().all(|p| p.kind != PlacementKind::AddButton));
    }

    #[test]
    fn test_submenu_drop_on_action_is_rejected() {
        let mut session = submenu(vec![action("a"), menu("m")]);
        session.allocate(600.0, 600.0, 0.0);
        let payload = action("dragged").to_payload().unwrap();

        let pointer = center_of(&session, 0, 0.0);
        session.drag_motion(pointer, 0.0);
        let result = session.drop(DropPayload::Internal(payload), pointer, 0.0);

        assert_eq!(result, Err(DropRejection::NoContainerTarget));
        assert_eq!(names(&session), vec!["a", "m"]);
        assert_eq!(session.selected(), Some(ItemSlot::Center));
    }

    #[test]
    fn test_submenu_drop_on_empty_ring_is_rejected() {
        let mut session = submenu(vec![action("a")]);
        session.allocate(600.0, 600.0, 0.0);
        let payload = action("dragged").to_payload().unwrap();

        let result = session.drop(DropPayload::Internal(payload), Point::new(5.0, 5.0), 0.0);
        assert_eq!(result, Err(DropRejection::NoContainerTarget));
    }

    #[test]
    fn test_drop_into_container() {
        let mut session = submenu(vec![action("a"), menu("m")]);
        session.allocate(600.0, 600.0, 0.0);
        let payload = action("dragged").to_payload().unwrap();

        let pointer = center_of(&session, 1, 0.0);
        let events = session
            .drop(DropPayload::Internal(payload.clone()), pointer, 0.0)
            .unwrap();
        assert_eq!(events, vec![EditorEvent::DropItemInto { payload, target: 1 }]);
        assert_eq!(session.selected(), Some(ItemSlot::Index(1)));

        let events = session
            .drop(
                DropPayload::External {
                    text: "file:///a\nfile:///b\n".into(),
                    uri_list: true,
                },
                pointer,
                0.0,
            )
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            EditorEvent::DropDataInto {
                text: "file:///b".into(),
                target: 1
            }
        );
    }

    #[test]
    fn test_drop_on_center_is_rejected() {
        let mut session = submenu(vec![action("a"), action("b")]);
        session.allocate(600.0, 600.0, 0.0);
        let center = Point::new(300.0, 300.0);

        let payload = action("dragged").to_payload().unwrap();
        session.drag_motion(center, 0.0);
        let result = session.drop(DropPayload::Internal(payload), center, 0.0);
        assert_eq!(result, Err(DropRejection::NoContainerTarget));

        let result = session.drop(
            DropPayload::External {
                text: "https://a.org\r\nhttps://b.org".into(),
                uri_list: true,
            },
            center,
            0.0,
        );
        assert_eq!(result, Err(DropRejection::NoContainerTarget));
        assert_eq!(names(&session), vec!["a", "b"]);
        assert_eq!(session.selected(), Some(ItemSlot::Center));
    }

    #[test]
    fn test_submenu_drag_targets_containers_only() {
        let mut session = submenu(vec![action("a"), menu("m")]);
        session.allocate(600.0, 600.0, 0.0);

        assert!(session.drag_motion(center_of(&session, 1, 0.0), 0.0));
        assert_eq!(session.drop_target(), Some(DropTarget::Item(1)));
        assert_eq!(session.drop_target(), None);

        assert!(session.drag_motion(center_of(&session, 0, 0.0), 0.0));
        assert_eq!(session.drop_target(), None);

        session.drag_motion(center_of(&session, 1, 0.0), 0.0);
        assert!(session.drag_motion(Point::new(300.0, 300.0), 0.0));
        assert_eq!(session.drop_target(), None);

        session.drag_motion(center_of(&session, 1, 0.0), 0.0);
        assert!(session.drag_leave());
        assert_eq!(session.drop_target(), None);
    }

    #[test]
    fn test_dragged_container_is_no_target() {
        let mut session = submenu(vec![menu("m")]);
        session.allocate(600.0, 600.0, 0.0);
        session.prepare_drag(Hit::Item(0)).unwrap();

        assert!(!session.drag_motion(center_of(&session, 0, 0.0), 0.0));
        assert_eq!(session.drop_target(), None);
    }

    #[test]
    fn test_releasing_action_on_itself_is_silent() {
        let mut session = submenu(vec![action("a"), menu("m")]);
        session.allocate(600.0, 600.0, 0.0);
        let payload = session.prepare_drag(Hit::Item(0)).unwrap();

        let pointer = center_of(&session, 0, 0.0);
        let result = session.drop(DropPayload::Internal(payload), pointer, 0.0);
        assert_eq!(result, Err(DropRejection::IntoItself));
        assert!(!DropRejection::IntoItself.is_user_facing());
    }

    #[test]
    fn test_overview_cell_targets_its_menu() {
        let mut session = overview(3);
        session.allocate(4.0 * S, S, 0.0);

        assert!(session.drag_motion(center_of(&session, 1, 500.0), 500.0));
        assert_eq!(session.drop_target(), Some(DropTarget::Item(1)));
        // no slot, so nothing gets pushed apart
        assert!(!session.allocate(4.0 * S, S, 500.0));
    }

    #[test]
    fn test_overview_drop_checks_item_class() {
        let mut session = overview(5);
        session.allocate(3.0 * S, 2.0 * S, 0.0);
        let boundary = Point::new(2.0 * S, S + 10.0);

        session.drag_motion(boundary, 0.0);
        let result = session.drop(
            DropPayload::Internal(action("a").to_payload().unwrap()),
            boundary,
            0.0,
        );
        assert_eq!(result, Err(DropRejection::ActionAsTopLevel));
        assert_eq!(session.drop_target(), None);

        let payload = menu("m").to_payload().unwrap();
        let events = session
            .drop(DropPayload::Internal(payload.clone()), boundary, 0.0)
            .unwrap();
        assert_eq!(events, vec![EditorEvent::DropItem { payload, index: 5 }]);

        let result = session.drop(
            DropPayload::External {
                text: "hello".into(),
                uri_list: false,
            },
            boundary,
            0.0,
        );
        assert_eq!(result, Err(DropRejection::ExternalAtTopLevel));

        let result = session.drop(DropPayload::Internal("{".into()), boundary, 0.0);
        assert_eq!(result, Err(DropRejection::MalformedPayload));
    }

    #[test]
    fn test_overview_drop_inside_cell_goes_into_menu() {
        let mut session = overview(3);
        session.allocate(4.0 * S, S, 0.0);
        let pointer = center_of(&session, 2, 500.0);

        let payload = action("a").to_payload().unwrap();
        let events = session
            .drop(DropPayload::Internal(payload.clone()), pointer, 500.0)
            .unwrap();
        assert_eq!(events, vec![EditorEvent::DropItemInto { payload, target: 2 }]);
    }

    #[test]
    fn test_internal_move_within_overview() {
        let mut session = overview(3);
        session.allocate(4.0 * S, S, 0.0);

        let payload = session.prepare_drag(Hit::Item(0)).unwrap();
        assert!(session.placements(0.0)[0].dragged);

        // dropping the dragged menu into itself is refused silently
        let own = center_of(&session, 0, 500.0);
        let result = session.drop(DropPayload::Internal(payload.clone()), own, 500.0);
        assert_eq!(result, Err(DropRejection::IntoItself));

        // between the last menu and the add button
        let boundary = Point::new(3.0 * S, S / 2.0);
        session.drag_motion(boundary, 500.0);
        let events = session
            .drop(DropPayload::Internal(payload.clone()), boundary, 500.0)
            .unwrap();
        let EditorEvent::DropItem { payload, index } = &events[0] else {
            panic!("unexpected {:?}", events);
        };
        assert_eq!(*index, 3);

        // the owner inserts the copy, then the source removes the original
        session.add(ItemConfig::from_payload(payload).unwrap(), *index);
        assert_eq!(session.drag_finished(true), Some(EditorEvent::Remove(0)));
        assert_eq!(names(&session), vec!["menu 1", "menu 2", "menu 0"]);
        assert_eq!(session.selected(), Some(ItemSlot::Index(2)));
        assert!(session.placements(500.0).iter().all(|p| !p.dragged));
    }

    #[test]
    fn test_cancelled_drag_keeps_items() {
        let mut session = overview(2);
        session.allocate(4.0 * S, S, 0.0);
        session.prepare_drag(Hit::Item(1)).unwrap();
        assert_eq!(session.drag_finished(false), None);
        assert_eq!(session.items().len(), 2);
    }

    #[test]
    fn test_center_and_add_button_are_not_draggable() {
        let mut session = submenu(vec![action("a")]);
        assert!(session.prepare_drag(Hit::Center).is_none());
        assert!(session.prepare_drag(Hit::AddButton).is_none());
        assert!(session.prepare_drag(Hit::Item(0)).is_some());
    }

    #[test]
    fn test_long_press_edits_containers_only() {
        let mut session = submenu(vec![action("a"), menu("m")]);
        assert_eq!(session.long_press(Hit::Item(0)), None);
        assert_eq!(session.long_press(Hit::Center), None);
        assert_eq!(session.long_press(Hit::Item(1)), Some(EditorEvent::Edit(1)));
        assert_eq!(session.selected(), Some(ItemSlot::Index(1)));
    }

    #[test]
    fn test_click_selects_and_add_button_requests() {
        let mut session = overview(2);
        session.allocate(3.0 * S, S, 0.0);

        assert_eq!(
            session.click(Hit::Item(1), 0.0),
            Some(EditorEvent::Select(ItemSlot::Index(1)))
        );
        assert_eq!(session.selected(), Some(ItemSlot::Index(1)));

        let add = Point::new(2.5 * S, S / 2.0);
        assert_eq!(session.hit_test(add, 500.0), Some(Hit::AddButton));
        assert_eq!(
            session.click(Hit::AddButton, 500.0),
            Some(EditorEvent::RequestAdd(Rect::new(2.0 * S, 0.0, S, S)))
        );
    }

    #[test]
    fn test_hit_test_finds_center() {
        let mut session = submenu(vec![action("a")]);
        session.allocate(600.0, 600.0, 0.0);
        assert_eq!(session.hit_test(Point::new(300.0, 300.0), 0.0), Some(Hit::Center));
        assert_eq!(session.hit_test(Point::new(1.0, 1.0), 0.0), None);
    }
}
