use crate::config::{self, Config};
use crate::editor::{DropPayload, EditorEvent, EditorSession, ItemSlot, Point, Rect};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::ticker::Ticker;
use crate::gui::tree::{MenuTree, TreeChange};
use crate::gui::view::{self, IconCache};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use piekit::{BuiltinCatalog, ItemClass, ItemKind};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Milliseconds on the monotonic clock, the time base of all animations.
fn now_ms() -> f64 {
    glib::monotonic_time() as f64 / 1000.0
}

/// The drawing area and the session it shows, shared with the GTK callbacks.
#[derive(Clone)]
struct Surface {
    session: Rc<RefCell<EditorSession>>,
    area: gtk::DrawingArea,
    ticker: Rc<RefCell<Ticker>>,
    icons: Rc<RefCell<IconCache>>,
}

impl Surface {
    fn new(session: EditorSession) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            area: gtk::DrawingArea::default(),
            ticker: Rc::new(RefCell::new(Ticker::default())),
            icons: Rc::new(RefCell::new(IconCache::default())),
        }
    }

    fn relayout(&self) {
        let restarted = self.session.borrow_mut().relayout(now_ms());
        self.after_layout(restarted);
    }

    fn after_layout(&self, restarted: bool) {
        let stalled = self.session.borrow().is_animating() && !self.ticker.borrow().is_armed();
        if restarted || stalled {
            self.arm_ticker();
        }
        let (width, height) = self.session.borrow().preferred_size();
        self.area.set_content_width(width.ceil() as i32);
        self.area.set_content_height(height.ceil() as i32);
        self.area.queue_draw();
    }

    /// Replaces any running tick source with a fresh one. The source ends
    /// itself once every animation has finished.
    fn arm_ticker(&self) {
        self.ticker.borrow_mut().stop();

        let interval = Duration::from_millis(self.session.borrow().settings().tick_ms);
        let surface = self.clone();
        let source = glib::timeout_add_local(interval, move || {
            let finished = surface.session.borrow_mut().update_positions(now_ms());
            surface.area.queue_draw();
            if finished {
                surface.ticker.borrow_mut().finish();
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
        self.ticker.borrow_mut().arm(source);
    }
}

pub struct AppModel {
    surface: Surface,
    tree: MenuTree,
    title: String,
    at_root: bool,
    notice: Option<String>,
    notice_serial: u64,
    add_popover: gtk::Popover,
    add_buttons: Vec<(ItemKind, gtk::Button)>,
    root: gtk::ApplicationWindow,
}

#[derive(Debug)]
pub enum AppMsg {
    Present,
    ConfigReload,
    Editor(EditorEvent),
    DragFinished(bool),
    Back,
    AddItem(ItemKind),
    DeleteSelected,
    DismissNotice(u64),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Present => AppMsg::Present,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Menu Editor"),
            set_default_size: (800, 600),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Delete => sender.input(AppMsg::DeleteSelected),
                        gtk::gdk::Key::Escape | gtk::gdk::Key::BackSpace => {
                            sender.input(AppMsg::Back)
                        }
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,
                    set_margin_all: 6,

                    gtk::Button {
                        set_icon_name: "go-previous-symbolic",
                        set_tooltip_text: Some("Back"),
                        #[watch]
                        set_sensitive: !model.at_root,
                        connect_clicked => AppMsg::Back,
                    },

                    gtk::Label {
                        set_hexpand: true,
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.title,
                    },

                    gtk::Button {
                        set_icon_name: "user-trash-symbolic",
                        set_tooltip_text: Some("Delete the selected item"),
                        connect_clicked => AppMsg::DeleteSelected,
                    },
                },

                gtk::Overlay {
                    gtk::ScrolledWindow {
                        set_hscrollbar_policy: gtk::PolicyType::Never,

                        #[name = "drawing_area"]
                        gtk::DrawingArea {
                            set_hexpand: true,
                            set_vexpand: true,
                        },
                    },

                    add_overlay = &gtk::Revealer {
                        set_halign: gtk::Align::Center,
                        set_valign: gtk::Align::End,
                        set_margin_bottom: 12,
                        #[watch]
                        set_reveal_child: model.notice.is_some(),

                        gtk::Label {
                            add_css_class: "piedit-notice",
                            #[watch]
                            set_label: model.notice.as_deref().unwrap_or_default(),
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let (add_popover, add_buttons) = build_add_popover(&sender);
        let mut model = AppModel {
            surface: Surface::new(EditorSession::new(config.editor, BuiltinCatalog)),
            tree: MenuTree::new(config.menus),
            title: String::new(),
            at_root: true,
            notice: None,
            notice_serial: 0,
            add_popover,
            add_buttons,
            root: root.clone(),
        };

        let widgets = view_output!();

        model.surface.area = widgets.drawing_area.clone();
        model.add_popover.set_parent(&widgets.drawing_area);
        attach_surface(&model.surface, &sender);
        model.show_level(None);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Present => self.root.present(),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.tree = MenuTree::new(new_config.menus);
                    self.surface
                        .session
                        .borrow_mut()
                        .set_settings(new_config.editor);
                    self.surface.icons.borrow_mut().clear();
                    self.show_level(None);
                    log::info!("Configuration reloaded, {} menus", self.tree.menus().len());
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Editor(event) => self.handle_editor_event(event, &sender),
            AppMsg::DragFinished(delete) => {
                let event = self.surface.session.borrow_mut().drag_finished(delete);
                if let Some(event) = event {
                    self.handle_editor_event(event, &sender);
                }
                self.surface.relayout();
            }
            AppMsg::Back => {
                if let Some(index) = self.tree.back() {
                    self.show_level(Some(ItemSlot::Index(index)));
                }
            }
            AppMsg::AddItem(kind) => self.add_item(kind),
            AppMsg::DeleteSelected => self.delete_selected(),
            AppMsg::DismissNotice(serial) => {
                if serial == self.notice_serial {
                    self.notice = None;
                }
            }
        }
    }
}

impl AppModel {
    /// Puts the tree's current level on the surface.
    fn show_level(&mut self, selected: Option<ItemSlot>) {
        let items = self.tree.level().to_vec();
        let parent = self.tree.parent().cloned();
        self.title = self.tree.title();
        self.at_root = self.tree.is_root();

        self.surface
            .session
            .borrow_mut()
            .set_items(items, parent, selected);
        self.surface.relayout();
    }

    fn handle_editor_event(&mut self, event: EditorEvent, sender: &ComponentSender<Self>) {
        match &event {
            EditorEvent::Select(slot) => {
                log::debug!("Selected {}", slot);
                self.surface.area.queue_draw();
                return;
            }
            EditorEvent::RequestAdd(rect) => {
                self.request_add(rect);
                return;
            }
            EditorEvent::Notification(rejection) => {
                if rejection.is_user_facing() {
                    self.notify(rejection.to_string(), sender);
                }
                return;
            }
            _ => {}
        }

        let change = {
            let session = self.surface.session.borrow();
            self.tree.apply(&event, session.catalog())
        };

        match change {
            Ok(TreeChange::Entered(_)) => self.show_level(Some(ItemSlot::Center)),
            Ok(TreeChange::Inserted { index, config }) => {
                self.surface.session.borrow_mut().add(config, index);
                self.surface.relayout();
            }
            Ok(TreeChange::Nested(target)) => {
                if let Some(config) = self.tree.level().get(target).cloned() {
                    self.surface.session.borrow_mut().update_selected(config);
                }
                self.surface.area.queue_draw();
            }
            Ok(TreeChange::Removed(index)) => {
                log::debug!("Removed item {} from the menu tree", index);
            }
            Ok(TreeChange::Unchanged) => {}
            Err(e) => {
                log::error!("Failed to apply {:?}: {}", event, e);
                self.notify(e.to_string(), sender);
            }
        }
    }

    fn request_add(&self, rect: &Rect) {
        let overview = self.surface.session.borrow().is_overview();
        for (kind, button) in &self.add_buttons {
            button.set_sensitive(!overview || kind.class() == ItemClass::Menu);
        }

        let rect = gdk::Rectangle::new(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        );
        self.add_popover.set_pointing_to(Some(&rect));
        self.add_popover.popup();
    }

    fn add_item(&mut self, kind: ItemKind) {
        let config = kind.new_config();
        let index = self.tree.level().len();

        match self.tree.insert(index, config.clone()) {
            Ok(()) => {
                self.surface.session.borrow_mut().add(config, index);
                self.surface.relayout();
            }
            Err(e) => log::error!("Failed to add {}: {}", kind, e),
        }
    }

    fn delete_selected(&mut self) {
        let selected = self.surface.session.borrow().selected();
        let Some(ItemSlot::Index(index)) = selected else {
            return;
        };

        match self.tree.remove(index) {
            Ok(removed) => {
                self.surface.session.borrow_mut().remove(index);
                self.surface.relayout();
                log::debug!("Deleted '{}'", removed.name);
            }
            Err(e) => log::error!("Failed to delete item {}: {}", index, e),
        }
    }

    fn notify(&mut self, text: String, sender: &ComponentSender<Self>) {
        self.notice_serial += 1;
        self.notice = Some(text);

        let serial = self.notice_serial;
        let sender = sender.clone();
        glib::timeout_add_local_once(NOTICE_TIMEOUT, move || {
            sender.input(AppMsg::DismissNotice(serial));
        });
    }
}

fn build_add_popover(
    sender: &ComponentSender<AppModel>,
) -> (gtk::Popover, Vec<(ItemKind, gtk::Button)>) {
    let popover = gtk::Popover::new();
    let list = gtk::Box::new(gtk::Orientation::Vertical, 0);

    let buttons: Vec<(ItemKind, gtk::Button)> = BuiltinCatalog
        .kinds()
        .map(|kind| {
            let button = gtk::Button::builder()
                .label(kind.label())
                .tooltip_text(kind.subtitle())
                .has_frame(false)
                .halign(gtk::Align::Fill)
                .build();

            let sender = sender.clone();
            let popover = popover.clone();
            button.connect_clicked(move |_| {
                popover.popdown();
                sender.input(AppMsg::AddItem(kind));
            });

            list.append(&button);
            (kind, button)
        })
        .collect();

    popover.set_child(Some(&list));
    (popover, buttons)
}

/// Internal drags come with a `gdk::Drag` of this process.
fn is_internal(target: &gtk::DropTarget) -> bool {
    target.current_drop().and_then(|d| d.drag()).is_some()
}

fn is_uri_list(target: &gtk::DropTarget) -> bool {
    target
        .current_drop()
        .is_some_and(|d| d.formats().contain_mime_type("text/uri-list"))
}

/// Hooks drawing, sizing, gestures and drag and drop of the drawing area up to the
/// session.
fn attach_surface(surface: &Surface, sender: &ComponentSender<AppModel>) {
    let area = &surface.area;

    {
        let session = surface.session.clone();
        let icons = surface.icons.clone();
        area.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = view::draw(
                cr,
                &session.borrow(),
                now_ms(),
                &colors,
                &mut icons.borrow_mut(),
            ) {
                log::error!("Drawing error: {}", e);
            }
        });
    }

    {
        let surface = surface.clone();
        area.connect_resize(move |_, width, height| {
            let restarted =
                surface
                    .session
                    .borrow_mut()
                    .allocate(width as f64, height as f64, now_ms());
            surface.after_layout(restarted);
        });
    }

    // a long press must not also count as a click on release
    let long_pressed = Rc::new(Cell::new(false));

    let click = gtk::GestureClick::new();
    {
        let long_pressed = long_pressed.clone();
        click.connect_pressed(move |_, _, _, _| long_pressed.set(false));
    }
    {
        let surface = surface.clone();
        let sender = sender.clone();
        let long_pressed = long_pressed.clone();
        click.connect_released(move |_, _, x, y| {
            if long_pressed.get() {
                return;
            }
            let now = now_ms();
            let event = {
                let mut session = surface.session.borrow_mut();
                session
                    .hit_test(Point::new(x, y), now)
                    .and_then(|hit| session.click(hit, now))
            };
            if let Some(event) = event {
                sender.input(AppMsg::Editor(event));
            }
        });
    }
    area.add_controller(click);

    let long_press = gtk::GestureLongPress::new();
    {
        let surface = surface.clone();
        let sender = sender.clone();
        long_press.connect_pressed(move |_, x, y| {
            let event = {
                let mut session = surface.session.borrow_mut();
                session
                    .hit_test(Point::new(x, y), now_ms())
                    .and_then(|hit| session.long_press(hit))
            };
            if let Some(event) = event {
                long_pressed.set(true);
                sender.input(AppMsg::Editor(event));
            }
        });
    }
    area.add_controller(long_press);

    let drag_source = gtk::DragSource::new();
    drag_source.set_actions(gdk::DragAction::MOVE);
    {
        let surface = surface.clone();
        drag_source.connect_prepare(move |_, x, y| {
            let mut session = surface.session.borrow_mut();
            let hit = session.hit_test(Point::new(x, y), now_ms())?;
            let payload = session.prepare_drag(hit)?;
            Some(gdk::ContentProvider::for_value(&payload.to_value()))
        });
    }
    {
        let surface = surface.clone();
        drag_source.connect_drag_begin(move |_, _| surface.area.queue_draw());
    }
    {
        let sender = sender.clone();
        drag_source.connect_drag_end(move |_, _, delete| {
            sender.input(AppMsg::DragFinished(delete));
        });
    }
    drag_source.connect_drag_cancel(|_, _, reason| {
        log::debug!("Drag cancelled: {:?}", reason);
        false
    });
    area.add_controller(drag_source);

    let drop_target = gtk::DropTarget::new(
        glib::Type::STRING,
        gdk::DragAction::COPY | gdk::DragAction::MOVE,
    );
    {
        let surface = surface.clone();
        drop_target.connect_motion(move |target, x, y| {
            let changed = surface
                .session
                .borrow_mut()
                .drag_motion(Point::new(x, y), now_ms());
            if changed {
                surface.relayout();
            }
            if is_internal(target) {
                gdk::DragAction::MOVE
            } else {
                gdk::DragAction::COPY
            }
        });
    }
    {
        let surface = surface.clone();
        drop_target.connect_leave(move |_| {
            let cleared = surface.session.borrow_mut().drag_leave();
            if cleared {
                surface.relayout();
            }
        });
    }
    {
        let surface = surface.clone();
        let sender = sender.clone();
        drop_target.connect_drop(move |target, value, x, y| {
            let Ok(text) = value.get::<String>() else {
                return false;
            };
            let payload = if is_internal(target) {
                DropPayload::Internal(text)
            } else {
                DropPayload::External {
                    text,
                    uri_list: is_uri_list(target),
                }
            };

            let result = surface
                .session
                .borrow_mut()
                .drop(payload, Point::new(x, y), now_ms());
            surface.relayout();

            match result {
                Ok(events) => {
                    for event in events {
                        sender.input(AppMsg::Editor(event));
                    }
                    true
                }
                Err(rejection) => {
                    sender.input(AppMsg::Editor(rejection.into()));
                    false
                }
            }
        });
    }
    area.add_controller(drop_target);
}
