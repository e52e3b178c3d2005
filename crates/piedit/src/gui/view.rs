use super::theme::ThemeColors;
use crate::editor::grid::GridGeometry;
use crate::editor::{
    DropHint, DropTarget, EditorSession, ItemState, Placement, PlacementKind, Rect,
};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use piekit::icon::{self, IconName};
use std::collections::HashMap;
use std::f64::consts::PI;

const ICON_SIZE: i32 = 256;
const ICON_FILL: f64 = 0.5;
const DRAGGED_ALPHA: f64 = 0.35;
const CELL_PADDING: f64 = 6.0;
const CORNER_RADIUS: f64 = 12.0;
const HINT_WIDTH: f64 = 4.0;
const FONT_SIZE: f64 = 12.0;

/// Loaded pixbufs by icon name. Misses are remembered too.
#[derive(Default)]
pub struct IconCache {
    pixbufs: HashMap<IconName, Option<Pixbuf>>,
}

impl IconCache {
    pub fn get(&mut self, name: &IconName) -> Option<&Pixbuf> {
        self.pixbufs
            .entry(name.clone())
            .or_insert_with(|| {
                let path = icon::find_icon_path(name)?;
                Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
                    .inspect_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
                    .ok()
            })
            .as_ref()
    }

    pub fn clear(&mut self) {
        self.pixbufs.clear();
        icon::clear_cache();
    }
}

struct ItemRenderer<'a> {
    placement: &'a Placement,
    name: &'a str,
    pixbuf: Option<&'a Pixbuf>,
}

impl<'a> ItemRenderer<'a> {
    fn alpha(&self) -> f64 {
        if self.placement.dragged {
            DRAGGED_ALPHA
        } else {
            1.0
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_background(cr, colors)?;
        self.draw_icon(cr)?;
        if self.placement.state == ItemState::Grid {
            self.draw_name(cr, colors)?;
        }
        Ok(())
    }

    fn draw_background(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let color = if self.placement.selected {
            colors.selected
        } else if self.placement.state == ItemState::Center {
            colors.center
        } else {
            colors.item
        };
        set_color(cr, color, self.alpha());

        let rect = &self.placement.rect;
        match self.placement.state {
            ItemState::Grid => rounded_rect(
                cr,
                &Rect::new(
                    rect.x + CELL_PADDING,
                    rect.y + CELL_PADDING,
                    rect.width - 2.0 * CELL_PADDING,
                    rect.height - 2.0 * CELL_PADDING,
                ),
                CORNER_RADIUS,
            ),
            ItemState::Center | ItemState::Child => {
                let center = rect.center();
                cr.new_sub_path();
                cr.arc(center.x, center.y, rect.width / 2.0, 0.0, 2.0 * PI);
            }
        }
        cr.fill()
    }

    fn draw_icon(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(pixbuf) = self.pixbuf else {
            return Ok(());
        };
        let rect = &self.placement.rect;
        let icon_scale = rect.width * ICON_FILL / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        let mut center = rect.center();
        // leave room for the name below
        if self.placement.state == ItemState::Grid {
            center.y -= FONT_SIZE / 2.0;
        }

        cr.save()?;
        cr.translate(center.x - iw / 2.0, center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.alpha())?;
        cr.restore()
    }

    fn draw_name(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let rect = &self.placement.rect;
        set_color(cr, colors.text, self.alpha());
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(FONT_SIZE);
        if let Ok(ext) = cr.text_extents(self.name) {
            let width = ext.width().min(rect.width - 2.0 * CELL_PADDING);
            cr.move_to(
                rect.x + (rect.width - width) / 2.0,
                rect.y + rect.height - CELL_PADDING - FONT_SIZE,
            );
            cr.show_text(self.name)?;
        }
        Ok(())
    }
}

pub fn draw(
    cr: &Context,
    session: &EditorSession,
    now: f64,
    colors: &ThemeColors,
    icons: &mut IconCache,
) -> Result<(), cairo::Error> {
    let placements = session.placements(now);
    for placement in &placements {
        match placement.kind {
            PlacementKind::AddButton => draw_add_button(cr, &placement.rect, colors)?,
            PlacementKind::Item(id) => {
                let Some(item) = session.item(id) else {
                    continue;
                };
                ItemRenderer {
                    placement,
                    name: item.config.name.as_str(),
                    pixbuf: icons.get(&item.config.icon),
                }
                .draw(cr, colors)?;
            }
        }
    }

    match session.drop_target() {
        Some(DropTarget::Slot(hint)) => {
            if let Some(grid) = session.grid() {
                draw_drop_hint(cr, &hint, grid, colors)?;
            }
        }
        Some(DropTarget::Item(index)) => {
            let target = session.items().get(index).and_then(|item| {
                placements
                    .iter()
                    .find(|p| p.kind == PlacementKind::Item(item.id))
            });
            if let Some(placement) = target {
                draw_drop_outline(cr, placement, colors)?;
            }
        }
        None => {}
    }
    Ok(())
}

fn draw_add_button(cr: &Context, rect: &Rect, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let center = rect.center();
    let radius = rect.width / 2.0;
    set_color(cr, colors.add_button, 1.0);

    cr.set_line_width(2.0);
    cr.new_sub_path();
    cr.arc(center.x, center.y, radius - 1.0, 0.0, 2.0 * PI);
    cr.stroke()?;

    let arm = radius / 2.0;
    cr.move_to(center.x - arm, center.y);
    cr.line_to(center.x + arm, center.y);
    cr.move_to(center.x, center.y - arm);
    cr.line_to(center.x, center.y + arm);
    cr.stroke()
}

/// Insertion bar on the column boundary the pending drop would land on.
fn draw_drop_hint(
    cr: &Context,
    hint: &DropHint,
    grid: &GridGeometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let x = grid.offset.x + hint.column as f64 * grid.cell;
    let y = grid.offset.y + hint.row as f64 * grid.cell;
    set_color(cr, colors.drop_hint, 1.0);
    rounded_rect(
        cr,
        &Rect::new(
            x - HINT_WIDTH / 2.0,
            y + CELL_PADDING,
            HINT_WIDTH,
            grid.cell - 2.0 * CELL_PADDING,
        ),
        HINT_WIDTH / 2.0,
    );
    cr.fill()
}

/// Ring around the container that would receive the drop.
fn draw_drop_outline(
    cr: &Context,
    placement: &Placement,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let rect = &placement.rect;
    set_color(cr, colors.drop_hint, 1.0);
    cr.set_line_width(HINT_WIDTH);
    match placement.state {
        ItemState::Grid => rounded_rect(
            cr,
            &Rect::new(
                rect.x + CELL_PADDING,
                rect.y + CELL_PADDING,
                rect.width - 2.0 * CELL_PADDING,
                rect.height - 2.0 * CELL_PADDING,
            ),
            CORNER_RADIUS,
        ),
        ItemState::Center | ItemState::Child => {
            let center = rect.center();
            cr.new_sub_path();
            cr.arc(
                center.x,
                center.y,
                (rect.width - HINT_WIDTH) / 2.0,
                0.0,
                2.0 * PI,
            );
        }
    }
    cr.stroke()
}

fn set_color(cr: &Context, color: Srgba<f64>, alpha: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * alpha);
}

fn rounded_rect(cr: &Context, rect: &Rect, radius: f64) {
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    let r = radius.min(w / 2.0).min(h / 2.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}
