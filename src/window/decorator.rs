use std::fmt::Write as _;

use indoc::indoc;
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use super::{WindowMode, WindowSnapshot};
use crate::layout::floating::{self, HitRegion, ResizeEdge};
use crate::layout::{Bounds, Point, Size};
use crate::theme::{CLOSE_HOVER_BG, ThemeStyle};

/// Projects a window snapshot onto some output surface. Rendering never
/// mutates window state.
pub trait Renderer {
    type Target: ?Sized;

    fn render(&self, target: &mut Self::Target, window: &WindowSnapshot, style: &ThemeStyle);

    /// Uses the header height the snapshot was taken with, so renderers agree
    /// with [`WindowManager::hit_test`](super::WindowManager::hit_test).
    fn hit_test(&self, window: &WindowSnapshot, point: Point) -> Option<HitRegion> {
        floating::hit_test(
            window.visible_bounds,
            window.header_height,
            window.chrome_flags(),
            point,
        )
    }
}

/// Base rules a DOM host installs once. Everything that depends on window
/// state goes inline through [`CssWindow`].
pub const STYLESHEET: &str = indoc! {"
    .dom-wm-window {
        position: absolute;
        display: flex;
        flex-direction: column;
        box-sizing: border-box;
        border: 1px solid;
        border-radius: 6px;
        overflow: hidden;
        box-shadow: 0 4px 16px rgba(0, 0, 0, 0.25);
    }
    .dom-wm-window.minimized .dom-wm-content,
    .dom-wm-window.minimized .dom-wm-resizer {
        display: none;
    }
    .dom-wm-header {
        display: flex;
        align-items: center;
        padding: 0 12px;
        cursor: move;
        user-select: none;
    }
    .dom-wm-title {
        flex: 1;
        overflow: hidden;
        text-overflow: ellipsis;
        white-space: nowrap;
    }
    .dom-wm-control {
        width: 24px;
        height: 24px;
        margin-left: 5px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
    }
    .dom-wm-content {
        flex: 1;
        overflow: auto;
        padding: 10px;
    }
    .dom-wm-resizer {
        position: absolute;
    }
    .dom-wm-resizer.se { right: 0; bottom: 0; width: 15px; height: 15px; cursor: se-resize; }
    .dom-wm-resizer.e { right: 0; top: 0; width: 5px; height: 100%; cursor: e-resize; }
    .dom-wm-resizer.w { left: 0; top: 0; width: 5px; height: 100%; cursor: w-resize; }
    .dom-wm-resizer.s { left: 0; bottom: 0; width: 100%; height: 5px; cursor: s-resize; }
"};

/// Header control as the DOM shows it, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssControl {
    pub region: HitRegion,
    pub class: &'static str,
    pub label: &'static str,
    pub style: String,
    pub hover_style: String,
}

/// Everything a DOM host needs to draw one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssWindow {
    pub dom_id: String,
    pub classes: Vec<&'static str>,
    pub window_style: String,
    pub header_style: String,
    pub content_style: String,
    pub controls: Vec<CssControl>,
    pub resizers: Vec<ResizeEdge>,
    pub resizer_style: String,
    pub title: String,
    pub content: String,
}

impl CssWindow {
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    /// Markup for the whole window. The title is escaped; content is
    /// inserted as-is.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div id="{}" class="{}" style="{}">"#,
            self.dom_id,
            self.class_attr(),
            self.window_style
        );
        let _ = write!(
            html,
            r#"<div class="dom-wm-header" style="{}"><span class="dom-wm-title">{}</span>"#,
            self.header_style,
            escape_html(&self.title)
        );
        for control in &self.controls {
            let _ = write!(
                html,
                r#"<button class="dom-wm-control {}" style="{}">{}</button>"#,
                control.class, control.style, control.label
            );
        }
        html.push_str("</div>");
        let _ = write!(
            html,
            r#"<div class="dom-wm-content" style="{}">{}</div>"#,
            self.content_style, self.content
        );
        for edge in &self.resizers {
            let _ = write!(
                html,
                r#"<div class="dom-wm-resizer {}" style="{}"></div>"#,
                edge.css_name(),
                self.resizer_style
            );
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Emits inline CSS and class lists for DOM hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssRenderer;

impl Renderer for CssRenderer {
    type Target = Vec<CssWindow>;

    fn render(&self, target: &mut Vec<CssWindow>, window: &WindowSnapshot, style: &ThemeStyle) {
        let b = window.visible_bounds;
        let mut classes = vec!["dom-wm-window"];
        match window.mode {
            WindowMode::Normal => {}
            WindowMode::Minimized => classes.push("minimized"),
            WindowMode::Maximized => classes.push("maximized"),
        }
        if !window.resizable {
            classes.push("fixed-size");
        }

        let flags = window.chrome_flags();
        let button_style = format!("background: {};", style.button_bg);
        let mut controls = Vec::with_capacity(3);
        // document order is the reverse of the right-to-left hit layout
        if flags.allow_minimize {
            controls.push(CssControl {
                region: HitRegion::Minimize,
                class: "minimize",
                label: "\u{2212}",
                style: button_style.clone(),
                hover_style: format!("background: {};", style.button_hover_bg),
            });
        }
        if flags.allow_maximize {
            controls.push(CssControl {
                region: HitRegion::Maximize,
                class: "maximize",
                label: if window.mode == WindowMode::Maximized {
                    "\u{2750}"
                } else {
                    "\u{25a1}"
                },
                style: button_style.clone(),
                hover_style: format!("background: {};", style.button_hover_bg),
            });
        }
        controls.push(CssControl {
            region: HitRegion::Close,
            class: "close",
            label: "\u{00d7}",
            style: button_style,
            hover_style: format!("background: {};", CLOSE_HOVER_BG),
        });

        let resizers = floating::resize_handles_for_region(b, flags)
            .into_iter()
            .map(|handle| handle.edge)
            .collect();

        target.push(CssWindow {
            dom_id: window.id.to_string(),
            classes,
            window_style: format!(
                "left: {}px; top: {}px; width: {}px; height: {}px; z-index: {}; border-color: {};",
                b.x, b.y, b.width, b.height, window.z_index, style.border_color
            ),
            header_style: format!(
                "height: {}px; background: {}; color: {};",
                window.header_height,
                style.header_bg,
                style.header_text
            ),
            content_style: format!(
                "background: {}; color: {};",
                style.content_bg, style.content_text
            ),
            controls,
            resizers,
            resizer_style: format!("background: {};", style.resizer_color),
            title: window.title.clone(),
            content: window.content.clone(),
        });
    }
}

/// Draws window chrome into a ratatui buffer. Pixels map onto cells of
/// `cell_width`×`cell_height`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalDecorator {
    cell_width: u32,
    cell_height: u32,
}

impl Default for TerminalDecorator {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

impl TerminalDecorator {
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Pixel viewport covered by a terminal area.
    pub fn viewport_for(&self, area: Rect) -> Size {
        Size::new(
            u32::from(area.width) * self.cell_width,
            u32::from(area.height) * self.cell_height,
        )
    }

    /// Pixel at the center of a cell.
    pub fn cell_to_point(&self, column: u16, row: u16) -> Point {
        let px = |cell: u16, extent: u32| {
            i32::try_from(u32::from(cell) * extent + extent / 2).unwrap_or(i32::MAX)
        };
        Point::new(px(column, self.cell_width), px(row, self.cell_height))
    }

    /// Cells a pixel rectangle covers, clipped at the origin.
    pub fn to_cells(&self, bounds: Bounds) -> Rect {
        let cell = |px: i64, extent: u32| {
            px.div_euclid(i64::from(extent))
                .clamp(0, i64::from(u16::MAX)) as u16
        };
        let left = cell(i64::from(bounds.x), self.cell_width);
        let top = cell(i64::from(bounds.y), self.cell_height);
        let right = cell(i64::from(bounds.x) + i64::from(bounds.width), self.cell_width);
        let bottom = cell(i64::from(bounds.y) + i64::from(bounds.height), self.cell_height);
        Rect {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    fn header_rows(&self, header_height: u32) -> u16 {
        (header_height / self.cell_height).clamp(1, u32::from(u16::MAX)) as u16
    }
}

fn put(buffer: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    if let Some(cell) = buffer.cell_mut((x, y)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

/// Visible text of an HTML payload: tags dropped, whitespace collapsed.
fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Renderer for TerminalDecorator {
    type Target = Buffer;

    fn render(&self, buffer: &mut Buffer, window: &WindowSnapshot, style: &ThemeStyle) {
        let rect = self.to_cells(window.visible_bounds);
        if rect.width < 2 || rect.height < 1 {
            return;
        }
        let header_bg = style.header_bg.to_terminal();
        let header_style = Style::default()
            .bg(header_bg)
            .fg(style.header_text.to_terminal())
            .add_modifier(Modifier::BOLD);
        let border_style = Style::default()
            .fg(style.border_color.to_terminal())
            .bg(style.content_bg.to_terminal());
        let header_border_style = border_style.bg(header_bg);
        let content_style = Style::default()
            .bg(style.content_bg.to_terminal())
            .fg(style.content_text.to_terminal());

        let outer_left = rect.x;
        let outer_top = rect.y;
        let outer_right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let outer_bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        let header_end = outer_top
            .saturating_add(self.header_rows(window.header_height))
            .min(outer_bottom.saturating_add(1));
        let title_row = outer_top + header_end.saturating_sub(outer_top) / 2;

        // Header and content fill
        for y in outer_top..=outer_bottom {
            let fill = if y < header_end {
                header_style
            } else {
                content_style
            };
            for x in outer_left..=outer_right {
                put(buffer, x, y, " ", fill);
            }
        }

        // Title, left aligned after the border
        let controls_start = floating::header_buttons(
            window.visible_bounds,
            window.header_height,
            window.chrome_flags(),
        )
        .iter()
        .map(|button| self.to_cells(button.rect).x)
        .min()
        .unwrap_or(outer_right);
        let mut x = outer_left.saturating_add(2);
        for ch in window.title.chars() {
            if x.saturating_add(1) >= controls_start || x == u16::MAX {
                break;
            }
            put(buffer, x, title_row, &ch.to_string(), header_style);
            x = x.saturating_add(1);
        }

        // Header controls, placed where their pixel hit boxes land
        let button_style = header_style.bg(style.button_bg.over(style.header_bg).to_terminal());
        for button in floating::header_buttons(
            window.visible_bounds,
            window.header_height,
            window.chrome_flags(),
        ) {
            let glyph = match button.region {
                HitRegion::Close => "x",
                HitRegion::Maximize if window.mode == WindowMode::Maximized => "\u{2750}",
                HitRegion::Maximize => "\u{25a1}",
                HitRegion::Minimize => "_",
                _ => continue,
            };
            let cells = self.to_cells(button.rect);
            let cx = cells.x.saturating_add(cells.width / 2);
            put(buffer, cx, title_row, glyph, button_style);
        }

        // Content text, one wrapped paragraph
        if window.mode != WindowMode::Minimized {
            let inner_width = usize::from(rect.width.saturating_sub(4));
            let text = plain_text(&window.content);
            let chars: Vec<char> = text.chars().collect();
            if inner_width > 0 {
                for (row, chunk) in chars.chunks(inner_width).enumerate() {
                    let Ok(row) = u16::try_from(row) else { break };
                    let y = header_end.saturating_add(row);
                    if y >= outer_bottom {
                        break;
                    }
                    for (idx, ch) in chunk.iter().enumerate() {
                        let Ok(idx) = u16::try_from(idx) else { break };
                        let x = outer_left.saturating_add(2).saturating_add(idx);
                        if x >= outer_right {
                            break;
                        }
                        put(buffer, x, y, &ch.to_string(), content_style);
                    }
                }
            }
        }

        // Borders
        for x in outer_left..=outer_right {
            let symbol = if x == outer_left {
                "┌"
            } else if x == outer_right {
                "┐"
            } else {
                "─"
            };
            put(buffer, x, outer_top, symbol, header_border_style);
        }
        if outer_bottom > outer_top {
            for x in outer_left..=outer_right {
                let symbol = if x == outer_left {
                    "└"
                } else if x == outer_right {
                    "┘"
                } else {
                    "─"
                };
                let style = if outer_bottom < header_end {
                    header_border_style
                } else {
                    border_style
                };
                put(buffer, x, outer_bottom, symbol, style);
            }
        }
        for y in outer_top.saturating_add(1)..outer_bottom {
            let style = if y < header_end {
                header_border_style
            } else {
                border_style
            };
            put(buffer, outer_left, y, "│", style);
            put(buffer, outer_right, y, "│", style);
        }

        if window.chrome_flags().resizable && window.mode == WindowMode::Normal {
            let grip = Style::default()
                .fg(style.resizer_color.to_terminal())
                .bg(style.content_bg.to_terminal());
            put(buffer, outer_right, outer_bottom, "◢", grip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HEADER_HEIGHT;
    use crate::theme::{HeaderOverrides, ThemeSelection};
    use crate::window::WindowId;

    fn snapshot(mode: WindowMode) -> WindowSnapshot {
        let bounds = Bounds::new(80, 32, 320, 160);
        let visible_bounds = match mode {
            WindowMode::Minimized => Bounds {
                height: HEADER_HEIGHT,
                ..bounds
            },
            _ => bounds,
        };
        WindowSnapshot {
            id: WindowId::new(3),
            title: "Notes <draft>".into(),
            content: "<p>hello world</p>".into(),
            bounds,
            visible_bounds,
            header_height: HEADER_HEIGHT,
            mode,
            theme: ThemeSelection::default(),
            header: HeaderOverrides::default(),
            resizable: true,
            allow_minimize: true,
            allow_maximize: true,
            z_index: 12,
        }
    }

    #[test]
    fn css_renderer_emits_inline_geometry() {
        let mut out = Vec::new();
        CssRenderer.render(&mut out, &snapshot(WindowMode::Normal), &ThemeStyle::default());
        let window = &out[0];
        assert_eq!(window.dom_id, "window-3");
        assert_eq!(window.class_attr(), "dom-wm-window");
        assert!(window.window_style.starts_with(
            "left: 80px; top: 32px; width: 320px; height: 160px; z-index: 12;"
        ));
        assert!(window.header_style.contains("background: #888888"));
        let classes: Vec<_> = window.controls.iter().map(|c| c.class).collect();
        assert_eq!(classes, vec!["minimize", "maximize", "close"]);
        assert_eq!(window.resizers.len(), 4);
    }

    #[test]
    fn css_minimized_window_drops_resizers() {
        let mut out = Vec::new();
        CssRenderer.render(&mut out, &snapshot(WindowMode::Minimized), &ThemeStyle::default());
        let window = &out[0];
        assert_eq!(window.class_attr(), "dom-wm-window minimized");
        assert!(window.window_style.contains("height: 40px"));
        assert!(window.resizers.is_empty());
    }

    #[test]
    fn css_html_escapes_title_only() {
        let mut out = Vec::new();
        CssRenderer.render(&mut out, &snapshot(WindowMode::Normal), &ThemeStyle::default());
        let html = out[0].to_html();
        assert!(html.contains("Notes &lt;draft&gt;"));
        assert!(html.contains("<p>hello world</p>"));
        assert!(html.contains(r#"class="dom-wm-resizer se""#));
    }

    #[test]
    fn default_hit_test_uses_visible_bounds() {
        let window = snapshot(WindowMode::Minimized);
        assert_eq!(
            CssRenderer.hit_test(&window, Point::new(120, 40)),
            Some(HitRegion::Header)
        );
        assert_eq!(CssRenderer.hit_test(&window, Point::new(120, 150)), None);
    }

    #[test]
    fn terminal_cells_round_trip() {
        let deco = TerminalDecorator::new(8, 16);
        assert_eq!(deco.to_cells(Bounds::new(80, 32, 320, 160)), Rect::new(10, 2, 40, 10));
        assert_eq!(deco.cell_to_point(10, 2), Point::new(84, 40));
        assert_eq!(deco.viewport_for(Rect::new(0, 0, 100, 30)), Size::new(800, 480));
    }

    #[test]
    fn terminal_decorator_draws_frame_and_title() {
        let deco = TerminalDecorator::new(8, 16);
        let mut buffer = Buffer::empty(Rect::new(0, 0, 60, 20));
        deco.render(&mut buffer, &snapshot(WindowMode::Normal), &ThemeStyle::default());
        let symbol = |x: u16, y: u16| buffer.cell((x, y)).map(|c| c.symbol().to_string());
        assert_eq!(symbol(10, 2).as_deref(), Some("┌"));
        assert_eq!(symbol(49, 11).as_deref(), Some("◢"));
        assert_eq!(symbol(10, 11).as_deref(), Some("└"));
        assert_eq!(symbol(12, 3).as_deref(), Some("N"));
        // close glyph sits under its pixel hit box
        let close = floating::header_buttons(
            Bounds::new(80, 32, 320, 160),
            HEADER_HEIGHT,
            snapshot(WindowMode::Normal).chrome_flags(),
        )[0];
        let cells = deco.to_cells(close.rect);
        assert_eq!(symbol(cells.x + cells.width / 2, 3).as_deref(), Some("x"));
    }

    #[test]
    fn terminal_decorator_survives_last_buffer_columns() {
        let deco = TerminalDecorator::new(8, 16);
        let mut buffer = Buffer::empty(Rect::new(65530, 0, 5, 20));
        let mut window = snapshot(WindowMode::Normal);
        // two cells wide once clipped at the last column
        window.visible_bounds = Bounds::new(65533 * 8, 32, 320, 160);
        deco.render(&mut buffer, &window, &ThemeStyle::default());
        let corner = buffer.cell((65533, 2)).map(|c| c.symbol().to_string());
        assert_eq!(corner.as_deref(), Some("┌"));
    }

    #[test]
    fn stylesheet_covers_every_resizer_class() {
        for edge in ResizeEdge::ALL {
            let rule = format!(".dom-wm-resizer.{} {{", edge.css_name());
            assert!(STYLESHEET.contains(&rule), "missing {rule}");
        }
        assert!(!STYLESHEET.starts_with(' '));
    }

    #[test]
    fn plain_text_strips_markup() {
        assert_eq!(plain_text("<p>hello <b>big</b>\n world</p>"), "hello big world");
    }
}
