/// The handset screen as a `Platform`.
///
/// Handset pixels map onto a cell canvas, 2 px per column and 4 px per row,
/// so the 128x146 reference screen becomes 64x37 cells. Drawing goes to
/// `canvas`; `present` copies it to `visible`, which is what the renderer
/// puts in the bezel. Images are sprites cut from the bundle.

use anyhow::Result;
use crossterm::style::Color;
use log::trace;

use crate::domain::asset::{Font, ImageId, Point, StringId};
use crate::sim::platform::{DeviceInfo, Platform, Rect};
use crate::sim::widgets::{ChoiceMenu, TextPanel};
use crate::ui::bundle::{Bundle, ImageArt};
use crate::ui::renderer::{Cell, FrameBuffer};

pub const PX_PER_COL: i32 = 2;
pub const PX_PER_ROW: i32 = 4;

const PAPER: Color = Color::Rgb { r: 232, g: 232, b: 216 };
const INK: Color = Color::Rgb { r: 16, g: 16, b: 16 };
const PANEL_PAPER: Color = Color::Rgb { r: 250, g: 246, b: 228 };
const PANEL_EDGE: Color = Color::Rgb { r: 110, g: 70, b: 40 };
const MENU_PAPER: Color = Color::Rgb { r: 228, g: 236, b: 250 };
const MENU_EDGE: Color = Color::Rgb { r: 40, g: 60, b: 120 };
const HIGHLIGHT: Color = Color::Rgb { r: 40, g: 60, b: 120 };

// ── Sprites ──

/// A loaded image. Dropping it releases it.
pub struct Sprite {
    id: ImageId,
    rows: Vec<Vec<char>>,
    fg: Color,
    bg: Option<Color>,
}

impl Sprite {
    fn from_art(id: ImageId, art: &ImageArt) -> Self {
        Sprite {
            id,
            rows: art.rows.iter().map(|r| r.chars().collect()).collect(),
            fg: rgb(art.fg),
            bg: art.bg.map(rgb),
        }
    }
}

impl Drop for Sprite {
    fn drop(&mut self) {
        trace!("released {}", self.id.key());
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

// ── Screen ──

pub struct HandsetScreen {
    bundle: Bundle,
    device: DeviceInfo,
    canvas: FrameBuffer,
    visible: FrameBuffer,
}

impl HandsetScreen {
    pub fn new(bundle: Bundle, device: DeviceInfo) -> Self {
        let cols = cells(device.screen_width, PX_PER_COL);
        let rows = cells(device.screen_height, PX_PER_ROW);
        let paper = Cell::new(' ', INK, PAPER, false);
        HandsetScreen {
            bundle,
            device,
            canvas: FrameBuffer::filled(cols, rows, paper),
            visible: FrameBuffer::filled(cols, rows, paper),
        }
    }

    /// What the last `present` showed.
    pub fn visible(&self) -> &FrameBuffer {
        &self.visible
    }

    fn cols(&self) -> i32 {
        self.canvas.width() as i32
    }

    fn rows(&self) -> i32 {
        self.canvas.height() as i32
    }

    /// Paint one cell; `bg: None` keeps what is underneath.
    fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Option<Color>, bold: bool) {
        if x < 0 || y < 0 || x >= self.cols() || y >= self.rows() {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let under = self.canvas.get(x, y).bg;
        self.canvas.set(x, y, Cell::new(ch, fg, bg.unwrap_or(under), bold));
    }

    fn put_line(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Option<Color>, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg, bg, bold);
        }
    }

    /// Widget rectangle in cells, (left, top, right, bottom) inclusive.
    /// Kept on screen and mirrored so the box is centred horizontally.
    fn frame_for(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let (left, top) = to_cell(Point { x: rect.x, y: rect.y });
        let (far_x, far_y) = to_cell(Point { x: rect.x + rect.w, y: rect.y + rect.h });
        let right = (far_x - 1).min(self.cols() - 1 - left).max(left + 2);
        let bottom = (far_y - 1).min(self.rows() - 1).max(top + 2);
        (left, top, right, bottom)
    }

    /// Filled box with a single-line border; returns the inner rectangle
    /// as (left, top, width, height) in cells.
    fn boxed(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        edge: Color,
        paper: Color,
    ) -> (i32, i32, i32, i32) {
        for y in top..=bottom {
            for x in left..=right {
                let ch = match (x == left, x == right, y == top, y == bottom) {
                    (true, _, true, _) => '\u{250c}',
                    (_, true, true, _) => '\u{2510}',
                    (true, _, _, true) => '\u{2514}',
                    (_, true, _, true) => '\u{2518}',
                    (_, _, true, _) | (_, _, _, true) => '\u{2500}',
                    (true, _, _, _) | (_, true, _, _) => '\u{2502}',
                    _ => ' ',
                };
                self.put(x, y, ch, edge, Some(paper), false);
            }
        }
        (left + 1, top + 1, right - left - 1, bottom - top - 1)
    }
}

fn cells(px: i32, per_cell: i32) -> usize {
    ((px.max(1) + per_cell - 1) / per_cell) as usize
}

fn to_cell(at: Point) -> (i32, i32) {
    (at.x.div_euclid(PX_PER_COL), at.y.div_euclid(PX_PER_ROW))
}

/// Greedy word wrap honouring embedded newlines. Words longer than
/// `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;
        for word in para.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if len > 0 && len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            len += word.len();
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}

impl Platform for HandsetScreen {
    type Image = Sprite;

    fn device_info(&self) -> Result<DeviceInfo> {
        Ok(self.device)
    }

    fn load_image(&mut self, id: ImageId) -> Result<Sprite> {
        let art = self.bundle.image(id)?;
        trace!("loaded {}", id.key());
        Ok(Sprite::from_art(id, art))
    }

    fn load_string(&mut self, id: StringId) -> Result<String> {
        Ok(self.bundle.string(id)?.to_string())
    }

    fn clear(&mut self) {
        self.canvas.fill(Cell::new(' ', INK, PAPER, false));
    }

    /// Transparent draws skip spaces and keep the paper underneath.
    fn draw_image(&mut self, image: &Sprite, at: Point, transparent: bool) {
        let (cx, cy) = to_cell(at);
        let paper = if transparent { None } else { Some(image.bg.unwrap_or(PAPER)) };
        for (dy, row) in image.rows.iter().enumerate() {
            for (dx, &ch) in row.iter().enumerate() {
                if transparent && ch == ' ' {
                    continue;
                }
                self.put(cx + dx as i32, cy + dy as i32, ch, image.fg, paper, false);
            }
        }
    }

    fn draw_text(&mut self, font: Font, text: &str, at: Point) {
        let (cx, cy) = to_cell(at);
        self.put_line(cx, cy, text, INK, None, font == Font::Bold);
    }

    fn draw_panel(&mut self, panel: &TextPanel) {
        if !panel.visible {
            return;
        }
        let (left, top, right, bottom) = self.frame_for(panel.rect);
        let (ix, iy, iw, ih) = self.boxed(left, top, right, bottom, PANEL_EDGE, PANEL_PAPER);

        if !panel.title.is_empty() {
            let title = format!(" {} ", panel.title);
            self.put_line(left + 2, top, &title, PANEL_EDGE, Some(PANEL_PAPER), true);
        }
        let lines = wrap(&panel.body, iw.max(1) as usize);
        for (i, line) in lines.iter().take(ih.max(0) as usize).enumerate() {
            self.put_line(ix, iy + i as i32, line, INK, Some(PANEL_PAPER), false);
        }
    }

    fn draw_menu(&mut self, menu: &ChoiceMenu) {
        if !menu.is_active() {
            return;
        }
        let (left, top, right, bottom) = self.frame_for(menu.rect);
        let bottom = bottom.min(top + menu.items.len() as i32 + 3);
        let (ix, iy, iw, _) = self.boxed(left, top, right, bottom, MENU_EDGE, MENU_PAPER);

        self.put_line(ix + 1, iy, &menu.title, MENU_EDGE, Some(MENU_PAPER), true);
        for (i, item) in menu.items.iter().enumerate() {
            let y = iy + 1 + i as i32;
            if y >= bottom {
                break;
            }
            if i == menu.cursor {
                let text = format!("\u{25b6} {:<w$}", item.label, w = (iw - 3).max(0) as usize);
                self.put_line(ix + 1, y, &text, PANEL_PAPER, Some(HIGHLIGHT), true);
            } else {
                self.put_line(ix + 3, y, &item.label, INK, Some(MENU_PAPER), false);
            }
        }
    }

    fn present(&mut self) {
        self.visible.clone_from(&self.canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{HAMLET_AT, WALL_AT};

    fn screen() -> HandsetScreen {
        let bundle = Bundle::parse(
            r#"
            [strings]
            panel_title = "Hamlet"

            [images.hamlet]
            rows = ["(o o)", " /|\\ "]
            fg = [1, 2, 3]

            [images.back0]
            rows = ["~ ~"]
            bg = [9, 9, 9]
            "#,
        )
        .unwrap();
        HandsetScreen::new(bundle, DeviceInfo { screen_width: 128, screen_height: 146 })
    }

    #[test]
    fn reference_screen_is_64_by_37_cells() {
        let s = screen();
        assert_eq!((s.visible().width(), s.visible().height()), (64, 37));
    }

    #[test]
    fn nothing_shows_until_present() {
        let mut s = screen();
        s.draw_text(Font::Bold, "Instructions:", Point { x: 20, y: 30 });
        assert_eq!(s.visible().get(10, 7).ch, ' ');
        s.present();
        assert_eq!(s.visible().get(10, 7).ch, 'I');
        assert!(s.visible().get(10, 7).bold);
    }

    #[test]
    fn transparent_draw_skips_spaces() {
        let mut s = screen();
        s.draw_text(Font::Normal, "##########", Point { x: 20, y: 44 });
        let sprite = s.load_image(ImageId::Hamlet).unwrap();
        s.draw_image(&sprite, HAMLET_AT, true);
        s.present();
        // HAMLET_AT is (21, 42) px → cell (10, 10); second row starts with a space
        let v = s.visible();
        assert_eq!(v.get(10, 10).ch, '(');
        assert_eq!(v.get(10, 10).fg, Color::Rgb { r: 1, g: 2, b: 3 });
        assert_eq!(v.get(10, 11).ch, '#');
        assert_eq!(v.get(11, 11).ch, '/');
    }

    #[test]
    fn opaque_draw_paints_sprite_paper() {
        let mut s = screen();
        let sprite = s.load_image(ImageId::Back0).unwrap();
        s.draw_image(&sprite, WALL_AT, false);
        s.present();
        let gap = s.visible().get(1, 0);
        assert_eq!(gap.ch, ' ');
        assert_eq!(gap.bg, Color::Rgb { r: 9, g: 9, b: 9 });
    }

    #[test]
    fn unknown_image_is_an_error() {
        let mut s = screen();
        assert!(s.load_image(ImageId::Turtles).is_err());
        assert!(s.load_string(StringId::MenuTitle).is_err());
    }

    #[test]
    fn clear_blanks_the_canvas() {
        let mut s = screen();
        s.draw_text(Font::Normal, "x", Point { x: 0, y: 0 });
        s.clear();
        s.present();
        assert_eq!(s.visible().get(0, 0).ch, ' ');
    }

    #[test]
    fn panel_wraps_body_inside_border() {
        let mut s = screen();
        let mut panel = TextPanel::new(Rect::new(3, 85, 128, 146));
        panel.set_text("Hamlet", "Kenny: Mmmmmmmm.\n*Kenny dies*");
        panel.visible = true;
        s.draw_panel(&panel);
        s.present();
        let v = s.visible();
        assert_eq!(v.get(1, 21).ch, '\u{250c}');
        assert!(v.row_text(21).contains(" Hamlet "));
        assert!(v.row_text(22).contains("Kenny: Mmmmmmmm."));
        assert!(v.row_text(23).contains("*Kenny dies*"));
    }

    #[test]
    fn hidden_panel_is_not_drawn() {
        let mut s = screen();
        let mut panel = TextPanel::new(Rect::new(3, 85, 128, 146));
        panel.set_text("Hamlet", "body");
        s.draw_panel(&panel);
        s.present();
        assert_eq!(s.visible().get(1, 21).ch, ' ');
    }

    #[test]
    fn inactive_menu_is_not_drawn() {
        let mut s = screen();
        let mut menu = ChoiceMenu::new(Rect::new(0, 85, 128, 146));
        menu.set_title("Who does Hamlet Kill?");
        menu.add_item("Polonius", 0);
        s.draw_menu(&menu);
        s.present();
        assert!(!s.visible().row_text(22).contains("Who does Hamlet Kill?"));
    }

    #[test]
    fn menu_highlights_cursor() {
        let mut s = screen();
        let mut menu = ChoiceMenu::new(Rect::new(0, 85, 128, 146));
        menu.set_title("Who does Hamlet Kill?");
        menu.add_item("Polonius", 0);
        menu.add_item("Kenny", 1);
        menu.cursor = 1;
        menu.set_active(true);
        s.draw_menu(&menu);
        s.present();
        let v = s.visible();
        assert!(v.row_text(22).contains("Who does Hamlet Kill?"));
        assert!(v.row_text(23).contains("Polonius"));
        assert!(v.row_text(24).contains("\u{25b6} Kenny"));
        assert_eq!(v.get(2, 24).bg, HIGHLIGHT);
    }

    #[test]
    fn wrap_breaks_on_words_and_newlines() {
        assert_eq!(wrap("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap("one\ntwo", 10), vec!["one", "two"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 5), vec![""]);
    }
}
