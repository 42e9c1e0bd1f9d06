/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (handset screen inside a bezel)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableFocusChange, EnableFocusChange},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::scene::LAST_LEVEL;

// ── Cell: the unit of every buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Cell {
    /// Explicit dark background for everything outside the handset.
    /// Using the same RGB for `Clear(ClearType::All)` and every cell keeps
    /// VTE terminals from showing lines between rows.
    pub const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
        bold: false,
    };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
        bold: false,
    };

    pub fn new(ch: char, fg: Color, bg: Color, bold: bool) -> Self {
        Cell { ch, fg, bg: Cell::norm_bg(bg), bold }
    }

    /// Color::Reset → BASE_BG so no cell falls back to terminal default.
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        FrameBuffer::filled(w, h, Cell::BLANK)
    }

    pub fn filled(w: usize, h: usize, cell: Cell) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![cell; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    pub fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg, bold));
        }
    }

    /// Copy `src` with its top-left corner at (x, y).
    fn blit(&mut self, src: &FrameBuffer, x: usize, y: usize) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                self.set(x + sx, y + sy, src.get(sx, sy));
            }
        }
    }

    /// Row `y` as text, for tests.
    #[cfg(test)]
    pub fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Renderer ──

/// What the bezel shows under the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub level: u8,
    pub paused: bool,
    pub finished: bool,
}

const BEZEL: Color = Color::Rgb { r: 60, g: 60, b: 72 };
const BEZEL_INK: Color = Color::Rgb { r: 190, g: 190, b: 200 };
const HELP_INK: Color = Color::Rgb { r: 130, g: 130, b: 145 };
const PAUSE_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

const HELP: &str = "1-3 back  4-6 wall  \u{2191}\u{2193} choose  Enter select  p pause  q quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableFocusChange,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            ResetColor,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, screen: &FrameBuffer, status: Status) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.fill(Cell::BLANK);
        compose_handset(&mut self.front, screen, status);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_bold = false;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the
        // terminal's own default and show seams.
        queue!(
            self.writer,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.bold != last_bold {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose ──

/// Terminal size needed to show the whole handset.
pub fn handset_size(screen: &FrameBuffer) -> (usize, usize) {
    (screen.width() + 2, screen.height() + 4)
}

/// Screen framed by the bezel, status and help lines below, centred.
fn compose_handset(frame: &mut FrameBuffer, screen: &FrameBuffer, status: Status) {
    let (need_w, need_h) = handset_size(screen);
    if frame.width() < need_w || frame.height() < need_h {
        let msg = format!("Terminal too small: need {need_w}x{need_h}");
        let y = frame.height() / 2;
        let x = frame.width().saturating_sub(msg.chars().count()) / 2;
        frame.put_str(x, y, &msg, Color::White, Color::Reset, true);
        return;
    }

    let ox = (frame.width() - need_w) / 2;
    let oy = (frame.height() - need_h) / 2;
    let (w, h) = (screen.width(), screen.height());

    // Bezel
    for y in oy..oy + h + 2 {
        for x in ox..ox + w + 2 {
            frame.set(x, y, Cell::new(' ', BEZEL_INK, BEZEL, false));
        }
    }
    let top: String = format!("\u{256d}{}\u{256e}", "\u{2500}".repeat(w));
    let bottom: String = format!("\u{2570}{}\u{256f}", "\u{2500}".repeat(w));
    frame.put_str(ox, oy, &top, BEZEL_INK, BEZEL, false);
    frame.put_str(ox, oy + h + 1, &bottom, BEZEL_INK, BEZEL, false);
    for y in 1..=h {
        frame.put_str(ox, oy + y, "\u{2502}", BEZEL_INK, BEZEL, false);
        frame.put_str(ox + w + 1, oy + y, "\u{2502}", BEZEL_INK, BEZEL, false);
    }
    let brand = " HAMLET ";
    frame.put_str(ox + (w + 2 - brand.len()) / 2, oy, brand, BEZEL_INK, BEZEL, true);

    frame.blit(screen, ox + 1, oy + 1);

    // Status line
    let status_y = oy + h + 2;
    let level = if status.finished {
        "The End".to_string()
    } else {
        format!("Level {}/{}", status.level, LAST_LEVEL)
    };
    frame.put_str(ox + 1, status_y, &level, BEZEL_INK, Color::Reset, false);
    if status.paused {
        let tag = " PAUSED ";
        frame.put_str(ox + w + 1 - tag.len(), status_y, tag, Color::Black, PAUSE_BG, true);
    }

    let help_x = ox + (w + 2).saturating_sub(HELP.chars().count()) / 2;
    frame.put_str(help_x, status_y + 1, HELP, HELP_INK, Color::Reset, false);
}
