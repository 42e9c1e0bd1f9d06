/// Text panel and choice menu widgets.
///
/// Both are plain data owned by the application; the display draws them.
/// The menu also owns its key handling: Up/Down move the highlight
/// (clamped at both ends), Select commits the highlighted item.

use crate::sim::event::Key;
use crate::sim::platform::Rect;

// ── Text panel ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPanel {
    pub rect: Rect,
    pub title: String,
    pub body: String,
    pub visible: bool,
}

impl TextPanel {
    pub fn new(rect: Rect) -> Self {
        TextPanel {
            rect,
            title: String::new(),
            body: String::new(),
            visible: false,
        }
    }

    pub fn set_text(&mut self, title: &str, body: &str) {
        self.title.clear();
        self.title.push_str(title);
        self.body.clear();
        self.body.push_str(body);
    }
}

// ── Choice menu ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub tag: u16,
}

/// What a key did to the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuResponse {
    /// Not a menu key, or the menu is inactive.
    Ignored,
    /// Highlight moved (or stayed at an end); redraw needed.
    Moved,
    Selected(u16),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceMenu {
    pub rect: Rect,
    pub title: String,
    pub items: Vec<MenuItem>,
    pub cursor: usize,
    active: bool,
}

impl ChoiceMenu {
    pub fn new(rect: Rect) -> Self {
        ChoiceMenu {
            rect,
            title: String::new(),
            items: Vec::with_capacity(3),
            cursor: 0,
            active: false,
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
    }

    /// Drop all items and reset the highlight.
    pub fn reset_items(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    pub fn add_item(&mut self, label: &str, tag: u16) {
        self.items.push(MenuItem { label: label.to_string(), tag });
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn handle_key(&mut self, key: Key) -> MenuResponse {
        if !self.active || self.items.is_empty() {
            return MenuResponse::Ignored;
        }
        match key {
            Key::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                MenuResponse::Moved
            }
            Key::Down => {
                self.cursor = (self.cursor + 1).min(self.items.len() - 1);
                MenuResponse::Moved
            }
            Key::Select => MenuResponse::Selected(self.items[self.cursor].tag),
            _ => MenuResponse::Ignored,
        }
    }
}
