/// Terminal input.
///
/// Drains crossterm events once per frame and turns them into host inputs:
/// keypad keys for the applet plus the host's own quit / pause controls.
/// Release events are ignored; every press (or repeat) is one key.
///
/// Focus reporting is enabled by the renderer, so leaving the terminal
/// window arrives here as `FocusLost`.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::event::Key;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HostInput {
    Key(Key),
    Quit,
    TogglePause,
    FocusLost,
    FocusGained,
}

pub struct InputState {
    inputs: Vec<HostInput>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { inputs: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame; read the result with `inputs()`.
    pub fn drain_events(&mut self) {
        self.inputs.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if let Some(input) = map_key(key) {
                        self.inputs.push(input);
                    }
                }
                Ok(Event::FocusLost) => self.inputs.push(HostInput::FocusLost),
                Ok(Event::FocusGained) => self.inputs.push(HostInput::FocusGained),
                _ => {}
            }
        }
    }

    pub fn inputs(&self) -> &[HostInput] {
        &self.inputs
    }
}

pub fn map_key(key: KeyEvent) -> Option<HostInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')).then_some(HostInput::Quit);
    }
    let input = match key.code {
        KeyCode::Char(c @ '0'..='9') => HostInput::Key(Key::Digit(c as u8 - b'0')),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => HostInput::Key(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => HostInput::Key(Key::Down),
        KeyCode::Left => HostInput::Key(Key::Left),
        KeyCode::Right => HostInput::Key(Key::Right),
        KeyCode::Enter | KeyCode::Char(' ') => HostInput::Key(Key::Select),
        KeyCode::Backspace => HostInput::Key(Key::Clear),
        KeyCode::Char('*') => HostInput::Key(Key::Star),
        KeyCode::Char('#') => HostInput::Key(Key::Pound),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => HostInput::Quit,
        KeyCode::F(1) | KeyCode::Char('p') | KeyCode::Char('P') => HostInput::TogglePause,
        _ => return None,
    };
    Some(input)
}
