/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick up/down  →  Menu up / down
///   A / Start                   →  Select
///   Select                      →  Quit
///   Mode                        →  Pause / resume
///   X                           →  Next background (digits 1, 2, 3)
///   Y                           →  Next wall (digits 4, 5, 6)

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::sim::event::Key;
use crate::ui::input::HostInput;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
    Mode,
}

const BTN_COUNT: usize = 9;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            "MODE" | "GUIDE" | "HOME" => Some(Btn::Mode),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South        => Some(Btn::A),
            Button::East         => Some(Btn::B),
            Button::West         => Some(Btn::X),
            Button::North        => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start        => Some(Btn::Start),
            Button::Select       => Some(Btn::Select),
            Button::Mode         => Some(Btn::Mode),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    pause: Vec<Btn>,
    background: Vec<Btn>,
    wall: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm:    vec![Btn::A, Btn::Start],
            cancel:     vec![Btn::Select],
            pause:      vec![Btn::Mode],
            background: vec![Btn::X],
            wall:       vec![Btn::Y],
        }
    }
}

/// Steps through a digit range, wrapping.
#[derive(Clone, Copy, Debug)]
struct DigitCycle {
    first: u8,
    last: u8,
    next: u8,
}

impl DigitCycle {
    const fn new(first: u8, last: u8) -> Self {
        DigitCycle { first, last, next: first }
    }

    fn advance(&mut self) -> u8 {
        let d = self.next;
        self.next = if d >= self.last { self.first } else { d + 1 };
        d
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; BTN_COUNT],

    dpad_up: BtnState,
    dpad_down: BtnState,
    stick_up: BtnState,
    stick_down: BtnState,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,
    backgrounds: DigitCycle,
    walls: DigitCycle,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::warn!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad_up: BtnState::default(),
            dpad_down: BtnState::default(),
            stick_up: BtnState::default(),
            stick_down: BtnState::default(),
            stick_y: 0.0,
            action_map: ActionMap::default(),
            backgrounds: DigitCycle::new(1, 3),
            walls: DigitCycle::new(4, 6),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(slot: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.cancel, &cfg.cancel);
        apply(&mut map.pause, &cfg.pause);
        apply(&mut map.background, &cfg.background);
        apply(&mut map.wall, &cfg.wall);
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    self.connected = true;
                    self.stick_y = value;
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        self.stick_up.set(self.stick_y > STICK_DEADZONE);
        self.stick_down.set(self.stick_y < -STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        match gilrs_btn {
            Button::DPadUp => return self.dpad_up.set(held),
            Button::DPadDown => return self.dpad_down.set(held),
            _ => {}
        }
        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn_index(btn)].set(held);
        }
    }

    /// Host inputs for the buttons pressed since the last `update`.
    pub fn inputs(&mut self) -> Vec<HostInput> {
        let mut out = Vec::new();
        if self.dpad_up.just_pressed || self.stick_up.just_pressed {
            out.push(HostInput::Key(Key::Up));
        }
        if self.dpad_down.just_pressed || self.stick_down.just_pressed {
            out.push(HostInput::Key(Key::Down));
        }
        if self.any_just_pressed(&self.action_map.confirm) {
            out.push(HostInput::Key(Key::Select));
        }
        if self.any_just_pressed(&self.action_map.background) {
            out.push(HostInput::Key(Key::Digit(self.backgrounds.advance())));
        }
        if self.any_just_pressed(&self.action_map.wall) {
            out.push(HostInput::Key(Key::Digit(self.walls.advance())));
        }
        if self.any_just_pressed(&self.action_map.pause) {
            out.push(HostInput::TogglePause);
        }
        if self.any_just_pressed(&self.action_map.cancel) {
            out.push(HostInput::Quit);
        }
        out
    }

    // ── Internal ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }
        self.dpad_up.just_pressed = false;
        self.dpad_down.just_pressed = false;
        self.stick_up.just_pressed = false;
        self.stick_down.just_pressed = false;
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad_up = BtnState::default();
        self.dpad_down = BtnState::default();
        self.stick_up = BtnState::default();
        self.stick_down = BtnState::default();
        self.stick_y = 0.0;
    }
}
