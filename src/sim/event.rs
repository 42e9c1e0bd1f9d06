/// Events delivered to the application by the host.

/// Handset keypad.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Digit(u8),
    Up,
    Down,
    Left,
    Right,
    Select,
    Clear,
    Star,
    Pound,
}

impl Key {
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Start,
    Stop,
    Suspend,
    Resume,
    /// Incoming message for the app. Accepted and ignored.
    #[allow(dead_code)]
    Message(String),
    Key(Key),
    /// Menu selection; carries the item's numeric tag.
    Command(u16),
}
