/// Host-independent runtime: the dispatcher and the pieces it owns.

pub mod app;
pub mod event;
pub mod platform;
pub mod slots;
pub mod timer;
pub mod widgets;

#[cfg(test)]
pub mod testing;
