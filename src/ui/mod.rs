/// Terminal host: bundle, handset display, renderer and input.

pub mod bundle;
pub mod display;
pub mod gamepad;
pub mod input;
pub mod renderer;
