/// Host collaborators the dispatcher talks to.
///
/// A `Platform` bundles the resource provider and the display surface.
/// Image handles are owned values of `Platform::Image`; dropping one
/// releases it, so the slot holders in `sim::slots` decide the lifetime.

use anyhow::Result;

use crate::domain::asset::{Font, ImageId, Point, StringId};
use crate::sim::widgets::{ChoiceMenu, TextPanel};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeviceInfo {
    pub screen_width: i32,
    pub screen_height: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }
}

pub trait Platform {
    type Image;

    /// Queried once at launch; failure aborts the launch.
    fn device_info(&self) -> Result<DeviceInfo>;

    fn load_image(&mut self, id: ImageId) -> Result<Self::Image>;
    fn load_string(&mut self, id: StringId) -> Result<String>;

    fn clear(&mut self);
    fn draw_image(&mut self, image: &Self::Image, at: Point, transparent: bool);
    fn draw_text(&mut self, font: Font, text: &str, at: Point);
    fn draw_panel(&mut self, panel: &TextPanel);
    fn draw_menu(&mut self, menu: &ChoiceMenu);

    /// Make everything drawn since the last present visible.
    fn present(&mut self);
}
