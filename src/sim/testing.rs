/// Recording platform for dispatcher tests.
///
/// Every call lands in a shared `Ledger`. Images are counted on load and
/// again when their handle is dropped, so a test can compare the two
/// counts against what the slots still hold.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::domain::asset::{Font, ImageId, Point, StringId};
use crate::sim::platform::{DeviceInfo, Platform};
use crate::sim::widgets::{ChoiceMenu, TextPanel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Clear,
    Load(ImageId),
    Release(ImageId),
    Draw { image: ImageId, at: Point, transparent: bool },
    Text { font: Font, text: String, at: Point },
    Panel { title: String, body: String },
    Menu { title: String, items: Vec<String>, cursor: usize },
    Present,
}

#[derive(Default, Debug)]
pub struct Ledger {
    pub loads: usize,
    pub releases: usize,
    pub calls: Vec<Call>,
}

impl Ledger {
    pub fn loaded_ids(&self) -> Vec<ImageId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn panel_bodies(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Panel { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }
}

pub struct TestImage {
    id: ImageId,
    ledger: Rc<RefCell<Ledger>>,
}

impl Drop for TestImage {
    fn drop(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.releases += 1;
        ledger.calls.push(Call::Release(self.id));
    }
}

pub struct RecordingPlatform {
    ledger: Rc<RefCell<Ledger>>,
    missing: HashSet<ImageId>,
    pub device_fails: bool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        RecordingPlatform {
            ledger: Rc::new(RefCell::new(Ledger::default())),
            missing: HashSet::new(),
            device_fails: false,
        }
    }

    /// Make `id` fail to load.
    pub fn without(mut self, id: ImageId) -> Self {
        self.missing.insert(id);
        self
    }

    pub fn shared_ledger(&self) -> Rc<RefCell<Ledger>> {
        Rc::clone(&self.ledger)
    }

    pub fn ledger(&self) -> Ref<'_, Ledger> {
        self.ledger.borrow()
    }

    pub fn ledger_mut(&self) -> RefMut<'_, Ledger> {
        self.ledger.borrow_mut()
    }

    fn record(&self, call: Call) {
        self.ledger.borrow_mut().calls.push(call);
    }
}

impl Platform for RecordingPlatform {
    type Image = TestImage;

    fn device_info(&self) -> Result<DeviceInfo> {
        if self.device_fails {
            bail!("no device");
        }
        Ok(DeviceInfo { screen_width: 128, screen_height: 146 })
    }

    fn load_image(&mut self, id: ImageId) -> Result<TestImage> {
        if self.missing.contains(&id) {
            bail!("image {} not in bundle", id.key());
        }
        {
            let mut ledger = self.ledger.borrow_mut();
            ledger.loads += 1;
            ledger.calls.push(Call::Load(id));
        }
        Ok(TestImage { id, ledger: Rc::clone(&self.ledger) })
    }

    /// Panel bodies get a caret so tests can see it turned into a newline.
    fn load_string(&mut self, id: StringId) -> Result<String> {
        let key = id.key();
        if key.starts_with("text_") {
            Ok(format!("{key}^end"))
        } else {
            Ok(key.to_string())
        }
    }

    fn clear(&mut self) {
        self.record(Call::Clear);
    }

    fn draw_image(&mut self, image: &TestImage, at: Point, transparent: bool) {
        self.record(Call::Draw { image: image.id, at, transparent });
    }

    fn draw_text(&mut self, font: Font, text: &str, at: Point) {
        self.record(Call::Text { font, text: text.to_string(), at });
    }

    fn draw_panel(&mut self, panel: &TextPanel) {
        self.record(Call::Panel { title: panel.title.clone(), body: panel.body.clone() });
    }

    fn draw_menu(&mut self, menu: &ChoiceMenu) {
        self.record(Call::Menu {
            title: menu.title.clone(),
            items: menu.items.iter().map(|i| i.label.clone()).collect(),
            cursor: menu.cursor,
        });
    }

    fn present(&mut self) {
        self.record(Call::Present);
    }
}
