/// The application-state record and its event dispatcher.
///
/// `HamletApp` owns everything that lives for the applet's lifetime: the
/// story scalars, the image slots, the two widgets, the staging buffer and
/// the single pending deadline. Host events go through `handle_event`; the
/// host clock goes through `tick`. Both feed `story::transition` and then
/// execute the returned effects against the platform.
///
/// ## Timing
///
/// `tick(now)` fires every due deadline in order. A fired deadline is used
/// as the base time for the schedule it produces, so a late tick never
/// shortens or stretches the timeline.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::domain::asset::{self, ImageId, Slot, StringId, MENU_LEFT, PANEL_LEFT, PANEL_TOP};
use crate::domain::scene::{Branch, Scene};
use crate::domain::story::{self, Cue, Effect, Story};
use crate::domain::text::{self, TEXT_BUF_CHARS};
use crate::sim::event::{AppEvent, Key};
use crate::sim::platform::{DeviceInfo, Platform, Rect};
use crate::sim::slots::ImageSlots;
use crate::sim::timer::Scheduler;
use crate::sim::widgets::{ChoiceMenu, MenuResponse, TextPanel};

pub struct HamletApp<P: Platform> {
    platform: P,
    device: DeviceInfo,
    story: Story,
    slots: ImageSlots<P::Image>,
    panel: Option<TextPanel>,
    menu: Option<ChoiceMenu>,
    timer: Scheduler<Scene>,
    text_buf: String,
    running: bool,
    suspended: bool,
}

impl<P: Platform> HamletApp<P> {
    /// Set up application data: device info plus the default background
    /// and wall. Any failure aborts the launch; whatever was already
    /// loaded is released on the way out.
    pub fn create(mut platform: P) -> Result<Self> {
        let device = platform.device_info().context("device info query failed")?;

        let mut slots = ImageSlots::new();
        slots
            .slot_mut(Slot::Back)
            .reload(|| platform.load_image(ImageId::Back0))
            .context("loading initial background")?;
        slots
            .slot_mut(Slot::Wall)
            .reload(|| platform.load_image(ImageId::Wall0))
            .context("loading initial wall")?;

        info!(
            "app data ready: screen {}x{}, {} images held",
            device.screen_width,
            device.screen_height,
            slots.held_count()
        );

        Ok(HamletApp {
            platform,
            device,
            story: Story::new(),
            slots,
            panel: None,
            menu: None,
            timer: Scheduler::new(),
            text_buf: String::with_capacity(TEXT_BUF_CHARS),
            running: false,
            suspended: false,
        })
    }

    /// Returns true if the event was handled.
    pub fn handle_event(&mut self, event: AppEvent, now: u64) -> bool {
        match event {
            AppEvent::Start => {
                if self.running {
                    return true;
                }
                info!("start");
                self.running = true;
                self.suspended = false;
                self.run_cue(Cue::Start, now);
                true
            }
            AppEvent::Stop => {
                self.teardown();
                true
            }
            AppEvent::Suspend => {
                if !self.running || self.suspended {
                    return true;
                }
                let from = self.story.level();
                self.suspended = true;
                self.run_cue(Cue::Suspend, now);
                // Only the level is rewound; slots keep what they hold.
                info!("suspend at level {from}, will resume at level {}", self.story.level());
                true
            }
            AppEvent::Resume => {
                if !self.running || !self.suspended {
                    return true;
                }
                info!("resume at level {}", self.story.level());
                self.suspended = false;
                self.run_cue(Cue::Resume, now);
                true
            }
            AppEvent::Message(msg) => {
                debug!("message ignored: {msg}");
                true
            }
            AppEvent::Key(key) => {
                if !self.accepts_input() {
                    return false;
                }
                self.handle_key(key, now);
                true
            }
            AppEvent::Command(tag) => {
                if !self.accepts_input() {
                    return false;
                }
                self.handle_command(tag, now)
            }
        }
    }

    /// Fire every deadline that is due at `now`.
    pub fn tick(&mut self, now: u64) {
        if !self.running {
            return;
        }
        while let Some(fired) = self.timer.take_due(now) {
            self.run_cue(Cue::Elapsed(fired.target), fired.deadline);
        }
    }

    // ── Queries ──

    pub fn level(&self) -> u8 {
        self.story.level()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_finished(&self) -> bool {
        self.story.scene == Scene::Done
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timer.pending().map(|p| p.deadline)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    // ── Internal ──

    fn accepts_input(&self) -> bool {
        self.running && !self.suspended
    }

    /// The active menu gets first refusal; unconsumed digits change scenery.
    fn handle_key(&mut self, key: Key, now: u64) {
        let response = match self.menu.as_mut() {
            Some(menu) => menu.handle_key(key),
            None => MenuResponse::Ignored,
        };
        match response {
            MenuResponse::Selected(tag) => {
                self.handle_command(tag, now);
            }
            MenuResponse::Moved => {
                if let Some(menu) = &self.menu {
                    self.platform.draw_menu(menu);
                    self.platform.present();
                }
            }
            MenuResponse::Ignored => {
                if let Some(digit) = key.digit() {
                    self.run_cue(Cue::Digit(digit), now);
                }
            }
        }
    }

    fn handle_command(&mut self, tag: u16, now: u64) -> bool {
        let Some(branch) = Branch::from_tag(tag) else {
            warn!("unknown command tag {tag}");
            return false;
        };
        if self.story.scene != Scene::ChoicePrep {
            warn!("selection {branch:?} ignored at level {}", self.story.level());
            return false;
        }
        info!("branch selected: {branch:?}");
        self.run_cue(Cue::Selected(branch), now);
        true
    }

    fn run_cue(&mut self, cue: Cue, now: u64) {
        let (next, effects) = story::transition(self.story, cue);
        if next.scene != self.story.scene {
            debug!(
                "{:?} (level {}) -> {:?} (level {}) on {cue:?}",
                self.story.scene,
                self.story.level(),
                next.scene,
                next.level()
            );
        }
        self.story = next;
        self.apply(effects, now);
    }

    fn apply(&mut self, effects: Vec<Effect>, now: u64) {
        for effect in effects {
            match effect {
                Effect::Clear => {
                    self.platform.clear();
                    if let Some(panel) = self.panel.as_mut() {
                        panel.visible = false;
                    }
                    if let Some(menu) = self.menu.as_mut() {
                        menu.set_active(false);
                    }
                }
                Effect::Load { slot, image } => {
                    let platform = &mut self.platform;
                    let held = self.slots.slot_mut(slot);
                    if let Err(e) = held.reload(|| platform.load_image(image)) {
                        warn!("{slot:?}: could not load {image:?} ({}): {e:#}", image.code());
                    }
                }
                Effect::Release(slot) => {
                    self.slots.slot_mut(slot).release();
                }
                Effect::Draw { slot, at, transparent } => match self.slots.get(slot) {
                    Some(image) => self.platform.draw_image(image, at, transparent),
                    None => warn!(
                        "{slot:?} slot is empty at {:?}; nothing drawn",
                        self.story.scene
                    ),
                },
                Effect::Text { font, text, at } => {
                    let line = self.load_string(text);
                    self.platform.draw_text(font, &line, at);
                }
                Effect::Panel(body) => self.show_panel(body),
                Effect::Menu => self.show_menu(),
                Effect::Present => self.platform.present(),
                Effect::Schedule { delay_ms, next } => {
                    if let Some(old) = self.timer.schedule(now, delay_ms, next) {
                        debug!("superseded pending {:?}", old.target);
                    }
                    debug!("{next:?} due in {delay_ms} ms");
                }
                Effect::Cancel => {
                    if let Some(old) = self.timer.cancel() {
                        debug!("cancelled pending {:?}", old.target);
                    }
                }
            }
        }
    }

    fn load_string(&mut self, id: StringId) -> String {
        self.platform.load_string(id).unwrap_or_else(|e| {
            warn!("missing string {id:?} ({}): {e:#}", id.code());
            String::new()
        })
    }

    fn show_panel(&mut self, body: StringId) {
        let title = self.load_string(StringId::PanelTitle);
        let raw = self.load_string(body);
        text::stage_into(&mut self.text_buf, &raw);

        let (w, h) = (self.device.screen_width, self.device.screen_height);
        let rect = Rect::new(PANEL_LEFT, PANEL_TOP, w, h);
        let panel = self.panel.get_or_insert_with(|| TextPanel::new(rect));
        panel.set_text(&title, &self.text_buf);
        panel.visible = true;

        self.platform.draw_panel(panel);
        self.platform.present();
    }

    fn show_menu(&mut self) {
        let title = self.load_string(StringId::MenuTitle);
        let labels: Vec<(String, u16)> = Branch::ALL
            .into_iter()
            .map(|b| (self.load_string(asset::menu_label(b)), b.tag()))
            .collect();

        let (w, h) = (self.device.screen_width, self.device.screen_height);
        let rect = Rect::new(MENU_LEFT, PANEL_TOP, w, h);
        let menu = self.menu.get_or_insert_with(|| ChoiceMenu::new(rect));
        menu.set_title(&title);
        menu.reset_items();
        for (label, tag) in &labels {
            menu.add_item(label, *tag);
        }
        menu.set_active(true);

        self.platform.draw_menu(menu);
        self.platform.present();
    }

    fn teardown(&mut self) {
        if let Some(old) = self.timer.cancel() {
            debug!("stop cancelled pending {:?}", old.target);
        }
        let released = self.slots.release_all();
        self.panel = None;
        self.menu = None;
        if self.running {
            info!("stop at level {}; released {released} images", self.story.level());
        }
        self.running = false;
        self.suspended = false;
    }
}

#[cfg(test)]
impl<P: Platform> HamletApp<P> {
    pub fn story(&self) -> Story {
        self.story
    }

    pub fn branch(&self) -> Branch {
        self.story.branch
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn held_images(&self) -> usize {
        self.slots.held_count()
    }

    pub fn panel(&self) -> Option<&TextPanel> {
        self.panel.as_ref()
    }

    pub fn menu(&self) -> Option<&ChoiceMenu> {
        self.menu.as_ref()
    }
}
