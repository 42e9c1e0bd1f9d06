/// Scenes of the story and the timeline that links them.
///
/// The whole narrative is one fixed sequence. `TIMELINE` lists every scene
/// in order together with how it advances; `Scene::next()` and
/// `Scene::advance()` both read from it, so the graph can be inspected and
/// tested without anything to draw on.

// ── Substeps ──

/// Animation substep inside `Stab` and `Reveal`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Step {
    A,
    B,
    C,
}

impl Step {
    /// 1-based variant number used by the numbered sprite art.
    pub fn variant(self) -> u8 {
        match self {
            Step::A => 1,
            Step::B => 2,
            Step::C => 3,
        }
    }
}

// ── Scenes ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Scene {
    Logo,
    Instructions,
    Dialogue,
    ChoicePrep,
    Stab(Step),
    Reveal(Step),
    Epilogue,
    Done,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::FIRST
    }
}

/// How a scene hands over to the one after it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Advance {
    /// Timer of this many milliseconds.
    After(u32),
    /// Waits for the branch menu.
    OnSelection,
    /// Story is over.
    Never,
}

pub const FIRST_LEVEL: u8 = 1;
pub const LAST_LEVEL: u8 = 8;

pub const TIMELINE: [(Scene, Advance); 12] = [
    (Scene::Logo, Advance::After(2000)),
    (Scene::Instructions, Advance::After(3000)),
    (Scene::Dialogue, Advance::After(10000)),
    (Scene::ChoicePrep, Advance::OnSelection),
    (Scene::Stab(Step::A), Advance::After(500)),
    (Scene::Stab(Step::B), Advance::After(500)),
    (Scene::Stab(Step::C), Advance::After(2000)),
    (Scene::Reveal(Step::A), Advance::After(200)),
    (Scene::Reveal(Step::B), Advance::After(300)),
    (Scene::Reveal(Step::C), Advance::After(4000)),
    (Scene::Epilogue, Advance::After(5000)),
    (Scene::Done, Advance::Never),
];

impl Scene {
    pub const FIRST: Scene = Scene::Logo;

    /// Level number, 1..=8. Substeps share their scene's level.
    pub fn level(self) -> u8 {
        match self {
            Scene::Logo => 1,
            Scene::Instructions => 2,
            Scene::Dialogue => 3,
            Scene::ChoicePrep => 4,
            Scene::Stab(_) => 5,
            Scene::Reveal(_) => 6,
            Scene::Epilogue => 7,
            Scene::Done => 8,
        }
    }

    /// Entry scene for a level (substep A for the animated ones).
    pub fn from_level(level: u8) -> Option<Scene> {
        TIMELINE
            .iter()
            .map(|&(scene, _)| scene)
            .find(|scene| scene.level() == level)
    }

    pub fn advance(self) -> Advance {
        TIMELINE
            .iter()
            .find(|&&(scene, _)| scene == self)
            .map(|&(_, advance)| advance)
            .unwrap_or(Advance::Never)
    }

    /// Scene that follows this one in the timeline.
    pub fn next(self) -> Option<Scene> {
        let idx = TIMELINE.iter().position(|&(scene, _)| scene == self)?;
        TIMELINE.get(idx + 1).map(|&(scene, _)| scene)
    }

    /// Scene a suspend rewinds to: entry of the previous level, never below 1.
    pub fn rewound(self) -> Scene {
        let level = self.level();
        if level > FIRST_LEVEL {
            Scene::from_level(level - 1).unwrap_or(self)
        } else {
            self
        }
    }

    /// Levels where background/wall changes are redrawn straight away.
    pub fn shows_live_scenery(self) -> bool {
        (4..=7).contains(&self.level())
    }

    pub fn shows_sword(self) -> bool {
        matches!(self, Scene::Stab(_) | Scene::Reveal(_))
    }
}

// ── Branch ──

/// Who Hamlet kills. Numeric tags match the menu item tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Branch {
    #[default]
    Polonius = 0,
    Kenny = 1,
    Splinter = 2,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Polonius, Branch::Kenny, Branch::Splinter];

    pub fn tag(self) -> u16 {
        self as u16
    }

    pub fn from_tag(tag: u16) -> Option<Branch> {
        Branch::ALL.into_iter().find(|b| b.tag() == tag)
    }
}
