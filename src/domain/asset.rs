/// Resource identifiers, image slots and screen positions.
///
/// Coordinates are handset pixels on the 128×146 reference screen; the
/// display maps them to whatever it draws on.

use super::scene::{Branch, Scene, Step};

// ── Geometry ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub const fn pt(x: i32, y: i32) -> Point {
    Point { x, y }
}

pub const LOGO_AT: Point = pt(1, 50);
pub const BACK_AT: Point = pt(85, 25);
pub const WALL_AT: Point = pt(0, 0);
pub const HAMLET_AT: Point = pt(21, 42);
pub const GERTRUDE_AT: Point = pt(53, 27);
pub const SWORD_AT: Point = pt(5, 52);
pub const DEAD_AT: Point = pt(0, 37);
pub const TEARDROPS_AT: Point = pt(69, 38);
pub const FULLSCREEN_AT: Point = pt(0, 0);

/// Top edge of the text panel and the menu.
pub const PANEL_TOP: i32 = 85;
pub const PANEL_LEFT: i32 = 3;
pub const MENU_LEFT: i32 = 0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Font {
    Normal,
    Bold,
}

// ── Images ──

/// Image resource IDs in the packaged bundle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u16)]
pub enum ImageId {
    Logo = 5001,
    Back0 = 5010,
    Back1,
    Back2,
    Back3,
    Wall0 = 5020,
    Wall1,
    Wall2,
    Wall3,
    Hamlet = 5030,
    Gertrude,
    Sword1 = 5040,
    Sword2,
    Sword3,
    Polonius1 = 5050,
    Polonius2,
    Polonius3,
    Kenny1 = 5060,
    Kenny2,
    Kenny3,
    Splinter1 = 5070,
    Splinter2,
    Splinter3,
    Teardrops = 5080,
    StanKyle,
    Turtles,
}

impl ImageId {
    pub const ALL: [ImageId; 26] = [
        ImageId::Logo,
        ImageId::Back0, ImageId::Back1, ImageId::Back2, ImageId::Back3,
        ImageId::Wall0, ImageId::Wall1, ImageId::Wall2, ImageId::Wall3,
        ImageId::Hamlet, ImageId::Gertrude,
        ImageId::Sword1, ImageId::Sword2, ImageId::Sword3,
        ImageId::Polonius1, ImageId::Polonius2, ImageId::Polonius3,
        ImageId::Kenny1, ImageId::Kenny2, ImageId::Kenny3,
        ImageId::Splinter1, ImageId::Splinter2, ImageId::Splinter3,
        ImageId::Teardrops, ImageId::StanKyle, ImageId::Turtles,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    /// Key of this image in the resource bundle.
    pub fn key(self) -> &'static str {
        match self {
            ImageId::Logo => "logo",
            ImageId::Back0 => "back0",
            ImageId::Back1 => "back1",
            ImageId::Back2 => "back2",
            ImageId::Back3 => "back3",
            ImageId::Wall0 => "wall0",
            ImageId::Wall1 => "wall1",
            ImageId::Wall2 => "wall2",
            ImageId::Wall3 => "wall3",
            ImageId::Hamlet => "hamlet",
            ImageId::Gertrude => "gertrude",
            ImageId::Sword1 => "sword1",
            ImageId::Sword2 => "sword2",
            ImageId::Sword3 => "sword3",
            ImageId::Polonius1 => "polonius1",
            ImageId::Polonius2 => "polonius2",
            ImageId::Polonius3 => "polonius3",
            ImageId::Kenny1 => "kenny1",
            ImageId::Kenny2 => "kenny2",
            ImageId::Kenny3 => "kenny3",
            ImageId::Splinter1 => "splinter1",
            ImageId::Splinter2 => "splinter2",
            ImageId::Splinter3 => "splinter3",
            ImageId::Teardrops => "teardrops",
            ImageId::StanKyle => "stankyle",
            ImageId::Turtles => "turtles",
        }
    }
}

// ── Strings ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u16)]
pub enum StringId {
    Instruction0 = 6001,
    Instruction1,
    Instruction2,
    Instruction3,
    Instruction4,
    PanelTitle = 6010,
    TextLevel3 = 6020,
    TextLevel5,
    TextLevel6Polonius = 6030,
    TextLevel6Kenny,
    TextLevel6Splinter,
    TextLevel7Polonius = 6040,
    TextLevel7Kenny,
    TextLevel7Splinter,
    MenuTitle = 6050,
    MenuPolonius,
    MenuKenny,
    MenuSplinter,
}

impl StringId {
    pub const ALL: [StringId; 18] = [
        StringId::Instruction0, StringId::Instruction1, StringId::Instruction2,
        StringId::Instruction3, StringId::Instruction4,
        StringId::PanelTitle,
        StringId::TextLevel3, StringId::TextLevel5,
        StringId::TextLevel6Polonius, StringId::TextLevel6Kenny, StringId::TextLevel6Splinter,
        StringId::TextLevel7Polonius, StringId::TextLevel7Kenny, StringId::TextLevel7Splinter,
        StringId::MenuTitle, StringId::MenuPolonius, StringId::MenuKenny, StringId::MenuSplinter,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn key(self) -> &'static str {
        match self {
            StringId::Instruction0 => "instruction0",
            StringId::Instruction1 => "instruction1",
            StringId::Instruction2 => "instruction2",
            StringId::Instruction3 => "instruction3",
            StringId::Instruction4 => "instruction4",
            StringId::PanelTitle => "panel_title",
            StringId::TextLevel3 => "text_level3",
            StringId::TextLevel5 => "text_level5",
            StringId::TextLevel6Polonius => "text_level6_polonius",
            StringId::TextLevel6Kenny => "text_level6_kenny",
            StringId::TextLevel6Splinter => "text_level6_splinter",
            StringId::TextLevel7Polonius => "text_level7_polonius",
            StringId::TextLevel7Kenny => "text_level7_kenny",
            StringId::TextLevel7Splinter => "text_level7_splinter",
            StringId::MenuTitle => "menu_title",
            StringId::MenuPolonius => "menu_polonius",
            StringId::MenuKenny => "menu_kenny",
            StringId::MenuSplinter => "menu_splinter",
        }
    }
}

/// The five instruction lines: font, text, position.
pub const INSTRUCTIONS: [(Font, StringId, Point); 5] = [
    (Font::Bold, StringId::Instruction0, pt(20, 30)),
    (Font::Normal, StringId::Instruction1, pt(20, 50)),
    (Font::Normal, StringId::Instruction2, pt(20, 65)),
    (Font::Normal, StringId::Instruction3, pt(20, 85)),
    (Font::Normal, StringId::Instruction4, pt(20, 100)),
];

// ── Slots ──

/// Named image holders in the application state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Slot {
    Logo,
    Back,
    Wall,
    Hamlet,
    Gertrude,
    Dead,
    Epilogue,
    Sword,
}

impl Slot {
    pub const COUNT: usize = 8;

    pub fn index(self) -> usize {
        self as usize
    }
}

// ── Lookup tables ──

pub fn sword_image(step: Step) -> ImageId {
    match step {
        Step::A => ImageId::Sword1,
        Step::B => ImageId::Sword2,
        Step::C => ImageId::Sword3,
    }
}

pub fn dead_image(branch: Branch, step: Step) -> ImageId {
    use ImageId::*;
    let set = match branch {
        Branch::Polonius => [Polonius1, Polonius2, Polonius3],
        Branch::Kenny => [Kenny1, Kenny2, Kenny3],
        Branch::Splinter => [Splinter1, Splinter2, Splinter3],
    };
    set[usize::from(step.variant() - 1)]
}

/// Closing picture per branch: image, position, transparent?
pub fn epilogue_image(branch: Branch) -> (ImageId, Point, bool) {
    match branch {
        Branch::Polonius => (ImageId::Teardrops, TEARDROPS_AT, true),
        Branch::Kenny => (ImageId::StanKyle, FULLSCREEN_AT, false),
        Branch::Splinter => (ImageId::Turtles, FULLSCREEN_AT, false),
    }
}

/// Panel body for a level. Only levels 3, 5, 6 and 7 have one.
pub fn panel_text(level: u8, branch: Branch) -> Option<StringId> {
    let id = match (level, branch) {
        (3, _) => StringId::TextLevel3,
        (5, _) => StringId::TextLevel5,
        (6, Branch::Polonius) => StringId::TextLevel6Polonius,
        (6, Branch::Kenny) => StringId::TextLevel6Kenny,
        (6, Branch::Splinter) => StringId::TextLevel6Splinter,
        (7, Branch::Polonius) => StringId::TextLevel7Polonius,
        (7, Branch::Kenny) => StringId::TextLevel7Kenny,
        (7, Branch::Splinter) => StringId::TextLevel7Splinter,
        _ => return None,
    };
    Some(id)
}

pub fn menu_label(branch: Branch) -> StringId {
    match branch {
        Branch::Polonius => StringId::MenuPolonius,
        Branch::Kenny => StringId::MenuKenny,
        Branch::Splinter => StringId::MenuSplinter,
    }
}

/// Digit keys 1-3 pick a background, 4-6 a wall.
pub fn scenery_for_digit(digit: u8) -> Option<(Slot, ImageId)> {
    let pick = match digit {
        1 => (Slot::Back, ImageId::Back1),
        2 => (Slot::Back, ImageId::Back2),
        3 => (Slot::Back, ImageId::Back3),
        4 => (Slot::Wall, ImageId::Wall1),
        5 => (Slot::Wall, ImageId::Wall2),
        6 => (Slot::Wall, ImageId::Wall3),
        _ => return None,
    };
    Some(pick)
}

/// True if `scene` draws the dead character for `branch`.
pub fn shows_dead(scene: Scene, branch: Branch) -> bool {
    match scene {
        Scene::Reveal(_) => true,
        Scene::Epilogue => branch == Branch::Polonius,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_and_keys_are_unique() {
        let codes: HashSet<u16> = ImageId::ALL.iter().map(|i| i.code()).collect();
        let keys: HashSet<&str> = ImageId::ALL.iter().map(|i| i.key()).collect();
        assert_eq!(codes.len(), ImageId::ALL.len());
        assert_eq!(keys.len(), ImageId::ALL.len());

        let codes: HashSet<u16> = StringId::ALL.iter().map(|s| s.code()).collect();
        let keys: HashSet<&str> = StringId::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(codes.len(), StringId::ALL.len());
        assert_eq!(keys.len(), StringId::ALL.len());
    }

    #[test]
    fn branch_assets_never_mix() {
        for branch in Branch::ALL {
            let dead: Vec<ImageId> = [Step::A, Step::B, Step::C]
                .into_iter()
                .map(|s| dead_image(branch, s))
                .collect();
            let prefix = match branch {
                Branch::Polonius => "polonius",
                Branch::Kenny => "kenny",
                Branch::Splinter => "splinter",
            };
            assert!(dead.iter().all(|id| id.key().starts_with(prefix)));
            assert_eq!(dead[2].key(), format!("{prefix}3"));
        }
    }

    #[test]
    fn panel_text_only_on_story_levels() {
        for level in [1, 2, 4, 8] {
            assert_eq!(panel_text(level, Branch::Kenny), None);
        }
        assert_eq!(panel_text(3, Branch::Splinter), Some(StringId::TextLevel3));
        assert_eq!(panel_text(6, Branch::Kenny), Some(StringId::TextLevel6Kenny));
        assert_eq!(panel_text(7, Branch::Splinter), Some(StringId::TextLevel7Splinter));
    }

    #[test]
    fn digits_map_to_scenery() {
        assert_eq!(scenery_for_digit(2), Some((Slot::Back, ImageId::Back2)));
        assert_eq!(scenery_for_digit(6), Some((Slot::Wall, ImageId::Wall3)));
        assert_eq!(scenery_for_digit(0), None);
        assert_eq!(scenery_for_digit(7), None);
    }

    #[test]
    fn dead_character_visibility() {
        assert!(shows_dead(Scene::Reveal(Step::B), Branch::Kenny));
        assert!(shows_dead(Scene::Epilogue, Branch::Polonius));
        assert!(!shows_dead(Scene::Epilogue, Branch::Kenny));
        assert!(!shows_dead(Scene::Stab(Step::C), Branch::Polonius));
    }
}
