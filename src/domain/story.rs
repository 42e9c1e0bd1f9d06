/// Story state and the pure transition function.
///
/// `transition(story, cue)` returns the next story plus the list of effects
/// the dispatcher must carry out (load, draw, schedule, ...). Nothing here
/// touches a screen, a clock or a resource, so the narrative graph can be
/// walked in tests with plain values.

use super::asset::{
    self, Font, ImageId, Point, Slot, StringId, BACK_AT, GERTRUDE_AT, HAMLET_AT, LOGO_AT,
    DEAD_AT, SWORD_AT, WALL_AT,
};
use super::scene::{Advance, Branch, Scene, Step};

/// The application-state scalars: current scene (hence level) and branch.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Story {
    pub scene: Scene,
    pub branch: Branch,
}

impl Story {
    pub fn new() -> Self {
        Story::default()
    }

    pub fn level(&self) -> u8 {
        self.scene.level()
    }
}

/// Inputs to the state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Start,
    /// The pending deadline fired; carries the scene it was armed for.
    Elapsed(Scene),
    Selected(Branch),
    Suspend,
    Resume,
    Digit(u8),
}

/// Commands for the dispatcher.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Effect {
    Clear,
    /// Release whatever `slot` holds, then load `image` into it.
    Load { slot: Slot, image: ImageId },
    Release(Slot),
    Draw { slot: Slot, at: Point, transparent: bool },
    Text { font: Font, text: StringId, at: Point },
    Panel(StringId),
    Menu,
    Present,
    Schedule { delay_ms: u32, next: Scene },
    Cancel,
}

pub fn transition(story: Story, cue: Cue) -> (Story, Vec<Effect>) {
    match cue {
        Cue::Start => enter(Story { scene: Scene::FIRST, ..story }),
        Cue::Elapsed(next) => enter(Story { scene: next, ..story }),
        Cue::Resume => enter(story),
        Cue::Selected(branch) => {
            if story.scene != Scene::ChoicePrep {
                return (story, Vec::new());
            }
            enter(Story { scene: Scene::Stab(Step::A), branch })
        }
        Cue::Suspend => {
            let rewound = Story { scene: story.scene.rewound(), ..story };
            (rewound, vec![Effect::Cancel])
        }
        Cue::Digit(digit) => {
            let Some((slot, image)) = asset::scenery_for_digit(digit) else {
                return (story, Vec::new());
            };
            let mut fx = vec![Effect::Load { slot, image }];
            match story.scene {
                // A full-screen ending hides the scenery; only the slot changes.
                Scene::Epilogue if story.branch != Branch::Polonius => {}
                Scene::Epilogue => {
                    epilogue_frame(&mut fx, story);
                    fx.push(Effect::Present);
                }
                scene if scene.shows_live_scenery() => {
                    stage(&mut fx, story);
                    fx.push(Effect::Present);
                }
                _ => {}
            }
            (story, fx)
        }
    }
}

/// Effects for entering `story.scene` from scratch.
fn enter(story: Story) -> (Story, Vec<Effect>) {
    use Effect::*;

    let scene = story.scene;
    let mut fx = Vec::with_capacity(16);

    match scene {
        Scene::Logo => {
            fx.push(Clear);
            fx.push(Load { slot: Slot::Logo, image: ImageId::Logo });
            fx.push(Draw { slot: Slot::Logo, at: LOGO_AT, transparent: true });
            fx.push(Present);
            fx.push(Release(Slot::Logo));
        }
        Scene::Instructions => {
            fx.push(Clear);
            for (font, text, at) in asset::INSTRUCTIONS {
                fx.push(Text { font, text, at });
            }
            fx.push(Present);
        }
        Scene::Dialogue => {
            fx.push(Clear);
            fx.push(Load { slot: Slot::Hamlet, image: ImageId::Hamlet });
            fx.push(Load { slot: Slot::Gertrude, image: ImageId::Gertrude });
            stage(&mut fx, story);
            fx.push(Present);
        }
        Scene::ChoicePrep => {
            fx.push(Clear);
            stage(&mut fx, story);
            fx.push(Present);
            fx.push(Menu);
        }
        Scene::Stab(step) => {
            if step == Step::A {
                fx.push(Clear);
            }
            fx.push(Load { slot: Slot::Sword, image: asset::sword_image(step) });
            stage(&mut fx, story);
            fx.push(Present);
        }
        Scene::Reveal(step) => {
            if step == Step::A {
                fx.push(Clear);
            }
            fx.push(Load { slot: Slot::Dead, image: asset::dead_image(story.branch, step) });
            stage(&mut fx, story);
            fx.push(Present);
        }
        Scene::Epilogue => {
            fx.push(Clear);
            let (image, _, _) = asset::epilogue_image(story.branch);
            fx.push(Load { slot: Slot::Epilogue, image });
            epilogue_frame(&mut fx, story);
            fx.push(Present);
        }
        Scene::Done => {}
    }

    // Panel only on the first frame of a level; later substeps keep it.
    let first_frame = !matches!(
        scene,
        Scene::Stab(Step::B | Step::C) | Scene::Reveal(Step::B | Step::C)
    );
    if first_frame {
        if let Some(text) = asset::panel_text(scene.level(), story.branch) {
            fx.push(Panel(text));
        }
    }

    if let (Advance::After(delay_ms), Some(next)) = (scene.advance(), scene.next()) {
        fx.push(Schedule { delay_ms, next });
    }

    (story, fx)
}

/// Scenery and characters for the current scene, back to front.
fn stage(fx: &mut Vec<Effect>, story: Story) {
    use Effect::Draw;

    fx.push(Draw { slot: Slot::Back, at: BACK_AT, transparent: false });
    fx.push(Draw { slot: Slot::Wall, at: WALL_AT, transparent: true });
    fx.push(Draw { slot: Slot::Hamlet, at: HAMLET_AT, transparent: true });
    fx.push(Draw { slot: Slot::Gertrude, at: GERTRUDE_AT, transparent: true });
    if story.scene.shows_sword() {
        fx.push(Draw { slot: Slot::Sword, at: SWORD_AT, transparent: true });
    }
    if asset::shows_dead(story.scene, story.branch) {
        fx.push(Draw { slot: Slot::Dead, at: DEAD_AT, transparent: true });
    }
}

/// The ending picture, over the stage when the ending keeps it.
fn epilogue_frame(fx: &mut Vec<Effect>, story: Story) {
    let (_, at, transparent) = asset::epilogue_image(story.branch);
    if story.branch == Branch::Polonius {
        stage(fx, story);
    }
    fx.push(Effect::Draw { slot: Slot::Epilogue, at, transparent });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scene::TIMELINE;

    fn schedules(fx: &[Effect]) -> Vec<(u32, Scene)> {
        fx.iter()
            .filter_map(|e| match *e {
                Effect::Schedule { delay_ms, next } => Some((delay_ms, next)),
                _ => None,
            })
            .collect()
    }

    fn menus(fx: &[Effect]) -> usize {
        fx.iter().filter(|e| **e == Effect::Menu).count()
    }

    fn drawn_slots(fx: &[Effect]) -> Vec<Slot> {
        fx.iter()
            .filter_map(|e| match *e {
                Effect::Draw { slot, .. } => Some(slot),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_scene_arms_exactly_one_continuation() {
        for (scene, advance) in TIMELINE {
            let story = Story { scene, branch: Branch::Kenny };
            let (_, fx) = transition(story, Cue::Elapsed(scene));
            match advance {
                Advance::After(ms) => {
                    assert_eq!(schedules(&fx), vec![(ms, scene.next().unwrap())], "{scene:?}");
                    assert_eq!(menus(&fx), 0, "{scene:?}");
                }
                Advance::OnSelection => {
                    assert!(schedules(&fx).is_empty());
                    assert_eq!(menus(&fx), 1);
                }
                Advance::Never => assert!(fx.is_empty()),
            }
        }
    }

    #[test]
    fn start_enters_logo() {
        let (story, fx) = transition(Story::new(), Cue::Start);
        assert_eq!(story.scene, Scene::Logo);
        assert_eq!(fx.first(), Some(&Effect::Clear));
        assert!(fx.contains(&Effect::Release(Slot::Logo)));
        assert_eq!(schedules(&fx), vec![(2000, Scene::Instructions)]);
    }

    #[test]
    fn logo_is_released_after_present() {
        let (_, fx) = transition(Story::new(), Cue::Start);
        let present = fx.iter().position(|e| *e == Effect::Present).unwrap();
        let release = fx.iter().position(|e| *e == Effect::Release(Slot::Logo)).unwrap();
        assert!(present < release);
    }

    #[test]
    fn selection_only_counts_at_the_menu() {
        let story = Story { scene: Scene::Dialogue, branch: Branch::Polonius };
        let (after, fx) = transition(story, Cue::Selected(Branch::Splinter));
        assert_eq!(after, story);
        assert!(fx.is_empty());

        let story = Story { scene: Scene::ChoicePrep, branch: Branch::Polonius };
        let (after, fx) = transition(story, Cue::Selected(Branch::Splinter));
        assert_eq!(after.scene, Scene::Stab(Step::A));
        assert_eq!(after.branch, Branch::Splinter);
        assert_eq!(schedules(&fx), vec![(500, Scene::Stab(Step::B))]);
        assert!(fx.contains(&Effect::Panel(StringId::TextLevel5)));
    }

    #[test]
    fn sword_and_dead_follow_the_scene() {
        let stab = Story { scene: Scene::Stab(Step::B), branch: Branch::Kenny };
        let (_, fx) = transition(stab, Cue::Resume);
        let slots = drawn_slots(&fx);
        assert!(slots.contains(&Slot::Sword));
        assert!(!slots.contains(&Slot::Dead));

        let reveal = Story { scene: Scene::Reveal(Step::C), branch: Branch::Kenny };
        let (_, fx) = transition(reveal, Cue::Resume);
        let slots = drawn_slots(&fx);
        assert!(slots.contains(&Slot::Sword));
        assert!(slots.contains(&Slot::Dead));
        assert!(fx.contains(&Effect::Load { slot: Slot::Dead, image: ImageId::Kenny3 }));
    }

    #[test]
    fn substeps_do_not_clear_or_reshow_the_panel() {
        for scene in [Scene::Stab(Step::B), Scene::Reveal(Step::C)] {
            let (_, fx) = transition(Story { scene, branch: Branch::Polonius }, Cue::Resume);
            assert!(!fx.contains(&Effect::Clear));
            assert!(!fx.iter().any(|e| matches!(e, Effect::Panel(_))));
        }
    }

    #[test]
    fn epilogue_per_branch() {
        let polonius = Story { scene: Scene::Epilogue, branch: Branch::Polonius };
        let (_, fx) = transition(polonius, Cue::Resume);
        assert!(drawn_slots(&fx).contains(&Slot::Dead));
        assert!(fx.contains(&Effect::Load { slot: Slot::Epilogue, image: ImageId::Teardrops }));
        assert!(fx.contains(&Effect::Panel(StringId::TextLevel7Polonius)));

        let kenny = Story { scene: Scene::Epilogue, branch: Branch::Kenny };
        let (_, fx) = transition(kenny, Cue::Resume);
        assert_eq!(drawn_slots(&fx), vec![Slot::Epilogue]);
        assert!(fx.contains(&Effect::Draw {
            slot: Slot::Epilogue,
            at: asset::FULLSCREEN_AT,
            transparent: false,
        }));
    }

    #[test]
    fn suspend_rewinds_one_level_and_cancels() {
        let story = Story { scene: Scene::Reveal(Step::B), branch: Branch::Splinter };
        let (after, fx) = transition(story, Cue::Suspend);
        assert_eq!(after.scene, Scene::Stab(Step::A));
        assert_eq!(after.branch, Branch::Splinter);
        assert_eq!(fx, vec![Effect::Cancel]);

        let (after, _) = transition(Story::new(), Cue::Suspend);
        assert_eq!(after.level(), 1);
    }

    #[test]
    fn digit_redraws_only_on_levels_four_to_seven() {
        let early = Story { scene: Scene::Dialogue, branch: Branch::Polonius };
        let (_, fx) = transition(early, Cue::Digit(1));
        assert_eq!(fx, vec![Effect::Load { slot: Slot::Back, image: ImageId::Back1 }]);

        let live = Story { scene: Scene::ChoicePrep, branch: Branch::Polonius };
        let (after, fx) = transition(live, Cue::Digit(5));
        assert_eq!(after, live);
        assert_eq!(fx[0], Effect::Load { slot: Slot::Wall, image: ImageId::Wall2 });
        assert_eq!(fx.last(), Some(&Effect::Present));
        assert!(schedules(&fx).is_empty());

        let (_, fx) = transition(live, Cue::Digit(9));
        assert!(fx.is_empty());
    }

    #[test]
    fn digit_at_epilogue_keeps_the_ending_picture() {
        let polonius = Story { scene: Scene::Epilogue, branch: Branch::Polonius };
        let (_, fx) = transition(polonius, Cue::Digit(2));
        assert_eq!(fx[0], Effect::Load { slot: Slot::Back, image: ImageId::Back2 });
        let slots = drawn_slots(&fx);
        assert_eq!(slots.last(), Some(&Slot::Epilogue));
        assert!(slots.contains(&Slot::Back));
        assert!(slots.contains(&Slot::Dead));
        assert!(fx.contains(&Effect::Draw {
            slot: Slot::Epilogue,
            at: asset::TEARDROPS_AT,
            transparent: true,
        }));
        assert_eq!(fx.last(), Some(&Effect::Present));

        for branch in [Branch::Kenny, Branch::Splinter] {
            let story = Story { scene: Scene::Epilogue, branch };
            let (_, fx) = transition(story, Cue::Digit(4));
            let swap = Effect::Load { slot: Slot::Wall, image: ImageId::Wall1 };
            assert_eq!(fx, vec![swap], "{branch:?}");
        }
    }
}
