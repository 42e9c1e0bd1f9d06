/// Scoped ownership for image handles.
///
/// `Held<T>` owns at most one handle. Loading into it always drops the
/// previous handle before the loader runs, and `ImageSlots` drops all of
/// them on teardown. Handles are never reachable after release because
/// the only way to draw is through `Held::get`.

use crate::domain::asset::Slot;

pub struct Held<T> {
    value: Option<T>,
}

impl<T> Held<T> {
    pub fn empty() -> Self {
        Held { value: None }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.value.is_some()
    }

    /// Release the current handle, then store whatever `load` produces.
    /// On error the slot stays empty.
    pub fn reload<E>(&mut self, load: impl FnOnce() -> Result<T, E>) -> Result<(), E> {
        self.release();
        self.value = Some(load()?);
        Ok(())
    }

    /// Returns true if something was released.
    pub fn release(&mut self) -> bool {
        self.value.take().is_some()
    }
}

impl<T> Default for Held<T> {
    fn default() -> Self {
        Held::empty()
    }
}

/// One `Held` per `Slot`.
pub struct ImageSlots<T> {
    slots: [Held<T>; Slot::COUNT],
}

impl<T> ImageSlots<T> {
    pub fn new() -> Self {
        ImageSlots { slots: std::array::from_fn(|_| Held::empty()) }
    }

    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.slots[slot.index()].get()
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Held<T> {
        &mut self.slots[slot.index()]
    }

    pub fn held_count(&self) -> usize {
        self.slots.iter().filter(|h| h.is_held()).count()
    }

    pub fn release_all(&mut self) -> usize {
        self.slots.iter_mut().map(Held::release).filter(|&released| released).count()
    }
}

impl<T> Default for ImageSlots<T> {
    fn default() -> Self {
        ImageSlots::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Handle that logs its own release.
    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("release {}", self.name));
        }
    }

    fn tracked(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Result<Tracked, ()> {
        log.borrow_mut().push(format!("load {name}"));
        Ok(Tracked { name, log: Rc::clone(log) })
    }

    #[test]
    fn reload_releases_before_loading() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut held = Held::empty();
        held.reload(|| tracked("sword1", &log)).unwrap();
        held.reload(|| tracked("sword2", &log)).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["load sword1", "release sword1", "load sword2"]
        );
        assert_eq!(held.get().map(|t| t.name), Some("sword2"));
    }

    #[test]
    fn failed_load_leaves_slot_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut held = Held::empty();
        held.reload(|| tracked("back0", &log)).unwrap();
        let result: Result<(), ()> = held.reload(|| Err(()));
        assert!(result.is_err());
        assert!(!held.is_held());
        assert_eq!(*log.borrow(), vec!["load back0", "release back0"]);
    }

    #[test]
    fn release_all_and_drop_free_everything() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = ImageSlots::new();
        slots.slot_mut(Slot::Back).reload(|| tracked("back", &log)).unwrap();
        slots.slot_mut(Slot::Wall).reload(|| tracked("wall", &log)).unwrap();
        assert_eq!(slots.held_count(), 2);
        assert_eq!(slots.release_all(), 2);
        assert_eq!(slots.held_count(), 0);

        slots.slot_mut(Slot::Sword).reload(|| tracked("sword", &log)).unwrap();
        drop(slots);
        assert_eq!(log.borrow().last().map(String::as_str), Some("release sword"));
    }

    #[test]
    fn release_on_empty_slot_is_a_no_op() {
        let mut held: Held<u8> = Held::default();
        assert!(!held.release());
    }
}
