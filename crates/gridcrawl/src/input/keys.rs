use std::collections::HashSet;

use super::queue::InputEvent;

/// DOM key codes for the arrow keys.
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;

/// Which keys are currently held.
///
/// Events are edge-triggered; behaviours want level-triggered state, so the
/// runner folds each frame's `InputEvent`s into this set before dispatching
/// `Update`. A key pressed and released inside one frame therefore never
/// shows up as held.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashSet<u32>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key_code: u32) {
        self.pressed.insert(key_code);
    }

    pub fn release(&mut self, key_code: u32) {
        self.pressed.remove(&key_code);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn is_down(&self, key_code: u32) -> bool {
        self.pressed.contains(&key_code)
    }

    /// Fold one input event into the held set.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => self.press(key_code),
            InputEvent::KeyUp { key_code } => self.release(key_code),
            InputEvent::ReleaseAll => self.release_all(),
        }
    }

    pub fn pressed(&self) -> impl Iterator<Item = u32> + '_ {
        self.pressed.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}

impl FromIterator<u32> for KeyState {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = KeyState::new();
        keys.press(KEY_UP);
        keys.press(KEY_UP);
        assert!(keys.is_down(KEY_UP));
        assert_eq!(keys.len(), 1);
        keys.release(KEY_UP);
        assert!(!keys.is_down(KEY_UP));
        // Releasing an unheld key is harmless.
        keys.release(KEY_DOWN);
        assert!(keys.is_empty());
    }

    #[test]
    fn apply_events_in_order() {
        let mut keys = KeyState::new();
        for ev in [
            InputEvent::KeyDown { key_code: KEY_LEFT },
            InputEvent::KeyDown { key_code: KEY_UP },
            InputEvent::KeyUp { key_code: KEY_LEFT },
        ] {
            keys.apply(&ev);
        }
        assert!(keys.is_down(KEY_UP));
        assert!(!keys.is_down(KEY_LEFT));
    }

    #[test]
    fn release_all_on_blur() {
        let mut keys: KeyState = [KEY_LEFT, KEY_RIGHT, 65].into_iter().collect();
        assert_eq!(keys.len(), 3);
        keys.apply(&InputEvent::ReleaseAll);
        assert!(keys.is_empty());
        assert_eq!(keys.pressed().count(), 0);
    }
}
