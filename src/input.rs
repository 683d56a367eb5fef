//! Keyboard state and the logical actions the motion controller reads.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
}

/// Reports which logical actions are currently held.
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Raised by the platform when the loop should end.
pub trait QuitSignal {
    fn quit_requested(&self) -> bool;
}

/// Physical keys bound to each action. Either key of a pair triggers it.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub forward: [KeyCode; 2],
    pub backward: [KeyCode; 2],
    pub rotate_left: [KeyCode; 2],
    pub rotate_right: [KeyCode; 2],
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: [KeyCode::KeyW, KeyCode::ArrowUp],
            backward: [KeyCode::KeyS, KeyCode::ArrowDown],
            rotate_left: [KeyCode::KeyA, KeyCode::ArrowLeft],
            rotate_right: [KeyCode::KeyD, KeyCode::ArrowRight],
            quit: KeyCode::Escape,
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[KeyCode; 2] {
        match action {
            Action::Forward => &self.forward,
            Action::Backward => &self.backward,
            Action::RotateLeft => &self.rotate_left,
            Action::RotateRight => &self.rotate_right,
        }
    }
}

/// Keys currently down plus the quit flag, fed from window events.
#[derive(Default)]
pub struct KeyState {
    bindings: KeyBindings,
    keys_down: HashSet<KeyCode>,
    quit: bool,
}

impl KeyState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys_down: HashSet::new(),
            quit: false,
        }
    }

    pub fn press(&mut self, code: KeyCode) {
        if code == self.bindings.quit {
            self.quit = true;
        }
        self.keys_down.insert(code);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.keys_down.remove(&code);
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }
}

impl InputSource for KeyState {
    fn is_held(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|k| self.keys_down.contains(k))
    }
}

impl QuitSignal for KeyState {
    fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_bound_key_holds_action() {
        let mut keys = KeyState::default();
        assert!(!keys.is_held(Action::Forward));

        keys.press(KeyCode::ArrowUp);
        assert!(keys.is_held(Action::Forward));
        keys.press(KeyCode::KeyW);
        keys.release(KeyCode::ArrowUp);
        assert!(keys.is_held(Action::Forward));
        keys.release(KeyCode::KeyW);
        assert!(!keys.is_held(Action::Forward));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut keys = KeyState::default();
        keys.press(KeyCode::KeyQ);
        for action in [
            Action::Forward,
            Action::Backward,
            Action::RotateLeft,
            Action::RotateRight,
        ] {
            assert!(!keys.is_held(action));
        }
    }

    #[test]
    fn test_quit_key_and_close_request() {
        let mut keys = KeyState::default();
        assert!(!keys.quit_requested());
        keys.press(KeyCode::Escape);
        assert!(keys.quit_requested());

        let mut keys = KeyState::new(KeyBindings::default());
        keys.request_quit();
        assert!(keys.quit_requested());
    }
}
