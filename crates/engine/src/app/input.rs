use std::collections::VecDeque;

use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

pub(crate) const MAX_PENDING_CONSOLE_KEYS: usize = 64;

/// One logical key event for text entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKey {
    Char(char),
    Backspace,
    Submit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    activate_pressed: bool,
    drop_pressed: bool,
    exit_pressed: bool,
    console_key: Option<ConsoleKey>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn activate_pressed(&self) -> bool {
        self.activate_pressed
    }

    pub fn drop_pressed(&self) -> bool {
        self.drop_pressed
    }

    pub fn exit_pressed(&self) -> bool {
        self.exit_pressed
    }

    pub fn console_key(&self) -> Option<ConsoleKey> {
        self.console_key
    }

    pub fn with_activate_pressed(mut self, activate_pressed: bool) -> Self {
        self.activate_pressed = activate_pressed;
        self
    }

    pub fn with_drop_pressed(mut self, drop_pressed: bool) -> Self {
        self.drop_pressed = drop_pressed;
        self
    }

    pub fn with_exit_pressed(mut self, exit_pressed: bool) -> Self {
        self.exit_pressed = exit_pressed;
        self
    }

    pub fn with_console_key(mut self, console_key: Option<ConsoleKey>) -> Self {
        self.console_key = console_key;
        self
    }
}

/// Folds window events into edge-triggered per-tick snapshots.
#[derive(Debug, Default)]
pub struct InputCollector {
    left_mouse_is_down: bool,
    activate_pressed_edge: bool,
    right_mouse_is_down: bool,
    drop_pressed_edge: bool,
    escape_is_down: bool,
    exit_pressed_edge: bool,
    pending_console_keys: VecDeque<ConsoleKey>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if let PhysicalKey::Code(code) = key_event.physical_key {
            self.handle_key_state(code, key_event.state);
        }
        if key_event.state == ElementState::Pressed {
            if let Some(text) = key_event.text.as_ref() {
                self.handle_text(text);
            }
        }
    }

    pub fn handle_key_state(&mut self, code: KeyCode, state: ElementState) {
        match code {
            KeyCode::Escape => match state {
                ElementState::Pressed => {
                    if !self.escape_is_down {
                        self.exit_pressed_edge = true;
                    }
                    self.escape_is_down = true;
                }
                ElementState::Released => self.escape_is_down = false,
            },
            KeyCode::Enter | KeyCode::NumpadEnter if state == ElementState::Pressed => {
                self.push_console_key(ConsoleKey::Submit);
            }
            KeyCode::Backspace if state == ElementState::Pressed => {
                self.push_console_key(ConsoleKey::Backspace);
            }
            _ => {}
        }
    }

    /// Printable characters only; control keys arrive through `handle_key_state`.
    pub fn handle_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            self.push_console_key(ConsoleKey::Char(ch));
        }
    }

    pub fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match button {
            MouseButton::Left => match state {
                ElementState::Pressed => {
                    if !self.left_mouse_is_down {
                        self.activate_pressed_edge = true;
                    }
                    self.left_mouse_is_down = true;
                }
                ElementState::Released => self.left_mouse_is_down = false,
            },
            MouseButton::Right => match state {
                ElementState::Pressed => {
                    if !self.right_mouse_is_down {
                        self.drop_pressed_edge = true;
                    }
                    self.right_mouse_is_down = true;
                }
                ElementState::Released => self.right_mouse_is_down = false,
            },
            _ => {}
        }
    }

    /// Delivers at most one console key; the rest wait for later ticks.
    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::empty()
            .with_activate_pressed(self.activate_pressed_edge)
            .with_drop_pressed(self.drop_pressed_edge)
            .with_exit_pressed(self.exit_pressed_edge)
            .with_console_key(self.pending_console_keys.pop_front());
        self.activate_pressed_edge = false;
        self.drop_pressed_edge = false;
        self.exit_pressed_edge = false;
        snapshot
    }

    pub fn pending_console_key_count(&self) -> usize {
        self.pending_console_keys.len()
    }

    fn push_console_key(&mut self, key: ConsoleKey) {
        if self.pending_console_keys.len() == MAX_PENDING_CONSOLE_KEYS {
            self.pending_console_keys.pop_front();
        }
        self.pending_console_keys.push_back(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_click_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::new();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.activate_pressed());
        assert!(!second.activate_pressed());
    }

    #[test]
    fn held_left_click_does_not_repeat_pressed_edge() {
        let mut input = InputCollector::new();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let second = input.snapshot_for_tick();
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        let third = input.snapshot_for_tick();

        assert!(first.activate_pressed());
        assert!(!second.activate_pressed());
        assert!(third.activate_pressed());
    }

    #[test]
    fn right_click_maps_to_drop_edge() {
        let mut input = InputCollector::new();
        input.handle_mouse_input(MouseButton::Right, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.drop_pressed());
        assert!(!first.activate_pressed());
        assert!(!second.drop_pressed());
    }

    #[test]
    fn held_escape_fires_exit_once() {
        let mut input = InputCollector::new();
        input.handle_key_state(KeyCode::Escape, ElementState::Pressed);
        let first = input.snapshot_for_tick();
        input.handle_key_state(KeyCode::Escape, ElementState::Pressed);
        let second = input.snapshot_for_tick();

        assert!(first.exit_pressed());
        assert!(!second.exit_pressed());
    }

    #[test]
    fn console_keys_are_delivered_one_per_tick() {
        let mut input = InputCollector::new();
        input.handle_text("ab");
        input.handle_key_state(KeyCode::Backspace, ElementState::Pressed);
        input.handle_key_state(KeyCode::Enter, ElementState::Pressed);

        let keys: Vec<Option<ConsoleKey>> =
            (0..5).map(|_| input.snapshot_for_tick().console_key()).collect();

        assert_eq!(
            keys,
            vec![
                Some(ConsoleKey::Char('a')),
                Some(ConsoleKey::Char('b')),
                Some(ConsoleKey::Backspace),
                Some(ConsoleKey::Submit),
                None,
            ]
        );
    }

    #[test]
    fn released_keys_do_not_enqueue_console_keys() {
        let mut input = InputCollector::new();
        input.handle_key_state(KeyCode::Enter, ElementState::Released);
        input.handle_key_state(KeyCode::Backspace, ElementState::Released);
        assert_eq!(input.pending_console_key_count(), 0);
    }

    #[test]
    fn text_input_ignores_control_characters() {
        let mut input = InputCollector::new();
        input.handle_text("x\n\u{8}");
        assert_eq!(input.pending_console_key_count(), 1);
    }

    #[test]
    fn pending_console_keys_are_bounded() {
        let mut input = InputCollector::new();
        let burst = "k".repeat(MAX_PENDING_CONSOLE_KEYS + 8);
        input.handle_text(&burst);
        assert_eq!(input.pending_console_key_count(), MAX_PENDING_CONSOLE_KEYS);
    }
}
