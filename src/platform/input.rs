//! Input adapter
//!
//! Collects raw device events between frames and turns them into one
//! [`TickInput`] per frame. Keyboard movement is held-state; fire, pause and
//! start are one-shot actions consumed by [`InputAdapter::sample`].

use glam::Vec2;

use crate::consts::DEFAULT_DEAD_ZONE;
use crate::sim::TickInput;

/// Standard-mapping gamepad buttons
pub const GAMEPAD_FIRE_BUTTON: usize = 0;
pub const GAMEPAD_START_BUTTON: usize = 9;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Start,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " => Some(Key::Fire),
            "p" | "P" | "Escape" => Some(Key::Pause),
            "Enter" => Some(Key::Start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            _ => {}
        }
    }

    fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Last polled state of the active gamepad
#[derive(Debug, Clone, Copy, Default)]
struct PadState {
    index: u32,
    stick: Vec2,
    fire_held: bool,
    start_held: bool,
}

/// Device-independent input collector
#[derive(Debug, Clone)]
pub struct InputAdapter {
    dead_zone: f32,
    held: HeldKeys,
    pad: Option<PadState>,
    /// Canvas point to aim at on the next sample
    aim_target: Option<Vec2>,
    fire: bool,
    pause: bool,
    start: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_DEAD_ZONE)
    }
}

impl InputAdapter {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            dead_zone,
            held: HeldKeys::default(),
            pad: None,
            aim_target: None,
            fire: false,
            pause: false,
            start: false,
        }
    }

    /// Key pressed. `repeat` is the browser's auto-repeat flag; repeats never
    /// re-trigger one-shot actions. Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        self.held.set(key, true);
        if !repeat {
            match key {
                Key::Fire => self.fire = true,
                Key::Pause => self.pause = true,
                Key::Start => self.start = true,
                _ => {}
            }
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        self.held.set(key, false);
        true
    }

    /// Drop all held keys (window lost focus)
    pub fn release_all(&mut self) {
        self.held = HeldKeys::default();
    }

    /// Mouse button at canvas-relative `pos`: aim there and fire
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.aim_target = Some(pos);
        self.fire = true;
    }

    /// Tap at canvas-relative `pos`: same as a click
    pub fn touch_start(&mut self, pos: Vec2) {
        self.pointer_down(pos);
    }

    /// Request a pause toggle from outside the keyboard (e.g. tab hidden)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Request start / restart (e.g. the restart button)
    pub fn request_start(&mut self) {
        self.start = true;
    }

    pub fn gamepad_connected(&mut self, index: u32) {
        if self.pad.is_none() {
            log::info!("Gamepad {} connected", index);
            self.pad = Some(PadState {
                index,
                ..Default::default()
            });
        }
    }

    pub fn gamepad_disconnected(&mut self, index: u32) {
        if self.pad.is_some_and(|p| p.index == index) {
            log::info!("Gamepad {} disconnected", index);
            self.pad = None;
        }
    }

    /// Index of the gamepad being polled, if any
    pub fn active_gamepad(&self) -> Option<u32> {
        self.pad.map(|p| p.index)
    }

    /// Feed one poll of the active gamepad: axes and pressed flags in
    /// standard-mapping order
    pub fn poll_gamepad(&mut self, axes: &[f64], buttons: &[bool]) {
        let dead_zone = self.dead_zone;
        let Some(pad) = self.pad.as_mut() else {
            return;
        };

        let raw = Vec2::new(
            axes.first().copied().unwrap_or(0.0) as f32,
            axes.get(1).copied().unwrap_or(0.0) as f32,
        );
        pad.stick = if raw.length() < dead_zone {
            Vec2::ZERO
        } else {
            raw.clamp(Vec2::NEG_ONE, Vec2::ONE)
        };

        let pressed = |i: usize| buttons.get(i).copied().unwrap_or(false);
        let fire = pressed(GAMEPAD_FIRE_BUTTON);
        let start = pressed(GAMEPAD_START_BUTTON);
        if fire && !pad.fire_held {
            self.fire = true;
        }
        // Start doubles as pause; the phase decides which one applies
        if start && !pad.start_held {
            self.start = true;
            self.pause = true;
        }
        pad.fire_held = fire;
        pad.start_held = start;
    }

    /// Build this frame's input and consume one-shot actions.
    ///
    /// Aim priority: pointer/tap target, then gamepad stick, then keyboard
    /// movement direction.
    pub fn sample(&mut self, player_center: Vec2) -> TickInput {
        let keys = self.held.movement();
        let stick = self.pad.map(|p| p.stick).unwrap_or(Vec2::ZERO);
        let movement = if keys != Vec2::ZERO { keys } else { stick };

        let aim = match self.aim_target.take() {
            Some(target) => Some(target - player_center),
            None if movement != Vec2::ZERO => Some(movement),
            None => None,
        };

        let start = std::mem::take(&mut self.start);
        TickInput {
            movement,
            aim,
            fire: std::mem::take(&mut self.fire),
            pause: std::mem::take(&mut self.pause),
            start,
            restart: start,
        }
    }
}
