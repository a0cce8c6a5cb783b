//! Abstracted input
//!
//! Raw device capture lives in the shell. It reports button levels here and gets back
//! discrete press events, one per rising edge, so a held key never presses twice.

use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::players::PlayerId;
use crate::session::MatchMode;

/// Which hand pressed, in solo training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Hand::Left),
            "right" | "r" => Ok(Hand::Right),
            _ => Err(format!("unknown hand '{s}'")),
        }
    }
}

/// One abstracted button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub player: PlayerId,
    /// Only meaningful in solo mode
    pub hand: Option<Hand>,
}

impl InputEvent {
    pub fn player(player: PlayerId) -> Self {
        Self { player, hand: None }
    }

    /// Solo presses always belong to player 0
    pub fn hand(hand: Hand) -> Self {
        Self {
            player: 0,
            hand: Some(hand),
        }
    }

    /// Event for a gamepad's primary button: pad index is the player in party mode;
    /// in solo mode pad 0 is the left hand and every other pad the right.
    pub fn from_pad(index: usize, mode: MatchMode) -> Self {
        match mode {
            MatchMode::Party => Self::player(index as PlayerId),
            MatchMode::Solo if index == 0 => Self::hand(Hand::Left),
            MatchMode::Solo => Self::hand(Hand::Right),
        }
    }

    /// Event for a physical key (`KeyboardEvent.code`), if that key is bound in `mode`
    pub fn from_key(code: &str, mode: MatchMode) -> Option<Self> {
        match mode {
            MatchMode::Party => player_for_key(code).map(Self::player),
            MatchMode::Solo => hand_for_key(code).map(Self::hand),
        }
    }
}

/// Party key bindings, spread apart so four people can share one keyboard
pub fn player_for_key(code: &str) -> Option<PlayerId> {
    match code {
        "KeyA" | "Space" => Some(0),
        "KeyL" | "Enter" | "NumpadEnter" => Some(1),
        "ControlLeft" | "KeyQ" => Some(2),
        "ControlRight" | "KeyP" => Some(3),
        _ => None,
    }
}

/// Solo bindings: left half of the keyboard drives the left hand
pub fn hand_for_key(code: &str) -> Option<Hand> {
    const LEFT: &[&str] = &[
        "KeyA", "KeyS", "KeyD", "KeyF", "KeyQ", "KeyW", "KeyE", "KeyR", "KeyZ", "KeyX", "KeyC",
        "KeyV", "Space", "ShiftLeft", "ControlLeft", "Digit1", "Digit2", "Digit3", "Digit4",
        "Digit5",
    ];
    const RIGHT: &[&str] = &[
        "Enter", "NumpadEnter", "Numpad0", "ArrowRight", "ArrowLeft", "ArrowUp", "ArrowDown",
        "Slash", "Period", "Comma", "KeyJ", "KeyK", "KeyL", "Semicolon", "Quote", "KeyU", "KeyI",
        "KeyO", "KeyP", "BracketLeft", "BracketRight", "KeyM", "KeyN", "KeyH", "KeyY", "Digit0",
        "Digit9", "Digit8", "ShiftRight", "ControlRight", "Backspace",
    ];

    if LEFT.contains(&code) {
        Some(Hand::Left)
    } else if RIGHT.contains(&code) {
        Some(Hand::Right)
    } else {
        None
    }
}

/// Rising-edge detector keyed by button identity
#[derive(Debug, Clone)]
pub struct ButtonEdges<K> {
    held: HashMap<K, bool>,
}

impl<K: Eq + Hash> Default for ButtonEdges<K> {
    fn default() -> Self {
        Self {
            held: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> ButtonEdges<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the current level of a button; true only on the frame it goes down
    pub fn update(&mut self, key: K, pressed: bool) -> bool {
        let was = self.held.insert(key, pressed).unwrap_or(false);
        pressed && !was
    }

    /// Key-down event; true unless the key is already held (auto-repeat)
    pub fn press(&mut self, key: K) -> bool {
        self.update(key, true)
    }

    pub fn release(&mut self, key: K) {
        self.held.insert(key, false);
    }

    /// Forget every held button (focus loss, device disconnect)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl ButtonEdges<usize> {
    /// Poll gamepad primary buttons once per frame. `None` marks a disconnected pad.
    pub fn poll_pads(&mut self, pads: &[Option<bool>], mode: MatchMode) -> Vec<InputEvent> {
        pads.iter()
            .enumerate()
            .filter_map(|(index, level)| {
                let pressed = level.unwrap_or(false);
                self.update(index, pressed)
                    .then(|| InputEvent::from_pad(index, mode))
            })
            .collect()
    }
}
