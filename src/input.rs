//! Logical input
//!
//! Hosts translate keyboard and touch into `Gesture`s; the simulation only
//! ever sees the resulting `Action`. Left/swipe-left/key-left are treated
//! identically, and so on for every direction.

use serde::{Deserialize, Serialize};

/// Gestures longer than this are not swipes (ms)
pub const SWIPE_MAX_MS: f32 = 800.0;
/// Movement below this on both axes counts as a tap
pub const SWIPE_THRESHOLD: f32 = 35.0;

/// Discrete gestures a host can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    Tap,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    KeyLeft,
    KeyRight,
    KeyUp,
    KeyDown,
    KeyConfirm,
}

/// What a gesture asks the run to do.
///
/// `Confirm` depends on the phase: start while idle, jump while running,
/// restart once ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Confirm,
    Left,
    Right,
    /// Jump
    Up,
    /// Slide
    Down,
    /// Ask the host to share the final score (end screen button)
    Share,
}

impl Gesture {
    pub fn action(self) -> Action {
        match self {
            Gesture::Tap | Gesture::KeyConfirm => Action::Confirm,
            Gesture::SwipeLeft | Gesture::KeyLeft => Action::Left,
            Gesture::SwipeRight | Gesture::KeyRight => Action::Right,
            Gesture::SwipeUp | Gesture::KeyUp => Action::Up,
            Gesture::SwipeDown | Gesture::KeyDown => Action::Down,
        }
    }

    /// Map a keyboard key name (DOM `KeyboardEvent.key` style) to a gesture
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowleft" | "left" | "a" => Some(Gesture::KeyLeft),
            "arrowright" | "right" | "d" => Some(Gesture::KeyRight),
            "arrowup" | "up" | "w" => Some(Gesture::KeyUp),
            "arrowdown" | "down" | "s" => Some(Gesture::KeyDown),
            " " | "space" | "spacebar" | "enter" => Some(Gesture::KeyConfirm),
            _ => None,
        }
    }

    /// Parse a gesture name such as `"swipe_left"` or `"tap"`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "tap" => Some(Gesture::Tap),
            "swipe_left" => Some(Gesture::SwipeLeft),
            "swipe_right" => Some(Gesture::SwipeRight),
            "swipe_up" => Some(Gesture::SwipeUp),
            "swipe_down" => Some(Gesture::SwipeDown),
            "key_left" => Some(Gesture::KeyLeft),
            "key_right" => Some(Gesture::KeyRight),
            "key_up" => Some(Gesture::KeyUp),
            "key_down" => Some(Gesture::KeyDown),
            "key_confirm" => Some(Gesture::KeyConfirm),
            _ => None,
        }
    }
}

/// Classify a pointer stroke in screen coordinates (y grows downward).
///
/// Returns `None` for strokes held too long to count as a gesture.
pub fn classify_swipe(dx: f32, dy: f32, duration_ms: f32) -> Option<Gesture> {
    if duration_ms > SWIPE_MAX_MS {
        return None;
    }
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax < SWIPE_THRESHOLD && ay < SWIPE_THRESHOLD {
        return Some(Gesture::Tap);
    }
    Some(if ax > ay {
        if dx > 0.0 {
            Gesture::SwipeRight
        } else {
            Gesture::SwipeLeft
        }
    } else if dy < 0.0 {
        Gesture::SwipeUp
    } else {
        Gesture::SwipeDown
    })
}
