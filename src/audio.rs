//! Sound cues
//!
//! Maps game events to the sound effect a host should play and the gain to
//! play it at. Synthesis and mixing belong to the host.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Token collected
    Pickup,
    /// Jump started
    Jump,
    /// Slide started
    Slide,
    /// Obstacle hit
    Hit,
    /// Footstep while running
    Step,
}

impl SoundEffect {
    /// Volume relative to the other cues before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Pickup => 0.7,
            SoundEffect::Jump => 0.7,
            SoundEffect::Slide => 0.65,
            SoundEffect::Hit => 0.8,
            SoundEffect::Step => 0.10,
        }
    }

    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::TokenCollected { .. } => Some(SoundEffect::Pickup),
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::SlideStarted => Some(SoundEffect::Slide),
            GameEvent::ObstacleHit { .. } => Some(SoundEffect::Hit),
            GameEvent::Footstep => Some(SoundEffect::Step),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Pickup => "pickup",
            SoundEffect::Jump => "jump",
            SoundEffect::Slide => "slide",
            SoundEffect::Hit => "hit",
            SoundEffect::Step => "step",
        }
    }
}

/// Gains derived from the player's settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMix {
    sfx_gain: f32,
    footsteps: bool,
}

impl AudioMix {
    pub fn from_settings(settings: &Settings) -> Self {
        let sfx_gain = if settings.muted {
            0.0
        } else {
            (settings.master_volume * settings.sfx_volume).clamp(0.0, 1.0)
        };
        Self {
            sfx_gain,
            footsteps: settings.footsteps,
        }
    }

    /// Final gain for an effect; 0 means do not play
    pub fn gain(&self, effect: SoundEffect) -> f32 {
        if effect == SoundEffect::Step && !self.footsteps {
            return 0.0;
        }
        effect.base_volume() * self.sfx_gain
    }

    /// Effect and gain to play for an event, skipping silent cues
    pub fn cue(&self, event: &GameEvent) -> Option<(SoundEffect, f32)> {
        let effect = SoundEffect::for_event(event)?;
        let gain = self.gain(effect);
        (gain > 0.0).then_some((effect, gain))
    }
}

impl Default for AudioMix {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
