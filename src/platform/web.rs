//! Browser bindings
//!
//! `WebRunner` wraps a `Session` backed by LocalStorage and exposes a small
//! frame-driven API to JavaScript. The page owns rendering, audio playback
//! and input listeners; it forwards frame deltas and gestures here and pulls
//! events and entity snapshots back out as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::AudioMix;
use crate::input::{Gesture, classify_swipe};
use crate::persistence::LocalStorageStore;
use crate::session::{Session, share_message};
use crate::settings::Settings;
use crate::sim::{EntityKind, GameEvent};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Lane Runner starting...");
}

/// Event plus the sound cue the page should play for it
#[derive(Serialize)]
struct PresentedEvent {
    event: GameEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gain: Option<f32>,
}

#[derive(Serialize)]
struct EntityView {
    id: u32,
    kind: EntityKind,
    lane: u8,
    x: f32,
    y: f32,
}

#[wasm_bindgen]
pub struct WebRunner {
    session: Session<LocalStorageStore>,
    settings: Settings,
    mix: AudioMix,
    pending: Vec<PresentedEvent>,
}

#[wasm_bindgen]
impl WebRunner {
    /// Create a runner. A seed of 0 draws a random one.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebRunner {
        let seed = if seed == 0 {
            super::random_seed()
        } else {
            u64::from(seed)
        };
        let settings = Settings::load();
        let mix = AudioMix::from_settings(&settings);
        WebRunner {
            session: Session::new(LocalStorageStore::new(), seed, Tuning::default()),
            settings,
            mix,
            pending: Vec::new(),
        }
    }

    /// Advance by one animation frame
    pub fn tick(&mut self, dt_ms: f64) {
        let mix = self.mix;
        let pending = &mut self.pending;
        self.session.tick((dt_ms / 1000.0) as f32, &mut |event: &GameEvent| {
            let cue = mix.cue(event);
            pending.push(PresentedEvent {
                event: event.clone(),
                sound: cue.map(|(effect, _)| effect.as_str()),
                gain: cue.map(|(_, gain)| gain),
            });
        });
    }

    /// Queue a named gesture (`"tap"`, `"swipe_left"`, ...). Returns false for unknown names.
    pub fn gesture(&mut self, name: &str) -> bool {
        match Gesture::from_name(name) {
            Some(gesture) => {
                self.session.gesture(gesture);
                true
            }
            None => false,
        }
    }

    /// Queue a keyboard key by its `KeyboardEvent.key` name
    pub fn key(&mut self, name: &str) -> bool {
        match Gesture::from_key(name) {
            Some(gesture) => {
                self.session.gesture(gesture);
                true
            }
            None => false,
        }
    }

    /// Queue a pointer stroke; returns false when it was not a gesture
    pub fn swipe(&mut self, dx: f32, dy: f32, duration_ms: f32) -> bool {
        match classify_swipe(dx, dy, duration_ms) {
            Some(gesture) => {
                self.session.gesture(gesture);
                true
            }
            None => false,
        }
    }

    pub fn share(&mut self) {
        self.session.request_share();
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.session.score() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn best(&self) -> f64 {
        self.session.best() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f32 {
        self.session.speed()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 {
        self.session.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn lane(&self) -> u8 {
        self.session.state().avatar.lane.index()
    }

    /// Runner centre across the road (tweened during lane changes)
    #[wasm_bindgen(getter, js_name = runnerX)]
    pub fn runner_x(&self) -> f32 {
        self.session.state().avatar.x
    }

    #[wasm_bindgen(getter)]
    pub fn altitude(&self) -> f32 {
        self.session.state().avatar.altitude
    }

    #[wasm_bindgen(getter, js_name = speedLineAlpha)]
    pub fn speed_line_alpha(&self) -> f32 {
        self.settings
            .speed_line_alpha(self.session.progress(), &self.session.state().tuning)
    }

    #[wasm_bindgen(getter, js_name = screenShake)]
    pub fn screen_shake(&self) -> bool {
        self.settings.effective_screen_shake()
    }

    #[wasm_bindgen(js_name = shareMessage)]
    pub fn share_message(&self) -> String {
        share_message(self.session.score())
    }

    /// Live entities as a JSON array
    #[wasm_bindgen(js_name = entitiesJson)]
    pub fn entities_json(&self) -> String {
        let views: Vec<EntityView> = self
            .session
            .entities()
            .iter()
            .map(|e| EntityView {
                id: e.id,
                kind: e.kind,
                lane: e.lane.index(),
                x: e.pos.x,
                y: e.pos.y,
            })
            .collect();
        to_json(&views)
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> String {
        let events = std::mem::take(&mut self.pending);
        to_json(&events)
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.apply_settings();
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
        self.apply_settings();
    }

    #[wasm_bindgen(js_name = setFootsteps)]
    pub fn set_footsteps(&mut self, enabled: bool) {
        self.settings.footsteps = enabled;
        self.apply_settings();
    }
}

impl WebRunner {
    fn apply_settings(&mut self) {
        self.mix = AudioMix::from_settings(&self.settings);
        self.settings.save();
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize snapshot: {}", e);
        "[]".to_string()
    })
}
