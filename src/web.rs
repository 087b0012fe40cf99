//! Browser entry point
//!
//! The JS side owns the canvas, the DOM overlays and the animation frame
//! loop. Each frame it calls `tick` and draws whatever `frame` returns.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::persistence::LocalStore;
use crate::sim::{
    Direction, GameEvent, GameSession, Projection, Resolution, SessionPhase, Sprite, TickInput,
    tick,
};
use crate::{Settings, Tuning, flavor, load_high_score, persist_high_score};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
    log::info!("Not The Player starting...");
}

/// Everything the presentation needs to draw one frame
#[derive(Serialize)]
struct Frame<'a> {
    phase: SessionPhase,
    chaos: f32,
    score: u32,
    high_score: u32,
    avatar: &'a str,
    player: Projection,
    camera_tilt: f32,
    input_locked: bool,
    frozen: bool,
    sprites: Vec<Sprite>,
    events: Vec<GameEvent>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// One run, driven from JS
#[wasm_bindgen]
pub struct WebSession {
    session: GameSession,
    settings: Settings,
    store: Option<LocalStore>,
    input: TickInput,
    saved: bool,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Result<WebSession, JsValue> {
        let store = match LocalStore::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Running without storage: {}", e);
                None
            }
        };
        let settings = store.as_ref().map(Settings::load).unwrap_or_default();
        let high_score = store.as_ref().map_or(0, load_high_score);

        let session = GameSession::new(
            seed as u64,
            settings.session_config(),
            Tuning::default(),
            high_score,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebSession {
            session,
            settings,
            store,
            input: TickInput::default(),
            saved: false,
        })
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    /// Raw lane press (-1 or +1). Returns what chaos made of it.
    pub fn press(&mut self, delta: i32) -> String {
        match self.session.press_delta(delta) {
            None => "rejected",
            Some(Resolution::Ignored) => "ignored",
            Some(Resolution::Reversed(_)) => "reversed",
            Some(Resolution::Passed(_)) => "passed",
        }
        .to_string()
    }

    pub fn press_left(&mut self) -> String {
        self.press(Direction::Left.delta())
    }

    pub fn press_right(&mut self) -> String {
        self.press(Direction::Right.delta())
    }

    /// Attract-mode bot
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    pub fn tick(&mut self, dt_ms: f32) {
        tick(&mut self.session, &self.input, dt_ms);

        if self.session.phase() == SessionPhase::Dead && !self.saved {
            self.saved = true;
            if let Some(store) = self.store.as_mut() {
                persist_high_score(store, self.session.score().current);
            }
        }
    }

    /// JSON frame: projected sprites plus this frame's events
    pub fn frame(&mut self) -> Result<String, JsValue> {
        let events = self.session.drain_events();
        let session = &self.session;
        let projector = session.projector();
        let camera_tilt = if self.settings.effective_camera_shake() {
            session.camera_tilt()
        } else {
            0.0
        };
        let frame = Frame {
            phase: session.phase(),
            chaos: session.chaos(),
            score: session.score().current,
            high_score: session.score().best,
            avatar: session.avatar(),
            player: projector.player(session.player().lane),
            camera_tilt,
            input_locked: session.input_locked(),
            frozen: session.is_frozen(),
            sprites: projector.render_list(&session.track().obstacles),
            events,
        };
        to_json(&frame)
    }

    /// Death-screen payload as JSON, once the run is over
    pub fn summary(&self) -> Result<Option<String>, JsValue> {
        self.session.summary().map(to_json).transpose()
    }

    pub fn settings(&self) -> Result<String, JsValue> {
        to_json(&self.settings)
    }

    /// Replace and save settings; they apply from the next session
    pub fn update_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.settings = settings.sanitized();
        if let Some(store) = self.store.as_mut() {
            self.settings
                .save(store)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        Ok(())
    }

    /// Fake version line for the title screen
    pub fn patch_note(seed: f64) -> String {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(seed as u64);
        flavor::patch_note(&mut rng)
    }
}
