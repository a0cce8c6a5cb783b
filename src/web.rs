//! Browser facade
//!
//! The JS shell owns the canvas, the animation frame loop and raw device events. It
//! forwards key and gamepad levels here, calls `frame` once per animation frame and
//! draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::input::{ButtonEdges, Hand, InputEvent};
use crate::players::PlayerConfig;
use crate::session::{MatchMode, Session};
use crate::settings::MatchSettings;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
    log::info!("Timing Party (wasm) starting...");
}

fn to_js<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize for JS: {}", e);
        "null".into()
    })
}

fn parse_settings(json: &str) -> Result<MatchSettings, JsValue> {
    if json.trim().is_empty() {
        return Ok(MatchSettings::default());
    }
    MatchSettings::from_json(json).map_err(|e| {
        log::warn!("Rejected settings: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// A running match plus edge detection for the shell's raw inputs
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    keys: ButtonEdges<String>,
    pads: ButtonEdges<usize>,
}

impl WebSession {
    fn wrap(session: Session) -> Self {
        Self {
            session,
            keys: ButtonEdges::new(),
            pads: ButtonEdges::new(),
        }
    }
}

#[wasm_bindgen]
impl WebSession {
    /// Party match for `players` default-named players
    #[wasm_bindgen(js_name = newParty)]
    pub fn new_party(players: u8, settings_json: &str, seed: u64) -> Result<WebSession, JsValue> {
        let roster = (0..players).map(PlayerConfig::new).collect();
        let session = Session::new_party(roster, parse_settings(settings_json)?, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::wrap(session))
    }

    #[wasm_bindgen(js_name = newSolo)]
    pub fn new_solo(settings_json: &str, seed: u64) -> Result<WebSession, JsValue> {
        let session = Session::new_solo(parse_settings(settings_json)?, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::wrap(session))
    }

    /// Key down by `KeyboardEvent.code`; auto-repeat is ignored
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str) -> bool {
        if !self.keys.press(code.to_string()) {
            return false;
        }
        match InputEvent::from_key(code, self.session.mode()) {
            Some(event) => self.session.submit_input(event),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, code: &str) {
        self.keys.release(code.to_string());
    }

    /// Touch or click: player 0 in party mode, screen half picks the hand in solo
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, right_half: bool) -> bool {
        let event = match self.session.mode() {
            MatchMode::Party => InputEvent::player(0),
            MatchMode::Solo => InputEvent::from_pad(usize::from(right_half), MatchMode::Solo),
        };
        self.session.submit_input(event)
    }

    /// On-screen solo button by hand name ("left" / "right")
    #[wasm_bindgen(js_name = handDown)]
    pub fn hand_down(&mut self, hand: &str) -> bool {
        match hand.parse::<Hand>() {
            Ok(hand) => self.session.submit_input(InputEvent::hand(hand)),
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    /// Primary button level per gamepad slot; call once per frame
    #[wasm_bindgen(js_name = pollPads)]
    pub fn poll_pads(&mut self, pressed: &[u8], connected: &[u8]) {
        let levels: Vec<Option<bool>> = pressed
            .iter()
            .zip(connected)
            .map(|(&p, &c)| (c != 0).then_some(p != 0))
            .collect();
        for event in self.pads.poll_pads(&levels, self.session.mode()) {
            self.session.submit_input(event);
        }
    }

    /// Window lost focus: forget held buttons
    pub fn blur(&mut self) {
        self.keys.clear();
        self.pads.clear();
    }

    /// Advance one animation frame (seconds). Returns the round summary JSON when a
    /// round ended this frame, otherwise an empty string.
    pub fn frame(&mut self, dt: f32) -> String {
        self.session
            .advance(dt)
            .map(|summary| to_js(&summary))
            .unwrap_or_default()
    }

    /// Current round drawing state as JSON ("null" between matches)
    pub fn snapshot(&self) -> String {
        to_js(&self.session.snapshot())
    }

    /// Drained lock / miss events as JSON, for particles and sound
    pub fn events(&mut self) -> String {
        to_js(&self.session.drain_events())
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    #[wasm_bindgen(js_name = phaseTimeRemaining)]
    pub fn phase_time_remaining(&self) -> f32 {
        self.session.phase_time_remaining()
    }

    #[wasm_bindgen(js_name = roundNumber)]
    pub fn round_number(&self) -> u32 {
        self.session.round_number()
    }

    #[wasm_bindgen(js_name = totalRounds)]
    pub fn total_rounds(&self) -> u32 {
        self.session.total_rounds()
    }

    pub fn standings(&self) -> String {
        to_js(&self.session.standings())
    }

    #[wasm_bindgen(js_name = soloStats)]
    pub fn solo_stats(&self) -> String {
        to_js(self.session.solo_stats())
    }

    pub fn reset(&mut self) {
        self.blur();
        self.session.reset();
    }
}
