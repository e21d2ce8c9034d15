//! Browser host
//!
//! Exposes the session to a JS render loop. JS calls `frame(delta)` from
//! `requestAnimationFrame`, draws the returned snapshot, and supplies two
//! callbacks: one that synthesizes tones and one that returns a Promise for
//! the narrative text.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use crate::audio::{AudioBackend, AudioManager, SoundEffect, Tone, Waveform};
use crate::narrative::{NarrativeError, SummaryRequest};
use crate::platform::host::{Host, run_frame};
use crate::settings::Settings;
use crate::sim::{Direction, GameState};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Heart Dash (web) starting...");
}

/// Forwards tones to a JS synthesizer callback
struct JsAudio {
    callback: Option<js_sys::Function>,
}

impl AudioBackend for JsAudio {
    fn play(&mut self, effect: SoundEffect, tone: &Tone, volume: f32) {
        let Some(callback) = &self.callback else { return };
        let waveform = match tone.waveform {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        };
        let args = js_sys::Array::of5(
            &JsValue::from_str(&format!("{effect:?}")),
            &JsValue::from_str(waveform),
            &JsValue::from_f64(tone.start_hz as f64),
            &JsValue::from_f64(tone.end_hz as f64),
            &JsValue::from_f64(tone.duration as f64),
        );
        args.push(&JsValue::from_f64(volume as f64));
        if let Err(e) = callback.apply(&JsValue::NULL, &args) {
            log::warn!("Audio callback failed: {e:?}");
        }
    }
}

/// Game instance handed to JS
///
/// Every method takes `&self`, so JS callbacks fired during `frame` (sound,
/// narrative) may call back into the game.
#[wasm_bindgen]
pub struct WebGame {
    host: Rc<RefCell<Host>>,
    audio: RefCell<AudioManager<JsAudio>>,
    narrator: RefCell<Option<js_sys::Function>>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` and `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: &str, settings_json: &str) -> WebGame {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("{e}; using default tuning");
                Tuning::default()
            })
        };
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json)
        };
        let audio = AudioManager::from_settings(JsAudio { callback: None }, &settings);
        let state = GameState::with_tuning(seed as u64, tuning);
        WebGame {
            host: Rc::new(RefCell::new(Host::new(state, settings))),
            audio: RefCell::new(audio),
            narrator: RefCell::new(None),
        }
    }

    /// `fn(effect, waveform, startHz, endHz, duration, volume)`
    pub fn set_audio_callback(&self, callback: js_sys::Function) {
        let settings = self.host.borrow().settings.clone();
        let audio = AudioManager::from_settings(
            JsAudio {
                callback: Some(callback),
            },
            &settings,
        );
        *self.audio.borrow_mut() = audio;
    }

    /// `fn(prompt, requestJson) -> Promise<string>`
    pub fn set_narrator(&self, narrator: js_sys::Function) {
        *self.narrator.borrow_mut() = Some(narrator);
    }

    pub fn move_left(&self) {
        self.host.borrow_mut().queue_steer(Direction::Left);
    }

    pub fn move_right(&self) {
        self.host.borrow_mut().queue_steer(Direction::Right);
    }

    pub fn start(&self) {
        self.host.borrow_mut().queue_start();
    }

    pub fn reset(&self) {
        self.host.borrow_mut().state.reset();
    }

    /// Window focus changed
    pub fn set_focused(&self, focused: bool) {
        let settings = self.host.borrow().settings.clone();
        if settings.mute_on_blur {
            self.audio
                .borrow_mut()
                .set_muted(settings.muted || !focused);
        }
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn frame(&self, delta_secs: f32) -> String {
        let output = run_frame(&self.host, &self.audio, delta_secs);
        if let Some(request) = output.summary_request {
            let narrator = self.narrator.borrow().clone();
            request_summary(Rc::downgrade(&self.host), narrator, request);
        }
        serde_json::to_string(&output.snapshot).unwrap_or_default()
    }
}

/// Fire the narrative request; the answer lands whenever the promise settles
fn request_summary(
    host: Weak<RefCell<Host>>,
    narrator: Option<js_sys::Function>,
    request: SummaryRequest,
) {
    spawn_local(async move {
        let result = match narrator {
            Some(narrator) => call_narrator(&narrator, &request).await,
            None => Err(NarrativeError::Unavailable("no narrator registered".into())),
        };
        if let Some(host) = host.upgrade() {
            host.borrow_mut()
                .state
                .deliver_summary(request.generation, result);
        }
    });
}

async fn call_narrator(
    narrator: &js_sys::Function,
    request: &SummaryRequest,
) -> Result<String, NarrativeError> {
    let payload =
        serde_json::to_string(request).map_err(|e| NarrativeError::Malformed(e.to_string()))?;
    let value = narrator
        .call2(
            &JsValue::NULL,
            &JsValue::from_str(&request.prompt()),
            &JsValue::from_str(&payload),
        )
        .map_err(|e| NarrativeError::Unavailable(format!("{e:?}")))?;
    let text = JsFuture::from(js_sys::Promise::resolve(&value))
        .await
        .map_err(|e| NarrativeError::Unavailable(format!("{e:?}")))?;
    text.as_string()
        .ok_or_else(|| NarrativeError::Malformed("response is not a string".into()))
}
