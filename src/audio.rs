//! Audio feedback
//!
//! The simulation reports what happened as `GameEvent`s; this module decides
//! which sound that is, how loud, and hands a tone description to whatever
//! synthesizer the host plugs in.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Footstep tick
    Step,
    /// Lane change whoosh
    Move,
    /// Heart collected
    Collect,
    /// Ran into a hazard
    Hit,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Step => Some(SoundEffect::Step),
            GameEvent::Move { .. } => Some(SoundEffect::Move),
            GameEvent::Collect { .. } => Some(SoundEffect::Collect),
            GameEvent::Hit { .. } => Some(SoundEffect::Hit),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }

    /// Oscillator recipe for this effect
    pub fn tone(&self) -> Tone {
        match self {
            SoundEffect::Step => Tone {
                waveform: Waveform::Triangle,
                start_hz: 110.0,
                end_hz: 80.0,
                duration: 0.05,
                gain: 0.15,
            },
            SoundEffect::Move => Tone {
                waveform: Waveform::Sine,
                start_hz: 300.0,
                end_hz: 600.0,
                duration: 0.1,
                gain: 0.3,
            },
            // Rising chime
            SoundEffect::Collect => Tone {
                waveform: Waveform::Sine,
                start_hz: 880.0,
                end_hz: 1760.0,
                duration: 0.15,
                gain: 0.4,
            },
            SoundEffect::Hit => Tone {
                waveform: Waveform::Sawtooth,
                start_hz: 200.0,
                end_hz: 40.0,
                duration: 0.4,
                gain: 0.6,
            },
            SoundEffect::GameOver => Tone {
                waveform: Waveform::Square,
                start_hz: 330.0,
                end_hz: 110.0,
                duration: 0.8,
                gain: 0.35,
            },
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single swept tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
}

/// Synthesizer plugged in by the host
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, tone: &Tone, volume: f32);
}

/// Backend that drops everything (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn play(&mut self, _effect: SoundEffect, _tone: &Tone, _volume: f32) {}
}

/// Audio manager for the game
pub struct AudioManager<B> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    footsteps: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self::from_settings(backend, &Settings::default())
    }

    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let settings = settings.clamped();
        Self {
            backend,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
            footsteps: settings.footsteps,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if effect == SoundEffect::Step && !self.footsteps {
            return;
        }
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let tone = effect.tone();
        self.backend.play(effect, &tone, vol * tone.gain);
    }

    /// Play the sounds for one tick's events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
