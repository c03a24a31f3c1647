//! Audio system using Web Audio API
//!
//! Procedurally generated chiptune cues - no external files needed!

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, BgmMode};
use crate::settings::Settings;

/// Background loop step (ms); slower voices play every Nth step
const BGM_STEP_MS: i32 = 250;

/// One repeating voice of a background loop
#[derive(Clone, Copy)]
struct LoopVoice {
    /// Note per play, 0.0 = rest
    freqs: [f32; 4],
    /// Play on every Nth step
    every_steps: u32,
    osc_type: OscillatorType,
    volume: f32,
}

const INTRO_VOICES: [LoopVoice; 2] = [
    // A2, A2, B2, A2
    LoopVoice {
        freqs: [110.0, 110.0, 123.47, 110.0],
        every_steps: 2,
        osc_type: OscillatorType::Sawtooth,
        volume: 0.03,
    },
    LoopVoice {
        freqs: [220.0, 0.0, 246.94, 0.0],
        every_steps: 2,
        osc_type: OscillatorType::Square,
        volume: 0.01,
    },
];

const GAME_VOICES: [LoopVoice; 2] = [
    // C4, E4, G4, C5
    LoopVoice {
        freqs: [261.63, 329.63, 392.0, 523.25],
        every_steps: 1,
        osc_type: OscillatorType::Triangle,
        volume: 0.04,
    },
    // Bassline
    LoopVoice {
        freqs: [130.81, 130.81, 164.81, 196.0],
        every_steps: 2,
        osc_type: OscillatorType::Square,
        volume: 0.02,
    },
];

/// Running background loop
struct Background {
    mode: BgmMode,
    interval_id: i32,
    _closure: Closure<dyn FnMut()>,
}

/// Web Audio cue sink
pub struct WebAudio {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    background: Option<Background>,
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            background: None,
        }
    }

    /// Context ready to play, resumed if the browser suspended it
    fn live_ctx(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Play a single enveloped tone
    fn tone(&self, osc_type: OscillatorType, freq: f32, to_freq: Option<f32>, start: f64, len: f64) {
        let vol = self.sfx_volume * 0.1;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.live_ctx() else { return };
        let Some((osc, gain)) = create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + start;

        osc.frequency().set_value_at_time(freq, t).ok();
        if let Some(to) = to_freq {
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.1)
                .ok();
        }
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.1, t + len)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + len).ok();
    }
}

/// Create an oscillator routed through a gain node
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Play one step of every voice in a loop
fn play_step(ctx: &AudioContext, voices: &[LoopVoice], step: u32, music_volume: f32) {
    let step_secs = BGM_STEP_MS as f64 / 1000.0;
    for voice in voices {
        if step % voice.every_steps != 0 {
            continue;
        }
        let note = (step / voice.every_steps) as usize % voice.freqs.len();
        let freq = voice.freqs[note];
        if freq <= 0.0 {
            continue;
        }
        let Some((osc, gain)) = create_osc(ctx, freq, voice.osc_type) else {
            continue;
        };
        let t = ctx.current_time();
        let len = step_secs * voice.every_steps as f64 * 0.9;
        gain.gain()
            .set_value_at_time(voice.volume * music_volume, t)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + len)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + len).ok();
    }
}

impl AudioSink for WebAudio {
    /// Rising blip
    fn click(&mut self) {
        self.tone(OscillatorType::Sine, 440.0, Some(880.0), 0.0, 0.1);
    }

    /// Bright upward chirp
    fn success(&mut self) {
        self.tone(OscillatorType::Triangle, 523.25, Some(1046.5), 0.0, 0.3);
    }

    /// Low buzz
    fn error(&mut self) {
        self.tone(OscillatorType::Sawtooth, 150.0, Some(100.0), 0.0, 0.2);
    }

    /// C major arpeggio
    fn fanfare(&mut self) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            self.tone(OscillatorType::Sine, *freq, None, i as f64 * 0.1, 0.4);
        }
    }

    fn set_background_mode(&mut self, mode: BgmMode) {
        if self.background.as_ref().map(|b| b.mode) == Some(mode) {
            return;
        }
        self.stop_background_mode();

        let Some(ctx) = self.live_ctx().cloned() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        let voices = match mode {
            BgmMode::Intro => INTRO_VOICES,
            BgmMode::Game => GAME_VOICES,
        };
        let music_volume = self.music_volume;
        let mut step = 0u32;
        let closure = Closure::<dyn FnMut()>::new(move || {
            play_step(&ctx, &voices, step, music_volume);
            step = step.wrapping_add(1);
        });

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            BGM_STEP_MS,
        ) {
            Ok(interval_id) => {
                log::info!("Background music: {:?}", mode);
                self.background = Some(Background {
                    mode,
                    interval_id,
                    _closure: closure,
                });
            }
            Err(e) => log::warn!("Failed to start background music: {:?}", e),
        }
    }

    fn stop_background_mode(&mut self) {
        if let Some(bg) = self.background.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(bg.interval_id);
            }
        }
    }
}
