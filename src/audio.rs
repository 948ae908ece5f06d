//! Sound cues
//!
//! The simulation only says which cue to play. In the browser [`WebAudio`]
//! turns each cue into a short synthesized tone; elsewhere [`SilentAudio`]
//! just logs it.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Hedgehog left the ground
    Jump,
    /// Run ended on a mushroom
    Collision,
    /// Points awarded or a difficulty milestone reached
    Score,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// A single decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_s: f64,
    pub waveform: Waveform,
}

/// Starting gain of every tone; it ramps down to `TONE_END_GAIN`
pub const TONE_GAIN: f32 = 0.1;
pub const TONE_END_GAIN: f32 = 0.01;

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Collision => "collision",
            SoundCue::Score => "score",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            SoundCue::Jump => Tone {
                frequency_hz: 400.0,
                duration_s: 0.1,
                waveform: Waveform::Sine,
            },
            SoundCue::Collision => Tone {
                frequency_hz: 200.0,
                duration_s: 0.3,
                waveform: Waveform::Sawtooth,
            },
            SoundCue::Score => Tone {
                frequency_hz: 600.0,
                duration_s: 0.2,
                waveform: Waveform::Square,
            },
        }
    }
}

/// Anything that can play a cue. Playback must never fail loudly.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Unlock playback after a user gesture
    fn resume(&self) {}
}

/// Discards cues (native builds, tests)
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("sound cue: {}", cue.name());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue, TONE_END_GAIN, TONE_GAIN, Waveform};

    /// Web Audio tone generator
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Create an oscillator with gain envelope
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
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let tone = cue.tone();
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = Self::create_osc(ctx, tone.frequency_hz, osc_type) else {
                log::warn!("could not play {} cue", cue.name());
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(TONE_GAIN, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(TONE_END_GAIN, t + tone.duration_s)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + tone.duration_s).ok();
        }

        fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }
}
