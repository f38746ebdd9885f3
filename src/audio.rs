//! Sound cues and sinks
//!
//! The engine never plays sound itself. The host hands the session a
//! `SoundSink`; muting swaps in `Silent`, so no audio calls happen while muted.
//! Web Audio sounds are synthesized, no asset files.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::DropEvent;

/// Something worth a sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Token hit a peg; pitch rises with depth
    Peg { pitch: f32 },
    /// Token landed in a slot
    Win { multiplier: f64 },
}

impl SoundCue {
    pub fn for_event(event: &DropEvent) -> Self {
        match event {
            DropEvent::RowCrossed { depth, .. } => SoundCue::Peg {
                pitch: 1.0 + depth * 0.5,
            },
            DropEvent::Settled(s) => SoundCue::Win {
                multiplier: s.multiplier,
            },
        }
    }

    /// Starting oscillator frequency (Hz)
    pub fn base_frequency(&self) -> f32 {
        match self {
            SoundCue::Peg { pitch } => 800.0 * pitch,
            SoundCue::Win { multiplier } if *multiplier > 10.0 => 880.0,
            SoundCue::Win { .. } => 440.0,
        }
    }
}

/// Sound output capability. Implementations swallow their own failures.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Logs cues instead of playing them (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("sound {:?} @ {:.0} Hz", cue, cue.base_frequency());
    }
}

/// Captures cues for inspection; clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    cues: Rc<RefCell<Vec<SoundCue>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.borrow().clone()
    }

    pub fn clear(&self) {
        self.cues.borrow_mut().clear();
    }
}

impl SoundSink for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.cues.borrow_mut().push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundCue, SoundSink};

    /// Web Audio API sink
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        /// Combined master and effects gain
        volume: f32,
    }

    impl WebAudioSink {
        pub fn new(volume: f32) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
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

        /// Peg hit - short sine pop, slightly detuned each time
        fn play_pop(&self, ctx: &AudioContext, freq: f32, vol: f32) {
            let freq = freq + (js_sys::Math::random() as f32 * 50.0 - 25.0);
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            gain.gain().set_value_at_time(vol * 0.05, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Landing - rising triangle sweep, an octave higher for big wins
        fn play_win(&self, ctx: &AudioContext, freq: f32, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(freq * 2.0, t + 0.3)
                .ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    impl SoundSink for WebAudioSink {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let freq = cue.base_frequency();
            match cue {
                SoundCue::Peg { .. } => self.play_pop(ctx, freq, vol),
                SoundCue::Win { .. } => self.play_win(ctx, freq, vol),
            }
        }
    }
}
