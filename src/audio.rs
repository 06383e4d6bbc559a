//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and music - no external files needed!
//! The simulation only emits [`GameEvent`]s; anything here may fail silently.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired
    Shoot,
    /// Asteroid destroyed
    Explosion,
    /// Ship destroyed
    Hit,
    /// Engine burn
    Thrust,
    /// Consecutive hit, pitch rises with the (capped) level
    Combo(u32),
    /// Level cleared
    LevelUp,
    /// High combo or restart boost
    PowerUp,
}

impl From<GameEvent> for SoundEffect {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Shoot => SoundEffect::Shoot,
            GameEvent::Explosion => SoundEffect::Explosion,
            GameEvent::Hit => SoundEffect::Hit,
            GameEvent::Thrust => SoundEffect::Thrust,
            GameEvent::Combo { level } => SoundEffect::Combo(level),
            GameEvent::LevelUp { .. } => SoundEffect::LevelUp,
            GameEvent::PowerUp => SoundEffect::PowerUp,
        }
    }
}

/// Base pitch of the combo chime
pub fn combo_base_freq(level: u32) -> f32 {
    400.0 + level.min(crate::consts::MAX_COMBO_MULTIPLIER) as f32 * 200.0
}

/// Minimum gap between thrust blips (seconds)
pub const THRUST_INTERVAL: f64 = 0.05;

/// Ambient loop: (frequency Hz, start offset s, duration s)
pub const MELODY: [(f32, f64, f64); 8] = [
    (220.00, 0.0, 0.5), // A3
    (246.94, 0.5, 0.5), // B3
    (261.63, 1.0, 0.5), // C4
    (293.66, 1.5, 0.5), // D4
    (329.63, 2.0, 0.5), // E4
    (293.66, 2.5, 0.5), // D4
    (261.63, 3.0, 0.5), // C4
    (246.94, 3.5, 0.5), // B3
];

/// Length of one pass through [`MELODY`] (seconds)
pub const MELODY_LOOP: f64 = 4.0;

/// How far ahead of the loop boundary the next pass is queued (seconds)
pub const MUSIC_LOOKAHEAD: f64 = 0.1;

/// Rate limiter for sounds that fire every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Throttle {
    last: Option<f64>,
}

impl Throttle {
    /// True if `interval` has passed since the last accepted call
    pub fn ready(&mut self, now: f64, interval: f64) -> bool {
        match self.last {
            Some(last) if now - last < interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Receives game events
pub trait AudioSink {
    /// Play the sound for an event
    fn play(&mut self, event: GameEvent);

    /// Called once per frame (music scheduling)
    fn update(&mut self) {}
}

/// Discards everything (native builds, tests, unsupported browsers)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _event: GameEvent) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

    use super::*;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music_gain: Option<GainNode>,
        sound: bool,
        music: bool,
        thrust: Throttle,
        /// Context time at which the next melody pass starts
        next_loop_at: f64,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let music_gain = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });

            let mut manager = Self {
                ctx,
                music_gain,
                sound: settings.sound,
                music: settings.music,
                thrust: Throttle::default(),
                next_loop_at: 0.0,
            };
            manager.apply_settings(settings);
            manager
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up sound/music toggles and music volume
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sound = settings.sound;
            if settings.music && !self.music {
                // Restart the loop right away
                self.next_loop_at = 0.0;
            }
            self.music = settings.music;
            if let Some(gain) = &self.music_gain {
                gain.gain().set_value(settings.music_gain());
            }
        }

        /// Play a sound effect
        pub fn play_effect(&mut self, effect: SoundEffect) {
            if !self.sound {
                return;
            }
            let Some(ctx) = self.ctx.clone() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let t = ctx.current_time();

            match effect {
                SoundEffect::Shoot => play_shoot(&ctx, t),
                SoundEffect::Explosion => play_explosion(&ctx, t),
                SoundEffect::Hit => play_hit(&ctx, t),
                SoundEffect::Thrust => {
                    if self.thrust.ready(t, THRUST_INTERVAL) {
                        play_thrust(&ctx, t);
                    }
                }
                SoundEffect::Combo(level) => play_combo(&ctx, t, level),
                SoundEffect::LevelUp => play_level_up(&ctx, t),
                SoundEffect::PowerUp => play_power_up(&ctx, t),
            }
        }

        fn schedule_music(&mut self) {
            if !self.music {
                return;
            }
            let (Some(ctx), Some(gain)) = (&self.ctx, &self.music_gain) else {
                return;
            };
            let now = ctx.current_time();
            // Queue the next pass slightly early so loops join up
            if now + MUSIC_LOOKAHEAD < self.next_loop_at {
                return;
            }
            let start = now.max(self.next_loop_at);
            for &(freq, offset, duration) in MELODY.iter() {
                play_note(ctx, gain, freq, start + offset, duration);
            }
            self.next_loop_at = start + MELODY_LOOP;
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, event: GameEvent) {
            self.play_effect(event.into());
        }

        fn update(&mut self) {
            self.schedule_music();
        }
    }

    // === Sound generators ===

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

    /// Oscillator routed through a lowpass filter
    fn create_filtered_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        cutoff: f32,
    ) -> Option<(OscillatorNode, web_sys::BiquadFilterNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let filter = ctx.create_biquad_filter().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(cutoff);
        osc.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, filter, gain))
    }

    /// Shoot - descending square zap
    fn play_shoot(ctx: &AudioContext, t: f64) {
        let Some((osc, gain)) = create_osc(ctx, 1200.0, OscillatorType::Square) else {
            return;
        };
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.08)
            .ok();
        gain.gain().set_value_at_time(0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Explosion - filtered sawtooth rumble
    fn play_explosion(ctx: &AudioContext, t: f64) {
        let Some((osc, filter, gain)) =
            create_filtered_osc(ctx, 150.0, OscillatorType::Sawtooth, 2000.0)
        else {
            return;
        };
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.3)
            .ok();
        filter.frequency().set_value_at_time(2000.0, t).ok();
        filter
            .frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.3)
            .ok();
        gain.gain().set_value_at_time(0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    /// Ship hit - triangle thud
    fn play_hit(ctx: &AudioContext, t: f64) {
        let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.15)
            .ok();
        gain.gain().set_value_at_time(0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Thrust - short resonant burble
    fn play_thrust(ctx: &AudioContext, t: f64) {
        let Some((osc, filter, gain)) =
            create_filtered_osc(ctx, 80.0, OscillatorType::Sawtooth, 400.0)
        else {
            return;
        };
        filter.q().set_value(10.0);
        gain.gain().set_value_at_time(0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Combo - three rising blips, higher for bigger combos
    fn play_combo(ctx: &AudioContext, t: f64, level: u32) {
        let base = combo_base_freq(level);
        for i in 0..3 {
            let osc_type = if i == 0 {
                OscillatorType::Sine
            } else {
                OscillatorType::Square
            };
            let Some((osc, gain)) = create_osc(ctx, base + i as f32 * 200.0, osc_type) else {
                continue;
            };
            let start = t + i as f64 * 0.05;
            gain.gain()
                .set_value_at_time(0.3 - i as f32 * 0.05, start)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.1)
                .ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.15).ok();
        }
    }

    /// Level up - C major arpeggio
    fn play_level_up(ctx: &AudioContext, t: f64) {
        let notes = [523.25, 659.25, 783.99, 1046.50]; // C5, E5, G5, C6
        for (i, freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let start = t + i as f64 * 0.1;
            gain.gain().set_value_at_time(0.3, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.3)
                .ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.4).ok();
        }
    }

    /// Power-up - upward sweep
    fn play_power_up(ctx: &AudioContext, t: f64) {
        for _ in 0..2 {
            let Some((osc, gain)) = create_osc(ctx, 800.0, OscillatorType::Sine) else {
                continue;
            };
            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1600.0, t + 0.2)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.4, t + 0.05).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.2).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// One soft melody note routed through the music bus
    fn play_note(ctx: &AudioContext, bus: &GainNode, freq: f32, start: f64, duration: f64) {
        let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
            return;
        };
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value_at_time(freq, start).ok();
        gain.gain().set_value_at_time(0.0, start).ok();
        gain.gain().linear_ramp_to_value_at_time(0.1, start + 0.1).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(0.0, start + duration)
            .ok();

        if osc.connect_with_audio_node(&gain).is_err() || gain.connect_with_audio_node(bus).is_err()
        {
            return;
        }
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + duration).ok();
    }
}
