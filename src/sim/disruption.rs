//! Disruption scheduling
//!
//! Each tick the scheduler may pick one disruption from a weighted catalog.
//! It only chooses; the presentation layer decides what a disruption looks
//! and sounds like. The auto-play, fake-crash and camera-shake checks are
//! separate rolls that run every tick regardless of what `poll` returned.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DISRUPTION_FLOOR, DONATION_CHAOS};

/// Transient presentation-layer sabotage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisruptionEvent {
    None,
    ColorInvert,
    ScreenTilt,
    FakeChat,
    InputScramble,
    FakeLag,
    FakeDonation,
}

impl DisruptionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisruptionEvent::None => "none",
            DisruptionEvent::ColorInvert => "color_invert",
            DisruptionEvent::ScreenTilt => "screen_tilt",
            DisruptionEvent::FakeChat => "fake_chat",
            DisruptionEvent::InputScramble => "input_scramble",
            DisruptionEvent::FakeLag => "fake_lag",
            DisruptionEvent::FakeDonation => "fake_donation",
        }
    }
}

/// Chance that any disruption fires this tick
#[inline]
pub fn fire_chance(chaos: f32) -> f32 {
    0.005 + chaos * 0.01
}

/// Pick zero or one disruption for this tick.
///
/// Below the chaos floor nothing fires and no sample is drawn. Otherwise one
/// sample gates the tick and a second selects the band.
pub fn poll<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> DisruptionEvent {
    if chaos < DISRUPTION_FLOOR {
        return DisruptionEvent::None;
    }

    let gate: f32 = rng.random();
    if gate > fire_chance(chaos) {
        return DisruptionEvent::None;
    }

    select(chaos, rng.random())
}

/// Map a band sample to an event. Below the donation threshold the
/// donation band falls through to fake lag.
fn select(chaos: f32, band: f32) -> DisruptionEvent {
    if band < 0.3 {
        DisruptionEvent::FakeChat
    } else if band < 0.5 {
        DisruptionEvent::ScreenTilt
    } else if band < 0.7 {
        DisruptionEvent::ColorInvert
    } else if band < 0.85 {
        DisruptionEvent::InputScramble
    } else if band < 0.95 && chaos > DONATION_CHAOS {
        DisruptionEvent::FakeDonation
    } else {
        DisruptionEvent::FakeLag
    }
}

/// The game briefly "plays for you"
pub fn should_auto_play<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> bool {
    rng.random::<f32>() < 0.001 + chaos * 0.01
}

/// Fake error screen
pub fn should_fake_crash<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> bool {
    rng.random::<f32>() < 0.0001 + chaos * 0.005
}

pub fn should_camera_shake<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> bool {
    rng.random::<f32>() < 0.002 + chaos * 0.02
}

/// Target camera roll (radians) for the drunk-camera effect; the renderer
/// eases toward it
pub fn camera_tilt<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> f32 {
    let max_tilt = 0.02 + chaos * 0.08;
    (rng.random::<f32>() - 0.5) * 2.0 * max_tilt
}

/// All per-tick rolls, in the order the tick driver makes them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRolls {
    pub disruption: DisruptionEvent,
    pub auto_play: bool,
    pub fake_crash: bool,
    pub camera_shake: bool,
    pub camera_tilt: f32,
}

impl TickRolls {
    pub fn roll<R: Rng + ?Sized>(chaos: f32, rng: &mut R) -> Self {
        let auto_play = should_auto_play(chaos, rng);
        let fake_crash = should_fake_crash(chaos, rng);
        let disruption = poll(chaos, rng);
        let camera_shake = should_camera_shake(chaos, rng);
        let camera_tilt = camera_tilt(chaos, rng);
        Self {
            disruption,
            auto_play,
            fake_crash,
            camera_shake,
            camera_tilt,
        }
    }
}
