use serde::{Deserialize, Serialize};

/// Delta used on the first step, before any previous sample time exists.
pub const FALLBACK_DELTA: f32 = 0.016;

/// Which gait profile drives the bob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gait {
    Idle,
    Walking,
}

impl Gait {
    pub fn from_moving(moving: bool) -> Self {
        if moving { Self::Walking } else { Self::Idle }
    }
}

/// Phase speed (radians per second) and peak vertical offset for one gait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitProfile {
    pub speed: f32,
    pub amplitude: f32,
}

/// Per-character bob state, carried from one frame to the next.
///
/// `last_sample_time == 0.0` means "never stepped".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub phase: f32,
    pub last_sample_time: f32,
}

/// Sine bob applied to a character's root every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BobAnimator {
    pub idle: GaitProfile,
    pub walking: GaitProfile,
}

impl Default for BobAnimator {
    fn default() -> Self {
        Self {
            idle: GaitProfile {
                speed: 2.0,
                amplitude: 0.08,
            },
            walking: GaitProfile {
                speed: 8.0,
                amplitude: 0.15,
            },
        }
    }
}

impl BobAnimator {
    pub fn profile(&self, gait: Gait) -> GaitProfile {
        match gait {
            Gait::Idle => self.idle,
            Gait::Walking => self.walking,
        }
    }

    /// Advance `state` to `elapsed` seconds and return the vertical offset.
    ///
    /// A clock that runs backwards gives a negative delta and winds the phase
    /// back; nothing is clamped.
    pub fn step(&self, elapsed: f32, moving: bool, state: &mut AnimationState) -> f32 {
        let delta = if state.last_sample_time > 0.0 {
            elapsed - state.last_sample_time
        } else {
            tracing::trace!(elapsed, "no previous sample, using fallback delta");
            FALLBACK_DELTA
        };
        state.last_sample_time = elapsed;

        let profile = self.profile(Gait::from_moving(moving));
        state.phase += delta * profile.speed;
        state.phase.sin() * profile.amplitude
    }
}
