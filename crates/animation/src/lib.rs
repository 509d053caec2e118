//! Animation: the per-frame bob that makes characters breathe and walk.
//!
//! # Invariants
//! - One [`AnimationState`] per character; never shared.
//! - Stepping is strictly sequential, one call per rendered frame.
//! - Only the vertical axis is animated.

mod bob;
mod clock;

pub use bob::{AnimationState, BobAnimator, FALLBACK_DELTA, Gait, GaitProfile};
pub use clock::{FrameClock, fixed_timeline};

pub fn crate_info() -> &'static str {
    "meadow-animation v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("animation"));
    }
}
