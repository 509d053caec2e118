use serde::{Deserialize, Serialize};

/// Default spatial frequency along x.
pub const DEFAULT_KX: f32 = 0.1;
/// Default spatial frequency along y.
pub const DEFAULT_KY: f32 = 0.1;
/// Default peak height of the hills.
pub const DEFAULT_AMPLITUDE: f32 = 2.0;

/// Rolling-hills height field: `sin(x * kx) * cos(y * ky) * amplitude`.
///
/// Pure and total: the same inputs always give bit-identical output, and there
/// are no error cases. Non-finite inputs produce non-finite heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    pub kx: f32,
    pub ky: f32,
    pub amplitude: f32,
}

impl Default for HeightField {
    fn default() -> Self {
        Self {
            kx: DEFAULT_KX,
            ky: DEFAULT_KY,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl HeightField {
    /// Elevation at plane coordinate `(x, y)`.
    #[inline]
    pub fn elevation(&self, x: f32, y: f32) -> f32 {
        (x * self.kx).sin() * (y * self.ky).cos() * self.amplitude
    }

    /// Sample the field at `(x, y)`.
    pub fn sample(&self, x: f32, y: f32) -> GroundSample {
        GroundSample {
            x,
            y,
            elevation: self.elevation(x, y),
        }
    }

    /// Sample every `(x, y)` pair, rows of constant `y` in the order given.
    pub fn sample_grid(&self, xs: &[f32], ys: &[f32]) -> Vec<GroundSample> {
        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| self.sample(x, y)))
            .collect()
    }
}

/// One evaluated point of the height field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSample {
    pub x: f32,
    pub y: f32,
    pub elevation: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn closed_form(x: f32, y: f32) -> f32 {
        (x * 0.1).sin() * (y * 0.1).cos() * 2.0
    }

    #[test]
    fn matches_closed_form_exactly() {
        let hf = HeightField::default();
        for &(x, y) in &[(0.0, 0.0), (1.5, -2.25), (-17.0, 40.0), (1e4, -3.3)] {
            assert_eq!(hf.elevation(x, y).to_bits(), closed_form(x, y).to_bits());
        }
    }

    #[test]
    fn origin_is_flat() {
        assert_eq!(HeightField::default().elevation(0.0, 0.0), 0.0);
    }

    #[test]
    fn periodic_in_x() {
        let hf = HeightField::default();
        let period = 20.0 * PI;
        for &(x, y) in &[(0.0, 0.0), (3.0, 7.0), (-12.5, 4.0), (25.0, -25.0)] {
            let a = hf.elevation(x, y);
            let b = hf.elevation(x + period, y);
            assert!((a - b).abs() < 1e-4, "{a} vs {b} at ({x}, {y})");
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let hf = HeightField::default();
        let first = hf.elevation(13.37, -4.2).to_bits();
        for _ in 0..1000 {
            assert_eq!(hf.elevation(13.37, -4.2).to_bits(), first);
        }
    }

    #[test]
    fn bounded_by_amplitude() {
        let hf = HeightField::default();
        for i in -50..=50 {
            for j in -50..=50 {
                let h = hf.elevation(i as f32 * 1.7, j as f32 * 2.3);
                assert!(h.abs() <= DEFAULT_AMPLITUDE);
            }
        }
    }

    #[test]
    fn non_finite_inputs_propagate() {
        let hf = HeightField::default();
        assert!(hf.elevation(f32::NAN, 0.0).is_nan());
        assert!(!hf.elevation(f32::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn nine_point_grid_matches_formula() {
        let hf = HeightField::default();
        let axis = [-5.0, 0.0, 5.0];
        let samples = hf.sample_grid(&axis, &axis);
        assert_eq!(samples.len(), 9);
        for s in &samples {
            assert_eq!(s.elevation, closed_form(s.x, s.y));
        }
        // Rows of constant y, x varying fastest.
        assert_eq!((samples[1].x, samples[1].y), (0.0, -5.0));
        assert_eq!((samples[3].x, samples[3].y), (-5.0, 0.0));
    }

    #[test]
    fn samples_serialize_to_json() {
        let sample = HeightField::default().sample(5.0, 0.0);
        let json = serde_json::to_string(&sample).unwrap();
        let back: GroundSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn custom_amplitude_scales_linearly() {
        let flat = HeightField {
            amplitude: 0.0,
            ..HeightField::default()
        };
        assert_eq!(flat.elevation(7.0, 3.0), 0.0);

        let tall = HeightField {
            amplitude: 4.0,
            ..HeightField::default()
        };
        let base = HeightField::default().elevation(7.0, 3.0);
        assert!((tall.elevation(7.0, 3.0) - 2.0 * base).abs() < 1e-6);
    }
}
