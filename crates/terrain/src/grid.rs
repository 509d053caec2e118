use glam::Vec3;
use meadow_common::Color;

/// One line segment of the grid overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

/// Flat reference grid drawn just above the ground plane.
///
/// `size` is the full extent, `divisions` the number of cells per side. The two
/// lines through the origin use `center_color`, the rest use `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverlay {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub color: Color,
    pub height: f32,
}

impl Default for GridOverlay {
    fn default() -> Self {
        // #306850
        let green = Color::rgb(48.0 / 255.0, 104.0 / 255.0, 80.0 / 255.0);
        Self {
            size: 50.0,
            divisions: 50,
            center_color: green,
            color: green,
            height: 0.01,
        }
    }
}

impl GridOverlay {
    /// Line segments in world space: for each step one line along X and one along Z.
    pub fn lines(&self) -> Vec<GridLine> {
        if self.divisions == 0 {
            return Vec::new();
        }
        let step = self.size / self.divisions as f32;
        let half = self.size / 2.0;
        let y = self.height;

        let mut lines = Vec::with_capacity(2 * (self.divisions as usize + 1));
        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if i == self.divisions / 2 {
                self.center_color
            } else {
                self.color
            };
            lines.push(GridLine {
                start: Vec3::new(-half, y, k),
                end: Vec3::new(half, y, k),
                color,
            });
            lines.push(GridLine {
                start: Vec3::new(k, y, -half),
                end: Vec3::new(k, y, half),
                color,
            });
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_line_count() {
        let lines = GridOverlay::default().lines();
        assert_eq!(lines.len(), 102);
        for l in &lines {
            assert_eq!(l.start.y, 0.01);
            assert_eq!(l.end.y, 0.01);
            assert_eq!(l.color.to_hex(), "#306850");
        }
    }

    #[test]
    fn grid_spans_full_extent() {
        let lines = GridOverlay::default().lines();
        let first = lines[0];
        assert_eq!(first.start, Vec3::new(-25.0, 0.01, -25.0));
        assert_eq!(first.end, Vec3::new(25.0, 0.01, -25.0));
        let last = lines[lines.len() - 1];
        assert_eq!(last.start, Vec3::new(25.0, 0.01, -25.0));
        assert_eq!(last.end, Vec3::new(25.0, 0.01, 25.0));
    }

    #[test]
    fn center_lines_use_center_color() {
        let grid = GridOverlay {
            divisions: 4,
            center_color: Color::WHITE,
            ..GridOverlay::default()
        };
        let lines = grid.lines();
        let centered: Vec<_> = lines.iter().filter(|l| l.color == Color::WHITE).collect();
        assert_eq!(centered.len(), 2);
        assert_eq!(centered[0].start.z, 0.0);
        assert_eq!(centered[1].start.x, 0.0);
    }

    #[test]
    fn zero_divisions_draws_nothing() {
        let grid = GridOverlay {
            divisions: 0,
            ..GridOverlay::default()
        };
        assert!(grid.lines().is_empty());
    }
}
