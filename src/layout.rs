//! Responsive layout: everything on screen is sized from the ratio of
//! the current viewport width to a fixed 800x600 design resolution.

use bevy::math::Vec2;
use bevy::prelude::Resource;

pub const BASE_WIDTH: f32 = 800.0;
pub const BASE_HEIGHT: f32 = 600.0;

/// Unscaled option-button dimensions at the design resolution.
pub const OPTION_WIDTH: f32 = 400.0;
pub const OPTION_HEIGHT: f32 = 50.0;
pub const OPTION_SPACING: f32 = 20.0;
pub const OPTION_COUNT: usize = 3;

/// Current window size in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned option slot in viewport pixels (top-left origin, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptionRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OptionRegion {
    /// Strict-interior containment: a point exactly on an edge is not a hit.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x
            && point.x < self.x + self.width
            && point.y > self.y
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    pub scale: f32,
    pub options: [OptionRegion; OPTION_COUNT],
}

impl Layout {
    /// Recomputes the full layout for a viewport. Degenerate sizes yield
    /// `None` so callers keep the last valid layout until a real resize
    /// arrives.
    pub fn compute(viewport: Viewport) -> Option<Self> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }

        let scale = viewport.width / BASE_WIDTH;
        let width = OPTION_WIDTH * scale;
        let height = OPTION_HEIGHT * scale;
        let spacing = OPTION_SPACING * scale;

        let x = viewport.width / 2.0 - width / 2.0;
        let start_y = viewport.height / 2.0 + 50.0 * scale;

        let options = std::array::from_fn(|slot| OptionRegion {
            x,
            y: start_y + (height + spacing) * slot as f32,
            width,
            height,
        });

        Some(Self {
            viewport,
            scale,
            options,
        })
    }

    /// Which option slot, if any, strictly contains the pointer.
    pub fn hit_option(&self, point: Vec2) -> Option<usize> {
        self.options.iter().position(|region| region.contains(point))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::compute(Viewport {
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
        })
        .expect("design resolution is non-degenerate")
    }
}

/// Viewport pixels (top-left origin, y down) to bevy world space
/// (centered origin, y up). Only used at draw time; all game logic
/// stays in viewport coordinates.
pub fn to_world(point: Vec2, view: Viewport) -> Vec2 {
    Vec2::new(point.x - view.width / 2.0, view.height / 2.0 - point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: f32, height: f32) -> Viewport {
        Viewport { width, height }
    }

    #[test]
    fn base_resolution_regions() {
        let layout = Layout::compute(view(800.0, 600.0)).unwrap();
        assert_eq!(layout.scale, 1.0);
        for (i, region) in layout.options.iter().enumerate() {
            assert_eq!(region.x, 200.0);
            assert_eq!(region.y, 350.0 + 70.0 * i as f32);
            assert_eq!(region.width, 400.0);
            assert_eq!(region.height, 50.0);
        }
    }

    #[test]
    fn doubling_the_viewport_doubles_every_region() {
        let small = Layout::compute(view(800.0, 600.0)).unwrap();
        let big = Layout::compute(view(1600.0, 1200.0)).unwrap();
        assert_eq!(big.scale, 2.0 * small.scale);
        for (s, b) in small.options.iter().zip(big.options.iter()) {
            assert_eq!(b.width, 2.0 * s.width);
            assert_eq!(b.height, 2.0 * s.height);
            assert_eq!(b.center(), 2.0 * s.center());
        }
    }

    #[test]
    fn regions_stay_horizontally_centered() {
        let layout = Layout::compute(view(1000.0, 600.0)).unwrap();
        for region in &layout.options {
            assert_eq!(region.x + region.width / 2.0, 500.0);
        }
    }

    #[test]
    fn degenerate_viewports_are_rejected() {
        assert!(Layout::compute(view(0.0, 600.0)).is_none());
        assert!(Layout::compute(view(800.0, 0.0)).is_none());
        assert!(Layout::compute(view(-800.0, 600.0)).is_none());
    }

    #[test]
    fn containment_is_strict_on_all_edges() {
        let region = OptionRegion {
            x: 200.0,
            y: 350.0,
            width: 400.0,
            height: 50.0,
        };
        assert!(region.contains(Vec2::new(400.0, 375.0)));
        // Exactly on a boundary is not a hit.
        assert!(!region.contains(Vec2::new(200.0, 375.0)));
        assert!(!region.contains(Vec2::new(600.0, 375.0)));
        assert!(!region.contains(Vec2::new(400.0, 350.0)));
        assert!(!region.contains(Vec2::new(400.0, 400.0)));
        assert!(!region.contains(Vec2::new(200.0, 350.0)));
    }

    #[test]
    fn hit_option_picks_the_right_slot() {
        let layout = Layout::default();
        for (i, region) in layout.options.iter().enumerate() {
            assert_eq!(layout.hit_option(region.center()), Some(i));
        }
        assert_eq!(layout.hit_option(Vec2::new(400.0, 10.0)), None);
    }

    #[test]
    fn world_conversion_flips_y_around_the_center() {
        let v = view(800.0, 600.0);
        assert_eq!(to_world(Vec2::ZERO, v), Vec2::new(-400.0, 300.0));
        assert_eq!(to_world(Vec2::new(400.0, 300.0), v), Vec2::ZERO);
        assert_eq!(to_world(Vec2::new(800.0, 600.0), v), Vec2::new(400.0, -300.0));
    }
}
