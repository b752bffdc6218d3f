//! Collision footprints and overlap tests
//!
//! Hit detection uses footprints that are deliberately smaller than the
//! sprites they belong to, so grazing contact is forgiven. The road is seen
//! top-down: `x` runs across the lanes and `y` along the direction of travel.
//! Height above the road is handled separately with elevation bands, which is
//! what lets a jump clear a low barrier and a slide pass under an overhead one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on the road plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True if the rectangles share interior area (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Collision rectangle relative to an entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Width across lanes, depth along the direction of travel
    pub size: Vec2,
    /// Offset from the entity position to the footprint centre
    pub offset: Vec2,
}

impl Footprint {
    pub const fn new(width: f32, depth: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            size: Vec2::new(width, depth),
            offset: Vec2::new(offset_x, offset_y),
        }
    }

    /// World-space rectangle for an entity at `pos`
    pub fn at(&self, pos: Vec2) -> Rect {
        Rect::from_center_size(pos + self.offset, self.size)
    }
}

/// Vertical extent above the road surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub bottom: f32,
    pub top: f32,
}

impl Band {
    pub const fn new(bottom: f32, top: f32) -> Self {
        Self { bottom, top }
    }

    /// Same band lifted by `height`
    pub fn raised(self, height: f32) -> Self {
        Self {
            bottom: self.bottom + height,
            top: self.top + height,
        }
    }

    pub fn overlaps(&self, other: &Band) -> bool {
        self.bottom < other.top && other.bottom < self.top
    }
}

/// Full contact test: plane rectangles and elevation bands must both overlap
#[inline]
pub fn contact(a: &Rect, a_band: &Band, b: &Rect, b_band: &Band) -> bool {
    a.overlaps(b) && a_band.overlaps(b_band)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::from_center_size(Vec2::new(8.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Rect::from_center_size(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::from_center_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_footprint_offset() {
        let fp = Footprint::new(44.0, 92.0, 0.0, 10.0);
        let rect = fp.at(Vec2::new(100.0, 200.0));
        assert_eq!(rect.center(), Vec2::new(100.0, 210.0));
        assert_eq!(rect.size(), Vec2::new(44.0, 92.0));
    }

    #[test]
    fn test_band_overlap_and_raise() {
        let low = Band::new(0.0, 62.0);
        let standing = Band::new(0.0, 92.0);
        assert!(standing.overlaps(&low));
        assert!(!standing.raised(70.0).overlaps(&low));
        assert!(standing.raised(50.0).overlaps(&low));
    }

    #[test]
    fn test_contact_needs_both_axes() {
        let a = Rect::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::from_center_size(Vec2::new(4.0, 4.0), Vec2::splat(10.0));
        let ground = Band::new(0.0, 50.0);
        let overhead = Band::new(64.0, 140.0);
        assert!(contact(&a, &ground, &b, &ground));
        assert!(!contact(&a, &ground, &b, &overhead));
    }
}
