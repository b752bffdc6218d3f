//! Lane model
//!
//! Three fixed lanes across the road. Lane changes step one lane at a time
//! and stop at the edges without wrapping.

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_WIDTH, ROAD_MAX_WIDTH, ROAD_WIDTH_FRACTION};

/// Number of lanes on the road
pub const LANE_COUNT: u8 = 3;

/// A lane index, always within `0..LANE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const CENTER: Lane = Lane(1);
    pub const RIGHT: Lane = Lane(2);

    /// Lane from an index, `None` if out of range
    pub fn new(index: u8) -> Option<Self> {
        (index < LANE_COUNT).then_some(Lane(index))
    }

    /// Lane from an index in `0..LANE_COUNT`, e.g. a uniform draw
    pub(crate) fn from_index(index: usize) -> Self {
        Lane((index as u8).min(LANE_COUNT - 1))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// All lanes, left to right
    pub fn all() -> [Lane; LANE_COUNT as usize] {
        [Lane::LEFT, Lane::CENTER, Lane::RIGHT]
    }

    /// Step one lane in the sign of `direction`, clamped to the road
    pub fn shifted(self, direction: i8) -> Self {
        let next = self.0 as i8 + direction.signum();
        Lane(next.clamp(0, LANE_COUNT as i8 - 1) as u8)
    }
}

impl Default for Lane {
    fn default() -> Self {
        Lane::CENTER
    }
}

/// Move from `current` one lane toward `direction`.
///
/// Requests past either edge leave the lane unchanged.
pub fn move_lane(current: Lane, direction: i8) -> Lane {
    current.shifted(direction)
}

/// Horizontal road layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadGeometry {
    /// Left edge of the road
    pub left: f32,
    /// Total road width
    pub width: f32,
}

impl Default for RoadGeometry {
    fn default() -> Self {
        Self::for_field(FIELD_WIDTH)
    }
}

impl RoadGeometry {
    /// Road centred in a field of the given width
    pub fn for_field(field_width: f32) -> Self {
        let width = (field_width * ROAD_WIDTH_FRACTION).min(ROAD_MAX_WIDTH);
        Self {
            left: (field_width - width) / 2.0,
            width,
        }
    }

    pub fn lane_width(&self) -> f32 {
        self.width / LANE_COUNT as f32
    }

    /// Horizontal centre of a lane
    pub fn lane_x(&self, lane: Lane) -> f32 {
        self.left + self.lane_width() * (lane.index() as f32 + 0.5)
    }

    /// Horizontal positions of the two dashed dividers
    pub fn divider_xs(&self) -> [f32; 2] {
        [
            self.left + self.lane_width(),
            self.left + self.lane_width() * 2.0,
        ]
    }
}
