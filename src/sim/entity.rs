//! Obstacles, tokens and the tracker that owns them
//!
//! Entities live only inside the tracker. They are created by spawns, move
//! toward the runner every tick, and are destroyed when collected or once
//! they pass the trailing edge of the field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Band, Footprint, Rect, contact};
use super::lane::Lane;

/// Kinds of things that scroll down the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Knee-high barrier: dodge by changing lane or jumping
    LowBarrier,
    /// Head-high bar: dodge by changing lane or sliding
    OverheadBarrier,
    /// Collectible worth bonus points
    Token,
}

impl EntityKind {
    pub fn is_obstacle(self) -> bool {
        !matches!(self, EntityKind::Token)
    }

    /// Forgiving hit rectangle, smaller than the sprite
    pub fn footprint(self) -> Footprint {
        match self {
            EntityKind::LowBarrier => Footprint::new(70.0, 62.0, 0.0, 11.0),
            EntityKind::OverheadBarrier => Footprint::new(112.0, 30.0, 0.0, -29.0),
            EntityKind::Token => Footprint::new(36.0, 36.0, 0.0, 0.0),
        }
    }

    /// Height range the entity occupies above the road
    pub fn band(self) -> Band {
        match self {
            EntityKind::LowBarrier => Band::new(0.0, 62.0),
            EntityKind::OverheadBarrier => Band::new(64.0, 140.0),
            EntityKind::Token => Band::new(0.0, 40.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::LowBarrier => "low_barrier",
            EntityKind::OverheadBarrier => "overhead_barrier",
            EntityKind::Token => "token",
        }
    }
}

/// A live obstacle or token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique within a run
    pub id: u32,
    pub kind: EntityKind,
    pub lane: Lane,
    /// `x` is the lane centre, `y` grows toward (and past) the runner
    pub pos: Vec2,
    pub alive: bool,
}

impl Entity {
    pub fn hitbox(&self) -> Rect {
        self.kind.footprint().at(self.pos)
    }
}

/// Owns every live entity for the current run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityTracker {
    /// Live entities in spawn (id) order
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Place a new entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, lane: Lane, pos: Vec2) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.entities.push(Entity {
            id,
            kind,
            lane,
            pos,
            alive: true,
        });
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.entities.iter().filter(|e| e.kind.is_obstacle()).count()
    }

    /// Move every entity `distance` toward the runner and destroy the ones
    /// beyond `despawn_y`. Returns the destroyed entities.
    pub fn advance(&mut self, distance: f32, despawn_y: f32) -> Vec<Entity> {
        for entity in &mut self.entities {
            entity.pos.y += distance;
            if entity.pos.y > despawn_y {
                entity.alive = false;
            }
        }
        self.reap()
    }

    /// Ids of entities in contact with the given rectangle and band, in id order
    pub fn contacts(&self, rect: &Rect, band: &Band) -> Vec<u32> {
        self.entities
            .iter()
            .filter(|e| e.alive && contact(rect, band, &e.hitbox(), &e.kind.band()))
            .map(|e| e.id)
            .collect()
    }

    /// Destroy a single entity, leaving all others untouched
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let mut entity = self.entities.remove(index);
        entity.alive = false;
        Some(entity)
    }

    /// Destroy everything. Ids restart for the next run.
    pub fn clear(&mut self) -> usize {
        let cleared = self.entities.len();
        self.entities.clear();
        self.next_id = 1;
        cleared
    }

    fn reap(&mut self) -> Vec<Entity> {
        let (dead, live): (Vec<_>, Vec<_>) = self.entities.drain(..).partition(|e| !e.alive);
        self.entities = live;
        dead
    }
}
