//! Ghost movement.
//!
//! Ghosts walk straight ahead and turn clockwise whenever a wall or the edge
//! of the level gets in the way. There is no pathfinding, so a ghost can end
//! up circling inside a dead end.

use vek::Vec2;

use crate::anim::{AnimationId, AnimationStore, Rect, SpritePlayer};
use crate::collision::collides;
use crate::components::{Direction, Entity, EntityKind};
use crate::config::Tuning;
use crate::level::Bounds;

#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub position: Vec2<f32>,
    pub active: bool,
    pub direction: Direction,
    pub bounds: Bounds,
    pub animations: AnimationId,
    sprite: SpritePlayer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GhostMove {
    Advance(Vec2<f32>),
    Turn(Direction),
}

impl Ghost {
    pub fn new(position: Vec2<f32>, bounds: Bounds, animations: AnimationId, frame_time: f32) -> Self {
        Ghost {
            position,
            active: true,
            direction: Direction::Right,
            bounds,
            animations,
            sprite: SpritePlayer::new(frame_time, Direction::Right),
        }
    }

    pub fn plan_move(&self, dt: f32, entities: &[Entity], tuning: &Tuning) -> GhostMove {
        let candidate = self.position + self.direction.delta() * (dt * tuning.ghost_speed);
        let blocked = !self.bounds.contains(candidate)
            || collides(candidate, entities, EntityKind::Wall, tuning.wall_radius);
        if blocked {
            GhostMove::Turn(self.direction.clockwise())
        } else {
            GhostMove::Advance(candidate)
        }
    }

    pub fn apply_move(&mut self, planned: GhostMove, dt: f32, store: &AnimationStore) {
        match planned {
            GhostMove::Advance(position) => self.position = position,
            GhostMove::Turn(direction) => {
                self.direction = direction;
                self.sprite.set_animation(direction);
            }
        }
        self.sprite.update(dt, store.get(self.animations));
    }

    pub fn keyframe(&self, store: &AnimationStore) -> Rect {
        self.sprite.keyframe(store.get(self.animations))
    }
}

/// Move the ghost at `index` one tick.
pub fn update(
    entities: &mut [Entity],
    index: usize,
    dt: f32,
    tuning: &Tuning,
    store: &AnimationStore,
) -> Option<GhostMove> {
    let planned = entities.get(index)?.as_ghost()?.plan_move(dt, entities, tuning);
    match entities.get_mut(index) {
        Some(Entity::Ghost(ghost)) => {
            ghost.apply_move(planned, dt, store);
            Some(planned)
        }
        _ => None,
    }
}
