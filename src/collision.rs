//! Distance based collision queries over the entity collection.
//!
//! Every query scans the whole collection and skips inactive entities, so a
//! pellet eaten earlier in the same tick cannot be eaten twice.

use vek::Vec2;

use crate::components::{Entity, EntityKind};

/// Indices of every active `kind` entity within `radius` of `point`.
pub fn collisions<'a>(
    point: Vec2<f32>,
    entities: &'a [Entity],
    kind: EntityKind,
    radius: f32,
) -> impl Iterator<Item = usize> + 'a {
    entities
        .iter()
        .enumerate()
        .filter(move |(_, entity)| {
            entity.kind() == kind
                && entity.is_active()
                && (entity.position() - point).magnitude() <= radius
        })
        .map(|(i, _)| i)
}

pub fn first_collision(
    point: Vec2<f32>,
    entities: &[Entity],
    kind: EntityKind,
    radius: f32,
) -> Option<usize> {
    collisions(point, entities, kind, radius).next()
}

pub fn collides(point: Vec2<f32>, entities: &[Entity], kind: EntityKind, radius: f32) -> bool {
    first_collision(point, entities, kind, radius).is_some()
}
