//! Per entity draw attributes handed to whatever renders the level.

use vek::Vec2;

use crate::anim::{AnimationStore, Rect};
use crate::components::{Entity, Rgba};

pub const PELLET_COLOR: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Color(Rgba),
    Keyframe(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawAttributes {
    pub position: Vec2<f32>,
    pub fill: Fill,
    pub scale: f32,
    /// Quads for walls and sprites, circles for pellets.
    pub is_quad: bool,
    /// Draw in ascending order: walls, pellets, pacman, ghosts.
    pub z_order: f32,
}

pub fn draw_attributes(entity: &Entity, store: &AnimationStore) -> DrawAttributes {
    match entity {
        Entity::Wall(wall) => DrawAttributes {
            position: wall.position,
            fill: Fill::Color(wall.color),
            scale: 1.0,
            is_quad: true,
            z_order: 0.0,
        },
        Entity::Pellet(pellet) => DrawAttributes {
            position: pellet.position,
            fill: Fill::Color(PELLET_COLOR),
            scale: 0.25,
            is_quad: false,
            z_order: 1.0,
        },
        Entity::Player(pacman) => DrawAttributes {
            position: pacman.position,
            fill: Fill::Keyframe(pacman.keyframe()),
            scale: 1.0,
            is_quad: true,
            z_order: 2.0,
        },
        Entity::Ghost(ghost) => DrawAttributes {
            position: ghost.position,
            fill: Fill::Keyframe(ghost.keyframe(store)),
            scale: 1.0,
            is_quad: true,
            z_order: 3.0,
        },
    }
}

/// Draw attributes for every active entity, sorted by z order.
pub fn draw_list<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    store: &AnimationStore,
) -> Vec<DrawAttributes> {
    let mut list: Vec<DrawAttributes> = entities
        .into_iter()
        .filter(|entity| entity.is_active())
        .map(|entity| draw_attributes(entity, store))
        .collect();
    list.sort_by(|a, b| a.z_order.total_cmp(&b.z_order));
    list
}
