use tracing::{debug, trace};
use vek::Vec2;

use crate::anim::{DirectionalAnimation, Rect, SpritePlayer};
use crate::collision::{collides, first_collision};
use crate::components::{Direction, Entity, EntityKind};
use crate::config::Tuning;
use crate::level::Bounds;

#[derive(Debug, Clone, PartialEq)]
pub struct Pacman {
    pub position: Vec2<f32>,
    pub active: bool,
    pub direction: Direction,
    pub last_command: Option<Direction>,
    pub bounds: Bounds,
    pub pellets_eaten: u32,
    sprite: SpritePlayer,
    animations: DirectionalAnimation,
}

/// Outcome of testing one tick of movement against the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerMove {
    pub candidate: Vec2<f32>,
    pub in_bounds: bool,
    pub hit_wall: bool,
    /// Index of the pellet grazed by the candidate position.
    pub pellet: Option<usize>,
    pub hit_ghost: bool,
}

impl PlayerMove {
    pub fn accepted(&self) -> bool {
        self.in_bounds && !self.hit_wall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Blocked,
}

impl Pacman {
    pub fn new(
        position: Vec2<f32>,
        bounds: Bounds,
        animations: DirectionalAnimation,
        frame_time: f32,
    ) -> Self {
        Pacman {
            position,
            active: true,
            direction: Direction::Right,
            last_command: None,
            bounds,
            pellets_eaten: 0,
            sprite: SpritePlayer::new(frame_time, Direction::Right),
            animations,
        }
    }

    /// Turning is refused when a wall sits right in front of pacman in the
    /// new direction. The radius is tighter than the movement one so turns
    /// can start a little before reaching the centre of a tile.
    pub fn can_turn(&self, direction: Direction, entities: &[Entity], tuning: &Tuning) -> bool {
        let ahead = self.position + direction.delta();
        !collides(ahead, entities, EntityKind::Wall, tuning.turn_radius)
    }

    /// Face `direction`, restarting the matching animation.
    pub fn turn(&mut self, direction: Direction) {
        if direction != self.direction {
            self.direction = direction;
            self.sprite.set_animation(direction);
        }
    }

    pub fn plan_move(&self, dt: f32, entities: &[Entity], tuning: &Tuning) -> PlayerMove {
        let candidate = self.position + self.direction.delta() * (dt * tuning.player_speed);
        PlayerMove {
            candidate,
            in_bounds: self.bounds.contains(candidate),
            hit_wall: collides(candidate, entities, EntityKind::Wall, tuning.wall_radius),
            pellet: first_collision(
                candidate,
                entities,
                EntityKind::Pellet,
                tuning.pellet_radius,
            ),
            hit_ghost: collides(candidate, entities, EntityKind::Ghost, tuning.ghost_radius),
        }
    }

    /// Apply a planned move. Pellet and ghost hits count whether or not the
    /// move itself is accepted. A snapped position may sit within
    /// `wall_radius` of a wall.
    pub fn apply_move(&mut self, planned: &PlayerMove, dt: f32) -> Step {
        if planned.pellet.is_some() {
            self.pellets_eaten += 1;
        }
        if planned.hit_ghost {
            self.active = false;
        }

        let step = if planned.accepted() {
            self.sprite.play();
            self.position = planned.candidate;
            Step::Moved
        } else {
            self.sprite.pause();
            // snap the off axis to the grid so pacman does not drift inside tunnels
            if self.direction.is_vertical() {
                self.position.x = self.position.x.round();
            } else {
                self.position.y = self.position.y.round();
            }
            Step::Blocked
        };

        self.sprite.update(dt, &self.animations);
        step
    }

    pub fn is_animating(&self) -> bool {
        self.sprite.is_playing()
    }

    pub fn keyframe(&self) -> Rect {
        self.sprite.keyframe(&self.animations)
    }

    pub fn animations_mut(&mut self) -> &mut DirectionalAnimation {
        &mut self.animations
    }
}

/// Forward a directional command to the pacman at `index`.
pub fn on_input(entities: &mut [Entity], index: usize, direction: Direction, tuning: &Tuning) {
    let allowed = match entities.get(index) {
        Some(Entity::Player(pacman)) => pacman.can_turn(direction, entities, tuning),
        _ => return,
    };
    if let Some(Entity::Player(pacman)) = entities.get_mut(index) {
        pacman.last_command = Some(direction);
        if allowed {
            pacman.turn(direction);
        } else {
            trace!(?direction, "turn blocked by wall");
        }
    }
}

/// Move the pacman at `index` one tick, eating whatever pellet it grazes.
pub fn update(
    entities: &mut [Entity],
    index: usize,
    dt: f32,
    tuning: &Tuning,
) -> Option<(PlayerMove, Step)> {
    let planned = entities.get(index)?.as_player()?.plan_move(dt, entities, tuning);

    if let Some(pellet) = planned.pellet {
        entities[pellet].deactivate();
    }

    match entities.get_mut(index) {
        Some(Entity::Player(pacman)) => {
            let step = pacman.apply_move(&planned, dt);
            if planned.pellet.is_some() {
                trace!(eaten = pacman.pellets_eaten, "pellet eaten");
            }
            if planned.hit_ghost {
                debug!(position = ?pacman.position, "pacman caught by a ghost");
            }
            Some((planned, step))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::pacman_animations;
    use crate::components::{Pellet, Wall};

    fn bounds() -> Bounds {
        Bounds {
            min: Vec2::new(0.0, 0.0),
            max: Vec2::new(10.0, 10.0),
        }
    }

    fn pacman_at(x: f32, y: f32) -> Entity {
        Entity::Player(Pacman::new(
            Vec2::new(x, y),
            bounds(),
            pacman_animations(),
            0.05,
        ))
    }

    #[test]
    fn test_moves_along_facing() {
        let tuning = Tuning::default();
        let mut entities = vec![pacman_at(2.0, 2.0)];
        let (_, step) = update(&mut entities, 0, 0.25, &tuning).unwrap();
        assert_eq!(step, Step::Moved);
        assert_eq!(entities[0].position(), Vec2::new(2.5, 2.0));
        assert!(entities[0].as_player().unwrap().is_animating());
    }

    #[test]
    fn test_blocked_move_snaps_off_axis() {
        let tuning = Tuning::default();
        let mut entities = vec![
            pacman_at(2.0, 2.3),
            Entity::Wall(Wall::new(Vec2::new(3.0, 2.0))),
        ];
        let (planned, step) = update(&mut entities, 0, 0.1, &tuning).unwrap();
        assert!(planned.hit_wall);
        assert_eq!(step, Step::Blocked);
        assert_eq!(entities[0].position(), Vec2::new(2.0, 2.0));
        assert!(!entities[0].as_player().unwrap().is_animating());
    }

    #[test]
    fn test_turn_refused_into_wall() {
        let tuning = Tuning::default();
        let mut entities = vec![
            pacman_at(2.0, 2.0),
            Entity::Wall(Wall::new(Vec2::new(2.0, 3.0))),
        ];
        on_input(&mut entities, 0, Direction::Up, &tuning);
        let pacman = entities[0].as_player().unwrap();
        assert_eq!(pacman.direction, Direction::Right);
        assert_eq!(pacman.last_command, Some(Direction::Up));

        on_input(&mut entities, 0, Direction::Down, &tuning);
        assert_eq!(entities[0].as_player().unwrap().direction, Direction::Down);
    }

    #[test]
    fn test_pellet_grazed_even_when_blocked() {
        let tuning = Tuning::default();
        // out of bounds candidate, but a pellet right there
        let mut entities = vec![
            pacman_at(10.0, 5.0),
            Entity::Pellet(Pellet::new(Vec2::new(10.1, 5.0))),
        ];
        let (planned, step) = update(&mut entities, 0, 0.05, &tuning).unwrap();
        assert!(!planned.in_bounds);
        assert_eq!(step, Step::Blocked);
        assert!(!entities[1].is_active());
        assert_eq!(entities[0].as_player().unwrap().pellets_eaten, 1);
    }
}
