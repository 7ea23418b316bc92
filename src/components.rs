use vek::Vec2;

use crate::ghost::Ghost;
use crate::player::Pacman;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in world space, y up.
    pub fn delta(self) -> Vec2<f32> {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Next direction in the fixed Up -> Right -> Down -> Left cycle.
    pub fn clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgba { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Wall,
    Pellet,
    Ghost,
    Player,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub position: Vec2<f32>,
    pub color: Rgba,
}

impl Wall {
    pub const DEFAULT_COLOR: Rgba = Rgba::new(0.2, 0.4, 1.0, 1.0);

    pub fn new(position: Vec2<f32>) -> Self {
        Wall {
            position,
            color: Self::DEFAULT_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pellet {
    pub position: Vec2<f32>,
    pub active: bool,
}

impl Pellet {
    pub fn new(position: Vec2<f32>) -> Self {
        Pellet {
            position,
            active: true,
        }
    }

    pub fn pickup(&mut self) {
        self.active = false;
    }
}

/// Everything that lives in a level, kept together in one collection so a
/// single pass can check collisions against any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Wall(Wall),
    Pellet(Pellet),
    Ghost(Ghost),
    Player(Pacman),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Wall(_) => EntityKind::Wall,
            Entity::Pellet(_) => EntityKind::Pellet,
            Entity::Ghost(_) => EntityKind::Ghost,
            Entity::Player(_) => EntityKind::Player,
        }
    }

    pub fn position(&self) -> Vec2<f32> {
        match self {
            Entity::Wall(wall) => wall.position,
            Entity::Pellet(pellet) => pellet.position,
            Entity::Ghost(ghost) => ghost.position,
            Entity::Player(pacman) => pacman.position,
        }
    }

    /// Walls never deactivate.
    pub fn is_active(&self) -> bool {
        match self {
            Entity::Wall(_) => true,
            Entity::Pellet(pellet) => pellet.active,
            Entity::Ghost(ghost) => ghost.active,
            Entity::Player(pacman) => pacman.active,
        }
    }

    pub fn deactivate(&mut self) {
        match self {
            Entity::Wall(_) => {}
            Entity::Pellet(pellet) => pellet.active = false,
            Entity::Ghost(ghost) => ghost.active = false,
            Entity::Player(pacman) => pacman.active = false,
        }
    }

    pub fn as_player(&self) -> Option<&Pacman> {
        match self {
            Entity::Player(pacman) => Some(pacman),
            _ => None,
        }
    }

    pub fn as_ghost(&self) -> Option<&Ghost> {
        match self {
            Entity::Ghost(ghost) => Some(ghost),
            _ => None,
        }
    }
}
