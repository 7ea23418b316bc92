//! First person variant of the game.
//!
//! Works on the xz plane of the level: grid cell `(i, j)` spans
//! `[i, i + 1] x [j, j + 1]` with its centre at `(i + 0.5, j + 0.5)`. Pacman
//! walks along a forward vector derived from its yaw and is turned with the
//! left and right keys. Collision only rounds the candidate position to a grid
//! cell and checks whether that cell is a wall.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use rand::Rng;
use tracing::{debug, info};
use vek::{Vec2, Vec3};

use crate::components::{Rgba, Wall};
use crate::error::{GameResult, SpawnError};
use crate::game::{GameState, Outcome, Simulation};
use crate::input::{InputEvent, InputQueue, Key, KeyState};
use crate::level::{Cell, Level};
use crate::render::{DrawAttributes, Fill, PELLET_COLOR};
use crate::spawn::place_ghosts;

const PACMAN_COLOR: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
const GHOST_COLOR: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

/// Heights of things above the floor.
const EYE_HEIGHT: f32 = 0.5;
const PELLET_HEIGHT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonTuning {
    pub walk_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
    pub ghost_speed: f32,
    pub pellet_radius: f32,
    pub ghost_radius: f32,
}

impl Default for FirstPersonTuning {
    fn default() -> Self {
        FirstPersonTuning {
            walk_speed: 1.0,
            turn_speed: FRAC_PI_2,
            ghost_speed: 0.75,
            pellet_radius: 0.4,
            ghost_radius: 0.5,
        }
    }
}

/// Pacman seen from the inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    pub position: Vec3<f32>,
    /// Rotation around the y axis; zero looks down +z.
    pub yaw: f32,
    walk: f32,
    turn: f32,
}

impl Walker {
    pub fn new(position: Vec3<f32>) -> Self {
        Walker {
            position,
            yaw: 0.0,
            walk: 0.0,
            turn: 0.0,
        }
    }

    pub fn forward(&self) -> Vec3<f32> {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn input(&mut self, event: InputEvent) {
        match (event.key, event.state) {
            (Key::Up, KeyState::Pressed | KeyState::Held) => self.walk = 1.0,
            (Key::Down, KeyState::Pressed | KeyState::Held) => self.walk = -1.0,
            (Key::Left, KeyState::Pressed | KeyState::Held) => self.turn = 1.0,
            (Key::Right, KeyState::Pressed | KeyState::Held) => self.turn = -1.0,
            (Key::Up | Key::Down, KeyState::Released) => self.walk = 0.0,
            (Key::Left | Key::Right, KeyState::Released) => self.turn = 0.0,
        }
    }

    pub fn update(&mut self, dt: f32, level: &Level, tuning: &FirstPersonTuning) -> bool {
        self.yaw += self.turn * tuning.turn_speed * dt;
        let candidate = self.position + self.forward() * (self.walk * tuning.walk_speed * dt);
        if blocked(level, candidate) {
            return false;
        }
        self.position = candidate;
        true
    }
}

/// A ghost that walks in straight lines and turns a quarter on wall contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Roamer {
    pub position: Vec3<f32>,
    heading: usize,
}

impl Roamer {
    pub fn new(position: Vec3<f32>) -> Self {
        Roamer {
            position,
            heading: 0,
        }
    }

    /// Axis aligned headings cycled through on wall contact: +z, +x, -z, -x.
    pub fn forward(&self) -> Vec3<f32> {
        match self.heading % 4 {
            0 => Vec3::new(0.0, 0.0, 1.0),
            1 => Vec3::new(1.0, 0.0, 0.0),
            2 => Vec3::new(0.0, 0.0, -1.0),
            _ => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    pub fn update(&mut self, dt: f32, level: &Level, tuning: &FirstPersonTuning) {
        let candidate = self.position + self.forward() * (tuning.ghost_speed * dt);
        if blocked(level, candidate) {
            self.heading = (self.heading + 1) % 4;
        } else {
            self.position = candidate;
        }
    }
}

fn blocked(level: &Level, pos: Vec3<f32>) -> bool {
    let (w, h) = level.size();
    if pos.x < 0.0 || pos.z < 0.0 || pos.x > w as f32 || pos.z > h as f32 {
        return true;
    }
    let i = (pos.x - 0.5).round() as i32;
    let j = (pos.z - 0.5).round() as i32;
    level.get(i, j) == Cell::Wall
}

fn cell_centre(i: usize, j: usize, height: f32) -> Vec3<f32> {
    Vec3::new(i as f32 + 0.5, height, j as f32 + 0.5)
}

fn xz(v: Vec3<f32>) -> Vec2<f32> {
    Vec2::new(v.x, v.z)
}

/// Pacman's spawn cell centre at eye height.
pub fn find_pacman(level: &Level) -> Result<Vec3<f32>, SpawnError> {
    level
        .cells()
        .find(|&(_, _, cell)| cell == Cell::PacmanSpawn)
        .map(|(i, j, _)| cell_centre(i, j, EYE_HEIGHT))
        .ok_or(SpawnError::PlayerNotFound)
}

#[derive(Debug, Clone)]
pub struct FirstPersonGame {
    level: Level,
    player: Walker,
    ghosts: Vec<Roamer>,
    pellets: Vec<Vec3<f32>>,
    pellets_eaten: u32,
    total_pellets: u32,
    state: GameState,
    tuning: FirstPersonTuning,
}

impl FirstPersonGame {
    pub fn new(
        level: Level,
        ghost_count: usize,
        tuning: FirstPersonTuning,
        rng: &mut impl Rng,
    ) -> Result<Self, SpawnError> {
        let player = Walker::new(find_pacman(&level)?);
        let ghost_cells = place_ghosts(&level, ghost_count, rng)?;

        let width = level.width();
        let ghosts: Vec<Roamer> = ghost_cells
            .iter()
            .map(|&index| Roamer::new(cell_centre(index % width, index / width, EYE_HEIGHT)))
            .collect();
        let pellets: Vec<Vec3<f32>> = level
            .cells()
            .filter(|&(i, j, cell)| {
                matches!(cell, Cell::Tunnel | Cell::Pellet) && !ghost_cells.contains(&(j * width + i))
            })
            .map(|(i, j, _)| cell_centre(i, j, PELLET_HEIGHT))
            .collect();

        debug!(
            ghosts = ghosts.len(),
            pellets = pellets.len(),
            "populated first person level"
        );
        Ok(FirstPersonGame {
            level,
            player,
            ghosts,
            total_pellets: pellets.len() as u32,
            pellets,
            pellets_eaten: 0,
            state: GameState::Playing,
            tuning,
        })
    }

    pub fn load(
        path: impl AsRef<Path>,
        ghost_count: usize,
        tuning: FirstPersonTuning,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        let level = Level::load(path)?;
        Ok(FirstPersonGame::new(level, ghost_count, tuning, rng)?)
    }

    pub fn tick(&mut self, dt: f32, input: &mut InputQueue) -> GameState {
        if self.state != GameState::Playing {
            input.drain().for_each(drop);
            return self.state;
        }
        for event in input.drain() {
            self.player.input(event);
        }

        self.player.update(dt, &self.level, &self.tuning);

        let player = self.player.position;
        let radius = self.tuning.pellet_radius;
        let before = self.pellets.len();
        self.pellets
            .retain(|pellet| (*pellet - player).magnitude() > radius);
        self.pellets_eaten += (before - self.pellets.len()) as u32;

        for ghost in &mut self.ghosts {
            ghost.update(dt, &self.level, &self.tuning);
        }
        let caught = self
            .ghosts
            .iter()
            .any(|ghost| (xz(ghost.position) - xz(player)).magnitude() <= self.tuning.ghost_radius);

        if caught {
            self.finish(Outcome::Lost {
                pellets_eaten: self.pellets_eaten,
                total_pellets: self.total_pellets,
            });
        } else if self.pellets_eaten >= self.total_pellets {
            self.finish(Outcome::Won);
        }
        self.state
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(?outcome, "first person game finished");
        self.state = GameState::Finished(outcome);
    }

    pub fn player(&self) -> &Walker {
        &self.player
    }

    pub fn ghosts(&self) -> &[Roamer] {
        &self.ghosts
    }

    pub fn pellets(&self) -> &[Vec3<f32>] {
        &self.pellets
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Top down view, mapped onto the same world space as the classic game.
    fn top_down(&self, v: Vec3<f32>) -> Vec2<f32> {
        let flip = self.level.height() as f32 - 1.0;
        Vec2::new(v.x - 0.5, flip - (v.z - 0.5))
    }
}

impl Simulation for FirstPersonGame {
    fn tick(&mut self, dt: f32, input: &mut InputQueue) -> GameState {
        FirstPersonGame::tick(self, dt, input)
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn draw_list(&self) -> Vec<DrawAttributes> {
        let walls = self
            .level
            .cells()
            .filter(|&(_, _, cell)| cell == Cell::Wall)
            .map(|(i, j, _)| DrawAttributes {
                position: self.level.to_world(i, j),
                fill: Fill::Color(Wall::DEFAULT_COLOR),
                scale: 1.0,
                is_quad: true,
                z_order: 0.0,
            });
        let pellets = self.pellets.iter().map(|&p| DrawAttributes {
            position: self.top_down(p),
            fill: Fill::Color(PELLET_COLOR),
            scale: 0.2,
            is_quad: false,
            z_order: 1.0,
        });
        let player = std::iter::once(DrawAttributes {
            position: self.top_down(self.player.position),
            fill: Fill::Color(PACMAN_COLOR),
            scale: 1.0,
            is_quad: false,
            z_order: 2.0,
        });
        let ghosts = self.ghosts.iter().map(|g| DrawAttributes {
            position: self.top_down(g.position),
            fill: Fill::Color(GHOST_COLOR),
            scale: 1.0,
            is_quad: false,
            z_order: 3.0,
        });
        walls.chain(pellets).chain(player).chain(ghosts).collect()
    }

    fn pellets(&self) -> (u32, u32) {
        (self.pellets_eaten, self.total_pellets)
    }

    fn size(&self) -> (usize, usize) {
        self.level.size()
    }
}
