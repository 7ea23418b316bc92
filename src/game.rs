//! Level controller: owns the entities and drives them one tick at a time.

use std::path::Path;

use rand::Rng;
use tracing::{info, trace};

use crate::anim::{ghost_animations, AnimationId, AnimationStore};
use crate::components::{Entity, EntityKind};
use crate::config::Tuning;
use crate::error::{GameResult, SpawnError};
use crate::input::InputQueue;
use crate::level::Level;
use crate::player::Pacman;
use crate::render::{draw_list, DrawAttributes};
use crate::spawn::populate;
use crate::{ghost, player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost { pellets_eaten: u32, total_pellets: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Finished(Outcome),
}

/// Shared surface of the classic and first person games, used by the
/// front end.
pub trait Simulation {
    fn tick(&mut self, dt: f32, input: &mut InputQueue) -> GameState;

    fn state(&self) -> GameState;

    fn draw_list(&self) -> Vec<DrawAttributes>;

    /// Pellets eaten and total pellets in the level.
    fn pellets(&self) -> (u32, u32);

    /// Level width and height in cells.
    fn size(&self) -> (usize, usize);

    fn is_game_over(&self) -> bool {
        matches!(self.state(), GameState::Finished(_))
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    entities: Vec<Entity>,
    animations: AnimationStore,
    ghost_animations: AnimationId,
    tuning: Tuning,
    state: GameState,
    pellets_eaten: u32,
    total_pellets: u32,
    size: (usize, usize),
    ticks: u64,
}

impl Game {
    pub fn new(
        level: &Level,
        ghost_count: usize,
        tuning: Tuning,
        rng: &mut impl Rng,
    ) -> Result<Game, SpawnError> {
        let mut animations = AnimationStore::new();
        let ghost_table = animations.insert(ghost_animations());
        let population = populate(level, ghost_count, ghost_table, &tuning, rng)?;
        info!(
            total_pellets = population.total_pellets,
            entities = population.entities.len(),
            "level ready"
        );
        Ok(Game {
            entities: population.entities,
            animations,
            ghost_animations: ghost_table,
            tuning,
            state: GameState::Playing,
            pellets_eaten: 0,
            total_pellets: population.total_pellets,
            size: level.size(),
            ticks: 0,
        })
    }

    /// Load the level at `path` and populate it.
    pub fn load(
        path: impl AsRef<Path>,
        ghost_count: usize,
        tuning: Tuning,
        rng: &mut impl Rng,
    ) -> GameResult<Game> {
        let level = Level::load(path)?;
        Ok(Game::new(&level, ghost_count, tuning, rng)?)
    }

    /// Drive the simulation forward by `dt` seconds.
    ///
    /// The input queue is drained in order before anything moves. Pacman
    /// moves first, then every ghost in collection order; walls and pellets
    /// are only ever queried.
    pub fn tick(&mut self, dt: f32, input: &mut InputQueue) -> GameState {
        if self.is_game_over() {
            input.drain().for_each(drop);
            return self.state;
        }
        self.ticks += 1;

        let pacman = self.player_index();
        if let Some(index) = pacman {
            for event in input.drain().filter(|event| event.is_down()) {
                player::on_input(&mut self.entities, index, event.key.direction(), &self.tuning);
            }
            player::update(&mut self.entities, index, dt, &self.tuning);
        } else {
            input.drain().for_each(drop);
        }

        for index in 0..self.entities.len() {
            if self.entities[index].kind() == EntityKind::Ghost {
                ghost::update(
                    &mut self.entities,
                    index,
                    dt,
                    &self.tuning,
                    &self.animations,
                );
            }
        }

        self.evaluate(pacman);
        let removed = self.sweep();
        if removed > 0 {
            trace!(tick = self.ticks, removed, "swept inactive entities");
        }
        self.state
    }

    fn evaluate(&mut self, pacman: Option<usize>) {
        let (alive, eaten) = match pacman.and_then(|i| self.entities[i].as_player()) {
            Some(pacman) => (pacman.active, pacman.pellets_eaten),
            None => (false, self.pellets_eaten),
        };
        self.pellets_eaten = eaten;

        let outcome = if !alive {
            Outcome::Lost {
                pellets_eaten: self.pellets_eaten,
                total_pellets: self.total_pellets,
            }
        } else if self.pellets_eaten >= self.total_pellets {
            Outcome::Won
        } else {
            return;
        };

        match outcome {
            Outcome::Won => info!(tick = self.ticks, "game won"),
            Outcome::Lost {
                pellets_eaten,
                total_pellets,
            } => info!(
                tick = self.ticks,
                pellets_eaten, total_pellets, "game over"
            ),
        }
        self.state = GameState::Finished(outcome);
    }

    /// Drop every inactive entity. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_active);
        before - self.entities.len()
    }

    fn player_index(&self) -> Option<usize> {
        self.entities
            .iter()
            .position(|entity| entity.kind() == EntityKind::Player)
    }

    pub fn player(&self) -> Option<&Pacman> {
        self.entities.iter().find_map(Entity::as_player)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::Finished(outcome) => Some(outcome),
            GameState::Playing => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, GameState::Finished(_))
    }

    pub fn pellets_eaten(&self) -> u32 {
        self.pellets_eaten
    }

    pub fn total_pellets(&self) -> u32 {
        self.total_pellets
    }

    pub fn ghost_animations(&self) -> AnimationId {
        self.ghost_animations
    }

    /// Shared animation tables. Edits show up on every ghost at once.
    pub fn animations_mut(&mut self) -> &mut AnimationStore {
        &mut self.animations
    }

    pub fn animations(&self) -> &AnimationStore {
        &self.animations
    }

    pub fn draw_list(&self) -> Vec<DrawAttributes> {
        draw_list(&self.entities, &self.animations)
    }
}

impl Simulation for Game {
    fn tick(&mut self, dt: f32, input: &mut InputQueue) -> GameState {
        Game::tick(self, dt, input)
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn draw_list(&self) -> Vec<DrawAttributes> {
        Game::draw_list(self)
    }

    fn pellets(&self) -> (u32, u32) {
        (self.pellets_eaten, self.total_pellets)
    }

    fn size(&self) -> (usize, usize) {
        self.size
    }
}
