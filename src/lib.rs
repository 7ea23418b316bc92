//! Grid based Pacman simulation.
//!
//! A level grid is loaded from a text file and populated with walls,
//! pellets, ghosts and pacman. [`game::Game`] drives them forward one tick
//! per frame; [`first_person::FirstPersonGame`] is the first person take on
//! the same level.

pub mod anim;
pub mod collision;
pub mod components;
pub mod config;
pub mod error;
pub mod first_person;
pub mod game;
pub mod ghost;
pub mod input;
pub mod level;
pub mod logging;
pub mod player;
pub mod render;
pub mod spawn;

pub use components::{Direction, Entity, EntityKind};
pub use error::{GameError, GameResult, LevelLoadError, SpawnError};
pub use game::{Game, GameState, Outcome, Simulation};
pub use level::{Cell, Level};
