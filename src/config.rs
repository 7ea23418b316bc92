use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::error::ParseModeError;

const DEFAULT_LEVEL: &str = "levels/level0.txt";
const DEFAULT_LOG: &str = "pacman.log";
const DEFAULT_RENDER_FPS: u64 = 60;
pub const DEFAULT_GHOSTS: usize = 4;

/// Speeds (units per second) and collision radii (world units) used by the
/// classic simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub player_speed: f32,
    pub ghost_speed: f32,
    pub wall_radius: f32,
    pub turn_radius: f32,
    pub pellet_radius: f32,
    pub ghost_radius: f32,
    pub pacman_frame_time: f32,
    pub ghost_frame_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            player_speed: 2.0,
            ghost_speed: 1.5,
            wall_radius: 0.95,
            turn_radius: 0.8,
            pellet_radius: 0.2,
            ghost_radius: 0.35,
            pacman_frame_time: 0.05,
            ghost_frame_time: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Classic,
    FirstPerson,
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "2d" => Ok(Mode::Classic),
            "first-person" | "firstperson" | "3d" => Ok(Mode::FirstPerson),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// Options for one run, read from `PACMAN_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub level: PathBuf,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub ghosts: usize,
    pub mode: Mode,
    pub log_file: PathBuf,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            level: PathBuf::from(DEFAULT_LEVEL),
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            ghosts: DEFAULT_GHOSTS,
            mode: Mode::Classic,
            log_file: PathBuf::from(DEFAULT_LOG),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset or unparsable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let level = lookup("PACMAN_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.level);
        let render_fps = lookup("PACMAN_FPS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.render_fps);
        let seed = lookup("PACMAN_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        let ghosts = lookup("PACMAN_GHOSTS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.ghosts);
        let mode = lookup("PACMAN_MODE")
            .and_then(|v| {
                v.parse::<Mode>()
                    .map_err(|err| warn!(%err, "falling back to the default mode"))
                    .ok()
            })
            .unwrap_or(defaults.mode);
        let log_file = lookup("PACMAN_LOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);
        Settings {
            level,
            render_fps,
            seed,
            ghosts,
            mode,
            log_file,
            tuning: defaults.tuning,
        }
    }
}
