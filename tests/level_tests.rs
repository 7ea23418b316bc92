use std::fs;

use pacman_sim::config::Tuning;
use pacman_sim::{Cell, Game, GameError, Level, LevelLoadError, SpawnError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vek::Vec2;

#[test]
fn test_bundled_level_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/levels/level0.txt");
    let level = Level::load(path).unwrap();
    assert_eq!(level.size(), (15, 9));
    assert_eq!(level.count(Cell::PacmanSpawn), 1);
    assert!(level.count(Cell::Tunnel) >= 4);
    // enclosed by walls
    for x in 0..15 {
        assert_eq!(level.get(x, 0), Cell::Wall);
        assert_eq!(level.get(x, 8), Cell::Wall);
    }
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("pacman_sim_level_{}.txt", std::process::id()));
    fs::write(&path, "3 2\n1 2 1\n1 0 1\n").unwrap();
    let level = Level::load(&path);
    fs::remove_file(&path).unwrap();

    let level = level.unwrap();
    assert_eq!(level.size(), (3, 2));
    assert_eq!(level.get(1, 0), Cell::PacmanSpawn);
    // row 0 is the top of the world
    assert_eq!(level.to_world(1, 0), Vec2::new(1.0, 1.0));
    assert_eq!(level.bounds().max, Vec2::new(2.0, 1.0));
}

#[test]
fn test_load_reports_bad_contents() {
    let path = std::env::temp_dir().join(format!("pacman_sim_bad_{}.txt", std::process::id()));
    fs::write(&path, "2 2\n1 1 1").unwrap();
    let err = Level::load(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(
        err,
        LevelLoadError::SizeMismatch {
            expected: 6,
            found: 5
        }
    ));
}

#[test]
fn test_game_load_surfaces_missing_file() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = Game::load("levels/no_such_level.txt", 4, Tuning::default(), &mut rng).unwrap_err();
    assert!(matches!(err, GameError::Load(LevelLoadError::NotFound { .. })));
}

#[test]
fn test_game_load_surfaces_spawn_failure() {
    let path = std::env::temp_dir().join(format!("pacman_sim_crowded_{}.txt", std::process::id()));
    fs::write(&path, "3 3\n1 1 1\n1 0 1\n1 2 1").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let result = Game::load(&path, 4, Tuning::default(), &mut rng);
    fs::remove_file(&path).unwrap();

    assert!(matches!(
        result,
        Err(GameError::Spawn(SpawnError::InsufficientFreeCells {
            needed: 4,
            available: 1
        }))
    ));
}
