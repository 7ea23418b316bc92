//! Turning a level grid into entities.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::anim::{pacman_animations, AnimationId};
use crate::components::{Entity, Pellet, Wall};
use crate::config::Tuning;
use crate::error::SpawnError;
use crate::ghost::Ghost;
use crate::level::{Cell, Level};
use crate::player::Pacman;

#[derive(Debug, Clone)]
pub struct Population {
    pub entities: Vec<Entity>,
    pub total_pellets: u32,
}

/// Grid indices where ghosts start: every ghost spawn cell of the level,
/// topped up to `ghost_count` with tunnel cells sampled without replacement.
pub fn place_ghosts(
    level: &Level,
    ghost_count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, SpawnError> {
    let width = level.width();
    let mut placed: Vec<usize> = level
        .cells()
        .filter(|&(_, _, cell)| cell == Cell::GhostSpawn)
        .map(|(x, y, _)| y * width + x)
        .collect();

    let needed = ghost_count.saturating_sub(placed.len());
    if needed == 0 {
        return Ok(placed);
    }

    let mut free: Vec<usize> = level
        .cells()
        .filter(|&(_, _, cell)| cell == Cell::Tunnel)
        .map(|(x, y, _)| y * width + x)
        .collect();
    if free.len() < needed {
        return Err(SpawnError::InsufficientFreeCells {
            needed,
            available: free.len(),
        });
    }

    let (chosen, _) = free.partial_shuffle(rng, needed);
    placed.extend_from_slice(chosen);
    Ok(placed)
}

/// Spawn walls, pellets, pacman and ghosts for `level`.
///
/// Tunnel and pellet cells get a pellet unless a ghost was placed there.
/// Only the first pacman spawn cell is used.
pub fn populate(
    level: &Level,
    ghost_count: usize,
    ghost_animations: AnimationId,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Result<Population, SpawnError> {
    if level.count(Cell::PacmanSpawn) == 0 {
        return Err(SpawnError::PlayerNotFound);
    }
    let ghosts = place_ghosts(level, ghost_count, rng)?;

    let bounds = level.bounds();
    let width = level.width();
    let mut entities = Vec::with_capacity(width * level.height());
    let mut total_pellets = 0;
    let mut spawned_pacman = false;

    for (x, y, cell) in level.cells() {
        let pos = level.to_world(x, y);
        if ghosts.contains(&(y * width + x)) {
            entities.push(Entity::Ghost(Ghost::new(
                pos,
                bounds,
                ghost_animations,
                tuning.ghost_frame_time,
            )));
            continue;
        }
        match cell {
            Cell::Wall => entities.push(Entity::Wall(Wall::new(pos))),
            Cell::Tunnel | Cell::Pellet => {
                total_pellets += 1;
                entities.push(Entity::Pellet(Pellet::new(pos)));
            }
            Cell::PacmanSpawn if !spawned_pacman => {
                spawned_pacman = true;
                entities.push(Entity::Player(Pacman::new(
                    pos,
                    bounds,
                    pacman_animations(),
                    tuning.pacman_frame_time,
                )));
            }
            Cell::PacmanSpawn => warn!(x, y, "ignoring extra pacman spawn"),
            // ghost spawn cells are all in `ghosts`
            Cell::GhostSpawn => {}
        }
    }

    debug!(
        entities = entities.len(),
        total_pellets,
        ghosts = ghosts.len(),
        "populated level"
    );
    Ok(Population {
        entities,
        total_pellets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{ghost_animations, AnimationStore};
    use crate::components::EntityKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kinds(population: &Population, kind: EntityKind) -> usize {
        population
            .entities
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    #[test]
    fn test_populate_counts() {
        let level = Level::parse(
            "5 4\n\
             1 1 1 1 1\n\
             1 0 0 3 1\n\
             1 2 0 4 1\n\
             1 1 1 1 1",
        )
        .unwrap();
        let mut store = AnimationStore::new();
        let id = store.insert(ghost_animations());
        let mut rng = StdRng::seed_from_u64(3);
        let population = populate(&level, 2, id, &Tuning::default(), &mut rng).unwrap();

        assert_eq!(kinds(&population, EntityKind::Wall), 14);
        assert_eq!(kinds(&population, EntityKind::Player), 1);
        assert_eq!(kinds(&population, EntityKind::Ghost), 2);
        // 3 tunnels + 1 pellet cell, minus the one tunnel taken by a ghost
        assert_eq!(kinds(&population, EntityKind::Pellet), 3);
        assert_eq!(population.total_pellets, 3);
    }

    #[test]
    fn test_ghosts_never_on_pellet_cells() {
        let level = Level::parse("4 1\n4 0 2 4").unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let cells = place_ghosts(&level, 1, &mut rng).unwrap();
            assert_eq!(cells, vec![1]);
        }
    }

    #[test]
    fn test_not_enough_free_cells() {
        let level = Level::parse("3 3\n1 1 1\n1 0 1\n1 2 1").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = place_ghosts(&level, 4, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SpawnError::InsufficientFreeCells {
                needed: 4,
                available: 1
            }
        );
    }

    #[test]
    fn test_missing_pacman() {
        let level = Level::parse("2 1\n0 0").unwrap();
        let mut store = AnimationStore::new();
        let id = store.insert(ghost_animations());
        let mut rng = StdRng::seed_from_u64(0);
        let err = populate(&level, 0, id, &Tuning::default(), &mut rng).unwrap_err();
        assert_eq!(err, SpawnError::PlayerNotFound);
    }
}
