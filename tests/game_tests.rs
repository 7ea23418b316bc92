use pacman_sim::anim::{ghost_animations, Animation, AnimationStore, Rect};
use pacman_sim::config::Tuning;
use pacman_sim::first_person::{FirstPersonGame, FirstPersonTuning};
use pacman_sim::input::{InputEvent, InputQueue, Key};
use pacman_sim::player::{self, Step};
use pacman_sim::render::Fill;
use pacman_sim::spawn::populate;
use pacman_sim::{Direction, Entity, EntityKind, Game, GameState, Level, Outcome, Simulation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vek::Vec2;

fn level0() -> Level {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/levels/level0.txt");
    Level::load(path).unwrap()
}

fn new_game(text: &str, ghosts: usize, seed: u64) -> Game {
    let level = Level::parse(text).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    Game::new(&level, ghosts, Tuning::default(), &mut rng).unwrap()
}

fn press(key: Key) -> InputQueue {
    [InputEvent::pressed(key)].into_iter().collect()
}

fn random_key(rng: &mut StdRng) -> Key {
    Key::ALL[rng.gen_range(0..Key::ALL.len())]
}

#[test]
fn test_enclosed_pacman_cannot_move() {
    let mut game = new_game("3 3\n1 1 1\n1 2 1\n1 1 1", 0, 0);
    assert_eq!(game.total_pellets(), 0);

    let state = game.tick(0.1, &mut press(Key::Up));
    let pacman = game.player().unwrap();
    assert_eq!(pacman.position, Vec2::new(1.0, 1.0));
    assert_eq!(pacman.direction, Direction::Right);
    assert_eq!(pacman.last_command, Some(Direction::Up));
    // nothing to eat, so the level is already cleared
    assert_eq!(state, GameState::Finished(Outcome::Won));
}

#[test]
fn test_adjacent_pellet_eaten_in_one_tick() {
    let mut game = new_game("4 3\n1 1 1 1\n1 2 0 1\n1 1 1 1", 0, 0);
    assert_eq!(game.total_pellets(), 1);

    let state = game.tick(0.5, &mut InputQueue::new());
    assert_eq!(game.pellets_eaten(), 1);
    assert_eq!(game.player().unwrap().position, Vec2::new(2.0, 1.0));
    assert!(game
        .entities()
        .iter()
        .all(|e| e.kind() != EntityKind::Pellet));
    assert_eq!(state, GameState::Finished(Outcome::Won));
}

#[test]
fn test_whole_queue_drained_in_order() {
    let mut game = new_game(
        "5 5\n1 1 1 1 1\n1 0 0 0 1\n1 0 2 0 1\n1 0 0 0 1\n1 1 1 1 1",
        0,
        0,
    );
    let mut queue: InputQueue = [
        InputEvent::pressed(Key::Up),
        InputEvent::pressed(Key::Left),
        InputEvent::released(Key::Down),
    ]
    .into_iter()
    .collect();

    game.tick(0.01, &mut queue);
    let pacman = game.player().unwrap();
    assert_eq!(pacman.direction, Direction::Left);
    // releases do not steer
    assert_eq!(pacman.last_command, Some(Direction::Left));
    assert!(queue.is_empty());
}

#[test]
fn test_ghost_contact_loses() {
    let mut game = new_game("6 3\n1 1 1 1 1 1\n1 0 2 0 3 1\n1 1 1 1 1 1", 1, 0);
    assert_eq!(game.total_pellets(), 2);

    assert_eq!(game.tick(0.5, &mut InputQueue::new()), GameState::Playing);
    assert_eq!(game.pellets_eaten(), 1);

    let state = game.tick(0.5, &mut InputQueue::new());
    assert_eq!(
        state,
        GameState::Finished(Outcome::Lost {
            pellets_eaten: 1,
            total_pellets: 2
        })
    );
    // the dead pacman is swept at the end of the tick
    assert!(game.player().is_none());
}

#[test]
fn test_ticks_after_game_over_change_nothing() {
    let mut game = new_game("3 3\n1 1 1\n1 2 1\n1 1 1", 0, 0);
    game.tick(0.1, &mut InputQueue::new());
    let before = game.entities().to_vec();

    let mut queue = press(Key::Left);
    let state = game.tick(0.1, &mut queue);
    assert_eq!(state, GameState::Finished(Outcome::Won));
    assert!(queue.is_empty());
    assert_eq!(game.entities(), before.as_slice());
}

#[test]
fn test_pellet_count_only_grows() {
    let level = level0();
    let mut rng = StdRng::seed_from_u64(5);
    let mut game = Game::new(&level, 4, Tuning::default(), &mut rng).unwrap();
    let mut eaten = 0;
    for _ in 0..2000 {
        let mut queue = InputQueue::new();
        if rng.gen_bool(0.05) {
            queue.push(InputEvent::pressed(random_key(&mut rng)));
        }
        let state = game.tick(1.0 / 60.0, &mut queue);
        assert!(game.pellets_eaten() >= eaten);
        assert!(game.pellets_eaten() <= game.total_pellets());
        eaten = game.pellets_eaten();
        if state == GameState::Finished(Outcome::Won) {
            assert_eq!(game.pellets_eaten(), game.total_pellets());
        }
        if game.is_game_over() {
            break;
        }
    }
}

#[test]
fn test_accepted_moves_keep_clear_of_walls() {
    let level = level0();
    let tuning = Tuning::default();
    let mut rng = StdRng::seed_from_u64(9);
    let mut store = AnimationStore::new();
    let ghost_table = store.insert(ghost_animations());
    let mut entities = populate(&level, 0, ghost_table, &tuning, &mut rng)
        .unwrap()
        .entities;
    let index = entities
        .iter()
        .position(|e| e.kind() == EntityKind::Player)
        .unwrap();
    let walls: Vec<Vec2<f32>> = entities
        .iter()
        .filter(|e| e.kind() == EntityKind::Wall)
        .map(Entity::position)
        .collect();

    let mut moved = 0;
    for _ in 0..3000 {
        if rng.gen_bool(0.05) {
            let dir = random_key(&mut rng).direction();
            player::on_input(&mut entities, index, dir, &tuning);
        }
        let (_, step) = player::update(&mut entities, index, 1.0 / 60.0, &tuning).unwrap();
        let pacman = entities[index].as_player().unwrap();
        match step {
            Step::Moved => {
                moved += 1;
                for wall in &walls {
                    assert!((pacman.position - *wall).magnitude() > tuning.wall_radius);
                }
            }
            Step::Blocked => {
                if pacman.direction.is_vertical() {
                    assert_eq!(pacman.position.x, pacman.position.x.round());
                } else {
                    assert_eq!(pacman.position.y, pacman.position.y.round());
                }
            }
        }
    }
    assert!(moved > 0);
}

#[test]
fn test_same_seed_same_game() {
    let level = level0();
    let run = || {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = Game::new(&level, 4, Tuning::default(), &mut rng).unwrap();
        let keys = [Key::Up, Key::Left, Key::Down, Key::Right];
        for tick in 0..600 {
            let mut queue = InputQueue::new();
            if tick % 45 == 0 {
                queue.push(InputEvent::pressed(keys[(tick / 45) % keys.len()]));
            }
            game.tick(1.0 / 60.0, &mut queue);
        }
        game
    };
    let a = run();
    let b = run();
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.state(), b.state());
    assert_eq!(a.pellets_eaten(), b.pellets_eaten());
}

#[test]
fn test_sweep_drops_only_inactive() {
    let mut game = new_game("5 3\n1 1 1 1 1\n1 2 0 0 1\n1 1 1 1 1", 0, 0);
    assert_eq!(game.sweep(), 0);
    let count = game.entities().len();

    game.tick(0.5, &mut InputQueue::new());
    assert_eq!(game.entities().len(), count - 1);
    assert!(game.entities().iter().all(Entity::is_active));
    assert_eq!(game.sweep(), 0);
}

#[test]
fn test_ghost_animation_edits_are_shared() {
    let mut game = new_game("5 3\n1 1 1 1 1\n1 2 0 0 1\n1 0 0 0 1", 2, 1);
    let frame = Rect::new(1, 2, 3, 4);
    let id = game.ghost_animations();
    *game.animations_mut().get_mut(id).get_mut(Direction::Right) = Animation::new([frame]);

    let ghosts: Vec<Fill> = game
        .draw_list()
        .into_iter()
        .filter(|attr| attr.z_order == 3.0)
        .map(|attr| attr.fill)
        .collect();
    assert_eq!(ghosts, vec![Fill::Keyframe(frame); 2]);
}

#[test]
fn test_draw_list_is_layered() {
    let game = new_game("5 3\n1 1 1 1 1\n1 2 0 0 1\n1 0 0 0 1", 1, 3);
    let list = game.draw_list();
    assert_eq!(list.len(), game.entities().len());
    assert!(list.windows(2).all(|w| w[0].z_order <= w[1].z_order));
}

#[test]
fn test_both_modes_share_a_front_end() {
    let level = level0();
    let mut rng = StdRng::seed_from_u64(4);
    let classic = Game::new(&level, 4, Tuning::default(), &mut rng).unwrap();
    let first_person =
        FirstPersonGame::new(level.clone(), 4, FirstPersonTuning::default(), &mut rng).unwrap();

    let mut sims: Vec<Box<dyn Simulation>> = vec![Box::new(classic), Box::new(first_person)];
    for sim in sims.iter_mut() {
        assert_eq!(sim.size(), (15, 9));
        let (eaten, total) = sim.pellets();
        assert_eq!(eaten, 0);
        assert!(total > 0);
        assert!(!sim.is_game_over());
        sim.tick(1.0 / 60.0, &mut InputQueue::new());
        assert!(!sim.draw_list().is_empty());
    }
}
