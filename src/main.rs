use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use unicode_width::UnicodeWidthStr;

use pacman_sim::components::Rgba;
use pacman_sim::config::{Mode, Settings};
use pacman_sim::first_person::{FirstPersonGame, FirstPersonTuning};
use pacman_sim::input::{InputEvent, InputQueue, Key};
use pacman_sim::logging::init_logging;
use pacman_sim::render::{DrawAttributes, Fill};
use pacman_sim::{Game, GameState, Outcome, Simulation};

const CELL_W: usize = 2;
const INPUT_HOLD_MS: u64 = 160;
/// Longest step fed to the simulation, so a stalled terminal cannot push
/// anything through a wall.
const MAX_DT: f32 = 0.1;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Empty,
    Pellet,
    Player,
    Ghost,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const EMPTY: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![EMPTY; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

/// Turns key presses into simulation input. Most terminals never report key
/// releases, so a key counts as released once it has not repeated for
/// `INPUT_HOLD_MS`.
#[derive(Default)]
struct KeyTracker {
    last_seen: [Option<Instant>; 4],
}

impl KeyTracker {
    fn press(&mut self, key: Key, now: Instant, queue: &mut InputQueue) {
        let slot = &mut self.last_seen[idx_for_key(key)];
        if slot.is_some() {
            queue.push(InputEvent::held(key));
        } else {
            queue.push(InputEvent::pressed(key));
        }
        *slot = Some(now);
    }

    fn release(&mut self, key: Key, queue: &mut InputQueue) {
        if self.last_seen[idx_for_key(key)].take().is_some() {
            queue.push(InputEvent::released(key));
        }
    }

    fn expire(&mut self, now: Instant, queue: &mut InputQueue) {
        for key in Key::ALL {
            if let Some(t) = self.last_seen[idx_for_key(key)] {
                if now.duration_since(t) > Duration::from_millis(INPUT_HOLD_MS) {
                    self.release(key, queue);
                }
            }
        }
    }
}

fn idx_for_key(key: Key) -> usize {
    match key {
        Key::Up => 0,
        Key::Down => 1,
        Key::Left => 2,
        Key::Right => 3,
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('k') | KeyCode::Char('w') | KeyCode::Up => Some(Key::Up),
        KeyCode::Char('j') | KeyCode::Char('s') | KeyCode::Down => Some(Key::Down),
        KeyCode::Char('h') | KeyCode::Char('a') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('l') | KeyCode::Char('d') | KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings.log_file)?;
    info!(?settings, "settings");

    // load before touching the terminal so errors print normally
    let mut sim = build(&settings)
        .with_context(|| format!("unable to start level {}", settings.level.display()))?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, sim.as_mut(), &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn build(settings: &Settings) -> Result<Box<dyn Simulation>> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let path = &settings.level;
    let sim: Box<dyn Simulation> = match settings.mode {
        Mode::Classic => Box::new(Game::load(path, settings.ghosts, settings.tuning, &mut rng)?),
        Mode::FirstPerson => Box::new(FirstPersonGame::load(
            path,
            settings.ghosts,
            FirstPersonTuning::default(),
            &mut rng,
        )?),
    };
    Ok(sim)
}

fn run(stdout: &mut Stdout, sim: &mut dyn Simulation, settings: &Settings) -> Result<()> {
    let (width, height) = sim.size();
    let mut renderer = Renderer::new(width, height);
    let mut queue = InputQueue::new();
    let mut keys = KeyTracker::default();
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut prev = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        code => {
                            if let Some(k) = map_key(code) {
                                keys.press(k, Instant::now(), &mut queue);
                            }
                        }
                    },
                    KeyEventKind::Release => {
                        if let Some(k) = map_key(key.code) {
                            keys.release(k, &mut queue);
                        }
                    }
                }
            }
        }

        let now = Instant::now();
        keys.expire(now, &mut queue);
        let dt = now.duration_since(prev).as_secs_f32().min(MAX_DT);
        prev = now;

        let state = sim.tick(dt, &mut queue);
        renderer.draw(stdout, sim)?;
        if let GameState::Finished(outcome) = state {
            render_game_over(stdout, sim, &renderer, outcome)?;
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn rgb(color: Rgba) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

fn cell_for(attr: &DrawAttributes) -> Cell {
    let glyph = match attr.z_order as i32 {
        0 => Glyph::Wall,
        1 => Glyph::Pellet,
        2 => Glyph::Player,
        _ => Glyph::Ghost,
    };
    let color = match (attr.fill, glyph) {
        (Fill::Color(color), _) => rgb(color),
        (Fill::Keyframe(_), Glyph::Player) => Color::Yellow,
        (Fill::Keyframe(_), _) => Color::Red,
    };
    Cell { glyph, color }
}

fn compose(sim: &dyn Simulation, width: usize, height: usize) -> Vec<Cell> {
    let mut cells = vec![EMPTY; width * height];
    // draw list is sorted by z order, later entries win
    for attr in sim.draw_list() {
        let x = attr.position.x.round() as i64;
        let y = height as i64 - 1 - attr.position.y.round() as i64;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            continue;
        }
        cells[y as usize * width + x as usize] = cell_for(&attr);
    }
    cells
}

impl Renderer {
    /// Recentre the board in the terminal. Returns false when the terminal
    /// is too small to hold it.
    fn layout(&mut self, out: &mut Stdout) -> io::Result<bool> {
        let want_w = (self.width * CELL_W) as u16;
        let want_h = (self.height + 2) as u16;
        let (cols, rows) = terminal::size()?;
        if cols < want_w || rows < want_h {
            out.queue(MoveTo(0, 0))?;
            out.queue(Clear(ClearType::All))?;
            out.queue(Print(format!(
                "Terminal too small: board needs {}x{}, have {}x{}.",
                want_w, want_h, cols, rows
            )))?;
            self.needs_full = true;
            return Ok(false);
        }

        let origin = ((cols - want_w) / 2, (rows - want_h) / 2 + 1);
        if origin != (self.origin_x, self.origin_y) {
            (self.origin_x, self.origin_y) = origin;
            self.needs_full = true;
            out.queue(Clear(ClearType::All))?;
        }
        Ok(true)
    }

    fn draw(&mut self, out: &mut Stdout, sim: &dyn Simulation) -> io::Result<()> {
        if !self.layout(out)? {
            return out.flush();
        }

        let (eaten, total) = sim.pellets();
        let hud = format!("Pellets: {}/{}  (q to quit)", eaten, total);
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let frame = compose(sim, self.width, self.height);
        for (idx, cell) in frame.into_iter().enumerate() {
            if !self.needs_full && self.last[idx] == cell {
                continue;
            }
            self.last[idx] = cell;
            self.put(out, idx, cell)?;
        }
        self.needs_full = false;
        out.flush()
    }

    fn put(&self, out: &mut Stdout, idx: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Pellet => "· ",
        };
        let col = self.origin_x + ((idx % self.width) * CELL_W) as u16;
        let row = self.origin_y + (idx / self.width) as u16;
        out.queue(MoveTo(col, row))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(text))?;
        // pad narrow glyphs so every cell covers CELL_W columns
        let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
        out.queue(Print(" ".repeat(pad)))?;
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn render_game_over(
    stdout: &mut Stdout,
    sim: &dyn Simulation,
    renderer: &Renderer,
    outcome: Outcome,
) -> io::Result<()> {
    let msg = match outcome {
        Outcome::Won => format!("YOU WIN - all {} pellets eaten (press q to quit)", sim.pellets().1),
        Outcome::Lost {
            pellets_eaten,
            total_pellets,
        } => format!(
            "GAME OVER - {}/{} pellets eaten (press q to quit)",
            pellets_eaten, total_pellets
        ),
    };
    info!(?outcome, "showing final screen");
    stdout.queue(MoveTo(
        renderer.origin_x,
        renderer.origin_y + renderer.height as u16,
    ))?;
    stdout.queue(Print(msg))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}
