//! Sprite sheet animations keyed by movement direction.
//!
//! Ghosts all share one table through an [`AnimationStore`]; pacman owns
//! its table outright. A [`SpritePlayer`] only tracks playback state and is
//! handed the table when a keyframe is needed.

use crate::components::Direction;

/// Keyframe rectangle in sprite sheet pixels: `(x0, y0, x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Rect { x0, y0, x1, y1 }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    keyframes: Vec<Rect>,
}

impl Animation {
    pub fn new(keyframes: impl Into<Vec<Rect>>) -> Self {
        Animation {
            keyframes: keyframes.into(),
        }
    }

    pub fn push_keyframe(&mut self, frame: Rect) {
        self.keyframes.push(frame);
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn keyframe(&self, index: usize) -> Option<Rect> {
        self.keyframes.get(index).copied()
    }
}

/// One animation per direction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectionalAnimation {
    up: Animation,
    down: Animation,
    left: Animation,
    right: Animation,
}

impl DirectionalAnimation {
    pub fn new(up: Animation, down: Animation, left: Animation, right: Animation) -> Self {
        DirectionalAnimation {
            up,
            down,
            left,
            right,
        }
    }

    pub fn get(&self, direction: Direction) -> &Animation {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut Animation {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Stable handle into an [`AnimationStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(usize);

/// Arena of shared animation tables. Editing a table through the store is
/// seen by every entity holding its id.
#[derive(Debug, Clone, Default)]
pub struct AnimationStore {
    tables: Vec<DirectionalAnimation>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: DirectionalAnimation) -> AnimationId {
        self.tables.push(table);
        AnimationId(self.tables.len() - 1)
    }

    pub fn get(&self, id: AnimationId) -> &DirectionalAnimation {
        &self.tables[id.0]
    }

    pub fn get_mut(&mut self, id: AnimationId) -> &mut DirectionalAnimation {
        &mut self.tables[id.0]
    }
}

/// Playback state for a directional animation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpritePlayer {
    frame_time: f32,
    since_last_frame: f32,
    frame: usize,
    current: Direction,
    paused: bool,
}

impl SpritePlayer {
    pub fn new(frame_time: f32, direction: Direction) -> Self {
        SpritePlayer {
            frame_time,
            since_last_frame: 0.0,
            frame: 0,
            current: direction,
            paused: false,
        }
    }

    /// Switch to the animation for `direction`, restarting it.
    pub fn set_animation(&mut self, direction: Direction) {
        self.current = direction;
        self.frame = 0;
        self.since_last_frame = 0.0;
        self.paused = false;
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance playback by `dt` seconds, looping at the end of the animation.
    pub fn update(&mut self, dt: f32, table: &DirectionalAnimation) {
        if self.paused {
            return;
        }
        self.since_last_frame += dt;
        if self.since_last_frame >= self.frame_time {
            self.since_last_frame = 0.0;
            self.frame += 1;
            if self.frame >= table.get(self.current).len() {
                self.frame = 0;
            }
        }
    }

    pub fn keyframe(&self, table: &DirectionalAnimation) -> Rect {
        let animation = table.get(self.current);
        debug_assert!(
            !animation.is_empty(),
            "no keyframes for {:?}",
            self.current
        );
        animation.keyframe(self.frame).unwrap_or_default()
    }
}

const fn cell(col: i32, row: i32) -> Rect {
    Rect::new(col * 72, row * 72, col * 72 + 72, row * 72 + 72)
}

/// Chomping cycle: open, wider, widest, wider again.
fn chomp(row: i32) -> Animation {
    Animation::new([0, 1, 2, 3, 2, 1].map(|col| cell(col, row)))
}

fn flutter(row: i32) -> Animation {
    Animation::new([cell(4, row), cell(5, row)])
}

/// Pacman's per direction animations in the stock 432x288 sprite sheet.
pub fn pacman_animations() -> DirectionalAnimation {
    DirectionalAnimation::new(chomp(1), chomp(0), chomp(3), chomp(2))
}

/// Ghost animations in the stock sprite sheet.
pub fn ghost_animations() -> DirectionalAnimation {
    DirectionalAnimation::new(flutter(1), flutter(0), flutter(2), flutter(3))
}
