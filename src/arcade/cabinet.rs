//! The arcade cabinet: a controller that plays the breakout game running on
//! an Intcode VM.
//!
//! The game speaks in triples of outputs, `(x, y, tile)`. The triple
//! `(-1, 0, n)` is a score update rather than a tile. Input is the joystick
//! position, which the cabinet keeps aimed at the ball.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::vm::{Vm, VmError};
use super::{ArcadeError, Renderer, Screen, Tile};

/// Value written to address 0 to play for free.
pub const QUARTERS: i64 = 2;

/// Joystick position, fed to the game as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Joystick {
    Left,
    #[default]
    Neutral,
    Right,
}

impl Joystick {
    /// Tilt towards the ball.
    pub fn track(ball_x: i64, paddle_x: i64) -> Self {
        match ball_x.cmp(&paddle_x) {
            std::cmp::Ordering::Less => Joystick::Left,
            std::cmp::Ordering::Equal => Joystick::Neutral,
            std::cmp::Ordering::Greater => Joystick::Right,
        }
    }

    /// The input value the game expects.
    pub fn value(self) -> i64 {
        match self {
            Joystick::Left => -1,
            Joystick::Neutral => 0,
            Joystick::Right => 1,
        }
    }
}

/// One decoded output triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Draw { x: i64, y: i64, tile: Tile },
    Score(i64),
}

/// An arcade cabinet running a game program.
pub struct Arcade {
    vm: Vm,
    screen: Screen,
    ball_x: Option<i64>,
    paddle_x: Option<i64>,
    joystick: Joystick,
}

impl Arcade {
    /// Load a game. The joystick starts in neutral.
    pub fn new(program: &[i64]) -> Self {
        Self {
            vm: Vm::new(program, Some(Joystick::Neutral.value())),
            screen: Screen::new(),
            ball_x: None,
            paddle_x: None,
            joystick: Joystick::Neutral,
        }
    }

    /// Switch the game to free play.
    pub fn insert_quarters(&mut self) -> Result<(), ArcadeError> {
        self.vm.memory_mut().write(0, QUARTERS).map_err(VmError::from)?;
        Ok(())
    }

    /// Read the next output triple and apply it.
    ///
    /// Returns `None` once the game halts, including halting partway
    /// through a triple.
    pub fn next_event(&mut self) -> Result<Option<Event>, ArcadeError> {
        let Some(x) = self.vm.run_until_output()?.output() else { return Ok(None) };
        let Some(y) = self.vm.run_until_output()?.output() else { return Ok(None) };
        let Some(id) = self.vm.run_until_output()?.output() else { return Ok(None) };

        if x == -1 && y == 0 {
            debug!(score = id, "score update");
            self.screen.set_score(id);
            return Ok(Some(Event::Score(id)));
        }

        let tile = Tile::from_id(id)?;
        self.screen.set_tile(x, y, tile);
        match tile {
            Tile::Paddle => self.paddle_x = Some(x),
            Tile::Ball => self.ball_x = Some(x),
            _ => {}
        }

        if let (Some(ball), Some(paddle)) = (self.ball_x, self.paddle_x) {
            self.joystick = Joystick::track(ball, paddle);
            self.vm.set_input(self.joystick.value());
        }

        Ok(Some(Event::Draw { x, y, tile }))
    }

    /// Play until the game halts or every block is cleared.
    ///
    /// The renderer sees the screen after each score update. Returns the
    /// final score.
    pub fn play<R: Renderer>(&mut self, renderer: &mut R) -> Result<i64, ArcadeError> {
        while let Some(event) = self.next_event()? {
            if let Event::Score(_) = event {
                renderer.render(&self.screen)?;
                if self.is_cleared() {
                    break;
                }
            }
        }

        info!(score = self.screen.score(), steps = self.vm.steps(), "game over");
        Ok(self.screen.score())
    }

    /// Consume every event until the game halts, without rendering.
    pub fn run_to_completion(&mut self) -> Result<&Screen, ArcadeError> {
        while self.next_event()?.is_some() {}
        Ok(&self.screen)
    }

    /// True once blocks have appeared and none are left.
    pub fn is_cleared(&self) -> bool {
        self.screen.seen_blocks() && self.screen.block_count() == 0
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn joystick(&self) -> Joystick {
        self.joystick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the score seen at each render.
    #[derive(Default)]
    struct Recorder {
        scores: Vec<i64>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, screen: &Screen) -> Result<(), ArcadeError> {
            self.scores.push(screen.score());
            Ok(())
        }
    }

    #[test]
    fn test_joystick_tracks_ball() {
        assert_eq!(Joystick::track(5, 3), Joystick::Right);
        assert_eq!(Joystick::track(1, 3), Joystick::Left);
        assert_eq!(Joystick::track(3, 3), Joystick::Neutral);
        assert_eq!(Joystick::Left.value(), -1);
    }

    #[test]
    fn test_draw_and_score_events() {
        let mut arcade = Arcade::new(&[
            104, 1, 104, 2, 104, 3,
            104, -1, 104, 0, 104, 42,
            99,
        ]);

        assert_eq!(
            arcade.next_event().unwrap(),
            Some(Event::Draw { x: 1, y: 2, tile: Tile::Paddle })
        );
        assert_eq!(arcade.next_event().unwrap(), Some(Event::Score(42)));
        assert_eq!(arcade.next_event().unwrap(), None);
        assert_eq!(arcade.screen().tile_at(1, 2), Tile::Paddle);
        assert_eq!(arcade.screen().score(), 42);
    }

    #[test]
    fn test_joystick_is_fed_as_input() {
        // Paddle at x=3, ball at x=5, then echo the input back as the score.
        let mut arcade = Arcade::new(&[
            104, 3, 104, 0, 104, 3,
            104, 5, 104, 0, 104, 4,
            3, 100,
            104, -1, 104, 0, 4, 100,
            99,
        ]);
        let mut recorder = Recorder::default();

        assert_eq!(arcade.play(&mut recorder).unwrap(), 1);
        assert_eq!(recorder.scores, vec![1]);
        assert_eq!(arcade.joystick(), Joystick::Right);
        assert!(arcade.vm().is_halted());
    }

    #[test]
    fn test_play_stops_when_cleared() {
        // Draws a block, erases it, reports a score, then spins forever.
        let mut arcade = Arcade::new(&[
            104, 1, 104, 1, 104, 2,
            104, 1, 104, 1, 104, 0,
            104, -1, 104, 0, 104, 7,
            1105, 1, 18,
        ]);
        let mut recorder = Recorder::default();

        assert_eq!(arcade.play(&mut recorder).unwrap(), 7);
        assert!(arcade.is_cleared());
        assert!(!arcade.vm().is_halted());
    }

    #[test]
    fn test_halt_mid_triple() {
        let mut arcade = Arcade::new(&[104, 1, 104, 2, 99]);
        assert_eq!(arcade.next_event().unwrap(), None);
        assert!(arcade.vm().is_halted());
    }

    #[test]
    fn test_unknown_tile() {
        let mut arcade = Arcade::new(&[104, 0, 104, 0, 104, 9, 99]);
        assert!(matches!(arcade.next_event(), Err(ArcadeError::UnknownTile(9))));
    }

    #[test]
    fn test_block_count() {
        let mut arcade = Arcade::new(&[
            104, 0, 104, 0, 104, 2,
            104, 1, 104, 0, 104, 2,
            104, 2, 104, 0, 104, 1,
            99,
        ]);
        let screen = arcade.run_to_completion().unwrap();
        assert_eq!(screen.block_count(), 2);
    }

    #[test]
    fn test_insert_quarters() {
        let mut arcade = Arcade::new(&[1, 0, 0, 0, 99]);
        arcade.insert_quarters().unwrap();
        assert_eq!(arcade.vm().memory().read(0), Ok(QUARTERS));
    }

    #[test]
    fn test_vm_errors_propagate() {
        let mut arcade = Arcade::new(&[42]);
        assert!(matches!(arcade.next_event(), Err(ArcadeError::VmError(_))));
    }
}
