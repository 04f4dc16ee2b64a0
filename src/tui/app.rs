//! Viewer application state and logic.

use crate::arcade::{Arcade, Event};

/// Events processed per tick while running.
const EVENTS_PER_TICK: usize = 64;

/// Viewer application state.
pub struct ViewerApp {
    /// The cabinet being watched.
    pub arcade: Arcade,
    /// Original program, for reset.
    pub program: Vec<i64>,
    /// Whether quarters are inserted on reset.
    pub free_play: bool,
    /// Is the game running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Events handled since the last reset.
    pub events: u64,
}

impl ViewerApp {
    /// Create a viewer for a game program.
    pub fn new(program: Vec<i64>, free_play: bool) -> Self {
        let mut app = Self {
            arcade: Arcade::new(&program),
            program,
            free_play,
            running: false,
            should_quit: false,
            status: String::new(),
            events: 0,
        };
        app.reset();
        app.status = "Ready. Press 'space' to run, 's' to step, 'q' to quit.".into();
        app
    }

    /// Handle one output triple. Returns `None` once nothing more can happen.
    pub fn step(&mut self) -> Option<Event> {
        match self.arcade.next_event() {
            Ok(Some(event)) => {
                self.events += 1;
                self.status = match event {
                    Event::Draw { x, y, tile } => format!("Draw {:?} at ({}, {})", tile, x, y),
                    Event::Score(score) => format!("Score: {}", score),
                };
                Some(event)
            }
            Ok(None) => {
                self.status = format!("Game over. Final score {}", self.arcade.screen().score());
                self.running = false;
                None
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
                None
            }
        }
    }

    /// Toggle continuous running.
    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        self.status = if self.running { "Running...".into() } else { "Paused.".into() };
    }

    /// Run one batch of continuous execution, stopping early at a score
    /// update so the screen keeps pace with the game.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        for _ in 0..EVENTS_PER_TICK {
            let Some(event) = self.step() else { return };
            if let Event::Score(score) = event {
                if self.arcade.is_cleared() {
                    self.running = false;
                    self.status = format!("Cleared! Score {}", score);
                }
                return;
            }
        }
    }

    /// Reload the program.
    pub fn reset(&mut self) {
        self.arcade = Arcade::new(&self.program);
        if self.free_play {
            if let Err(e) = self.arcade.insert_quarters() {
                self.status = format!("Error: {}", e);
                return;
            }
        }
        self.running = false;
        self.events = 0;
        self.status = "Reset. Ready.".into();
    }
}

/// Run the viewer with a game program.
pub fn run_viewer(program: Vec<i64>, free_play: bool) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event as TermEvent, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = ViewerApp::new(program, free_play);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(16))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char(' ') => app.toggle_running(),
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('x') => app.reset(),
                        _ => {}
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
