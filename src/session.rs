use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::food;
use crate::grid::{Cell, Direction, Grid};
use crate::input::InputBuffer;
use crate::snake::Snek;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    Moved,
    Ate { score: u32, interval_ms: u64 },
    Crashed(Collision),
    /// Ate the last free cell; no room left for food.
    BoardFilled,
}

/// Read-only snapshot for the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub snake_cells: Vec<Cell>,
    pub head: Cell,
    pub food: Cell,
    pub score: u32,
    pub best: u32,
    pub running: bool,
    pub game_over: bool,
}

#[derive(Debug)]
pub struct GameSession<R = rand::rngs::ThreadRng> {
    config: GameConfig,
    grid: Grid,
    rng: R,
    snek: Snek,
    direction: Direction,
    input: InputBuffer,
    food: Cell,
    score: u32,
    best: u32,
    interval_ms: u64,
    phase: Phase,
}

impl GameSession<rand::rngs::ThreadRng> {
    pub fn new(config: GameConfig) -> Self {
        GameSession::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameSession<R> {
    /// Out-of-range config values are replaced by defaults first.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let config = config.validated();
        let grid = config.grid();
        GameSession {
            grid,
            rng,
            snek: Snek::new(config.initial_snake.iter().copied()),
            direction: config.initial_direction,
            input: InputBuffer::new(),
            food: config.initial_food,
            score: 0,
            best: 0,
            interval_ms: config.speed.initial_interval_ms,
            phase: Phase::Idle,
            config,
        }
    }

    /// Re-rolls the food to a random free cell. Used once when the board is
    /// first shown so every session does not open with the same food.
    pub fn randomize_food(&mut self) {
        let occupied: HashSet<Cell> = self.snek.cells().copied().collect();
        if let Some(cell) = food::place(&occupied, &self.grid, &mut self.rng) {
            self.food = cell;
        }
    }

    /// Advances the game by one step. Does nothing unless running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        if let Some(dir) = self.input.consume(&self.snek, &self.grid) {
            self.direction = dir;
        }

        let stepped = self.grid.step(self.snek.head(), self.direction, self.config.wrap_edges);
        let new_head = match stepped {
            Some(cell) => cell,
            None => return self.crash(Collision::Wall),
        };

        // The tail still counts even though it would move away this tick.
        if self.snek.occupies(new_head) {
            return self.crash(Collision::SelfBite);
        }

        let ate = new_head == self.food;
        self.snek.slither(new_head, ate);
        if !ate {
            return TickOutcome::Moved;
        }

        self.score += 1;
        self.interval_ms = self.next_interval();
        debug!(
            "Food eaten at {:?}: score {}, interval {}ms",
            new_head, self.score, self.interval_ms
        );

        let occupied: HashSet<Cell> = self.snek.cells().copied().collect();
        match food::place(&occupied, &self.grid, &mut self.rng) {
            Some(cell) => {
                self.food = cell;
                TickOutcome::Ate {
                    score: self.score,
                    interval_ms: self.interval_ms,
                }
            }
            // `food` stays on the eaten cell, now the head; the renderer skips it.
            None => {
                warn!("Snake fills the board at length {}", self.snek.len());
                self.finish();
                TickOutcome::BoardFilled
            }
        }
    }

    fn next_interval(&self) -> u64 {
        let decayed = (self.interval_ms as f64 * self.config.speed.decay).floor() as u64;
        decayed.max(self.config.speed.min_interval_ms)
    }

    fn crash(&mut self, collision: Collision) -> TickOutcome {
        self.finish();
        TickOutcome::Crashed(collision)
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.best = self.best.max(self.score);
        info!("Game over: score {}, best {}", self.score, self.best);
    }

    /// Idle → Running. Ignored while running or after game over.
    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            info!("Game started");
            self.phase = Phase::Running;
        }
    }

    /// Running → Idle, keeping the board as it is.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            info!("Game stopped");
            self.phase = Phase::Idle;
        }
    }

    pub fn toggle_run(&mut self) {
        if self.running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Back to the initial board. `best` survives.
    pub fn reset(&mut self) {
        info!("Game reset");
        self.snek = Snek::new(self.config.initial_snake.iter().copied());
        self.direction = self.config.initial_direction;
        self.input.clear();
        self.food = self.config.initial_food;
        self.score = 0;
        self.interval_ms = self.config.speed.initial_interval_ms;
        self.phase = Phase::Idle;
    }

    /// Start, or start over after a game over.
    pub fn start_or_restart(&mut self) {
        match self.phase {
            Phase::Running => {}
            Phase::GameOver => {
                self.reset();
                self.start();
            }
            Phase::Idle => self.start(),
        }
    }

    pub fn request_direction(&mut self, dir: Direction) -> bool {
        self.input.submit(dir, &self.snek, &self.grid)
    }
}

impl<R> GameSession<R> {
    pub fn render_state(&self) -> RenderState {
        RenderState {
            snake_cells: self.snek.cells().copied().collect(),
            head: self.snek.head(),
            food: self.food,
            score: self.score,
            best: self.best,
            running: self.running(),
            game_over: self.game_over(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.input.pending()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn snake(&self) -> &Snek {
        &self.snek
    }
}
