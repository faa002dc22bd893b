//! Tick-driven grid snake.
//!
//! The engine (`grid`, `snake`, `input`, `food`, `session`, `scheduler`) has
//! no terminal dependency; `controls` and `ui` adapt it to crossterm and
//! ratatui.

pub mod config;
pub mod controls;
pub mod food;
pub mod grid;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod snake;
pub mod ui;

pub use config::GameConfig;
pub use grid::{Cell, Direction, Grid, GRID_SIZE};
pub use session::{Collision, GameSession, Phase, RenderState, TickOutcome};
