//! Game configuration.
//!
//! Defaults reproduce the classic board: 20×20, wrapping edges, 200ms
//! start interval shrinking by 2% per food down to 60ms. An optional
//! `snake.toml` next to the executable (or in the CWD) overrides any key.

use std::collections::HashSet;
use std::path::PathBuf;

use log::{info, warn};
use serde::Deserialize;

use crate::grid::{Cell, Direction, Grid};
use crate::input::reverses_into_neck;
use crate::snake::Snek;

pub const CONFIG_FILE: &str = "snake.toml";

/// Largest board the terminal renderer can lay out.
pub const MAX_GRID_SIZE: i32 = 255;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid_size: i32,
    pub wrap_edges: bool,
    pub initial_snake: Vec<Cell>,
    pub initial_direction: Direction,
    pub initial_food: Cell,
    pub speed: SpeedConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub initial_interval_ms: u64,
    pub min_interval_ms: u64,
    /// Multiplier applied to the interval each time food is eaten.
    pub decay: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from(TomlConfig::default())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speed: TomlSpeed,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlBoard {
    #[serde(default = "default_size")]
    size: i32,
    #[serde(default = "default_wrap_edges")]
    wrap_edges: bool,
    #[serde(default = "default_initial_snake")]
    initial_snake: Vec<[i32; 2]>,
    #[serde(default = "default_initial_direction")]
    initial_direction: Direction,
    #[serde(default = "default_initial_food")]
    initial_food: [i32; 2],
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlSpeed {
    #[serde(default = "default_initial_interval")]
    initial_interval_ms: u64,
    #[serde(default = "default_min_interval")]
    min_interval_ms: u64,
    #[serde(default = "default_decay")]
    decay: f64,
}

// ── Defaults ──

fn default_size() -> i32 {
    20
}

fn default_wrap_edges() -> bool {
    true
}

fn default_initial_snake() -> Vec<[i32; 2]> {
    vec![[8, 10], [7, 10], [6, 10]]
}

fn default_initial_direction() -> Direction {
    Direction::Right
}

fn default_initial_food() -> [i32; 2] {
    [12, 12]
}

fn default_initial_interval() -> u64 {
    200
}

fn default_min_interval() -> u64 {
    60
}

fn default_decay() -> f64 {
    0.98
}

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            size: default_size(),
            wrap_edges: default_wrap_edges(),
            initial_snake: default_initial_snake(),
            initial_direction: default_initial_direction(),
            initial_food: default_initial_food(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            initial_interval_ms: default_initial_interval(),
            min_interval_ms: default_min_interval(),
            decay: default_decay(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(cfg: TomlConfig) -> Self {
        let [fx, fy] = cfg.board.initial_food;
        GameConfig {
            grid_size: cfg.board.size,
            wrap_edges: cfg.board.wrap_edges,
            initial_snake: cfg
                .board
                .initial_snake
                .into_iter()
                .map(|[x, y]| Cell::new(x, y))
                .collect(),
            initial_direction: cfg.board.initial_direction,
            initial_food: Cell::new(fx, fy),
            speed: SpeedConfig {
                initial_interval_ms: cfg.speed.initial_interval_ms,
                min_interval_ms: cfg.speed.min_interval_ms,
                decay: cfg.speed.decay,
            },
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load `snake.toml` from the executable directory or the CWD.
    /// A missing file means defaults; a broken one is logged and ignored.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match Self::from_toml_str(&text) {
                    Ok(cfg) => {
                        info!("Loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        warn!("{} parse error, using defaults: {}", path.display(), e);
                        return Self::default();
                    }
                },
                Err(e) => warn!("Could not read {}: {}", path.display(), e),
            }
        }
        info!("No {} found, using defaults", CONFIG_FILE);
        Self::default()
    }

    /// Parses a TOML document. Missing keys take their defaults; values that
    /// parse but make no sense are replaced by defaults with a warning.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(GameConfig::from(cfg).validated())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    /// Replaces out-of-range values with defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(4..=MAX_GRID_SIZE).contains(&self.grid_size) {
            warn!(
                "grid size {} outside 4..={}, using {}",
                self.grid_size, MAX_GRID_SIZE, defaults.grid_size
            );
            self.grid_size = defaults.grid_size;
        }

        if self.speed.min_interval_ms == 0 {
            warn!(
                "min interval must be positive, using {}ms",
                defaults.speed.min_interval_ms
            );
            self.speed.min_interval_ms = defaults.speed.min_interval_ms;
        }
        if self.speed.initial_interval_ms < self.speed.min_interval_ms {
            warn!(
                "initial interval {}ms below minimum {}ms, clamping",
                self.speed.initial_interval_ms, self.speed.min_interval_ms
            );
            self.speed.initial_interval_ms = self.speed.min_interval_ms;
        }
        if !(self.speed.decay > 0.0 && self.speed.decay <= 1.0) {
            warn!(
                "decay {} outside (0, 1], using {}",
                self.speed.decay, defaults.speed.decay
            );
            self.speed.decay = defaults.speed.decay;
        }

        let grid = self.grid();
        let snake_check = |cfg: &GameConfig| {
            check_snake(&cfg.initial_snake, cfg.initial_direction, &grid, cfg.wrap_edges)
        };
        if let Err(reason) = snake_check(&self) {
            warn!("initial snake rejected ({}), using default", reason);
            self.initial_snake = defaults.initial_snake.clone();
            self.initial_direction = defaults.initial_direction;
            if let Err(reason) = snake_check(&self) {
                warn!(
                    "default snake does not fit this board ({}), using default config",
                    reason
                );
                return defaults;
            }
        }

        if !grid.contains(self.initial_food) || self.initial_snake.contains(&self.initial_food) {
            let fallback = grid
                .cells()
                .find(|cell| !self.initial_snake.contains(cell));
            match fallback {
                Some(cell) => {
                    warn!("initial food {:?} unusable, using {:?}", self.initial_food, cell);
                    self.initial_food = cell;
                }
                None => {
                    warn!("no room for food, using default config");
                    return defaults;
                }
            }
        }

        self
    }
}

fn check_snake(
    cells: &[Cell],
    dir: Direction,
    grid: &Grid,
    wrap_edges: bool,
) -> Result<(), &'static str> {
    if cells.is_empty() {
        return Err("empty");
    }
    if cells.iter().any(|&c| !grid.contains(c)) {
        return Err("outside the board");
    }
    if cells.iter().collect::<HashSet<_>>().len() != cells.len() {
        return Err("overlapping segments");
    }
    if cells.windows(2).any(|pair| !grid.adjacent(pair[0], pair[1], wrap_edges)) {
        return Err("segments not adjacent");
    }
    if reverses_into_neck(dir, &Snek::new(cells.iter().copied()), grid) {
        return Err("facing its own neck");
    }
    Ok(())
}

/// Executable directory first, then the CWD.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}
