use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::grid::{Cell, Grid};
use crate::session::RenderState;

/// Terminal columns per board cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;
const FOOD_SYMBOL: &str = "●";
const HELP_TEXT: &str =
    "Arrows/WASD move · Space/Enter start · P start/stop · R reset · Q quit";

/// The whole screen: score header, board, help line.
pub struct Screen<'a> {
    pub state: &'a RenderState,
    pub grid: Grid,
}

/// Just the cells of the board, drawn inside its border.
pub struct Board<'a> {
    pub state: &'a RenderState,
}

pub fn draw(frame: &mut Frame, state: &RenderState, grid: Grid) {
    frame.render_widget(&Screen { state, grid }, frame.area());
}

impl Widget for &Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header, body, help] = Layout::vertical([
            Constraint::Length(3), // Title + scores
            Constraint::Min(0),    // Board
            Constraint::Length(1), // Controls
        ])
        .areas(area);

        Paragraph::new(format!(
            "SNAKE    Best: {}    Score: {}",
            self.state.best, self.state.score
        ))
        .block(Block::default().borders(Borders::ALL))
        .render(header, buf);

        let side = u16::try_from(self.grid.size()).unwrap_or(u16::MAX);
        let width = side.saturating_mul(CELL_WIDTH).saturating_add(2);
        let [board] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(body);
        let [board] = Layout::vertical([Constraint::Length(side.saturating_add(2))])
            .flex(Flex::Center)
            .areas(board);

        let title = if self.state.running {
            "Playing"
        } else if self.state.game_over {
            "Game Over"
        } else {
            "Ready"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(board);
        block.render(board, buf);
        Board { state: self.state }.render(inner, buf);

        if !self.state.running {
            let message = if self.state.game_over {
                "Game Over (Space/Enter)"
            } else {
                "Ready? (Space/Enter)"
            };
            let [overlay] = Layout::vertical([Constraint::Length(2)])
                .flex(Flex::Center)
                .areas(inner);
            Clear.render(overlay, buf);
            Paragraph::new(vec![
                Line::from(message).bold(),
                Line::from("Controls: Arrow keys or WASD"),
            ])
            .centered()
            .render(overlay, buf);
        }

        Line::from(HELP_TEXT).centered().dark_gray().render(help, buf);
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = Style::default().bg(Color::Green);
        for &cell in &self.state.snake_cells {
            paint(area, buf, cell, "  ", body);
        }

        // Head last so it sits on top of the body.
        let head = Style::default().bg(Color::LightGreen);
        paint(area, buf, self.state.head, "  ", head);

        // After the last free cell is eaten the food is left under the snake.
        if !self.state.snake_cells.contains(&self.state.food) {
            let food = Style::default().fg(Color::LightRed);
            paint(area, buf, self.state.food, FOOD_SYMBOL, food);
        }
    }
}

/// Writes `symbol` into the terminal cells backing a board cell, skipping
/// anything that falls outside `area`.
fn paint(area: Rect, buf: &mut Buffer, cell: Cell, symbol: &str, style: Style) {
    let (Ok(col), Ok(row)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
        return;
    };
    let y = area.y.saturating_add(row);
    if y >= area.bottom() {
        return;
    }
    let left = area.x.saturating_add(col.saturating_mul(CELL_WIDTH));
    for (i, ch) in symbol.chars().enumerate() {
        let x = left.saturating_add(i as u16);
        if x >= area.right() {
            return;
        }
        if let Some(c) = buf.cell_mut((x, y)) {
            c.set_char(ch).set_style(style);
        }
    }
}
