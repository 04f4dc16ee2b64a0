//! UI rendering for the arcade viewer.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    style::{Color, Style, Modifier},
};
use crate::arcade::Tile;
use crate::vm::VmState;
use super::app::ViewerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &ViewerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Percentage(30),
        ])
        .split(frame.area());

    // Left side: game screen and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_screen(frame, left_chunks[0], app);
    draw_status(frame, left_chunks[1], app);

    // Right side: VM state and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(5),
        ])
        .split(chunks[1]);

    draw_vm(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);
}

/// Draw the game screen with colored tiles.
fn draw_screen(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let screen = app.arcade.screen();

    let lines: Vec<Line> = screen
        .rows()
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|tile| Span::styled(tile.glyph().to_string(), tile_style(tile)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let title = format!(
        " Score {}  Blocks {} ",
        screen.score(),
        screen.block_count()
    );
    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(paragraph, area);
}

/// Draw VM registers and I/O.
fn draw_vm(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let vm = app.arcade.vm();
    let state_style = match vm.state() {
        VmState::Running => Style::default().fg(Color::Green),
        VmState::Halted => Style::default().fg(Color::Yellow),
        VmState::Faulted => Style::default().fg(Color::Red),
    };
    let input = vm.input().map_or_else(|| "-".to_string(), |v| v.to_string());

    let content = vec![
        Line::from(vec![
            Span::raw("PC:     "),
            Span::styled(format!("{}", vm.pc()), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("RB:     "),
            Span::styled(format!("{}", vm.relative_base()), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw("Input:  "),
            Span::styled(input, Style::default().fg(Color::White)),
            Span::raw(format!("  ({:?})", app.arcade.joystick())),
        ]),
        Line::from(vec![
            Span::raw("Output: "),
            Span::styled(format!("{}", vm.outputs().len()), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("Steps:  "),
            Span::styled(format!("{}", vm.steps()), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("Events: "),
            Span::styled(format!("{}", app.events), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("State:  "),
            Span::styled(format!("{:?}", vm.state()), state_style),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" VM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &ViewerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("space: Run/Pause  s: Step"),
        Line::from("x: Reset  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Get color style for a tile.
fn tile_style(tile: Tile) -> Style {
    match tile {
        Tile::Empty => Style::default(),
        Tile::Wall => Style::default().fg(Color::Gray),
        Tile::Block => Style::default().fg(Color::Magenta),
        Tile::Paddle => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Tile::Ball => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    }
}
