// Battle tab rendering.
// Two player panels on the input view; winner and loser cards on the results view.

use std::time::Duration;

use ratatui::{prelude::*, widgets::*};

use crate::github::ProfileSource;
use crate::state::{BattleOutcome, BattleState, BattleView, LoadingState, Player, PlayerSlot};
use crate::theme::Palette;

use super::list::{self, format_count};

const LOADING_SPEED: Duration = Duration::from_millis(300);

/// Draw the Battle tab.
pub fn draw_battle_tab<S: ProfileSource>(
    frame: &mut Frame,
    battle: &BattleState<S>,
    palette: &Palette,
    elapsed: Duration,
    area: Rect,
) {
    match battle.view {
        BattleView::Input => draw_input_view(frame, battle, palette, area),
        BattleView::Results => draw_results_view(frame, &battle.result, palette, elapsed, area),
    }
}

fn draw_input_view<S: ProfileSource>(
    frame: &mut Frame,
    battle: &BattleState<S>,
    palette: &Palette,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Instructions
            Constraint::Length(4), // Player One
            Constraint::Length(4), // Player Two
            Constraint::Min(1),    // Prompt
        ])
        .split(area);

    let instructions = Paragraph::new(vec![
        Line::from("1. Enter two GitHub users"),
        Line::from("2. Battle"),
        Line::from("3. See the winner"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(palette.muted));
    frame.render_widget(instructions, chunks[0]);

    draw_player_panel(frame, battle, PlayerSlot::One, palette, chunks[1]);
    draw_player_panel(frame, battle, PlayerSlot::Two, palette, chunks[2]);

    if battle.ready() {
        let prompt = Paragraph::new(Line::from(vec![
            Span::styled("Press Enter to ", Style::default().fg(palette.muted)),
            Span::styled(
                "Battle",
                Style::default()
                    .fg(palette.selected)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(prompt, chunks[3]);
    }
}

fn draw_player_panel<S: ProfileSource>(
    frame: &mut Frame,
    battle: &BattleState<S>,
    slot: PlayerSlot,
    palette: &Palette,
    area: Rect,
) {
    let focused = battle.focus == slot;
    let border = if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", slot.label()));

    let input = battle.player(slot);
    let line = match &input.username {
        Some(username) => Line::from(vec![
            Span::styled(
                format!("@{}", username),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   x to reset", Style::default().fg(palette.muted)),
        ]),
        None if focused && battle.editing => Line::from(vec![
            Span::raw(input.buffer.as_str()),
            Span::styled("█", Style::default().fg(palette.selected)),
        ]),
        None if input.buffer.is_empty() => Line::from(Span::styled(
            "github username (Enter to edit)",
            Style::default().fg(palette.muted),
        )),
        None => Line::from(Span::raw(input.buffer.as_str())),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_results_view(
    frame: &mut Frame,
    result: &LoadingState<BattleOutcome>,
    palette: &Palette,
    elapsed: Duration,
    area: Rect,
) {
    match result {
        LoadingState::Idle => list::render_empty(frame, area, palette, "No battle yet"),
        LoadingState::Loading => {
            let text = list::loading_frame("Battling", elapsed, LOADING_SPEED);
            list::render_loading(frame, area, palette, &text);
        }
        LoadingState::Error(e) => {
            let message = format!("{}  (Esc to reset)", e);
            list::render_error(frame, area, palette, &message);
        }
        LoadingState::Loaded(outcome) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);

            let (first, second) = if outcome.is_tie() {
                ("Tie", "Tie")
            } else {
                ("Winner", "Loser")
            };
            draw_player_card(frame, first, outcome.winner(), palette, chunks[0]);
            draw_player_card(frame, second, outcome.loser(), palette, chunks[1]);
        }
    }
}

/// Render one profile card with its score.
fn draw_player_card(
    frame: &mut Frame,
    header: &str,
    player: &Player,
    palette: &Palette,
    area: Rect,
) {
    let profile = &player.profile;
    let label = Style::default().fg(palette.muted);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Score: {}", format_count(player.score)),
            Style::default()
                .fg(palette.selected)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            profile.name.clone().unwrap_or_else(|| profile.login.clone()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("@{}", profile.login),
            Style::default().fg(palette.accent),
        )),
        Line::from(Span::styled(profile.html_url.as_str(), label)),
        Line::from(""),
    ];

    if let Some(location) = &profile.location {
        lines.push(Line::from(vec![
            Span::styled("Location   ", label),
            Span::raw(location.as_str()),
        ]));
    }
    if let Some(company) = &profile.company {
        lines.push(Line::from(vec![
            Span::styled("Company    ", label),
            Span::raw(company.as_str()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Followers  ", label),
        Span::raw(format_count(profile.followers)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Following  ", label),
        Span::raw(format_count(profile.following)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Repos      ", label),
        Span::raw(format_count(profile.public_repos)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", header))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
