// UI module for rendering the TUI.
// Contains the tab bar, the Popular and Battle views, and the status bar.

mod battle;
mod list;
mod popular;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::github::{ProfileSource, RepoSource};
use crate::state::BattleView;
use crate::theme::Palette;

/// Main draw function that renders the entire UI.
pub fn draw<C: RepoSource + ProfileSource>(frame: &mut Frame, app: &mut App<C>) {
    let palette = app.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app.active_tab, &app.theme, chunks[0]);

    let elapsed = app.elapsed();
    match app.active_tab {
        Tab::Popular => {
            popular::draw_popular_tab(frame, &mut app.popular, &palette, elapsed, chunks[1])
        }
        Tab::Battle => battle::draw_battle_tab(frame, &app.battle, &palette, elapsed, chunks[1]),
    }

    draw_status_bar(frame, app, &palette, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame, &palette);
    }
}

/// Key hints for the current view.
fn hints<C: RepoSource + ProfileSource>(app: &App<C>) -> Vec<(&'static str, &'static str)> {
    match app.active_tab {
        Tab::Popular => vec![
            ("←→", "Language"),
            ("1-6", "Pick"),
            ("↑↓", "Scroll"),
            ("r", "Retry"),
        ],
        Tab::Battle if app.battle.editing => vec![("↵", "Submit"), ("Esc", "Cancel")],
        Tab::Battle => match app.battle.view {
            BattleView::Input => vec![("↵", "Edit/Battle"), ("↑↓", "Player"), ("x", "Reset")],
            BattleView::Results => vec![("Esc", "Reset")],
        },
    }
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar<C: RepoSource + ProfileSource>(
    frame: &mut Frame,
    app: &App<C>,
    palette: &Palette,
    area: Rect,
) {
    let muted = Style::default().fg(palette.muted);
    let mut spans: Vec<Span> = Vec::new();

    let mut all_hints = hints(app);
    if !app.battle.editing {
        all_hints.extend([("Tab", "Switch"), ("t", "Theme"), ("?", "Help"), ("q", "Quit")]);
    }
    for (key, action) in all_hints {
        spans.push(Span::raw(format!(" {} ", key)));
        spans.push(Span::styled(format!("{} ", action), muted));
    }

    // Add rate limit info on the right if available
    if let Some(rate) = app.client.quota() {
        let rate_color = if rate.remaining < 10 {
            palette.error
        } else {
            palette.muted
        };
        spans.push(Span::styled(
            format!("  API: {}/{}", rate.remaining, rate.limit),
            Style::default().fg(rate_color),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 52.min(area.width);
    let popup_height = 19.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = Style::default().fg(palette.accent);
    let row = |k: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("  {:<14}", k), key), Span::raw(desc)])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("Tab/Shift+Tab", "Switch tabs"),
        row("t", "Toggle light/dark theme"),
        row("q / Ctrl+c", "Quit"),
        Line::from(""),
        Line::from(Span::styled("Popular", Style::default().add_modifier(Modifier::BOLD))),
        row("←/→ or h/l", "Previous/next language"),
        row("1-6", "Select language"),
        row("↑/↓ or k/j", "Scroll repositories"),
        row("r", "Retry failed fetch"),
        Line::from(""),
        Line::from(Span::styled("Battle", Style::default().add_modifier(Modifier::BOLD))),
        row("Enter / i", "Edit player, or start battle"),
        row("↑/↓", "Switch player"),
        row("x", "Reset focused player"),
        row("Esc", "Cancel edit / new battle"),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .title(" Help (Esc to close) ")
            .style(Style::default().fg(palette.fg).bg(palette.bg)),
    );

    frame.render_widget(help, popup_area);
}
