// Popular tab rendering.
// Language nav row, then loading, error, or the ranked list for the active language.

use std::time::Duration;

use ratatui::{prelude::*, widgets::*};

use crate::github::RepoSource;
use crate::state::{Language, PopularState};
use crate::theme::Palette;

use super::list;

const LOADING_SPEED: Duration = Duration::from_millis(300);

/// Draw the language selector.
fn draw_language_nav(frame: &mut Frame, selected: Language, palette: &Palette, area: Rect) {
    let mut spans = Vec::with_capacity(Language::ALL.len() * 2);
    for (i, language) in Language::ALL.iter().enumerate() {
        let style = if *language == selected {
            Style::default()
                .fg(palette.selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.fg)
        };
        spans.push(Span::styled(format!(" {} ", i + 1), Style::default().fg(palette.muted)));
        spans.push(Span::styled(language.title(), style));
        spans.push(Span::raw("  "));
    }

    let nav = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.muted)),
        );
    frame.render_widget(nav, area);
}

/// Draw the Popular tab.
pub fn draw_popular_tab<S: RepoSource>(
    frame: &mut Frame,
    popular: &mut PopularState<S>,
    palette: &Palette,
    elapsed: Duration,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let active = popular.active();
    draw_language_nav(frame, active, palette, chunks[0]);

    if popular.is_loading() {
        let text = list::loading_frame("Fetching Repos", elapsed, LOADING_SPEED);
        list::render_loading(frame, chunks[1], palette, &text);
        return;
    }

    if let Some(error) = popular.error() {
        let message = format!("{}  (press r to retry)", error);
        list::render_error(frame, chunks[1], palette, &message);
        return;
    }

    let title = match popular.selected_repo() {
        Some(repo) => format!(" {} · {}/{} ", active.title(), repo.owner.login, repo.name),
        None => format!(" {} ", active.title()),
    };
    // Results borrow the state immutably, so render against a copy of the selection.
    let mut list_state = popular.list_state.clone();
    if let Some(repos) = popular.current_result() {
        list::render_repositories_list(frame, repos, &mut list_state, palette, &title, chunks[1]);
    }
    popular.list_state = list_state;
}
