// Shared list rendering and formatting helpers.
// Loading, error, and empty states plus the ranked repository list.

use std::time::Duration;

use ratatui::{prelude::*, widgets::*};

use crate::github::Repository;
use crate::theme::Palette;

/// Format a count with thousands separators (e.g. "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Loading text with an ellipsis that grows by one dot every `speed`, then resets.
pub fn loading_frame(text: &str, elapsed: Duration, speed: Duration) -> String {
    let step = elapsed.as_millis() / speed.as_millis().max(1);
    let dots = (step % 4) as usize;
    format!("{}{}", text, ".".repeat(dots))
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, palette: &Palette, message: &str) {
    let text = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.accent));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, palette: &Palette, error: &str) {
    let text = Paragraph::new(error.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.error))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, palette: &Palette, message: &str) {
    let text = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.muted));
    frame.render_widget(text, area);
}

/// Build the lines for one ranked repository card.
fn repo_item<'a>(rank: usize, repo: &'a Repository, palette: &Palette) -> ListItem<'a> {
    let muted = Style::default().fg(palette.muted);

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("#{:<3} ", rank),
                Style::default()
                    .fg(palette.selected)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&repo.name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  @{}", repo.owner.login), Style::default().fg(palette.accent)),
        ]),
        Line::from(vec![
            Span::raw("     "),
            Span::raw(format!("{} Stars", format_count(repo.stargazers_count))),
            Span::styled("  │  ", muted),
            Span::raw(format!("{} Forks", format_count(repo.forks))),
            Span::styled("  │  ", muted),
            Span::raw(format!("{} Open", format_count(repo.open_issues))),
        ]),
        Line::from(vec![Span::raw("     "), Span::styled(&repo.html_url, muted)]),
    ])
}

/// Render the ranked repository list.
pub fn render_repositories_list(
    frame: &mut Frame,
    repos: &[Repository],
    list_state: &mut ListState,
    palette: &Palette,
    title: &str,
    area: Rect,
) {
    if repos.is_empty() {
        render_empty(frame, area, palette, "No repositories found");
        return;
    }

    let items: Vec<ListItem> = repos
        .iter()
        .enumerate()
        .map(|(i, repo)| repo_item(i + 1, repo, palette))
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, list_state);
}
