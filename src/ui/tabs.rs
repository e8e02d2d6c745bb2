// Tab bar rendering.
// Highlights the active tab and shows the current theme on the right.

use ratatui::{prelude::*, widgets::*};

use crate::app::Tab;
use crate::theme::ThemeContext;

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, active: Tab, theme: &ThemeContext, area: Rect) {
    let palette = theme.palette();
    let tabs = [Tab::Popular, Tab::Battle];

    let tab_titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let style = if *tab == active {
                Style::default()
                    .fg(palette.selected)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };
            Line::from(Span::styled(tab.title(), style))
        })
        .collect();

    let selected_index = tabs.iter().position(|t| *t == active).unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.muted))
                .title(" GitHub Battle ")
                .title_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .title(
                    Line::from(format!(" {} ", theme.theme().label()))
                        .right_aligned()
                        .style(Style::default().fg(palette.muted)),
                ),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(palette.selected))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
