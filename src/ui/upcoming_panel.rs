use crate::calc::upcoming::UpcomingEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Narrowest panel worth drawing.
pub const MIN_PANEL_WIDTH: u16 = 28;

pub(crate) fn panel_lines(greeting: &str, upcoming: &[UpcomingEvent]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            greeting.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled(
            "No upcoming events",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }
    for u in upcoming {
        lines.push(Line::from(vec![
            Span::styled(u.event.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(u.time_label(), Style::default().fg(Color::LightBlue)),
        ]));
        lines.push(Line::from(Span::styled(
            u.date_label(),
            Style::default().fg(Color::Gray),
        )));
        if !u.event.desc.is_empty() {
            lines.push(Line::from(Span::styled(
                u.event.desc.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

pub fn draw_upcoming(f: &mut Frame, area: Rect, greeting: &str, upcoming: &[UpcomingEvent]) {
    if area.width < MIN_PANEL_WIDTH {
        return;
    }
    let p = Paragraph::new(panel_lines(greeting, upcoming))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Upcoming "));
    f.render_widget(p, area);
}
