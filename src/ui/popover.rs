use crate::calc::date_key::day_key;
use crate::data::EventData;
use crate::ui::hit::{HitMap, Target};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

pub const POPOVER_WIDTH: u16 = 30;
const VIEW_TIMELINE: &str = "[ View Timeline ]";

/// Small overlay listing one day's events, anchored under the clicked cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Popover {
    pub year: i32,
    pub month0: u32,
    pub day: u32,
    pub key: String,
    pub anchor: Rect,
}

impl Popover {
    pub fn show(anchor: Rect, year: i32, month0: u32, day: u32) -> Self {
        Popover {
            year,
            month0,
            day,
            key: day_key(year, month0, day),
            anchor,
        }
    }

    fn lines(&self, data: &EventData) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("Events for {}/{}/{}", self.month0 + 1, self.day, self.year),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let events = data.get_day(&self.key);
        if events.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No events",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for ev in &events {
            lines.push(Line::from(Span::styled(
                format!("• {}", ev.title),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if !ev.desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", ev.desc),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            VIEW_TIMELINE,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )));
        lines
    }

    pub fn draw(&self, f: &mut Frame, data: &EventData, hits: &mut HitMap) {
        let lines = self.lines(data);
        let area = popover_rect(self.anchor, f.area(), lines.len() as u16 + 2);
        let inner = Block::default().borders(Borders::ALL).inner(area);

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
            area,
        );

        hits.push(area, Target::PopoverBody);
        if inner.height > 0 {
            let button = Rect::new(
                inner.x,
                inner.bottom() - 1,
                (VIEW_TIMELINE.len() as u16).min(inner.width),
                1,
            );
            hits.push(button, Target::ViewTimeline);
        }
    }
}

/// Places a popover of `height` rows just below `anchor`, centred on it, and
/// keeps it on screen.
pub fn popover_rect(anchor: Rect, screen: Rect, height: u16) -> Rect {
    let width = POPOVER_WIDTH.min(screen.width);
    let height = height.min(screen.height);
    let centre = anchor.x + anchor.width / 2;
    let max_x = screen.right().saturating_sub(width);
    let x = centre.saturating_sub(width / 2).clamp(screen.x, max_x.max(screen.x));
    let max_y = screen.bottom().saturating_sub(height);
    let y = anchor.bottom().min(max_y).max(screen.y);
    Rect::new(x, y, width, height)
}
