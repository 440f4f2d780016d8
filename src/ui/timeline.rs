use crate::calc::date_key::{day_key, month_name};
use crate::data::{Event, EventData};
use crate::ui::event_form::centered_fixed;
use crate::ui::hit::{HitMap, Target};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EDIT: &str = "[Edit]";
const DELETE: &str = "[Delete]";
/// Heading, description, buttons, gap.
const CARD_HEIGHT: u16 = 4;

/// Full list of one day's events in time order. Sorting happens on a copy,
/// so opening the timeline never rewrites storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub year: i32,
    pub month0: u32,
    pub day: u32,
    pub key: String,
    /// Highlighted card, for keyboard edit/delete.
    pub cursor: usize,
}

impl Timeline {
    pub fn show(year: i32, month0: u32, day: u32) -> Self {
        Timeline {
            year,
            month0,
            day,
            key: day_key(year, month0, day),
            cursor: 0,
        }
    }

    pub fn entries(&self, data: &EventData) -> Vec<Event> {
        data.sorted_day(&self.key)
    }

    pub fn selected(&self, data: &EventData) -> Option<Event> {
        self.entries(data).into_iter().nth(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, data: &EventData) {
        let len = self.entries(data).len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Keeps the cursor on a real card after a delete.
    pub fn clamp_cursor(&mut self, data: &EventData) {
        let len = self.entries(data).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn title(&self) -> String {
        format!(
            " Timeline: {} {}, {} ",
            month_name(self.month0),
            self.day,
            self.year
        )
    }

    pub fn draw(&self, f: &mut Frame, data: &EventData, hits: &mut HitMap) {
        let screen = f.area();
        let area = centered_fixed(60, screen.height.saturating_sub(4).max(8), screen);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::LightBlue));
        let inner = block.inner(area);

        hits.push(screen, Target::Backdrop);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        hits.push(area, Target::TimelineBody);

        let close = Rect::new(area.right().saturating_sub(5), area.y, 3, 1).intersection(area);
        f.render_widget(
            Paragraph::new(Span::styled("[x]", Style::default().fg(Color::Red))),
            close,
        );
        hits.push(close, Target::TimelineClose);

        if inner.height < 2 {
            return;
        }
        let list_bottom = inner.bottom() - 1;
        let entries = self.entries(data);
        if entries.is_empty() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "No events for this day.",
                    Style::default().fg(Color::DarkGray),
                )),
                Rect::new(inner.x, inner.y, inner.width, 1),
            );
        }

        // keep the highlighted card in view
        let visible = ((list_bottom - inner.y) / CARD_HEIGHT).max(1) as usize;
        let first = self.cursor.saturating_sub(visible - 1);

        let mut y = inner.y;
        for (idx, ev) in entries.iter().enumerate().skip(first) {
            if y + CARD_HEIGHT - 1 > list_bottom {
                break;
            }
            let highlighted = idx == self.cursor;
            let heading_style = if highlighted {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let card = vec![
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::LightBlue)),
                    Span::styled(ev.heading(), heading_style),
                ]),
                Line::from(Span::styled(
                    format!("  {}", ev.desc),
                    Style::default().fg(Color::Gray),
                )),
            ];
            f.render_widget(Paragraph::new(card), Rect::new(inner.x, y, inner.width, 2));

            let buttons_y = y + 2;
            let edit = Rect::new(inner.x + 2, buttons_y, EDIT.len() as u16, 1).intersection(inner);
            let delete = Rect::new(edit.right() + 1, buttons_y, DELETE.len() as u16, 1)
                .intersection(inner);
            f.render_widget(
                Paragraph::new(Span::styled(
                    EDIT,
                    Style::default().fg(Color::Black).bg(Color::Blue),
                )),
                edit,
            );
            f.render_widget(
                Paragraph::new(Span::styled(
                    DELETE,
                    Style::default().fg(Color::Black).bg(Color::Red),
                )),
                delete,
            );
            hits.push(edit, Target::TimelineEdit(ev.id.clone()));
            hits.push(delete, Target::TimelineDelete(ev.id.clone()));

            y += CARD_HEIGHT;
        }

        f.render_widget(
            Paragraph::new(Span::styled(
                "↑↓=select  e=edit  d=delete  Esc=close",
                Style::default().fg(Color::DarkGray),
            )),
            Rect::new(inner.x, list_bottom, inner.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn day_with(events: Vec<Event>) -> EventData {
        let mut data = EventData::default();
        for e in events {
            data.push("2025-2-10", e);
        }
        data
    }

    #[test]
    fn test_entries_timed_first() {
        let data = day_with(vec![
            Event::new("whenever", "", ""),
            Event::new("Standup", "09:00", ""),
        ]);
        let t = Timeline::show(2025, 2, 10);
        let titles: Vec<_> = t.entries(&data).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["Standup", "whenever"]);
        // viewing leaves storage alone
        assert_eq!(data.days["2025-2-10"][0].title, "whenever");
    }

    #[test]
    fn test_cursor_moves_within_bounds() {
        let data = day_with(vec![Event::new("a", "08:00", ""), Event::new("b", "09:00", "")]);
        let mut t = Timeline::show(2025, 2, 10);
        t.move_up();
        assert_eq!(t.cursor, 0);
        t.move_down(&data);
        t.move_down(&data);
        assert_eq!(t.cursor, 1);
        assert_eq!(t.selected(&data).unwrap().title, "b");
    }

    #[test]
    fn test_clamp_cursor_after_shrink() {
        let mut t = Timeline::show(2025, 2, 10);
        t.cursor = 3;
        t.clamp_cursor(&day_with(vec![Event::new("a", "", "")]));
        assert_eq!(t.cursor, 0);
        t.cursor = 2;
        t.clamp_cursor(&EventData::default());
        assert_eq!(t.cursor, 0);
    }

    #[test]
    fn test_title() {
        assert_eq!(Timeline::show(2025, 2, 10).title(), " Timeline: March 10, 2025 ");
    }

    #[test]
    fn test_draw_tags_buttons_with_ids_in_display_order() {
        let untimed = Event::new("whenever", "", "");
        let timed = Event::new("Standup", "09:00", "");
        let data = day_with(vec![untimed.clone(), timed.clone()]);
        let t = Timeline::show(2025, 2, 10);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut hits = HitMap::default();
        terminal.draw(|f| t.draw(f, &data, &mut hits)).unwrap();

        let first_edit = hits.area_of(&Target::TimelineEdit(timed.id.clone())).unwrap();
        let second_edit = hits.area_of(&Target::TimelineEdit(untimed.id.clone())).unwrap();
        assert!(first_edit.y < second_edit.y);
        assert!(hits.area_of(&Target::TimelineDelete(untimed.id)).is_some());
        assert!(hits.area_of(&Target::TimelineClose).is_some());
        assert_eq!(hits.target_at(0, 0), Some(&Target::Backdrop));
    }
}
