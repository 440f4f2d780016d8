use crate::calc::date_key::{day_key, days_in_month, first_weekday, month_label};
use crate::data::EventData;
use crate::ui::hit::{HitMap, Target};
use chrono::{Datelike, NaiveDate};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::collections::BTreeMap;

pub const CELL_WIDTH: u16 = 5;
pub const CELL_HEIGHT: u16 = 2;
/// Seven cells plus the block borders.
pub const GRID_WIDTH: u16 = CELL_WIDTH * 7 + 2;
/// Nav line, weekday header, six weeks, borders.
pub const GRID_HEIGHT: u16 = 2 + CELL_HEIGHT * 6 + 2;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub day: u32,
    pub key: String,
    pub is_today: bool,
    pub has_events: bool,
}

/// One month laid out Sunday-first. Rebuilt from scratch whenever the month
/// changes or the store is mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month0: u32,
    /// Invisible filler cells before the 1st.
    pub leading_blanks: u32,
    pub cells: Vec<DayCell>,
    pub label: String,
}

impl MonthGrid {
    pub fn build(year: i32, month0: u32, today: NaiveDate, data: &EventData) -> Self {
        let cells = (1..=days_in_month(year, month0))
            .map(|day| {
                let key = day_key(year, month0, day);
                DayCell {
                    day,
                    is_today: today.year() == year
                        && today.month0() == month0
                        && today.day() == day,
                    has_events: data.has_events(&key),
                    key,
                }
            })
            .collect();
        MonthGrid {
            year,
            month0,
            leading_blanks: first_weekday(year, month0),
            cells,
            label: month_label(year, month0),
        }
    }

    pub fn days(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn cell(&self, day: u32) -> Option<&DayCell> {
        day.checked_sub(1).and_then(|i| self.cells.get(i as usize))
    }

    /// (week row, weekday column) of a day.
    pub fn position(&self, day: u32) -> (u16, u16) {
        let slot = self.leading_blanks + day - 1;
        ((slot / 7) as u16, (slot % 7) as u16)
    }
}

/// Cell look: selection wins, then today, then the has-events mark.
pub(crate) fn day_style(
    is_selected: bool,
    is_cursor: bool,
    is_today: bool,
    has_events: bool,
) -> Style {
    let mut style = if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if has_events {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    if is_cursor && !is_selected {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Draws the grid and registers every day cell and the month arrows as
/// click targets. Returns the screen area of each visible day.
pub fn draw_grid(
    f: &mut Frame,
    area: Rect,
    grid: &MonthGrid,
    selected: Option<u32>,
    cursor: u32,
    hits: &mut HitMap,
) -> BTreeMap<u32, Rect> {
    let block = Block::default().borders(Borders::ALL).title(" Calendar ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut day_areas = BTreeMap::new();
    if inner.height < 3 || inner.width < 7 {
        return day_areas;
    }

    // ── Navigation line: "<   March 2025   >" ──────────────────────────────
    let nav = Rect::new(inner.x, inner.y, inner.width, 1);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            grid.label.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )))
        .alignment(Alignment::Center),
        nav,
    );
    let prev = Rect::new(nav.x, nav.y, 3.min(nav.width), 1);
    let next = Rect::new(nav.right().saturating_sub(3), nav.y, 3.min(nav.width), 1);
    f.render_widget(Paragraph::new(" < "), prev);
    f.render_widget(Paragraph::new(" > "), next);
    hits.push(prev, Target::PrevMonth);
    hits.push(next, Target::NextMonth);

    // ── Weekday header ─────────────────────────────────────────────────────
    let header: String = WEEKDAYS
        .iter()
        .map(|d| format!("{:>3}{}", d, " ".repeat(CELL_WIDTH as usize - 3)))
        .collect();
    f.render_widget(
        Paragraph::new(header).style(Style::default().add_modifier(Modifier::DIM)),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    // ── Day cells ──────────────────────────────────────────────────────────
    let weeks_top = inner.y + 2;
    for cell in &grid.cells {
        let (row, col) = grid.position(cell.day);
        let rect = Rect::new(
            inner.x + col * CELL_WIDTH,
            weeks_top + row * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        )
        .intersection(inner);
        if rect.is_empty() {
            continue;
        }
        let style = day_style(
            selected == Some(cell.day),
            cursor == cell.day,
            cell.is_today,
            cell.has_events,
        );
        let marker = if cell.has_events { "  •" } else { "" };
        let lines = vec![
            Line::from(Span::styled(format!("{:>3}", cell.day), style)),
            Line::from(Span::styled(marker, Style::default().fg(Color::Cyan))),
        ];
        f.render_widget(Paragraph::new(lines), rect);
        hits.push(rect, Target::Day(cell.day));
        day_areas.insert(cell.day, rect);
    }

    day_areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Event;
    use ratatui::{Terminal, backend::TestBackend};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_build_march_2025() {
        let grid = MonthGrid::build(2025, 2, d(2025, 3, 10), &EventData::default());
        assert_eq!(grid.label, "March 2025");
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.days(), 31);
        assert_eq!(grid.cells[0].key, "2025-2-1");
    }

    #[test]
    fn test_build_marks_today_only_in_its_month() {
        let today = d(2025, 3, 10);
        let grid = MonthGrid::build(2025, 2, today, &EventData::default());
        let marked: Vec<_> = grid.cells.iter().filter(|c| c.is_today).map(|c| c.day).collect();
        assert_eq!(marked, [10]);

        let other = MonthGrid::build(2025, 3, today, &EventData::default());
        assert!(other.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_build_marks_days_with_events() {
        let mut data = EventData::default();
        data.push("2025-2-10", Event::new("Standup", "09:00", ""));
        let grid = MonthGrid::build(2025, 2, d(2025, 1, 1), &data);
        assert!(grid.cell(10).unwrap().has_events);
        assert!(!grid.cell(11).unwrap().has_events);
    }

    #[test]
    fn test_cell_bounds() {
        let grid = MonthGrid::build(2024, 1, d(2024, 1, 1), &EventData::default());
        assert_eq!(grid.days(), 29);
        assert!(grid.cell(0).is_none());
        assert!(grid.cell(29).is_some());
        assert!(grid.cell(30).is_none());
    }

    #[test]
    fn test_position_accounts_for_blanks() {
        // March 2025 starts on Saturday
        let grid = MonthGrid::build(2025, 2, d(2025, 1, 1), &EventData::default());
        assert_eq!(grid.position(1), (0, 6));
        assert_eq!(grid.position(2), (1, 0));
        assert_eq!(grid.position(31), (5, 1));
    }

    #[test]
    fn test_style_selected() {
        let s = day_style(true, true, true, true);
        assert_eq!(
            s,
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_today() {
        let s = day_style(false, false, true, true);
        assert_eq!(s, Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));
    }

    #[test]
    fn test_style_has_event() {
        let s = day_style(false, false, false, true);
        assert_eq!(s, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_cursor_underlines() {
        let s = day_style(false, true, false, false);
        assert_eq!(s, Style::default().add_modifier(Modifier::UNDERLINED));
    }

    #[test]
    fn test_draw_grid_registers_every_day() {
        let grid = MonthGrid::build(2025, 2, d(2025, 3, 10), &EventData::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut hits = HitMap::default();
        let mut areas = BTreeMap::new();
        terminal
            .draw(|f| {
                let area = Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT);
                areas = draw_grid(f, area, &grid, None, 1, &mut hits);
            })
            .unwrap();
        assert_eq!(areas.len(), 31);
        let first = areas[&1];
        assert_eq!(hits.target_at(first.x, first.y), Some(&Target::Day(1)));
        assert_eq!(hits.target_at(1, 1), Some(&Target::PrevMonth));
    }
}
