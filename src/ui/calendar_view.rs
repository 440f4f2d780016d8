use crate::calc::date_key::{month_name, parse_day_key, shift_month};
use crate::calc::upcoming::{greeting, upcoming_events};
use crate::data::{AppSettings, EventId, EventStore};
use crate::ui::event_form::EventForm;
use crate::ui::grid::{GRID_HEIGHT, GRID_WIDTH, MonthGrid, draw_grid};
use crate::ui::hit::{HitMap, Target};
use crate::ui::popover::Popover;
use crate::ui::timeline::Timeline;
use crate::ui::upcoming_panel::{MIN_PANEL_WIDTH, draw_upcoming};
use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use std::collections::BTreeMap;
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

/// What a form submit did.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added,
    Updated,
    /// Title missing; the form stays open.
    Invalid,
    /// The event being edited no longer exists.
    Stale,
    /// No day selected and nothing being edited.
    Ignored,
}

pub struct App {
    store: EventStore,
    pub settings: AppSettings,
    today: NaiveDate,
    year: i32,
    month0: u32,
    grid: MonthGrid,
    /// Keyboard focus inside the grid.
    cursor_day: u32,
    /// At most one selected day; cleared whenever the grid is regenerated.
    selected_day: Option<u32>,
    popover: Option<Popover>,
    timeline: Option<Timeline>,
    form: Option<EventForm>,
    /// Result of the last action (message, color). Cleared on next keypress.
    status: Option<(String, Color)>,
    hits: HitMap,
    day_areas: BTreeMap<u32, Rect>,
    last_click: Option<(u32, Instant)>,
}

impl App {
    pub fn new(store: EventStore, settings: AppSettings, today: NaiveDate) -> Self {
        let (year, month0) = (today.year(), today.month0());
        let grid = MonthGrid::build(year, month0, today, store.data());
        App {
            store,
            settings,
            today,
            year,
            month0,
            grid,
            cursor_day: today.day(),
            selected_day: None,
            popover: None,
            timeline: None,
            form: None,
            status: None,
            hits: HitMap::default(),
            day_areas: BTreeMap::new(),
            last_click: None,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Called from the event loop so the today mark follows the wall clock.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.grid = MonthGrid::build(self.year, self.month0, today, self.store.data());
    }

    /// Rebuilds the grid for a month. Clears the selection and hides the
    /// popover.
    pub fn show_month(&mut self, year: i32, month0: u32) {
        let same_month = (year, month0) == (self.year, self.month0);
        self.year = year;
        self.month0 = month0;
        self.grid = MonthGrid::build(year, month0, self.today, self.store.data());
        self.selected_day = None;
        self.popover = None;
        self.last_click = None;

        let days = self.grid.days();
        self.cursor_day = if same_month {
            self.cursor_day.clamp(1, days)
        } else if self.today.year() == year && self.today.month0() == month0 {
            self.today.day()
        } else {
            1
        };
    }

    fn regenerate_grid(&mut self) {
        self.show_month(self.year, self.month0);
    }

    pub fn next_month(&mut self) {
        let (y, m) = shift_month(self.year, self.month0, 1);
        self.show_month(y, m);
    }

    pub fn prev_month(&mut self) {
        let (y, m) = shift_month(self.year, self.month0, -1);
        self.show_month(y, m);
    }

    fn select(&mut self, day: u32) -> bool {
        if self.grid.cell(day).is_none() {
            return false;
        }
        self.selected_day = Some(day);
        self.cursor_day = day;
        true
    }

    /// Single click: select the day and open its popover.
    pub fn click_day(&mut self, day: u32) {
        if !self.select(day) {
            return;
        }
        let anchor = self.day_areas.get(&day).copied().unwrap_or_default();
        self.popover = Some(Popover::show(anchor, self.year, self.month0, day));
    }

    /// Double click: select the day and open a blank form in add mode.
    pub fn double_click_day(&mut self, day: u32) {
        if !self.select(day) {
            return;
        }
        self.popover = None;
        self.form = Some(EventForm::add());
    }

    pub fn open_timeline(&mut self, year: i32, month0: u32, day: u32) {
        self.popover = None;
        self.timeline = Some(Timeline::show(year, month0, day));
    }

    pub fn hide_timeline(&mut self) {
        self.timeline = None;
    }

    /// Hides the form. Any editing state goes with it.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Store errors only come from saving, after the in-memory change has
    /// happened, so they are reported and the change counts as applied.
    fn apply(&mut self, result: Result<bool>) -> bool {
        match result {
            Ok(applied) => applied,
            Err(e) => {
                tracing::error!("failed to save events: {e:#}");
                self.status = Some((format!("Save failed: {e:#}"), Color::Red));
                true
            }
        }
    }

    pub fn timeline_delete(&mut self, id: &EventId) {
        let Some(key) = self.timeline.as_ref().map(|t| t.key.clone()) else {
            return;
        };
        let result = self.store.delete_by_id(&key, id);
        if self.apply(result) {
            self.status = Some(("Event deleted".to_string(), Color::Yellow));
        }
        self.regenerate_grid();
        if let Some(t) = self.timeline.as_mut() {
            t.clamp_cursor(self.store.data());
        }
    }

    pub fn timeline_edit(&mut self, id: &EventId) {
        let Some(key) = self.timeline.as_ref().map(|t| t.key.clone()) else {
            return;
        };
        match self.store.data().find(&key, id).cloned() {
            Some(event) => {
                self.form = Some(EventForm::edit(&key, &event));
                self.timeline = None;
            }
            None => tracing::debug!(key = %key, id = %id, "edit skipped: no such event"),
        }
    }

    fn popover_day(&self) -> Option<(i32, u32, u32)> {
        self.popover.as_ref().map(|p| (p.year, p.month0, p.day))
    }

    fn timeline_selected_id(&self) -> Option<EventId> {
        self.timeline
            .as_ref()
            .and_then(|t| t.selected(self.store.data()))
            .map(|e| e.id)
    }

    pub fn submit_form(&mut self) -> SubmitOutcome {
        let (event, editing) = match self.form.as_mut() {
            None => return SubmitOutcome::Ignored,
            Some(form) => {
                if let Err(msg) = form.validate() {
                    form.error = Some(msg.to_string());
                    return SubmitOutcome::Invalid;
                }
                (form.to_event(), form.editing.clone())
            }
        };

        if let Some(editing) = editing {
            let result = self.store.update_by_id(&editing.key, &editing.id, event);
            let updated = self.apply(result);
            self.form = None;
            self.regenerate_grid();
            if !updated {
                self.status = Some(("Event no longer exists".to_string(), Color::Yellow));
                return SubmitOutcome::Stale;
            }
            if let Some((year, month0, day)) = parse_day_key(&editing.key) {
                self.open_timeline(year, month0, day);
            }
            return SubmitOutcome::Updated;
        }

        let Some(day) = self.selected_day else {
            return SubmitOutcome::Ignored;
        };
        let result = self
            .store
            .add(self.year, self.month0, day, event)
            .map(|_| true);
        self.apply(result);
        self.form = None;
        self.regenerate_grid();
        self.click_day(day);
        SubmitOutcome::Added
    }

    /// Moves the keyboard cursor, following it into the neighbouring month.
    fn move_cursor(&mut self, days: i64) {
        let Some(current) = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, self.cursor_day)
        else {
            return;
        };
        let Some(target) = current.checked_add_signed(Duration::days(days)) else {
            return;
        };
        if target.year() != self.year || target.month0() != self.month0 {
            self.show_month(target.year(), target.month0());
        }
        self.cursor_day = target.day();
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status = None;

        if self.form.is_some() {
            match code {
                KeyCode::Esc => self.close_form(),
                KeyCode::Enter => {
                    self.submit_form();
                }
                other => {
                    if let Some(form) = self.form.as_mut() {
                        match other {
                            KeyCode::Tab | KeyCode::Down => form.next_field(),
                            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                            KeyCode::Backspace => form.backspace(),
                            KeyCode::Char(c) => form.push_char(c),
                            _ => {}
                        }
                    }
                }
            }
            return false;
        }

        if self.timeline.is_some() {
            match code {
                KeyCode::Esc | KeyCode::Char('q') => self.hide_timeline(),
                KeyCode::Up => {
                    if let Some(t) = self.timeline.as_mut() {
                        t.move_up();
                    }
                }
                KeyCode::Down => {
                    if let Some(t) = self.timeline.as_mut() {
                        t.move_down(self.store.data());
                    }
                }
                KeyCode::Char('e') | KeyCode::Enter => {
                    if let Some(id) = self.timeline_selected_id() {
                        self.timeline_edit(&id);
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(id) = self.timeline_selected_id() {
                        self.timeline_delete(&id);
                    }
                }
                _ => {}
            }
            return false;
        }

        if let Some((y, m, d)) = self.popover_day() {
            match code {
                KeyCode::Esc => {
                    self.popover = None;
                    return false;
                }
                KeyCode::Enter | KeyCode::Char('t') => {
                    self.open_timeline(y, m, d);
                    return false;
                }
                // anything else acts like a click outside the popover
                _ => self.popover = None,
            }
        }

        match code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::Enter => self.click_day(self.cursor_day),
            KeyCode::Char('a') => self.double_click_day(self.cursor_day),
            KeyCode::Char('t') => self.open_timeline(self.year, self.month0, self.cursor_day),
            KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
            KeyCode::Char('p') | KeyCode::PageUp => self.prev_month(),
            KeyCode::Char('g') => {
                self.show_month(self.today.year(), self.today.month0());
                self.cursor_day = self.today.day();
            }
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            self.click_at(mouse.column, mouse.row, now);
        }
    }

    /// One listener for every click: find what is under the pointer and
    /// dispatch on it.
    pub fn click_at(&mut self, column: u16, row: u16, now: Instant) {
        let target = self.hits.target_at(column, row).cloned();

        if self.form.is_some() {
            match target {
                Some(Target::FormSubmit) => {
                    self.submit_form();
                }
                Some(Target::FormField(field)) => {
                    if let Some(form) = self.form.as_mut() {
                        form.focus = field;
                    }
                }
                Some(Target::FormBody) => {}
                _ => self.close_form(),
            }
            return;
        }

        if self.timeline.is_some() {
            match target {
                Some(Target::TimelineEdit(id)) => self.timeline_edit(&id),
                Some(Target::TimelineDelete(id)) => self.timeline_delete(&id),
                Some(Target::TimelineBody) => {}
                _ => self.hide_timeline(),
            }
            return;
        }

        if let Some((y, m, d)) = self.popover_day() {
            match target {
                Some(Target::ViewTimeline) => {
                    self.open_timeline(y, m, d);
                    return;
                }
                Some(Target::PopoverBody) => return,
                _ => self.popover = None,
            }
        }

        match target {
            Some(Target::Day(day)) => {
                let window = StdDuration::from_millis(self.settings.double_click_ms);
                match self.last_click.take() {
                    Some((prev, at))
                        if prev == day && now.saturating_duration_since(at) <= window =>
                    {
                        self.double_click_day(day);
                    }
                    _ => {
                        self.click_day(day);
                        self.last_click = Some((day, now));
                    }
                }
            }
            Some(Target::PrevMonth) => self.prev_month(),
            Some(Target::NextMonth) => self.next_month(),
            _ => {}
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        self.hits.clear();
        let size = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(GRID_HEIGHT), // grid + upcoming panel
                Constraint::Min(3),              // selection summary + status
                Constraint::Length(6),           // help table
            ])
            .split(size);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(GRID_WIDTH),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(chunks[0]);

        self.day_areas = draw_grid(
            f,
            top[0],
            &self.grid,
            self.selected_day,
            self.cursor_day,
            &mut self.hits,
        );

        if self.settings.show_upcoming && top[2].width >= MIN_PANEL_WIDTH {
            let now = Local::now().naive_local();
            let upcoming =
                upcoming_events(self.store.data(), self.today, self.settings.upcoming_limit);
            draw_upcoming(f, top[2], &greeting(now), &upcoming);
        }

        self.render_summary(f, chunks[1]);
        render_help(f, chunks[2]);

        if let Some(p) = &self.popover {
            p.draw(f, self.store.data(), &mut self.hits);
        }
        if let Some(t) = &self.timeline {
            t.draw(f, self.store.data(), &mut self.hits);
        }
        if let Some(form) = &self.form {
            form.draw(f, &mut self.hits);
        }
    }

    fn render_summary(&self, f: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        let focus_day = self.selected_day.unwrap_or(self.cursor_day);
        let count = match self.grid.cell(focus_day) {
            Some(cell) if self.store.has_events(&cell.key) => {
                self.store.get(self.year, self.month0, focus_day).len()
            }
            _ => 0,
        };
        let prefix = if self.selected_day.is_some() {
            "Selected"
        } else {
            "Cursor"
        };
        lines.push(Line::from(format!(
            "{}: {} {}, {}  ({} event{})",
            prefix,
            month_name(self.month0),
            focus_day,
            self.year,
            count,
            if count == 1 { "" } else { "s" }
        )));

        if let Some((msg, color)) = &self.status {
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )));
        }

        if let Some(dir) = self.store.dir() {
            lines.push(Line::from(vec![
                Span::styled("Data  ", Style::default().add_modifier(Modifier::DIM)),
                Span::styled(
                    dir.to_string_lossy().to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::NONE)),
            area,
        );
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let key_rows: Vec<Row> = vec![
        Row::new(vec!["← → ↑ ↓", "Move day", "n / p", "Next/prev month"]),
        Row::new(vec!["Enter / click", "Day popover", "a / dbl-click", "Add event"]),
        Row::new(vec!["t", "Timeline", "g", "Go to today"]),
        Row::new(vec!["Esc", "Close overlay", "q/Ctrl+C", "Quit"]),
    ];
    let help_table = Table::new(
        key_rows,
        [
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(16),
        ],
    )
    .block(Block::default().borders(Borders::TOP).title(" Keys "))
    .column_spacing(1);
    f.render_widget(help_table, area);
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let today = Local::now().date_naive();
        if today != app.today {
            app.set_today(today);
        }
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                _ => {}
            }
        }
    }
    Ok(())
}
