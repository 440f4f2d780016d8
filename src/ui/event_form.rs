use crate::data::{Event, EventId};
use crate::ui::hit::{HitMap, Target};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const FORM_WIDTH: u16 = 52;
const FORM_HEIGHT: u16 = 11;
const SAVE: &str = "[ Save ]";
const CLOSE: &str = "[ Close ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Time,
    Desc,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Title => Field::Time,
            Field::Time => Field::Desc,
            Field::Desc => Field::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Title => Field::Desc,
            Field::Time => Field::Title,
            Field::Desc => Field::Time,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Time => "Time (HH:MM)",
            Field::Desc => "Description",
        }
    }
}

/// Which stored event a submit overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct Editing {
    pub key: String,
    pub id: EventId,
}

/// Shared add/edit form. `editing` present means submit overwrites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub time: String,
    pub desc: String,
    pub focus: Field,
    pub editing: Option<Editing>,
    pub error: Option<String>,
}

impl EventForm {
    /// Blank form in add mode.
    pub fn add() -> Self {
        EventForm::default()
    }

    /// Form pre-filled from `event`, set to overwrite it on submit.
    pub fn edit(key: &str, event: &Event) -> Self {
        EventForm {
            title: event.title.clone(),
            time: event.time.clone(),
            desc: event.desc.clone(),
            editing: Some(Editing {
                key: key.to_string(),
                id: event.id.clone(),
            }),
            ..EventForm::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Time => &mut self.time,
            Field::Desc => &mut self.desc,
        }
    }

    fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Time => &self.time,
            Field::Desc => &self.desc,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.focus;
        self.field_mut(focus).push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    /// The only validation: a title must be present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            Err("Title is required")
        } else {
            Ok(())
        }
    }

    /// A fresh event from the current field values, as typed.
    pub fn to_event(&self) -> Event {
        Event::new(&self.title, &self.time, &self.desc)
    }

    pub fn draw(&self, f: &mut Frame, hits: &mut HitMap) {
        let screen = f.area();
        let area = centered_fixed(FORM_WIDTH, FORM_HEIGHT, screen);
        let title = if self.is_editing() {
            " Edit Event "
        } else {
            " Add Event "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);

        hits.push(screen, Target::Backdrop);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        hits.push(area, Target::FormBody);

        let mut row = inner.y;
        for field in [Field::Title, Field::Time, Field::Desc] {
            if row >= inner.bottom() {
                break;
            }
            let focused = field == self.focus;
            let cursor = if focused { "_" } else { "" };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{:<14}", field.label()), label_style),
                Span::raw(format!("{}{}", self.field(field), cursor)),
            ]);
            let rect = Rect::new(inner.x, row, inner.width, 1);
            f.render_widget(Paragraph::new(line), rect);
            hits.push(rect, Target::FormField(field));
            row += 2;
        }

        if let Some(err) = &self.error {
            if row < inner.bottom() {
                f.render_widget(
                    Paragraph::new(Span::styled(err.clone(), Style::default().fg(Color::Red))),
                    Rect::new(inner.x, row, inner.width, 1),
                );
            }
        }

        if inner.height >= 2 {
            let buttons_row = inner.bottom() - 2;
            let save = Rect::new(inner.x, buttons_row, (SAVE.len() as u16).min(inner.width), 1);
            let close_x = (save.right() + 2).min(inner.right());
            let close = Rect::new(
                close_x,
                buttons_row,
                (CLOSE.len() as u16).min(inner.right() - close_x),
                1,
            );
            f.render_widget(
                Paragraph::new(Span::styled(
                    SAVE,
                    Style::default().fg(Color::Black).bg(Color::Green),
                )),
                save,
            );
            f.render_widget(
                Paragraph::new(Span::styled(
                    CLOSE,
                    Style::default().fg(Color::Black).bg(Color::Gray),
                )),
                close,
            );
            hits.push(save, Target::FormSubmit);
            hits.push(close, Target::FormClose);

            f.render_widget(
                Paragraph::new(Span::styled(
                    "Tab=next field  Enter=save  Esc=close",
                    Style::default().fg(Color::DarkGray),
                )),
                Rect::new(inner.x, inner.bottom() - 1, inner.width, 1),
            );
        }
    }
}

/// A `width` x `height` rectangle centred in `r`, shrunk to fit.
pub(crate) fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
