//! Add / edit task dialog

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::DialogResult;
use crate::task::{Category, TaskForm};
use crate::tui::styles::Theme;

const NAME_FIELD: usize = 0;
const DURATION_FIELD: usize = 1;
const CATEGORY_FIELD: usize = 2;
const FIELD_COUNT: usize = 3;

pub struct TaskFormDialog {
    editing: bool,
    name: Input,
    duration: Input,
    category: Category,
    focused_field: usize,
}

impl TaskFormDialog {
    /// Dialog for a new task, seeded with whatever the form already holds
    pub fn new(form: &TaskForm) -> Self {
        Self::from_form(form, false)
    }

    pub fn edit(form: &TaskForm) -> Self {
        Self::from_form(form, true)
    }

    fn from_form(form: &TaskForm, editing: bool) -> Self {
        Self {
            editing,
            name: Input::new(form.name.clone()),
            duration: Input::new(form.duration_text.clone()),
            category: form.category,
            focused_field: NAME_FIELD,
        }
    }

    /// Current field values, as the store expects them
    pub fn form(&self) -> TaskForm {
        TaskForm {
            name: self.name.value().to_string(),
            duration_text: self.duration.value().to_string(),
            category: self.category,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<TaskForm> {
        match key.code {
            KeyCode::Esc => DialogResult::Cancel,
            KeyCode::Enter => DialogResult::Submit(self.form()),
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = (self.focused_field + 1) % FIELD_COUNT;
                DialogResult::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = (self.focused_field + FIELD_COUNT - 1) % FIELD_COUNT;
                DialogResult::Continue
            }
            KeyCode::Left if self.focused_field == CATEGORY_FIELD => {
                self.category = self.category.prev();
                DialogResult::Continue
            }
            KeyCode::Right | KeyCode::Char(' ') if self.focused_field == CATEGORY_FIELD => {
                self.category = self.category.next();
                DialogResult::Continue
            }
            KeyCode::Char(c) if self.focused_field == DURATION_FIELD && !c.is_ascii_digit() => {
                DialogResult::Continue
            }
            _ => {
                match self.focused_field {
                    NAME_FIELD => {
                        self.name.handle_event(&Event::Key(key));
                    }
                    DURATION_FIELD => {
                        self.duration.handle_event(&Event::Key(key));
                    }
                    _ => {}
                }
                DialogResult::Continue
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(area, 56, 11);
        frame.render_widget(Clear, dialog_area);

        let title = if self.editing {
            " Edit Task "
        } else {
            " New Task "
        };
        let block = Block::default()
            .style(Style::default().bg(theme.background))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(title)
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let [name_area, duration_area, category_area, _, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .horizontal_margin(2)
        .vertical_margin(1)
        .areas(inner);

        self.render_input(frame, name_area, "Name:    ", &self.name, NAME_FIELD, theme);
        self.render_input(
            frame,
            duration_area,
            "Seconds: ",
            &self.duration,
            DURATION_FIELD,
            theme,
        );
        self.render_category(frame, category_area, theme);

        let action = if self.editing { " save  " } else { " add  " };
        let hint = Line::from(vec![
            Span::styled("Tab", Style::default().fg(theme.hint)),
            Span::styled(" next field  ", Style::default().fg(theme.dimmed)),
            Span::styled("Enter", Style::default().fg(theme.hint)),
            Span::styled(action, Style::default().fg(theme.dimmed)),
            Span::styled("Esc", Style::default().fg(theme.hint)),
            Span::styled(" cancel", Style::default().fg(theme.dimmed)),
        ]);
        frame.render_widget(Paragraph::new(hint), hint_area);
    }

    fn label_style(&self, field: usize, theme: &Theme) -> Style {
        if self.focused_field == field {
            Style::default().fg(theme.accent).underlined()
        } else {
            Style::default().fg(theme.text)
        }
    }

    fn render_input(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &'static str,
        input: &Input,
        field: usize,
        theme: &Theme,
    ) {
        let focused = self.focused_field == field;
        let value_style = Style::default().fg(if focused { theme.accent } else { theme.text });
        let mut spans = vec![Span::styled(label, self.label_style(field, theme))];

        if focused {
            // Block cursor over the character under the caret
            let value = input.value();
            let caret = input.cursor();
            let before: String = value.chars().take(caret).collect();
            let under = value.chars().nth(caret).unwrap_or(' ');
            let after: String = value.chars().skip(caret + 1).collect();
            spans.push(Span::styled(before, value_style));
            spans.push(Span::styled(
                under.to_string(),
                Style::default().fg(theme.background).bg(theme.accent),
            ));
            spans.push(Span::styled(after, value_style));
        } else {
            spans.push(Span::styled(input.value().to_string(), value_style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_category(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let focused = self.focused_field == CATEGORY_FIELD;
        let mut spans = vec![Span::styled(
            "Category:",
            self.label_style(CATEGORY_FIELD, theme),
        )];

        for category in Category::ALL {
            let selected = category == self.category;
            let color = theme.category(category);
            let style = if selected {
                Style::default().fg(color).bold()
            } else if focused {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.dimmed)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(if selected { "● " } else { "○ " }, style));
            spans.push(Span::styled(category.label(), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
