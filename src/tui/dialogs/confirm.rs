//! Yes/No confirmation carrying the item it is about

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::DialogResult;
use crate::tui::styles::Theme;

pub struct ConfirmDialog<T> {
    title: String,
    message: String,
    subject: T,
    yes_selected: bool,
}

impl<T: Clone> ConfirmDialog<T> {
    /// Starts on "No" so a stray Enter does nothing destructive
    pub fn new(title: &str, message: &str, subject: T) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            subject,
            yes_selected: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<T> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => DialogResult::Cancel,
            KeyCode::Char('y') | KeyCode::Char('Y') => DialogResult::Submit(self.subject.clone()),
            KeyCode::Enter if self.yes_selected => DialogResult::Submit(self.subject.clone()),
            KeyCode::Enter => DialogResult::Cancel,
            KeyCode::Left | KeyCode::Char('h') => {
                self.yes_selected = true;
                DialogResult::Continue
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.yes_selected = false;
                DialogResult::Continue
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.yes_selected = !self.yes_selected;
                DialogResult::Continue
            }
            _ => DialogResult::Continue,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(area, 50, 8);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .style(Style::default().bg(theme.background))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme.error).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let [message_area, buttons_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .style(Style::default().fg(theme.text))
                .wrap(Wrap { trim: true }),
            message_area,
        );

        let button = |label: &'static str, active: bool, color: Color| {
            if active {
                Span::styled(label, Style::default().fg(color).bold().reversed())
            } else {
                Span::styled(label, Style::default().fg(theme.dimmed))
            }
        };

        let buttons = Line::from(vec![
            button(" Yes ", self.yes_selected, theme.error),
            Span::raw("    "),
            button(" No ", !self.yes_selected, theme.running),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            buttons_area,
        );
    }
}
