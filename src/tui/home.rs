//! Home view - task list, dialogs and key handling

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::app::Action;
use super::components::HelpOverlay;
use super::dialogs::{ConfirmDialog, DialogResult, TaskFormDialog};
use super::styles::Theme;
use crate::board::TaskBoard;
use crate::cli::truncate;
use crate::task::{Task, TaskId};
use crate::timer::TimerEvent;

pub struct HomeView {
    board: TaskBoard,

    // UI state
    cursor: usize,
    list_state: ListState,

    // Dialogs
    show_help: bool,
    form_dialog: Option<TaskFormDialog>,
    confirm_dialog: Option<ConfirmDialog<TaskId>>,
}

impl HomeView {
    pub fn new(board: TaskBoard) -> Self {
        Self {
            board,
            cursor: 0,
            list_state: ListState::default(),
            show_help: false,
            form_dialog: None,
            confirm_dialog: None,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.board.is_dark_mode())
    }

    #[cfg(test)]
    pub fn has_dialog(&self) -> bool {
        self.show_help || self.form_dialog.is_some() || self.confirm_dialog.is_some()
    }

    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        self.board.next_event().await
    }

    /// Apply a timer event plus anything queued behind it
    pub fn apply_timer_event(&mut self, event: TimerEvent) -> bool {
        let changed = self.board.handle_event(event);
        self.board.pump() > 0 || changed
    }

    fn selected_task(&self) -> Option<&Task> {
        self.board.tasks().get(self.cursor)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(dialog) = &mut self.form_dialog {
            let result = dialog.handle_key(key);
            *self.board.form_mut() = dialog.form();
            match result {
                DialogResult::Continue => {}
                DialogResult::Cancel => {
                    self.form_dialog = None;
                    self.board.cancel_edit();
                }
                DialogResult::Submit(form) => {
                    *self.board.form_mut() = form;
                    // A rejected form keeps the dialog open
                    if let Some(id) = self.board.submit_form() {
                        self.form_dialog = None;
                        self.select(&id);
                    }
                }
            }
            return None;
        }

        if let Some(dialog) = &mut self.confirm_dialog {
            match dialog.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => {
                    self.confirm_dialog = None;
                }
                DialogResult::Submit(id) => {
                    self.confirm_dialog = None;
                    self.board.delete(&id);
                    self.clamp_cursor();
                }
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('n') => {
                self.board.cancel_edit();
                self.form_dialog = Some(TaskFormDialog::new(self.board.form()));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    self.board.begin_edit(&id);
                    if self.board.editing().is_some() {
                        self.form_dialog = Some(TaskFormDialog::edit(self.board.form()));
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    let message = format!("Delete task '{}'?", truncate(&task.name, 30));
                    let dialog = ConfirmDialog::new("Delete Task", &message, task.id.clone());
                    self.confirm_dialog = Some(dialog);
                }
            }
            KeyCode::Char('s') => {
                self.board.start_all();
            }
            KeyCode::Char('v') => {
                self.board.enable_sound();
            }
            KeyCode::Char('t') => {
                self.board.toggle_dark_mode();
            }
            KeyCode::Esc => {
                self.board.dismiss_status_message();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.board.tasks().len().saturating_sub(1);
            }
            _ => {}
        }

        None
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.board.tasks().len();
        if len == 0 {
            return;
        }

        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.cursor + delta as usize).min(len - 1)
        };
    }

    fn clamp_cursor(&mut self) {
        let len = self.board.tasks().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn select(&mut self, id: &TaskId) {
        if let Some(pos) = self.board.tasks().iter().position(|t| &t.id == id) {
            self.cursor = pos;
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
            area,
        );

        let has_message = self.board.status_message().is_some();
        let [list_area, message_area, status_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(if has_message { 1 } else { 0 }),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_list(frame, list_area, &theme);
        if has_message {
            self.render_message(frame, message_area, &theme);
        }
        self.render_status_bar(frame, status_area, &theme);

        if self.show_help {
            HelpOverlay::render(frame, area, &theme);
        }

        if let Some(dialog) = &self.form_dialog {
            dialog.render(frame, area, &theme);
        }

        if let Some(dialog) = &self.confirm_dialog {
            dialog.render(frame, area, &theme);
        }
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let sound = if self.board.is_sound_enabled() {
            Span::styled(" 🔊 sound on ", Style::default().fg(theme.running))
        } else {
            Span::styled(" 🔇 sound off ", Style::default().fg(theme.dimmed))
        };
        let mode = if self.board.is_dark_mode() {
            " ☾ dark "
        } else {
            " ☀ light "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Voice Timer ")
            .title_style(Style::default().fg(theme.title).bold())
            .title(
                Line::from(vec![sound, Span::styled(mode, Style::default().fg(theme.hint))])
                    .right_aligned(),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.board.tasks().is_empty() {
            let empty_text = vec![
                Line::from(""),
                Line::from("No tasks yet").style(Style::default().fg(theme.dimmed)),
                Line::from(""),
                Line::from("Press 'n' to add one").style(Style::default().fg(theme.hint)),
            ];
            frame.render_widget(Paragraph::new(empty_text).alignment(Alignment::Center), inner);
            return;
        }

        let name_width = (inner.width as usize).saturating_sub(32).max(8);
        let items: Vec<ListItem> = self
            .board
            .tasks()
            .iter()
            .map(|task| self.render_item(task, name_width, theme))
            .collect();

        let list = List::new(items).highlight_style(Style::default().bg(theme.selection).bold());
        self.list_state.select(Some(self.cursor));
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }

    fn render_item(&self, task: &Task, name_width: usize, theme: &Theme) -> ListItem<'static> {
        let running = self.board.is_running(&task.id);
        let editing = self.board.editing() == Some(&task.id);

        let (icon, icon_style) = if editing {
            ("✎", Style::default().fg(theme.accent))
        } else if running {
            ("●", Style::default().fg(theme.running))
        } else if task.is_finished() {
            ("✓", Style::default().fg(theme.finished))
        } else {
            ("○", Style::default().fg(theme.dimmed))
        };

        let time_style = if task.is_finished() {
            Style::default().fg(theme.finished)
        } else if running {
            Style::default().fg(theme.running).bold()
        } else {
            Style::default().fg(theme.text)
        };

        let name = truncate(&task.name, name_width);
        let line = Line::from(vec![
            Span::styled(format!(" {} ", icon), icon_style),
            Span::styled(
                format!("{:<10}", format!("[{}]", task.category)),
                Style::default().fg(theme.category(task.category)),
            ),
            Span::styled(
                format!("{:<width$}", name, width = name_width),
                Style::default().fg(theme.text),
            ),
            Span::styled(format!(" {:>6}s", task.remaining_time), time_style),
            Span::styled(
                format!(" / {}s", task.duration),
                Style::default().fg(theme.dimmed),
            ),
        ]);

        ListItem::new(line)
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(message) = self.board.status_message() else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(format!(" ✓ {} ", message), Style::default().fg(theme.running).bold()),
            Span::styled("(Esc to dismiss)", Style::default().fg(theme.dimmed)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let key_style = Style::default().fg(theme.accent).bold();
        let desc_style = Style::default().fg(theme.dimmed);
        let sep_style = Style::default().fg(theme.border);

        let hints = [
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("s", "Start all"),
            ("v", "Sound"),
            ("t", "Theme"),
            ("?", "Help"),
            ("q", "Quit"),
        ];

        let mut spans = Vec::new();
        for (idx, (key, desc)) in hints.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled("│", sep_style));
            }
            spans.push(Span::styled(format!(" {}", key), key_style));
            spans.push(Span::styled(format!(" {} ", desc), desc_style));
        }

        let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bar));
        frame.render_widget(status, area);
    }
}
