//! Main TUI application

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::prelude::*;

use super::home::HomeView;
use crate::board::TaskBoard;

pub struct App {
    home: HomeView,
    should_quit: bool,
}

impl App {
    pub fn new(board: TaskBoard) -> Self {
        Self {
            home: HomeView::new(board),
            should_quit: false,
        }
    }

    /// Draw, then wait for either terminal input or a timer event
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        terminal.clear()?;

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = self.home.next_timer_event() => {
                    self.home.apply_timer_event(event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        self.home.render(frame, frame.area());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(action) = self.home.handle_key(key) {
            match action {
                Action::Quit => self.should_quit = true,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::Speaker;
    use crate::timer::RestartPolicy;

    fn app() -> App {
        App::new(TaskBoard::new(Speaker::silent(), RestartPolicy::Stack))
    }

    #[test]
    fn test_ctrl_c_quits_even_with_dialog() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        assert!(app.home.has_dialog());

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_does_not_panic_on_small_terminal() {
        let mut app = app();
        let backend = ratatui::backend::TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }
}
