use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::repo::TaskRepository;
use crate::sync::TaskListView;
use crate::task::{DocumentId, TaskFieldsInput};

use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct StatusLine {
    pub(crate) kind: StatusKind,
    pub(crate) text: String,
}

pub(crate) struct DeleteConfirm {
    pub(crate) id: DocumentId,
    pub(crate) title: String,
}

pub(crate) struct AppState {
    pub(crate) view: TaskListView,
    pub(crate) selected: Option<usize>,
    pub(crate) status: Option<StatusLine>,
    pub(crate) delete_confirm: Option<DeleteConfirm>,
    repo: TaskRepository,
    quit: bool,
}

impl AppState {
    fn new(repo: TaskRepository, view: TaskListView) -> Self {
        let selected = if view.is_empty() { None } else { Some(0) };
        Self {
            view,
            selected,
            status: None,
            delete_confirm: None,
            repo,
            quit: false,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn fail(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    fn clamp_selection(&mut self) {
        if self.view.is_empty() {
            self.selected = None;
        } else {
            let last = self.view.len() - 1;
            self.selected = Some(self.selected.unwrap_or(0).min(last));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.view.is_empty() {
            return;
        }
        let last = self.view.len() as isize - 1;
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).clamp(0, last) as usize);
    }

    /// Full load: rebuild the view from a fresh List.
    fn reload(&mut self) {
        match self.repo.list() {
            Ok(tasks) => {
                self.view.reload(tasks);
                self.clamp_selection();
                self.info("reloaded");
            }
            Err(err) => self.fail(format!("reload failed: {err}")),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(task) = self.view.tasks().get(index) else {
            return;
        };
        let id = task.id;
        let completed = !task.completed;

        let fields = TaskFieldsInput {
            completed: Some(completed),
            ..TaskFieldsInput::default()
        };
        match self.repo.update_fields(&id.to_string(), fields) {
            Ok(update) => {
                self.view.apply_update(id, &update);
                self.info(if completed { "completed" } else { "reopened" });
            }
            Err(_) => self.fail("failed to update task"),
        }
    }

    fn request_delete(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        if let Some(task) = self.view.tasks().get(index) {
            self.delete_confirm = Some(DeleteConfirm {
                id: task.id,
                title: task.title.clone(),
            });
        }
    }

    fn confirm_delete(&mut self) {
        let Some(confirm) = self.delete_confirm.take() else {
            return;
        };
        match self.repo.delete(&confirm.id.to_string()) {
            Ok(()) => {
                self.view.apply_delete(confirm.id);
                self.clamp_selection();
                self.info(format!("deleted '{}'", confirm.title));
            }
            Err(_) => self.fail("failed to delete task"),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Pending delete confirmation swallows everything except y/n.
        if self.delete_confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
                _ => {
                    self.delete_confirm = None;
                    self.info("delete cancelled");
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.view.is_empty() {
                    self.selected = Some(0);
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                if !self.view.is_empty() {
                    self.selected = Some(self.view.len() - 1);
                }
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }
}

/// Run the board until the user quits.
pub fn run(repo: TaskRepository) -> Result<()> {
    // Initial full load happens before the terminal is taken over, so a
    // dead store fails loudly instead of flashing an empty board.
    let tasks = repo.list()?;
    let mut state = AppState::new(repo, TaskListView::from_tasks(tasks));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::draw(frame, state))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                state.handle_key(key);
            }
        }

        if state.quit {
            return Ok(());
        }
    }
}
