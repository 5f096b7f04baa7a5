use ratatui::widgets::TableState;

use crate::manager::{TaskError, TaskManager};
use crate::models::Task;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

pub enum InputField {
    None,
    Title,
    Description,
}

/// State for the two-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub step: usize, // 0: Title, 1: Description
}

pub struct App {
    pub mgr: TaskManager,
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    pub show_completed: bool,
    /// Last validation message, shown until the next successful action.
    pub error: Option<String>,
}

impl App {
    /// Creates the app over an already-loaded manager.
    pub fn new(mgr: TaskManager) -> App {
        let mut app = App {
            mgr,
            tasks: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            show_completed: true,
            error: None,
        };
        app.reload();
        app
    }

    /// Refreshes the visible task list from the manager.
    pub fn reload(&mut self) {
        let mut tasks = self.mgr.list_ordered();
        if !self.show_completed {
            tasks.retain(|t| !t.done);
        }
        self.tasks = tasks;

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task, wrapping at the end.
    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping at the start.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_id(&self) -> Option<u64> {
        self.state
            .selected()
            .and_then(|i| self.tasks.get(i))
            .map(|t| t.id)
    }

    /// Toggles done/pending on the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.apply(|mgr| mgr.toggle_done(id).map(|_| ()));
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.apply(|mgr| mgr.remove(id));
        }
    }

    /// Toggles the visibility of completed tasks.
    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.reload();
    }

    /// Starts the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
        self.error = None;
    }

    /// Starts editing one field of the selected task, pre-filled.
    pub fn start_edit(&mut self, field: InputField) {
        if let Some(i) = self.state.selected() {
            if let Some(t) = self.tasks.get(i) {
                self.target_id = Some(t.id);
                self.input_buffer = match field {
                    InputField::Title => t.title.clone(),
                    InputField::Description => t.description.clone(),
                    InputField::None => return,
                };
                self.input_field = field;
                self.input_mode = InputMode::Editing;
                self.error = None;
            }
        }
    }

    /// Abandons the current input popup.
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.error = None;
    }

    /// Handles Enter in the input popup.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Reject an empty title up front so the wizard doesn't
                // advance to a step that can only fail.
                if let Some(e) = TaskManager::validate(&self.input_buffer, "") {
                    self.error = Some(e.to_string());
                    return;
                }
                self.add_state.title = self.input_buffer.clone();
                self.add_state.step = 1;
                self.input_buffer.clear();
                self.error = None;
            }
            1 => {
                let title = self.add_state.title.clone();
                let description = self.input_buffer.clone();
                let done = self.apply(|mgr| mgr.add(&title, &description).map(|_| ()));
                if done {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                    // Select the new task, which sorts to the top.
                    self.state.select(Some(0));
                }
            }
            _ => {}
        }
    }

    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id else { return };
        let Some(current) = self.mgr.get(id).cloned() else {
            self.cancel_input();
            self.reload();
            return;
        };
        let (title, description) = match self.input_field {
            InputField::Title => (self.input_buffer.clone(), current.description),
            InputField::Description => (current.title, self.input_buffer.clone()),
            InputField::None => return,
        };
        let done = self.apply(|mgr| mgr.update(id, &title, &description).map(|_| ()));
        if done {
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
        }
    }

    // Runs a mutation, keeping validation errors on screen (the draft stays
    // so the user can correct it) and reloading on success. Returns whether
    // the mutation went through.
    fn apply<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut TaskManager) -> Result<(), TaskError>,
    {
        match f(&mut self.mgr) {
            Ok(()) => {
                self.error = None;
                self.reload();
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                if !e.is_validation() {
                    // Storage failures leave memory ahead of disk; refresh
                    // the view so at least what is shown is what we hold.
                    self.reload();
                }
                false
            }
        }
    }
}
