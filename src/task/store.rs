//! In-memory task store and the transient form state that feeds it

use tracing::debug;

use super::error::{Result, TaskError};
use super::model::{parse_duration, validate_name, Category, Task, TaskId};

/// Fields of the add/edit form, kept as raw text until submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub duration_text: String,
    pub category: Category,
}

impl TaskForm {
    fn clear(&mut self) {
        self.name.clear();
        self.duration_text.clear();
    }
}

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    form: TaskForm,
    editing: Option<TaskId>,
    status_message: Option<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in insertion order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    /// Id of the task whose fields are loaded in the form, if any
    pub fn editing(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn add(&mut self, name: &str, duration_text: &str, category: Category) -> Result<TaskId> {
        let name = validate_name(name)?;
        let duration = parse_duration(duration_text)?;

        let task = Task::new(name, duration, category);
        let id = task.id.clone();
        debug!("Added task {} '{}' ({}s, {})", id, task.name, duration, category);
        self.tasks.push(task);
        self.form.clear();
        Ok(id)
    }

    /// Load a task into the form; the stored task is untouched until commit
    pub fn begin_edit(&mut self, id: &TaskId) -> Result<()> {
        let task = self
            .get(id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;

        self.form = TaskForm {
            name: task.name.clone(),
            duration_text: task.duration.to_string(),
            category: task.category,
        };
        self.editing = Some(id.clone());
        Ok(())
    }

    pub fn commit_edit(
        &mut self,
        name: &str,
        duration_text: &str,
        category: Category,
    ) -> Result<TaskId> {
        let id = self.editing.clone().ok_or(TaskError::NoEditInProgress)?;
        let name = validate_name(name)?;
        let duration = parse_duration(duration_text)?;

        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        task.respecify(name, duration, category);
        debug!("Updated task {} '{}' ({}s, {})", id, name, duration, category);

        self.editing = None;
        self.form.clear();
        Ok(id)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    /// Add or update from the current form fields, depending on edit state
    pub fn submit_form(&mut self) -> Result<TaskId> {
        let TaskForm {
            name,
            duration_text,
            category,
        } = self.form.clone();

        if self.editing.is_some() {
            self.commit_edit(&name, &duration_text, category)
        } else {
            self.add(&name, &duration_text, category)
        }
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;

        if self.editing.as_ref() == Some(id) {
            self.cancel_edit();
        }
        Ok(self.tasks.remove(idx))
    }

    /// Take one second off the stored task, against its current value
    pub fn decrement(&mut self, id: &TaskId) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| &t.id == id)?;
        task.tick();
        Some(&*task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(names: &[(&str, &str)]) -> (TaskStore, Vec<TaskId>) {
        let mut store = TaskStore::new();
        let ids = names
            .iter()
            .map(|(n, d)| store.add(n, d, Category::Work).unwrap())
            .collect();
        (store, ids)
    }

    #[test]
    fn test_add_valid_task() {
        let mut store = TaskStore::new();
        let id = store.add("Write report", "10", Category::Work).unwrap();

        assert_eq!(store.len(), 1);
        let task = store.get(&id).unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.remaining_time, 10);
        assert_eq!(task.category, Category::Work);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.add("", "10", Category::Work),
            Err(TaskError::EmptyName)
        );
        assert!(matches!(
            store.add("Read", "ten", Category::Work),
            Err(TaskError::InvalidDuration(_))
        ));
        assert!(store.add("Read", "0", Category::Work).is_err());
        assert!(store.add("Read", "-5", Category::Work).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (store, ids) = store_with(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let listed: Vec<_> = store.list().iter().map(|t| t.id.clone()).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_add_clears_form_but_keeps_category() {
        let mut store = TaskStore::new();
        store.form_mut().name = "Draft".to_string();
        store.form_mut().duration_text = "30".to_string();
        store.form_mut().category = Category::Study;

        store.submit_form().unwrap();

        assert!(store.form().name.is_empty());
        assert!(store.form().duration_text.is_empty());
        assert_eq!(store.form().category, Category::Study);
        assert_eq!(store.list()[0].category, Category::Study);
    }

    #[test]
    fn test_rejected_submit_keeps_form() {
        let mut store = TaskStore::new();
        store.form_mut().name = "Draft".to_string();
        store.form_mut().duration_text = "soon".to_string();

        assert!(store.submit_form().is_err());
        assert_eq!(store.form().name, "Draft");
        assert!(store.is_empty());
    }

    #[test]
    fn test_begin_edit_loads_form_without_mutation() {
        let (mut store, ids) = store_with(&[("Write report", "10")]);
        store.decrement(&ids[0]);

        store.begin_edit(&ids[0]).unwrap();

        assert_eq!(store.editing(), Some(&ids[0]));
        assert_eq!(store.form().name, "Write report");
        assert_eq!(store.form().duration_text, "10");
        assert_eq!(store.get(&ids[0]).unwrap().remaining_time, 9);
    }

    #[test]
    fn test_commit_edit_resets_remaining() {
        let (mut store, ids) = store_with(&[("Write report", "10"), ("Other", "5")]);
        store.decrement(&ids[0]);
        store.begin_edit(&ids[0]).unwrap();

        store
            .commit_edit("Write report v2", "20", Category::Personal)
            .unwrap();

        let edited = store.get(&ids[0]).unwrap();
        assert_eq!(edited.name, "Write report v2");
        assert_eq!(edited.duration, 20);
        assert_eq!(edited.remaining_time, 20);
        assert_eq!(edited.category, Category::Personal);

        let other = store.get(&ids[1]).unwrap();
        assert_eq!(other.name, "Other");
        assert_eq!(other.remaining_time, 5);

        assert!(store.editing().is_none());
        assert!(store.form().name.is_empty());
    }

    #[test]
    fn test_commit_edit_without_edit_is_noop() {
        let (mut store, ids) = store_with(&[("a", "3")]);
        assert_eq!(
            store.commit_edit("b", "4", Category::Work),
            Err(TaskError::NoEditInProgress)
        );
        assert_eq!(store.get(&ids[0]).unwrap().name, "a");
    }

    #[test]
    fn test_commit_edit_invalid_keeps_edit_state() {
        let (mut store, ids) = store_with(&[("a", "3")]);
        store.begin_edit(&ids[0]).unwrap();

        assert!(store.commit_edit("", "4", Category::Work).is_err());
        assert!(store.commit_edit("b", "x", Category::Work).is_err());

        assert_eq!(store.editing(), Some(&ids[0]));
        assert_eq!(store.get(&ids[0]).unwrap().name, "a");
    }

    #[test]
    fn test_submit_form_routes_to_edit() {
        let (mut store, ids) = store_with(&[("a", "3")]);
        store.begin_edit(&ids[0]).unwrap();
        store.form_mut().name = "renamed".to_string();

        let id = store.submit_form().unwrap();

        assert_eq!(id, ids[0]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&ids[0]).unwrap().name, "renamed");
    }

    #[test]
    fn test_delete_removes_only_target() {
        let (mut store, ids) = store_with(&[("a", "1"), ("b", "2"), ("c", "3")]);

        let removed = store.delete(&ids[1]).unwrap();

        assert_eq!(removed.name, "b");
        let names: Vec<_> = store.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (mut store, _) = store_with(&[("a", "1")]);
        let missing = TaskId::generate();
        assert_eq!(store.delete(&missing), Err(TaskError::NotFound(missing)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_edited_task_clears_edit_state() {
        let (mut store, ids) = store_with(&[("a", "1")]);
        store.begin_edit(&ids[0]).unwrap();
        store.delete(&ids[0]).unwrap();
        assert!(store.editing().is_none());
    }

    #[test]
    fn test_decrement_floors_and_ignores_missing() {
        let (mut store, ids) = store_with(&[("a", "2")]);
        assert_eq!(store.decrement(&ids[0]).unwrap().remaining_time, 1);
        assert_eq!(store.decrement(&ids[0]).unwrap().remaining_time, 0);
        assert_eq!(store.decrement(&ids[0]).unwrap().remaining_time, 0);
        assert!(store.decrement(&TaskId::generate()).is_none());
    }

    #[test]
    fn test_status_message() {
        let mut store = TaskStore::new();
        assert!(store.status_message().is_none());
        store.set_status_message("done");
        assert_eq!(store.status_message(), Some("done"));
        store.clear_status_message();
        assert!(store.status_message().is_none());
    }
}
