//! Page state and rendering for the HTML front end.
//!
//! UI state is not persisted anywhere. It is carried in the query string
//! (`?form=open`, `?edit=<id>`) or rebuilt from a failed submission, and every
//! successful mutation redirects back to a fresh `/`.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;
use crate::models::Task;
use crate::validation::{DESCRIPTION, PRIORITY_VALUES, TITLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Open,
    Submitted { ok: bool },
}

impl FormState {
    pub fn next(self, event: FormEvent) -> Self {
        match (self, event) {
            (FormState::Collapsed, FormEvent::Open) => FormState::Expanded,
            (FormState::Expanded, FormEvent::Submitted { ok: true }) => FormState::Collapsed,
            (state, _) => state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEvent {
    Edit,
    Saved { ok: bool },
}

impl ItemState {
    pub fn next(self, event: ItemEvent) -> Self {
        match (self, event) {
            (ItemState::Viewing, ItemEvent::Edit) => ItemState::Editing,
            (ItemState::Editing, ItemEvent::Saved { ok: true }) => ItemState::Viewing,
            (state, _) => state,
        }
    }
}

/// Values typed into a form, echoed back when a submission fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub priority: String,
}

impl Draft {
    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub form: FormState,
    pub form_error: Option<String>,
    pub draft: Option<Draft>,
    /// The one item in `ItemState::Editing`, if any.
    pub editing: Option<String>,
    pub edit_draft: Option<Draft>,
    /// Error from the last action on an item: `(task id, message)`.
    pub item_error: Option<(String, String)>,
}

impl PageState {
    pub fn item_state(&self, id: &str) -> ItemState {
        if self.editing.as_deref() == Some(id) {
            ItemState::Editing
        } else {
            ItemState::Viewing
        }
    }

    /// Moves one item through its state machine. Entering Editing takes the
    /// slot from whichever item held it.
    pub fn item_event(&mut self, id: String, event: ItemEvent) {
        match self.item_state(&id).next(event) {
            ItemState::Editing => self.editing = Some(id),
            ItemState::Viewing if self.editing.as_deref() == Some(id.as_str()) => {
                self.editing = None
            }
            ItemState::Viewing => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskGroups {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

/// Splits tasks into active then completed, keeping the incoming order
/// inside each group.
pub fn group_tasks(tasks: Vec<Task>) -> TaskGroups {
    let (completed, active) = tasks.into_iter().partition(|t| t.completed);
    TaskGroups { active, completed }
}

#[derive(Debug, Serialize)]
struct ItemView {
    id: String,
    title: String,
    description: Option<String>,
    priority: String,
    completed: bool,
    created: String,
    editing: bool,
    error: Option<String>,
    draft: Draft,
}

#[derive(Debug, Serialize)]
struct GroupView {
    name: &'static str,
    items: Vec<ItemView>,
}

#[derive(Debug, Serialize)]
struct Limits {
    title_max: usize,
    description_max: usize,
    priorities: [&'static str; 3],
}

#[derive(Debug, Serialize)]
struct PageContext {
    form_open: bool,
    form_error: Option<String>,
    draft: Draft,
    page_error: Option<String>,
    total: usize,
    groups: Vec<GroupView>,
    limits: Limits,
}

pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_template("index.html", include_str!("../../templates/index.html"))?;
        Ok(Self { tera })
    }

    pub fn render_page(&self, tasks: Vec<Task>, page: &PageState) -> Result<String, AppError> {
        let context = Context::from_serialize(build_context(tasks, page))?;
        Ok(self.tera.render("index.html", &context)?)
    }
}

fn build_context(tasks: Vec<Task>, page: &PageState) -> PageContext {
    let total = tasks.len();

    // An error for a task that is no longer listed goes to the page banner.
    let page_error = page
        .item_error
        .as_ref()
        .filter(|(id, _)| !tasks.iter().any(|t| &t.id == id))
        .map(|(_, message)| message.clone());

    let TaskGroups { active, completed } = group_tasks(tasks);
    let groups = [("Active", active), ("Completed", completed)]
        .into_iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .map(|(name, tasks)| GroupView {
            name,
            items: tasks.into_iter().map(|task| item_view(task, page)).collect(),
        })
        .collect();

    PageContext {
        form_open: page.form == FormState::Expanded,
        form_error: page.form_error.clone(),
        draft: page.draft.clone().unwrap_or_else(|| Draft {
            priority: "medium".to_string(),
            ..Draft::default()
        }),
        page_error,
        total,
        groups,
        limits: Limits {
            title_max: TITLE.max,
            description_max: DESCRIPTION.max,
            priorities: PRIORITY_VALUES,
        },
    }
}

fn item_view(task: Task, page: &PageState) -> ItemView {
    let editing = page.item_state(&task.id) == ItemState::Editing;
    let error = page
        .item_error
        .as_ref()
        .filter(|(id, _)| *id == task.id)
        .map(|(_, message)| message.clone());
    let draft = match (&page.edit_draft, editing) {
        (Some(draft), true) => draft.clone(),
        _ => Draft::from_task(&task),
    };

    ItemView {
        created: task.created_at.format("%b %-d, %Y").to_string(),
        priority: task.priority.to_string(),
        editing,
        error,
        draft,
        id: task.id,
        title: task.title,
        description: task.description,
        completed: task.completed,
    }
}
