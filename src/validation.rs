//! Field constraints and the per-operation validators.
//!
//! The constraint constants are the single source of truth: the validators
//! check against them and the HTML forms read their limits from them.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateTaskInput, DeleteTaskInput, NewTask, Priority, TaskId, TaskPatch, ToggleTaskInput,
    UpdateTaskInput,
};

#[derive(Debug, Clone, Copy)]
pub struct TextConstraint {
    pub field: &'static str,
    pub max: usize,
    /// `None` when the field may be empty.
    pub required_message: Option<&'static str>,
    pub too_long_message: &'static str,
}

pub const TITLE: TextConstraint = TextConstraint {
    field: "title",
    max: 100,
    required_message: Some("Title is required"),
    too_long_message: "Title must be less than 100 characters",
};

pub const DESCRIPTION: TextConstraint = TextConstraint {
    field: "description",
    max: 500,
    required_message: None,
    too_long_message: "Description must be less than 500 characters",
};

pub const PRIORITY_VALUES: [&str; 3] = ["low", "medium", "high"];
pub const PRIORITY_MESSAGE: &str = "Priority must be one of: low, medium, high";
pub const ID_MESSAGE: &str = "Invalid task id";
pub const COMPLETED_MESSAGE: &str = "Completed must be a boolean";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl TextConstraint {
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if let (true, Some(message)) = (value.is_empty(), self.required_message) {
            return Err(ValidationError::new(self.field, message));
        }
        if value.chars().count() > self.max {
            return Err(ValidationError::new(self.field, self.too_long_message));
        }
        Ok(())
    }
}

pub fn validate_create(input: &CreateTaskInput) -> Result<NewTask, ValidationError> {
    TITLE.check(&input.title)?;
    let description = optional_description(input.description.as_deref())?;
    let priority = match input.priority.as_deref() {
        Some(raw) => parse_priority(raw)?,
        None => Priority::default(),
    };

    Ok(NewTask {
        title: input.title.clone(),
        description,
        priority,
    })
}

pub fn validate_update(input: &UpdateTaskInput) -> Result<(TaskId, TaskPatch), ValidationError> {
    let id = parse_id(&input.id)?;

    if let Some(title) = &input.title {
        TITLE.check(title)?;
    }
    let description = match &input.description {
        Some(value) => Some(optional_description(value.as_deref())?),
        None => None,
    };
    let priority = input.priority.as_deref().map(parse_priority).transpose()?;
    let completed = input.completed.as_ref().map(completed_flag).transpose()?;

    Ok((
        id,
        TaskPatch {
            title: input.title.clone(),
            description,
            priority,
            completed,
        },
    ))
}

pub fn validate_toggle(input: &ToggleTaskInput) -> Result<(TaskId, bool), ValidationError> {
    let id = parse_id(&input.id)?;
    let completed = match &input.completed {
        Some(value) => completed_flag(value)?,
        None => return Err(ValidationError::new("completed", COMPLETED_MESSAGE)),
    };
    Ok((id, completed))
}

pub fn validate_delete(input: &DeleteTaskInput) -> Result<TaskId, ValidationError> {
    parse_id(&input.id)
}

/// Parses a boolean that arrived as text, e.g. from a form field.
pub fn parse_completed(raw: &str) -> Result<bool, ValidationError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValidationError::new("completed", COMPLETED_MESSAGE)),
    }
}

pub fn parse_id(raw: &str) -> Result<TaskId, ValidationError> {
    Uuid::parse_str(raw)
        .map(TaskId)
        .map_err(|_| ValidationError::new("id", ID_MESSAGE))
}

fn completed_flag(value: &Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| ValidationError::new("completed", COMPLETED_MESSAGE))
}

fn parse_priority(raw: &str) -> Result<Priority, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::new("priority", PRIORITY_MESSAGE))
}

// Empty descriptions are stored as absent.
fn optional_description(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value {
        Some(text) if !text.is_empty() => {
            DESCRIPTION.check(text)?;
            Ok(Some(text.to_string()))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            ..CreateTaskInput::default()
        }
    }

    fn valid_id() -> String {
        Uuid::new_v4().to_string()
    }

    #[test]
    fn priority_table_matches_enum() {
        let names: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, PRIORITY_VALUES);
    }

    #[test]
    fn create_applies_defaults() {
        let task = validate_create(&create("Buy milk")).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.description, None);
    }

    #[test]
    fn title_length_boundaries() {
        assert!(validate_create(&create(&"a".repeat(100))).is_ok());

        let err = validate_create(&create(&"a".repeat(101))).unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.to_string(), "Title must be less than 100 characters");

        let err = validate_create(&create("")).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        assert!(validate_create(&create(&"é".repeat(100))).is_ok());
    }

    #[test]
    fn description_length_boundaries() {
        let mut input = create("Buy milk");
        input.description = Some("d".repeat(500));
        assert_eq!(
            validate_create(&input).unwrap().description.map(|d| d.len()),
            Some(500)
        );

        input.description = Some("d".repeat(501));
        let err = validate_create(&input).unwrap_err();
        assert_eq!(err.to_string(), "Description must be less than 500 characters");
    }

    #[test]
    fn empty_description_on_create_is_absent() {
        let mut input = create("Buy milk");
        input.description = Some(String::new());
        assert_eq!(validate_create(&input).unwrap().description, None);
    }

    #[test]
    fn priority_domain() {
        for value in PRIORITY_VALUES {
            let mut input = create("Buy milk");
            input.priority = Some(value.to_string());
            assert_eq!(validate_create(&input).unwrap().priority.as_str(), value);
        }

        let mut input = create("Buy milk");
        input.priority = Some("urgent".to_string());
        assert_eq!(validate_create(&input).unwrap_err().to_string(), PRIORITY_MESSAGE);
    }

    #[test]
    fn first_failing_constraint_wins() {
        let input = CreateTaskInput {
            title: String::new(),
            description: Some("d".repeat(501)),
            priority: Some("urgent".to_string()),
        };
        assert_eq!(validate_create(&input).unwrap_err().field, "title");
    }

    #[test]
    fn malformed_ids_are_rejected_everywhere() {
        let update = UpdateTaskInput {
            id: "not-an-id".to_string(),
            ..UpdateTaskInput::default()
        };
        assert_eq!(validate_update(&update).unwrap_err().to_string(), ID_MESSAGE);

        let toggle = ToggleTaskInput {
            id: String::new(),
            completed: Some(Value::Bool(true)),
        };
        assert_eq!(validate_toggle(&toggle).unwrap_err().field, "id");

        let delete = DeleteTaskInput {
            id: "123".to_string(),
        };
        assert_eq!(validate_delete(&delete).unwrap_err().field, "id");
    }

    #[test]
    fn update_checks_only_present_fields() {
        let input = UpdateTaskInput {
            id: valid_id(),
            ..UpdateTaskInput::default()
        };
        let (_, patch) = validate_update(&input).unwrap();
        assert_eq!(patch, TaskPatch::default());

        let input = UpdateTaskInput {
            id: valid_id(),
            title: Some(String::new()),
            ..UpdateTaskInput::default()
        };
        assert_eq!(validate_update(&input).unwrap_err().to_string(), "Title is required");

        let input = UpdateTaskInput {
            id: valid_id(),
            priority: Some("none".to_string()),
            ..UpdateTaskInput::default()
        };
        assert_eq!(validate_update(&input).unwrap_err().field, "priority");
    }

    #[test]
    fn update_can_clear_description() {
        for cleared in [None, Some(String::new())] {
            let input = UpdateTaskInput {
                id: valid_id(),
                description: Some(cleared),
                ..UpdateTaskInput::default()
            };
            let (_, patch) = validate_update(&input).unwrap();
            assert_eq!(patch.description, Some(None));
        }
    }

    #[test]
    fn completed_text_must_be_boolean() {
        assert_eq!(parse_completed("true"), Ok(true));
        assert_eq!(parse_completed("false"), Ok(false));
        assert_eq!(parse_completed("yes").unwrap_err().to_string(), COMPLETED_MESSAGE);
    }

    #[test]
    fn empty_description_is_never_required() {
        assert!(DESCRIPTION.check("").is_ok());
        assert_eq!(TITLE.check("").unwrap_err().to_string(), "Title is required");
    }

    #[test]
    fn completed_must_be_a_json_boolean() {
        let toggle = |completed: Option<Value>| ToggleTaskInput {
            id: valid_id(),
            completed,
        };
        assert!(!validate_toggle(&toggle(Some(Value::Bool(false)))).unwrap().1);
        for bad in [None, Some(Value::from("yes")), Some(Value::from(1)), Some(Value::Null)] {
            let err = validate_toggle(&toggle(bad)).unwrap_err();
            assert_eq!(err.to_string(), COMPLETED_MESSAGE);
        }

        let update = UpdateTaskInput {
            id: valid_id(),
            completed: Some(Value::from("true")),
            ..UpdateTaskInput::default()
        };
        assert_eq!(validate_update(&update).unwrap_err().field, "completed");

        let update = UpdateTaskInput {
            id: valid_id(),
            completed: Some(Value::Bool(true)),
            ..UpdateTaskInput::default()
        };
        assert_eq!(validate_update(&update).unwrap().1.completed, Some(true));
    }
}
