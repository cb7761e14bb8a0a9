//! Request bodies for the todo routes.
//!
//! Fields arrive as raw JSON values and are checked by the rules in
//! [`crate::validate`], so a null or wrong-typed field becomes a reported
//! violation alongside the others instead of a decode failure.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::store::{NewTodo, TodoPatch};
use crate::validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(required(message = "Text is required"), custom = "crate::validate::text")]
    pub text: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::priority")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::category")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::due_date")]
    pub due_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::completed")]
    pub completed: Option<Value>,
}

impl CreateTodoRequest {
    /// Builds the insertable record. Callers run [`Validate::validate`]
    /// first, so the conversions here cannot miss.
    pub fn into_new_todo(self, owner: Uuid) -> NewTodo {
        NewTodo {
            user_id: owner,
            text: self
                .text
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            priority: self
                .priority
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            category: self
                .category
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            due_date: self
                .due_date
                .as_ref()
                .and_then(Value::as_str)
                .and_then(validate::parse_date),
            completed: self
                .completed
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::updated_text")]
    pub text: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::priority")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::category")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::nullable_due_date")]
    pub due_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom = "crate::validate::completed")]
    pub completed: Option<Value>,
}

impl UpdateTodoRequest {
    /// Builds the patch. An absent `dueDate` leaves the stored date alone;
    /// an explicit null clears it.
    pub fn into_patch(self) -> TodoPatch {
        TodoPatch {
            text: self
                .text
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned),
            priority: self
                .priority
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            category: self
                .category
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            due_date: self
                .due_date
                .map(|value| value.as_str().and_then(validate::parse_date)),
            completed: self.completed.as_ref().and_then(Value::as_bool),
        }
    }
}

/// Body of a successful delete, echoing the removed id.
#[derive(Debug, Serialize)]
pub struct DeletedTodo {
    pub id: Uuid,
}

// Keeps an explicit null distinct from an absent field: with a plain
// `Option` serde folds both into `None`, and the null could no longer
// be reported as a violation.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::field_errors;
    use crate::store::{Category, Priority};
    use serde_json::json;
    use time::macros::date;

    fn create_payload(value: Value) -> CreateTodoRequest {
        serde_json::from_value(value).expect("create body decodes")
    }

    fn update_payload(value: Value) -> UpdateTodoRequest {
        serde_json::from_value(value).expect("update body decodes")
    }

    #[test]
    fn create_applies_defaults_for_absent_fields() {
        let payload = create_payload(json!({"text": "buy milk"}));
        payload.validate().unwrap();

        let new = payload.into_new_todo(Uuid::new_v4());
        assert_eq!(new.text, "buy milk");
        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.category, Category::Personal);
        assert_eq!(new.due_date, None);
        assert!(!new.completed);
    }

    #[test]
    fn create_keeps_explicit_values() {
        let payload = create_payload(json!({
            "text": "quarterly report",
            "priority": "high",
            "category": "work",
            "dueDate": "2025-09-01",
            "completed": true,
        }));
        payload.validate().unwrap();

        let new = payload.into_new_todo(Uuid::new_v4());
        assert_eq!(new.priority, Priority::High);
        assert_eq!(new.category, Category::Work);
        assert_eq!(new.due_date, Some(date!(2025 - 09 - 01)));
        assert!(new.completed);
    }

    #[test]
    fn create_collects_every_bad_field() {
        let payload = create_payload(json!({
            "text": "",
            "priority": "urgent",
            "category": "circus",
            "dueDate": "someday",
        }));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["category", "dueDate", "priority", "text"]);
    }

    #[test]
    fn create_rejects_an_explicit_null_due_date() {
        let payload = create_payload(json!({"text": "pay rent", "dueDate": null}));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "dueDate");
        assert_eq!(details[0].message, "Due date must be a valid date");
    }

    #[test]
    fn create_rejects_explicit_nulls_for_every_optional_field() {
        let payload = create_payload(json!({
            "text": "pay rent",
            "priority": null,
            "category": null,
            "dueDate": null,
            "completed": null,
        }));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["category", "completed", "dueDate", "priority"]);
    }

    #[test]
    fn create_collects_wrong_typed_fields() {
        let payload = create_payload(json!({
            "text": "walk the dog",
            "completed": "yes",
            "priority": 5,
        }));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["completed", "priority"]);
        assert_eq!(details[0].message, "Completed must be a boolean");
        assert_eq!(details[1].message, "Priority must be low, medium, or high");
    }

    #[test]
    fn create_requires_text() {
        let errors = create_payload(json!({})).validate().unwrap_err();
        let details = field_errors(&errors);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "text");
        assert_eq!(details[0].message, "Text is required");

        let errors = create_payload(json!({"text": null})).validate().unwrap_err();
        assert_eq!(field_errors(&errors)[0].message, "Text is required");
    }

    #[test]
    fn update_accepts_an_empty_body() {
        let payload = update_payload(json!({}));
        payload.validate().unwrap();

        let patch = payload.into_patch();
        assert_eq!(patch.text, None);
        assert_eq!(patch.priority, None);
        assert_eq!(patch.category, None);
        assert_eq!(patch.due_date, None);
        assert_eq!(patch.completed, None);
    }

    #[test]
    fn update_distinguishes_absent_null_and_value_for_due_date() {
        let patch = update_payload(json!({})).into_patch();
        assert_eq!(patch.due_date, None);

        let payload = update_payload(json!({"dueDate": null}));
        payload.validate().unwrap();
        assert_eq!(payload.into_patch().due_date, Some(None));

        let payload = update_payload(json!({"dueDate": "2025-09-01"}));
        payload.validate().unwrap();
        assert_eq!(payload.into_patch().due_date, Some(Some(date!(2025 - 09 - 01))));
    }

    #[test]
    fn update_rejects_empty_text_and_unknown_enums_together() {
        let payload = update_payload(json!({
            "text": "",
            "priority": "urgent",
            "category": "circus",
        }));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["category", "priority", "text"]);
        assert_eq!(details[2].message, "Text cannot be empty");
    }

    #[test]
    fn update_rejects_a_null_due_date_only_when_malformed() {
        update_payload(json!({"dueDate": null})).validate().unwrap();

        let errors = update_payload(json!({"dueDate": "soon"})).validate().unwrap_err();
        let details = field_errors(&errors);
        assert_eq!(details[0].field, "dueDate");
        assert_eq!(details[0].message, "Due date must be a valid date");
    }

    #[test]
    fn update_rejects_null_everywhere_but_due_date() {
        let payload = update_payload(json!({
            "text": null,
            "priority": null,
            "category": null,
            "dueDate": null,
            "completed": null,
        }));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["category", "completed", "priority", "text"]);
        assert_eq!(details[3].message, "Text cannot be empty");
    }

    #[test]
    fn update_collects_wrong_typed_fields() {
        let payload = update_payload(json!({"text": 7, "completed": "done"}));

        let errors = payload.validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["completed", "text"]);
        assert_eq!(details[0].message, "Completed must be a boolean");
    }
}
