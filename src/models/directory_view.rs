use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// What the list area shows in place of (or alongside) its entries.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Populated,
    Empty,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[schema(value_type = String)]
    pub id: UserId,
    pub label: String,
    pub selected: bool,
}

/// The editable input fields of the page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub full_name: String,
    pub username: String,
    pub update_full_name: String,
    pub update_username: String,
    /// Whether the update/delete panel is shown.
    pub actions_visible: bool,
}

impl FormState {
    pub fn clear_fields(&mut self) {
        self.full_name.clear();
        self.username.clear();
        self.update_full_name.clear();
        self.update_username.clear();
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// User-facing message produced at the operation boundary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[schema(value_type = String)]
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Complete description of the page, rebuilt from client state on every render.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    pub items: Vec<ListItem>,
    pub status: ListStatus,
    pub form: FormState,
    #[schema(value_type = Option<String>)]
    pub selected_id: Option<UserId>,
    pub notification: Option<Notification>,
}
