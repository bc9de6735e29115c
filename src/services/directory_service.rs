use serde_json::Value;
use std::collections::HashMap;

use crate::models::{
    parse_user_entry, parse_user_id, DirectoryView, FormState, ListStatus, MalformedEntry, Notification, User,
    UserFields, UserId, UserPayload,
};
use crate::services::user_api::UserApi;
use crate::utils::{ApiError, DirectoryError, REFRESH_FAILED_MESSAGE};
use crate::view;

/// Local mirror of the backend collection plus the current selection.
///
/// The selection, when set, always names an id present in the mirror.
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    mirror: HashMap<UserId, UserFields>,
    order: Vec<UserId>,
    selection: Option<UserId>,
    fetch_failed: bool,
}

impl DirectoryState {
    pub fn get(&self, id: &UserId) -> Option<&UserFields> {
        self.mirror.get(id)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.mirror.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    /// Entries in display order.
    pub fn users(&self) -> impl Iterator<Item = (&UserId, &UserFields)> {
        self.order
            .iter()
            .filter_map(move |id| self.mirror.get(id).map(|fields| (id, fields)))
    }

    pub fn selection(&self) -> Option<&UserId> {
        self.selection.as_ref()
    }

    pub fn status(&self) -> ListStatus {
        if self.fetch_failed {
            ListStatus::Error
        } else if self.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Populated
        }
    }

    /// Replaces the mirror wholesale. A selection that no longer exists is dropped.
    /// Returns the ids that appeared more than once; the last occurrence wins.
    pub fn replace_all(&mut self, users: Vec<User>) -> Vec<UserId> {
        self.mirror.clear();
        self.order.clear();
        self.fetch_failed = false;
        let mut duplicates = Vec::new();
        for user in users {
            let id = user.id.clone();
            if !self.insert(user) {
                duplicates.push(id);
            }
        }
        if let Some(selected) = &self.selection {
            if !self.mirror.contains_key(selected) {
                self.selection = None;
            }
        }
        duplicates
    }

    /// Empties the mirror and flags the list as failed.
    pub fn mark_fetch_failed(&mut self) {
        self.mirror.clear();
        self.order.clear();
        self.selection = None;
        self.fetch_failed = true;
    }

    /// Inserts or overwrites an entry. Returns `false` when the id was already present.
    pub fn insert(&mut self, user: User) -> bool {
        let fields = user.fields();
        if self.mirror.insert(user.id.clone(), fields).is_some() {
            return false;
        }
        self.order.push(user.id);
        true
    }

    pub fn update(&mut self, id: &UserId, fields: UserFields) {
        if let Some(entry) = self.mirror.get_mut(id) {
            *entry = fields;
        }
    }

    pub fn remove(&mut self, id: &UserId) -> Option<UserFields> {
        let removed = self.mirror.remove(id)?;
        self.order.retain(|existing| existing != id);
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        Some(removed)
    }

    /// Selects `id` if it is in the mirror. Returns whether the selection changed to it.
    pub fn select(&mut self, id: &UserId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Finds a mirrored id whose textual form is `raw`.
    pub fn find_id(&self, raw: &str) -> Option<&UserId> {
        self.order.iter().find(|id| id.to_string() == raw)
    }
}

/// Outcome of a refresh. Refresh never fails outright; problems are reported here.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub status: ListStatus,
    pub loaded: usize,
    pub rejected: Vec<MalformedEntry>,
    pub error: Option<ApiError>,
}

/// One user action, as issued by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryAction {
    Refresh,
    Create { full_name: String, username: String },
    Update { full_name: String, username: String },
    Delete,
    Select(UserId),
    Deselect,
    ClearForm,
}

/// Client for the user directory: owns the mirror, the selection and the form.
pub struct DirectoryClient<A> {
    api: A,
    state: DirectoryState,
    form: FormState,
    notification: Option<Notification>,
}

impl<A: UserApi> DirectoryClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: DirectoryState::default(),
            form: FormState::default(),
            notification: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> DirectoryView {
        view::render(&self.state, &self.form, self.notification.as_ref())
    }

    /// Maps an id taken from a URL to the mirrored id it names, so that
    /// `"1"` finds a numeric `1` and a textual `"1"` alike.
    pub fn resolve_id(&self, raw: &str) -> UserId {
        self.state
            .find_id(raw)
            .cloned()
            .unwrap_or_else(|| UserId::parse(raw))
    }

    /// Re-fetches the whole collection and rebuilds the mirror from it.
    pub async fn refresh(&mut self) -> RefreshReport {
        let records = match self.api.list_users().await {
            Ok(records) => records,
            Err(e) => {
                log::error!("❌ Error fetching users: {}", e);
                self.state.mark_fetch_failed();
                self.form.actions_visible = false;
                return RefreshReport {
                    status: ListStatus::Error,
                    loaded: 0,
                    rejected: Vec::new(),
                    error: Some(e),
                };
            }
        };

        let (users, rejected) = partition_records(&records);
        for entry in &rejected {
            log::warn!("⚠️  Skipping malformed user record {}", entry);
        }

        for id in self.state.replace_all(users) {
            log::warn!("⚠️  Duplicate user id {} in list, keeping the last record", id);
        }
        let loaded = self.state.len();
        if self.state.selection().is_none() {
            self.form.actions_visible = false;
        }

        log::info!("📋 Directory refreshed: {} users, {} rejected", loaded, rejected.len());

        RefreshReport {
            status: self.state.status(),
            loaded,
            rejected,
            error: None,
        }
    }

    pub async fn create(&mut self, full_name: &str, username: &str) -> Result<User, DirectoryError> {
        let payload = UserPayload::validated(full_name, username).ok_or(DirectoryError::Validation)?;

        let body = self.api.add_user(&payload).await.map_err(|e| {
            log::error!("❌ Error adding user: {}", e);
            DirectoryError::Create(e)
        })?;

        let user = created_user(&body, &payload).map_err(|e| {
            log::error!("❌ Error adding user: {}", e);
            DirectoryError::Create(e)
        })?;

        log::info!("✅ User {} created ({})", user.id, user.username);
        self.state.insert(user.clone());
        self.form.clear_fields();
        self.refresh().await;

        Ok(user)
    }

    /// Updates the selected user. The selection check comes before validation.
    pub async fn update(&mut self, full_name: &str, username: &str) -> Result<UserId, DirectoryError> {
        let id = self.state.selection().cloned().ok_or(DirectoryError::NoSelection)?;
        let payload = UserPayload::validated(full_name, username).ok_or(DirectoryError::Validation)?;

        self.api.update_user(&id, &payload).await.map_err(|e| {
            log::error!("❌ Error updating user {}: {}", id, e);
            DirectoryError::Update(e)
        })?;

        log::info!("✅ User {} updated", id);
        self.state.update(&id, payload.into());
        self.finish_selected_mutation();
        self.refresh().await;

        Ok(id)
    }

    pub async fn delete(&mut self) -> Result<UserId, DirectoryError> {
        let id = self.state.selection().cloned().ok_or(DirectoryError::NoSelection)?;

        self.api.delete_user(&id).await.map_err(|e| {
            log::error!("❌ Error deleting user {}: {}", id, e);
            DirectoryError::Delete(e)
        })?;

        log::info!("✅ User {} deleted", id);
        self.state.remove(&id);
        self.finish_selected_mutation();
        self.refresh().await;

        Ok(id)
    }

    /// Selects a mirrored user and loads it into the edit fields. Unknown ids are ignored.
    pub fn select(&mut self, id: &UserId) -> bool {
        let fields = match self.state.get(id) {
            Some(fields) => fields.clone(),
            None => {
                log::debug!("Ignoring selection of unknown user {}", id);
                return false;
            }
        };

        self.state.select(id);
        self.form.update_full_name = fields.full_name;
        self.form.update_username = fields.username;
        self.form.actions_visible = true;
        true
    }

    pub fn deselect(&mut self) {
        self.state.clear_selection();
        self.form.actions_visible = false;
    }

    pub fn clear_form(&mut self) {
        self.form.clear_fields();
    }

    /// Runs one action and renders the result. This is the error boundary:
    /// failures become the view's notification and never reach the caller.
    pub async fn dispatch(&mut self, action: DirectoryAction) -> DirectoryView {
        self.notification = match action {
            DirectoryAction::Refresh => {
                let report = self.refresh().await;
                report.error.map(|_| Notification::error(REFRESH_FAILED_MESSAGE))
            }
            DirectoryAction::Create { full_name, username } => {
                self.form.full_name = full_name;
                self.form.username = username;
                let (full_name, username) = (self.form.full_name.clone(), self.form.username.clone());
                match self.create(&full_name, &username).await {
                    Ok(user) => Some(self.after_mutation(format!("User '{}' added", user.username))),
                    Err(e) => Some(Notification::error(e.to_string())),
                }
            }
            DirectoryAction::Update { full_name, username } => {
                self.form.update_full_name = full_name;
                self.form.update_username = username;
                let (full_name, username) =
                    (self.form.update_full_name.clone(), self.form.update_username.clone());
                match self.update(&full_name, &username).await {
                    Ok(id) => Some(self.after_mutation(format!("User {} updated", id))),
                    Err(e) => Some(Notification::error(e.to_string())),
                }
            }
            DirectoryAction::Delete => match self.delete().await {
                Ok(id) => Some(self.after_mutation(format!("User {} deleted", id))),
                Err(e) => Some(Notification::error(e.to_string())),
            },
            DirectoryAction::Select(id) => {
                self.select(&id);
                None
            }
            DirectoryAction::Deselect => {
                self.deselect();
                None
            }
            DirectoryAction::ClearForm => {
                self.clear_form();
                None
            }
        };

        self.view()
    }

    fn finish_selected_mutation(&mut self) {
        self.state.clear_selection();
        self.form.clear_fields();
        self.form.actions_visible = false;
    }

    /// A mutation that succeeded can still be followed by a failed refresh.
    fn after_mutation(&self, success: String) -> Notification {
        if self.state.status() == ListStatus::Error {
            Notification::error(REFRESH_FAILED_MESSAGE)
        } else {
            Notification::info(success)
        }
    }
}

fn partition_records(records: &[Value]) -> (Vec<User>, Vec<MalformedEntry>) {
    let mut users = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match parse_user_entry(index, record) {
            Ok(user) => users.push(user),
            Err(entry) => rejected.push(entry),
        }
    }
    (users, rejected)
}

/// Reads the created user from the `POST /add-user` body. The id is
/// mandatory; missing names fall back to what was submitted.
fn created_user(body: &Value, payload: &UserPayload) -> Result<User, ApiError> {
    let id = parse_user_id(body.get("id"))
        .map_err(|reason| ApiError::Decode(format!("created user: {}", reason)))?;

    let text = |key: &str, fallback: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    };

    Ok(User {
        id,
        full_name: text("fullName", &payload.full_name),
        username: text("username", &payload.username),
    })
}
