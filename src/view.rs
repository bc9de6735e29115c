//! Pure rendering of client state into a [`DirectoryView`].

use crate::models::{DirectoryView, FormState, ListItem, Notification, UserFields, UserId};
use crate::services::directory_service::DirectoryState;

/// Text of one list entry, e.g. `Ann Lee (ann) - ID: 1`.
pub fn item_label(id: &UserId, fields: &UserFields) -> String {
    format!("{} ({}) - ID: {}", fields.full_name, fields.username, id)
}

/// Rebuilds the whole view from scratch. Entries keep the order in which the
/// backend returned them; at most one entry carries the selected mark.
pub fn render(
    state: &DirectoryState,
    form: &FormState,
    notification: Option<&Notification>,
) -> DirectoryView {
    let selection = state.selection();

    let items = state
        .users()
        .map(|(id, fields)| ListItem {
            id: id.clone(),
            label: item_label(id, fields),
            selected: selection == Some(id),
        })
        .collect();

    DirectoryView {
        items,
        status: state.status(),
        form: form.clone(),
        selected_id: selection.cloned(),
        notification: notification.cloned(),
    }
}
