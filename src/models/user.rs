use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Backend-assigned user identifier. The API hands out numeric ids, but
/// string ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// Parses an id coming from a URL segment: numeric text becomes a
    /// numeric id, anything else stays text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => UserId::Number(n),
            Err(_) => UserId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub username: String,
}

/// Editable attributes of a user, as held in the local mirror.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub full_name: String,
    pub username: String,
}

impl User {
    pub fn fields(&self) -> UserFields {
        UserFields {
            full_name: self.full_name.clone(),
            username: self.username.clone(),
        }
    }
}

/// Request body for `POST /add-user` and `PUT /update-user/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub full_name: String,
    pub username: String,
}

impl UserPayload {
    /// Trims both fields and rejects the payload if either ends up empty.
    pub fn validated(full_name: &str, username: &str) -> Option<Self> {
        let full_name = full_name.trim();
        let username = username.trim();
        if full_name.is_empty() || username.is_empty() {
            return None;
        }
        Some(Self {
            full_name: full_name.to_string(),
            username: username.to_string(),
        })
    }
}

impl From<UserPayload> for UserFields {
    fn from(payload: UserPayload) -> Self {
        Self {
            full_name: payload.full_name,
            username: payload.username,
        }
    }
}

/// A list entry that could not be turned into a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedEntry {
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry #{}: {}", self.index, self.reason)
    }
}

impl std::error::Error for MalformedEntry {}

/// Validates one element of the `GET /users` array.
pub fn parse_user_entry(index: usize, entry: &Value) -> Result<User, MalformedEntry> {
    let malformed = |reason: &str| MalformedEntry {
        index,
        reason: reason.to_string(),
    };

    let object = entry
        .as_object()
        .ok_or_else(|| malformed("not a JSON object"))?;

    let id = parse_user_id(object.get("id")).map_err(malformed)?;

    let full_name = required_text(object.get("fullName"))
        .ok_or_else(|| malformed("missing fullName"))?;
    let username = required_text(object.get("username"))
        .ok_or_else(|| malformed("missing username"))?;

    Ok(User {
        id,
        full_name,
        username,
    })
}

/// Reads a backend id. Integers that overflow `i64` are kept as text.
pub fn parse_user_id(value: Option<&Value>) -> Result<UserId, &'static str> {
    match value {
        Some(Value::Number(n)) => {
            if let Some(id) = n.as_i64() {
                Ok(UserId::Number(id))
            } else if let Some(id) = n.as_u64() {
                Ok(UserId::Text(id.to_string()))
            } else {
                Err("id is not an integer")
            }
        }
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(UserId::Text(s.clone())),
        Some(Value::String(_)) => Err("id is empty"),
        Some(Value::Null) | None => Err("missing id"),
        Some(_) => Err("id has an unsupported type"),
    }
}

fn required_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
