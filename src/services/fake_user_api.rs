//! In-memory backend used by the tests. Same contract as the real one.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{UserId, UserPayload};
use crate::services::user_api::UserApi;
use crate::utils::ApiError;

pub struct FakeUserApi {
    pub records: Mutex<Vec<Value>>,
    fail_list: Mutex<Option<ApiError>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    fail_mutations: Mutex<Option<ApiError>>,
}

impl FakeUserApi {
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_list: Mutex::new(None),
            next_id: AtomicI64::new(100),
            calls: AtomicUsize::new(0),
            fail_mutations: Mutex::new(None),
        }
    }

    /// Backend holding a single user: `{id: 1, "Ann Lee", "ann"}`.
    pub fn ann() -> Self {
        Self::with_records(vec![json!({"id": 1, "fullName": "Ann Lee", "username": "ann"})])
    }

    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every later `list_users` call fail with `err`.
    pub fn fail_list_with(&self, err: ApiError) {
        *self.fail_list.lock().unwrap() = Some(err);
    }

    pub fn fail_mutations_with(&self, err: ApiError) {
        *self.fail_mutations.lock().unwrap() = Some(err);
    }

    fn injected_failure(&self) -> Result<(), ApiError> {
        match self.fail_mutations.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn position(records: &[Value], id: &UserId) -> Option<usize> {
        let id = serde_json::to_value(id).unwrap();
        records.iter().position(|r| r.get("id") == Some(&id))
    }
}

fn not_found() -> ApiError {
    ApiError::Backend {
        status: 404,
        message: Some("User not found".to_string()),
    }
}

#[async_trait]
impl UserApi for FakeUserApi {
    async fn list_users(&self) -> Result<Vec<Value>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_list.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn add_user(&self, payload: &UserPayload) -> Result<Value, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = json!({"id": id, "fullName": payload.full_name, "username": payload.username});
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: &UserId, payload: &UserPayload) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;
        let mut records = self.records.lock().unwrap();
        let pos = Self::position(&records, id).ok_or_else(not_found)?;
        records[pos]["fullName"] = json!(payload.full_name);
        records[pos]["username"] = json!(payload.username);
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;
        let mut records = self.records.lock().unwrap();
        let pos = Self::position(&records, id).ok_or_else(not_found)?;
        records.remove(pos);
        Ok(())
    }
}
