use std::sync::Mutex;

use async_trait::async_trait;
use client_core::{ApiResponse, RequestError, RestClient};
use serde_json::{json, Value};
use shared::domain::Post;

/// Answers like a well-behaved posts API and counts mutating calls.
#[derive(Default)]
pub struct EchoRestClient {
    pub posts: Vec<Post>,
    pub writes: Mutex<u32>,
    pub fail_deletes: bool,
}

impl EchoRestClient {
    pub fn writes(&self) -> u32 {
        *self.writes.lock().expect("lock")
    }

    fn bump(&self) {
        *self.writes.lock().expect("lock") += 1;
    }
}

#[async_trait]
impl RestClient for EchoRestClient {
    async fn get(&self, _path: &str) -> Result<ApiResponse, RequestError> {
        Ok(ApiResponse::ok(serde_json::to_value(&self.posts).expect("json")))
    }

    async fn post(&self, _path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.bump();
        Ok(ApiResponse::new(201, Some(body)))
    }

    async fn put(&self, _path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.bump();
        Ok(ApiResponse::ok(body))
    }

    async fn delete(&self, _path: &str) -> Result<ApiResponse, RequestError> {
        self.bump();
        if self.fail_deletes {
            return Err(RequestError::from_status(
                404,
                Some("Not Found"),
                r#"{"code":"not_found","message":"post 9 not found"}"#,
            ));
        }
        Ok(ApiResponse::ok(json!({})))
    }
}
