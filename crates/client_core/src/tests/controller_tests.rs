use super::*;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::transport::ApiResponse;

#[derive(Debug, Clone, PartialEq)]
struct Call {
    method: &'static str,
    path: String,
    body: Option<Value>,
}

/// In-process stand-in for the posts API that records every call.
#[derive(Default)]
struct FakeRestClient {
    posts: Mutex<Vec<Post>>,
    calls: Mutex<Vec<Call>>,
    fail_with: Mutex<Option<RequestError>>,
    update_response: Mutex<Option<Value>>,
    empty_list_response: bool,
}

impl FakeRestClient {
    fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    fn fail_next(&self, err: RequestError) {
        *self.fail_with.lock().expect("lock") = Some(err);
    }

    fn respond_to_update_with(&self, data: Value) {
        *self.update_response.lock().expect("lock") = Some(data);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<Value>) -> Result<(), RequestError> {
        self.calls.lock().expect("lock").push(Call {
            method,
            path: path.to_string(),
            body,
        });
        match self.fail_with.lock().expect("lock").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RestClient for FakeRestClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.record("GET", path, None)?;
        if self.empty_list_response {
            return Ok(ApiResponse::empty());
        }
        let posts = self.posts.lock().expect("lock").clone();
        Ok(ApiResponse::ok(serde_json::to_value(posts).expect("json")))
    }

    async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.record("POST", path, Some(body.clone()))?;
        let post: Post = serde_json::from_value(body.clone()).expect("post body");
        self.posts.lock().expect("lock").push(post);
        Ok(ApiResponse::new(201, Some(body)))
    }

    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.record("PUT", path, Some(body.clone()))?;
        let data = self
            .update_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or(body);
        Ok(ApiResponse::ok(data))
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.record("DELETE", path, None)?;
        Ok(ApiResponse::ok(json!({})))
    }
}

fn post(id: i64, title: &str, body: &str) -> Post {
    Post::new(PostId(id), title, body)
}

fn transport_failure() -> RequestError {
    RequestError::transport("connection refused")
}

async fn loaded(posts: Vec<Post>) -> PostsController<FakeRestClient> {
    let mut controller = PostsController::new(FakeRestClient::with_posts(posts));
    controller.load_all().await.expect("load");
    controller
}

#[tokio::test]
async fn load_all_replaces_list_with_server_collection() {
    let controller = loaded(vec![post(1, "first", "a"), post(2, "second", "b")]).await;
    assert_eq!(controller.posts().len(), 2);
    assert_eq!(controller.posts()[1], post(2, "second", "b"));
    assert_eq!(
        controller.client().calls(),
        vec![Call {
            method: "GET",
            path: "/posts".into(),
            body: None,
        }]
    );
}

#[tokio::test]
async fn load_failure_leaves_list_empty() {
    let client = FakeRestClient::with_posts(vec![post(1, "first", "a")]);
    client.fail_next(RequestError::from_status(
        503,
        Some("Service Unavailable"),
        r#"{"code":"internal","message":"try later"}"#,
    ));
    let mut controller = PostsController::new(client);

    let err = controller.load_all().await.expect_err("must fail");
    assert_eq!(err.log_message(), "try later");
    assert!(controller.posts().is_empty());
}

#[tokio::test]
async fn load_without_payload_keeps_current_list() {
    let client = FakeRestClient {
        empty_list_response: true,
        ..FakeRestClient::default()
    };
    let mut controller = PostsController::new(client);
    controller.load_all().await.expect("load");
    assert!(controller.posts().is_empty());
}

#[tokio::test]
async fn successful_creates_append_one_entry_each() {
    let mut controller = loaded(vec![post(3, "three", "x")]).await;

    for (i, title) in ["alpha", "bravo", "charlie"].into_iter().enumerate() {
        let before = controller.posts().len();
        controller.open_editor(None);
        assert!(controller.set_draft(PostDraft::new(title, "body text")));

        let created = controller.submit().await.expect("create");
        assert_eq!(controller.posts().len(), before + 1);
        assert_eq!(created.id, PostId(4 + i as i64));
        let last = controller.posts().last().expect("last");
        assert_eq!(last.title, title);
        assert_eq!(last.body, "body text");
        assert!(!controller.editor().is_open());
    }

    let first_post = controller
        .client()
        .calls()
        .into_iter()
        .find(|call| call.method == "POST")
        .expect("post call");
    assert_eq!(
        first_post.body,
        Some(json!({ "id": 4, "title": "alpha", "body": "body text" }))
    );
}

#[tokio::test]
async fn create_on_empty_list_uses_id_one() {
    let mut controller = loaded(Vec::new()).await;
    let created = controller
        .dispatch(SubmitAction::Create(PostDraft::new("abcd", "x")))
        .await
        .expect("create");
    assert_eq!(created.id, PostId(1));
}

#[tokio::test]
async fn update_replaces_entry_with_response_payload() {
    let mut controller = loaded(vec![
        post(4, "four", "a"),
        post(5, "Old", "y"),
        post(6, "six", "b"),
    ])
    .await;
    controller
        .client()
        .respond_to_update_with(json!({ "id": 5, "title": "Hi There (saved)", "body": "x" }));

    let target = controller.state().find(PostId(5)).cloned();
    controller.open_editor(target);
    controller.set_title("Hi There");
    controller.set_body("x");

    let updated = controller.submit().await.expect("update");
    assert_eq!(updated, post(5, "Hi There (saved)", "x"));
    assert_eq!(
        controller.posts(),
        &[post(4, "four", "a"), post(5, "Hi There (saved)", "x"), post(6, "six", "b")]
    );
    assert_eq!(controller.editor().editing(), None);
    assert!(!controller.editor().is_open());

    let put = controller.client().calls().pop().expect("put call");
    assert_eq!(put.method, "PUT");
    assert_eq!(put.path, "/posts/5");
    assert_eq!(
        put.body,
        Some(json!({ "id": 5, "title": "Hi There", "body": "x" }))
    );
}

#[tokio::test]
async fn update_requires_editing_the_same_post() {
    let mut controller = loaded(vec![post(5, "Old", "y"), post(7, "seven", "z")]).await;
    let calls_before = controller.client().calls().len();

    let err = controller
        .dispatch(SubmitAction::Update(PostId(5), PostDraft::new("Hi There", "x")))
        .await
        .expect_err("editor closed");
    assert_eq!(err, SubmitError::NotEditing(PostId(5)));

    controller.open_editor(Some(post(7, "seven", "z")));
    let err = controller
        .dispatch(SubmitAction::Update(PostId(5), PostDraft::new("Hi There", "x")))
        .await
        .expect_err("editing another post");
    assert_eq!(err, SubmitError::NotEditing(PostId(5)));
    assert_eq!(controller.client().calls().len(), calls_before);
}

#[tokio::test]
async fn delete_removes_exactly_the_matching_entry() {
    let mut controller = loaded(vec![
        post(9, "nine", "a"),
        post(5, "five", "b"),
        post(2, "two", "c"),
    ])
    .await;

    controller.delete(PostId(5)).await.expect("delete");
    assert_eq!(
        controller.posts(),
        &[post(9, "nine", "a"), post(2, "two", "c")]
    );
    let call = controller.client().calls().pop().expect("delete call");
    assert_eq!(call.method, "DELETE");
    assert_eq!(call.path, "/posts/5");
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_network() {
    let mut controller = loaded(Vec::new()).await;
    let calls_after_load = controller.client().calls().len();
    controller.open_editor(None);

    controller.set_draft(PostDraft::new("abc", "x"));
    let err = controller.submit().await.expect_err("short title");
    let errors = err.validation().expect("validation error");
    assert_eq!(
        errors.get(crate::validation::Field::Title),
        Some("Title must be at least 4 characters")
    );

    controller.set_draft(PostDraft::new("abcd", ""));
    let err = controller.submit().await.expect_err("missing body");
    assert_eq!(
        err.validation().and_then(|e| e.get(crate::validation::Field::Body)),
        Some("Text is required")
    );
    assert_eq!(controller.client().calls().len(), calls_after_load);
    assert!(controller.editor().is_open());

    controller.set_draft(PostDraft::new("abcd", "x"));
    controller.submit().await.expect("valid draft");
    assert_eq!(controller.client().calls().len(), calls_after_load + 1);
}

#[tokio::test]
async fn create_after_largest_id_is_refused_without_a_call() {
    let mut controller = loaded(vec![post(i64::MAX, "last", "a")]).await;
    let calls_after_load = controller.client().calls().len();
    controller.open_editor(None);
    controller.set_draft(PostDraft::new("abcd", "x"));

    let err = controller.submit().await.expect_err("no id left");
    assert_eq!(err, SubmitError::IdsExhausted);
    assert_eq!(controller.client().calls().len(), calls_after_load);
    assert_eq!(controller.posts(), &[post(i64::MAX, "last", "a")]);
    assert_eq!(
        controller.editor().draft(),
        Some(&PostDraft::new("abcd", "x"))
    );
}

#[tokio::test]
async fn failed_create_keeps_list_and_open_editor() {
    let mut controller = loaded(vec![post(1, "first", "a")]).await;
    let before = controller.posts().to_vec();
    controller.open_editor(None);
    controller.set_draft(PostDraft::new("abcd", "x"));
    controller.client().fail_next(transport_failure());

    let err = controller.submit().await.expect_err("must fail");
    assert_eq!(err.request(), Some(&transport_failure()));
    assert_eq!(controller.posts(), before.as_slice());
    assert!(controller.editor().is_open());
    assert_eq!(controller.editor().draft(), Some(&PostDraft::new("abcd", "x")));
}

#[tokio::test]
async fn failed_update_keeps_list_and_draft() {
    let mut controller = loaded(vec![post(5, "Old", "y")]).await;
    let before = controller.posts().to_vec();
    controller.open_editor(Some(post(5, "Old", "y")));
    controller.set_title("Hi There");
    controller.client().fail_next(transport_failure());

    controller.submit().await.expect_err("must fail");
    assert_eq!(controller.posts(), before.as_slice());
    assert_eq!(controller.editor().editing(), Some(&post(5, "Old", "y")));
    assert_eq!(controller.editor().draft(), Some(&PostDraft::new("Hi There", "y")));
}

#[tokio::test]
async fn failed_delete_keeps_entry() {
    let mut controller = loaded(vec![post(5, "five", "b")]).await;
    controller.client().fail_next(transport_failure());

    controller.delete(PostId(5)).await.expect_err("must fail");
    assert_eq!(controller.posts(), &[post(5, "five", "b")]);
}

#[tokio::test]
async fn submit_without_open_editor_is_rejected() {
    let mut controller = loaded(Vec::new()).await;
    assert!(!controller.set_title("abcd"));
    let err = controller.submit().await.expect_err("closed");
    assert_eq!(err, SubmitError::EditorClosed);
}

#[tokio::test]
async fn open_editor_prefills_and_create_mode_resets() {
    let mut controller = loaded(vec![post(5, "Old", "y")]).await;

    controller.open_editor(Some(post(5, "Old", "y")));
    assert_eq!(controller.editor().draft(), Some(&PostDraft::new("Old", "y")));

    controller.open_editor(None);
    assert_eq!(controller.editor().editing(), None);
    assert_eq!(controller.editor().draft(), Some(&PostDraft::default()));

    controller.close_editor();
    assert!(!controller.editor().is_open());
}
