use serde_json::Value;
use shared::{
    domain::{Post, PostDraft, PostId},
    protocol::{post_route, posts_route, NewPostRequest},
};
use tracing::{debug, info, warn};

use crate::{
    error::{RequestError, SubmitError},
    state::{Editor, PostsState, SubmitAction},
    transport::RestClient,
    validation::FormValidator,
};

pub struct PostsController<R: RestClient> {
    client: R,
    state: PostsState,
    validator: FormValidator,
}

impl<R: RestClient> PostsController<R> {
    pub fn new(client: R) -> Self {
        Self::with_validator(client, FormValidator::post_form())
    }

    pub fn with_validator(client: R, validator: FormValidator) -> Self {
        Self {
            client,
            state: PostsState::default(),
            validator,
        }
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    pub fn state(&self) -> &PostsState {
        &self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.state.posts
    }

    pub fn editor(&self) -> &Editor {
        &self.state.editor
    }

    fn transition(&mut self, f: impl FnOnce(PostsState) -> PostsState) {
        self.state = f(std::mem::take(&mut self.state));
    }

    pub async fn load_all(&mut self) -> Result<(), RequestError> {
        let loaded = match self.client.get(posts_route()).await {
            Ok(response) => response.decode::<Vec<Post>>("post list"),
            Err(err) => Err(err),
        };

        match loaded {
            Ok(Some(posts)) => {
                info!(count = posts.len(), "loaded posts");
                self.transition(|state| state.apply_loaded(posts));
                Ok(())
            }
            Ok(None) => {
                debug!("post list response carried no data");
                Ok(())
            }
            Err(err) => {
                err.log("load posts");
                Err(err)
            }
        }
    }

    pub fn open_editor(&mut self, post: Option<Post>) {
        self.transition(|state| state.open_editor(post));
    }

    pub fn close_editor(&mut self) {
        self.transition(PostsState::close_editor);
    }

    /// Replaces the open draft. Returns `false` when no editor is open.
    pub fn set_draft(&mut self, draft: PostDraft) -> bool {
        match self.state.editor.draft_mut() {
            Some(slot) => {
                *slot = draft;
                true
            }
            None => false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        match self.state.editor.draft_mut() {
            Some(draft) => {
                draft.title = title.into();
                true
            }
            None => false,
        }
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> bool {
        match self.state.editor.draft_mut() {
            Some(draft) => {
                draft.body = body.into();
                true
            }
            None => false,
        }
    }

    pub async fn submit(&mut self) -> Result<Post, SubmitError> {
        let action = self.state.editor.action().ok_or(SubmitError::EditorClosed)?;
        self.dispatch(action).await
    }

    pub async fn dispatch(&mut self, action: SubmitAction) -> Result<Post, SubmitError> {
        self.validator.validate(action.draft())?;
        match action {
            SubmitAction::Create(draft) => self.create(draft).await,
            SubmitAction::Update(id, draft) => self.update(id, draft).await,
        }
    }

    async fn create(&mut self, draft: PostDraft) -> Result<Post, SubmitError> {
        let Some(id) = self.state.next_post_id() else {
            warn!("largest post id is i64::MAX; refusing to create");
            return Err(SubmitError::IdsExhausted);
        };
        let request = NewPostRequest::from(draft.into_post(id));
        let created = self
            .send_post(request)
            .await
            .inspect_err(|err| err.log("create post"))?;

        info!(post_id = %created.id, "created post");
        self.transition(|state| state.apply_created(created.clone()));
        Ok(created)
    }

    async fn update(&mut self, id: PostId, draft: PostDraft) -> Result<Post, SubmitError> {
        let target = match self.state.editor.editing() {
            Some(target) if target.id == id => target.clone(),
            _ => return Err(SubmitError::NotEditing(id)),
        };
        let merged = target.merged_with(&draft);
        let updated = self
            .send_put(id, &merged)
            .await
            .inspect_err(|err| err.log("update post"))?;

        info!(post_id = %id, "updated post");
        self.transition(|state| state.apply_updated(id, updated.clone()));
        Ok(updated)
    }

    pub async fn delete(&mut self, id: PostId) -> Result<(), RequestError> {
        self.client
            .delete(&post_route(id))
            .await
            .inspect_err(|err| err.log("delete post"))?;

        info!(post_id = %id, "deleted post");
        self.transition(|state| state.apply_deleted(id));
        Ok(())
    }

    async fn send_post(&self, request: NewPostRequest) -> Result<Post, RequestError> {
        let body = to_body(&request)?;
        let response = self.client.post(posts_route(), body).await?;
        let status = response.status;
        response
            .decode::<Post>("created post")?
            .ok_or_else(|| RequestError::decode(status, "created post", "empty body"))
    }

    async fn send_put(&self, id: PostId, post: &Post) -> Result<Post, RequestError> {
        let body = to_body(post)?;
        let response = self.client.put(&post_route(id), body).await?;
        let status = response.status;
        response
            .decode::<Post>("updated post")?
            .ok_or_else(|| RequestError::decode(status, "updated post", "empty body"))
    }
}

fn to_body(value: &impl serde::Serialize) -> Result<Value, RequestError> {
    serde_json::to_value(value)
        .map_err(|e| RequestError::transport(format!("failed to encode request body: {e}")))
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
