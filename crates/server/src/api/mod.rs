use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use shared::{
    domain::{next_post_id, Post, PostId},
    error::{ApiError, ErrorCode},
    protocol::{NewPostRequest, PostsDocument, UpdatePostRequest},
};
use tokio::sync::RwLock;
use tracing::info;

/// In-memory posts collection, optionally written through to a JSON file.
#[derive(Clone)]
pub struct ApiContext {
    posts: Arc<RwLock<Vec<Post>>>,
    data_file: Option<PathBuf>,
}

impl ApiContext {
    pub fn new(posts: Vec<Post>, data_file: Option<PathBuf>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(posts)),
            data_file,
        }
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), ApiError> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };
        let document = PostsDocument {
            posts: posts.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&document)
            .context("failed to encode posts document")
            .map_err(internal)?;
        tokio::fs::write(path, raw)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))
            .map_err(internal)
    }
}

pub async fn list_posts(ctx: &ApiContext) -> Vec<Post> {
    ctx.posts.read().await.clone()
}

pub async fn get_post(ctx: &ApiContext, id: PostId) -> Result<Post, ApiError> {
    ctx.posts
        .read()
        .await
        .iter()
        .find(|post| post.id == id)
        .cloned()
        .ok_or_else(|| not_found(id))
}

pub async fn create_post(ctx: &ApiContext, req: NewPostRequest) -> Result<Post, ApiError> {
    validate_fields(&req.title, &req.body)?;

    let mut posts = ctx.posts.write().await;
    let id = match req.id {
        Some(id) if posts.iter().any(|post| post.id == id) => {
            return Err(ApiError::new(
                ErrorCode::Conflict,
                format!("post {id} already exists"),
            ));
        }
        Some(id) => id,
        None => next_post_id(&posts).ok_or_else(|| {
            ApiError::new(ErrorCode::Conflict, "no post id left to assign")
        })?,
    };

    let post = Post::new(id, req.title, req.body);
    posts.push(post.clone());
    if let Err(err) = ctx.persist(&posts).await {
        posts.pop();
        return Err(err);
    }
    info!(post_id = %id, "post created");
    Ok(post)
}

/// Replaces the stored post. The path id wins over any id in the body.
pub async fn update_post(
    ctx: &ApiContext,
    id: PostId,
    req: UpdatePostRequest,
) -> Result<Post, ApiError> {
    validate_fields(&req.title, &req.body)?;

    let mut posts = ctx.posts.write().await;
    let index = posts
        .iter()
        .position(|post| post.id == id)
        .ok_or_else(|| not_found(id))?;

    let updated = Post::new(id, req.title, req.body);
    let previous = std::mem::replace(&mut posts[index], updated.clone());
    if let Err(err) = ctx.persist(&posts).await {
        posts[index] = previous;
        return Err(err);
    }
    info!(post_id = %id, "post updated");
    Ok(updated)
}

pub async fn delete_post(ctx: &ApiContext, id: PostId) -> Result<Post, ApiError> {
    let mut posts = ctx.posts.write().await;
    let index = posts
        .iter()
        .position(|post| post.id == id)
        .ok_or_else(|| not_found(id))?;

    let removed = posts.remove(index);
    if let Err(err) = ctx.persist(&posts).await {
        posts.insert(index, removed);
        return Err(err);
    }
    info!(post_id = %id, "post deleted");
    Ok(removed)
}

fn validate_fields(title: &str, body: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "title is required"));
    }
    if body.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "body is required"));
    }
    Ok(())
}

fn not_found(id: PostId) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("post {id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
