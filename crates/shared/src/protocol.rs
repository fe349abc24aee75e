use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostId};

pub const POSTS_ROUTE: &str = "/posts";

pub fn posts_route() -> &'static str {
    POSTS_ROUTE
}

pub fn post_route(id: PostId) -> String {
    format!("{POSTS_ROUTE}/{}", id.0)
}

/// Create request body. The id is optional so servers may assign one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    pub title: String,
    pub body: String,
}

impl From<Post> for NewPostRequest {
    fn from(post: Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title,
            body: post.body,
        }
    }
}

/// Replacement body for `PUT /posts/{id}`. A body id, if sent, is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    pub title: String,
    pub body: String,
}

/// On-disk layout of the dev server's data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsDocument {
    #[serde(default)]
    pub posts: Vec<Post>,
}
