use shared::domain::{next_post_id, Post, PostDraft, PostId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Editor {
    #[default]
    Closed,
    Creating {
        draft: PostDraft,
    },
    Editing {
        target: Post,
        draft: PostDraft,
    },
}

impl Editor {
    pub fn is_open(&self) -> bool {
        !matches!(self, Editor::Closed)
    }

    pub fn editing(&self) -> Option<&Post> {
        match self {
            Editor::Editing { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&PostDraft> {
        match self {
            Editor::Closed => None,
            Editor::Creating { draft } | Editor::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut PostDraft> {
        match self {
            Editor::Closed => None,
            Editor::Creating { draft } | Editor::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn action(&self) -> Option<SubmitAction> {
        match self {
            Editor::Closed => None,
            Editor::Creating { draft } => Some(SubmitAction::Create(draft.clone())),
            Editor::Editing { target, draft } => {
                Some(SubmitAction::Update(target.id, draft.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Create(PostDraft),
    Update(PostId, PostDraft),
}

impl SubmitAction {
    pub fn draft(&self) -> &PostDraft {
        match self {
            SubmitAction::Create(draft) | SubmitAction::Update(_, draft) => draft,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    pub posts: Vec<Post>,
    pub editor: Editor,
}

impl PostsState {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            editor: Editor::Closed,
        }
    }

    pub fn find(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn next_post_id(&self) -> Option<PostId> {
        next_post_id(&self.posts)
    }

    pub fn apply_loaded(self, posts: Vec<Post>) -> Self {
        Self { posts, ..self }
    }

    pub fn apply_created(mut self, post: Post) -> Self {
        self.posts.push(post);
        self.close_editor()
    }

    /// Replaces the entry with `id` by the server's copy and closes the editor.
    pub fn apply_updated(mut self, id: PostId, post: Post) -> Self {
        if let Some(slot) = self.posts.iter_mut().find(|existing| existing.id == id) {
            *slot = post;
        }
        self.close_editor()
    }

    pub fn apply_deleted(mut self, id: PostId) -> Self {
        self.posts.retain(|post| post.id != id);
        self
    }

    pub fn open_editor(self, post: Option<Post>) -> Self {
        let editor = match post {
            Some(target) => Editor::Editing {
                draft: PostDraft::from(&target),
                target,
            },
            None => Editor::Creating {
                draft: PostDraft::default(),
            },
        };
        Self { editor, ..self }
    }

    pub fn close_editor(self) -> Self {
        Self {
            editor: Editor::Closed,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
