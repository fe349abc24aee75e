//! Plain-text rendering of posts, the editor, and errors.

use std::io::{self, Write};

use client_core::{Editor, RequestError, ValidationErrors};
use shared::domain::Post;

pub fn render_posts<W: Write>(out: &mut W, posts: &[Post]) -> io::Result<()> {
    if posts.is_empty() {
        return writeln!(out, "(no posts)");
    }
    for post in posts {
        writeln!(out, "#{} {}", post.id, post.title)?;
        writeln!(out, "    {}", post.body)?;
    }
    Ok(())
}

pub fn render_editor<W: Write>(out: &mut W, editor: &Editor) -> io::Result<()> {
    match editor {
        Editor::Closed => writeln!(out, "editor closed"),
        Editor::Creating { draft } => {
            writeln!(out, "Create Post")?;
            writeln!(out, "  title: {}", draft.title)?;
            writeln!(out, "  body:  {}", draft.body)
        }
        Editor::Editing { target, draft } => {
            writeln!(out, "Edit Post #{}", target.id)?;
            writeln!(out, "  title: {}", draft.title)?;
            writeln!(out, "  body:  {}", draft.body)
        }
    }
}

pub fn render_validation<W: Write>(out: &mut W, errors: &ValidationErrors) -> io::Result<()> {
    for err in errors.iter() {
        writeln!(out, "  {}: {}", err.field, err.message)?;
    }
    Ok(())
}

pub fn render_request_error<W: Write>(out: &mut W, err: &RequestError) -> io::Result<()> {
    match err.status_code {
        Some(status) => writeln!(out, "error ({status}): {}", err.log_message()),
        None => writeln!(out, "error: {}", err.log_message()),
    }
}

pub fn prompt(editor: &Editor) -> String {
    match editor {
        Editor::Closed => "posts> ".to_string(),
        Editor::Creating { .. } => "posts[new]> ".to_string(),
        Editor::Editing { target, .. } => format!("posts[edit #{}]> ", target.id),
    }
}
