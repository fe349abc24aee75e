//! Interactive session: one controller, many commands.

use std::io::Write;

use anyhow::Result;
use client_core::{PostsController, RestClient, SubmitError};
use shared::domain::PostId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::view;

const HELP: &str = "\
commands:
  list             show posts
  reload           fetch posts from the server
  new              open the editor to create a post
  edit <id>        open the editor on a post
  title <text>     set the draft title
  body <text>      set the draft body
  submit           save the draft
  cancel           close the editor
  delete <id>      delete a post
  help             show this text
  quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    Reload,
    New,
    Edit(PostId),
    Title(String),
    Body(String),
    Submit,
    Cancel,
    Delete(PostId),
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => ShellCommand::Empty,
            "list" | "ls" => ShellCommand::List,
            "reload" => ShellCommand::Reload,
            "new" => ShellCommand::New,
            "edit" => ShellCommand::Edit(parse_id(word, rest)?),
            "title" => ShellCommand::Title(rest.to_string()),
            "body" => ShellCommand::Body(rest.to_string()),
            "submit" | "save" => ShellCommand::Submit,
            "cancel" => ShellCommand::Cancel,
            "delete" | "rm" => ShellCommand::Delete(parse_id(word, rest)?),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{other}'; try 'help'")),
        };
        Ok(command)
    }
}

fn parse_id(word: &str, raw: &str) -> Result<PostId, String> {
    if raw.is_empty() {
        return Err(format!("usage: {word} <id>"));
    }
    raw.parse::<i64>()
        .map(PostId)
        .map_err(|_| format!("'{raw}' is not a post id"))
}

pub async fn run<C, R, W>(controller: &mut PostsController<C>, input: R, out: &mut W) -> Result<()>
where
    C: RestClient,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{}", view::prompt(controller.editor()))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(controller, command, out).await?;
    }
    Ok(())
}

async fn execute<C, W>(
    controller: &mut PostsController<C>,
    command: ShellCommand,
    out: &mut W,
) -> Result<()>
where
    C: RestClient,
    W: Write,
{
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::List => view::render_posts(out, controller.posts())?,
        ShellCommand::Reload => match controller.load_all().await {
            Ok(()) => view::render_posts(out, controller.posts())?,
            Err(err) => view::render_request_error(out, &err)?,
        },
        ShellCommand::New => {
            controller.open_editor(None);
            view::render_editor(out, controller.editor())?;
        }
        ShellCommand::Edit(id) => match controller.state().find(id).cloned() {
            Some(post) => {
                controller.open_editor(Some(post));
                view::render_editor(out, controller.editor())?;
            }
            None => writeln!(out, "no post #{id}")?,
        },
        ShellCommand::Title(title) => {
            if !controller.set_title(title) {
                writeln!(out, "no editor open; use 'new' or 'edit <id>'")?;
            }
        }
        ShellCommand::Body(body) => {
            if !controller.set_body(body) {
                writeln!(out, "no editor open; use 'new' or 'edit <id>'")?;
            }
        }
        ShellCommand::Submit => match controller.submit().await {
            Ok(post) => writeln!(out, "saved #{}", post.id)?,
            Err(SubmitError::Invalid(errors)) => view::render_validation(out, &errors)?,
            Err(SubmitError::Request(err)) => view::render_request_error(out, &err)?,
            Err(err) => writeln!(out, "{err}")?,
        },
        ShellCommand::Cancel => controller.close_editor(),
        ShellCommand::Delete(id) => match controller.delete(id).await {
            Ok(()) => writeln!(out, "deleted #{id}")?,
            Err(err) => view::render_request_error(out, &err)?,
        },
        ShellCommand::Help => writeln!(out, "{HELP}")?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
