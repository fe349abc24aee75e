use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, PostsController, ReqwestRestClient, RestClient, SubmitError};
use shared::domain::{PostDraft, PostId};
use tokio::io::AsyncBufRead;
use tracing_subscriber::EnvFilter;

mod shell;
mod view;

#[derive(Parser, Debug)]
#[command(name = "posts", about = "List, create, edit and delete posts on a posts API")]
struct Cli {
    /// Base URL of the posts API. Overrides posts.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every post.
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    /// Edit a post; fields not given keep their current value.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    let client = ReqwestRestClient::from_settings(&settings)
        .with_context(|| format!("cannot use api url '{}'", settings.api_base_url))?;
    tracing::debug!(base_url = client.base_url(), "posts client ready");

    let mut controller = PostsController::new(client);
    controller.load_all().await.ok();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_command(&mut controller, cli.command, stdin, &mut io::stdout()).await
}

async fn run_command<C, R, W>(
    controller: &mut PostsController<C>,
    command: Command,
    input: R,
    out: &mut W,
) -> Result<()>
where
    C: RestClient,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match command {
        Command::List => view::render_posts(out, controller.posts())?,
        Command::Create { title, body } => {
            controller.open_editor(None);
            controller.set_draft(PostDraft::new(title, body));
            submit(controller, out).await?;
        }
        Command::Edit { id, title, body } => {
            let post = controller
                .state()
                .find(PostId(id))
                .cloned()
                .ok_or_else(|| anyhow!("post #{id} not found"))?;
            controller.open_editor(Some(post));
            if let Some(title) = title {
                controller.set_title(title);
            }
            if let Some(body) = body {
                controller.set_body(body);
            }
            submit(controller, out).await?;
        }
        Command::Delete { id } => {
            controller
                .delete(PostId(id))
                .await
                .with_context(|| format!("failed to delete post #{id}"))?;
            writeln!(out, "deleted #{id}")?;
        }
        Command::Shell => shell::run(controller, input, out).await?,
    }
    Ok(())
}

async fn submit<C: RestClient, W: Write>(
    controller: &mut PostsController<C>,
    out: &mut W,
) -> Result<()> {
    match controller.submit().await {
        Ok(post) => {
            writeln!(out, "saved #{}", post.id)?;
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            view::render_validation(out, &errors)?;
            bail!("post not saved: {errors}")
        }
        Err(err) => Err(err).context("post not saved"),
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
