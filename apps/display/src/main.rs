mod commands;
mod config;
mod terminal;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{BoardEvent, FeedClient, FeedEvent, HttpCompletionEndpoint, OrderBoard};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{Command, HELP},
    terminal::TerminalSurface,
};

#[derive(Parser, Debug)]
struct Args {
    /// Config file; `display.toml` in the working directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Also write the board as an HTML page to this path on every render.
    #[arg(long)]
    html_output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if args.html_output.is_some() {
        settings.html_output = args.html_output;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let complete_url =
        HttpCompletionEndpoint::endpoint_url(&settings.server_url, &settings.complete_path)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let endpoint = HttpCompletionEndpoint::new(complete_url, settings.complete_timeout)
        .context("failed to build completion http client")?;
    let feed = FeedClient::from_server_url(&settings.server_url, &settings.feed_path)?;
    info!(
        feed = %feed.url(),
        complete = %endpoint.url(),
        complete_timeout = ?settings.complete_timeout,
        html_output = ?settings.html_output,
        "display: starting order board"
    );

    let surface = TerminalSurface::new(settings.html_output.clone(), settings.milk_colors.clone());
    let (board, handle) = OrderBoard::new(surface, Arc::new(endpoint));
    let board_task = tokio::spawn(board.run());

    let feed_task = match feed.spawn(handle.events()).await {
        Ok(task) => Some(task),
        Err(err) => {
            error!(error = %err, "display: order feed unavailable");
            handle
                .send(BoardEvent::Feed(FeedEvent::TransportError(err.to_string())))
                .await?;
            None
        }
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            other => {
                if let Some(event) = other.into_event() {
                    if let Err(err) = handle.dispatch(event) {
                        println!("{err}");
                    }
                }
            }
        }
    }

    if let Some(task) = feed_task {
        task.abort();
    }
    drop(handle);
    board_task.await.context("board task failed")?;
    info!("display: stopped");
    Ok(())
}
