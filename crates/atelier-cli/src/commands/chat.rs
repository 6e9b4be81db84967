//! Interactive chat REPL.

use anyhow::Result;
use atelier_application::{ConversationSession, SessionError, TurnOutcome, Workbench};
use atelier_core::gallery::{SortKey, TimeRange, Viewport};
use chrono::Utc;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use super::render;
use crate::helper::CliHelper;

const GALLERY_ROWS: usize = 10;

enum Flow {
    Continue,
    Quit,
}

pub async fn run() -> Result<()> {
    let (workbench, store) = super::open_workbench().await?;
    let session = workbench.session();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Atelier ===".bright_magenta().bold());
    println!(
        "{}",
        "Describe the interface you want. Type /help for commands, /quit to exit.".bright_black()
    );
    let restored = session.messages();
    if !restored.is_empty() {
        println!(
            "{}",
            format!("Restored {} messages from the last session.", restored.len()).bright_black()
        );
        for message in restored.iter().rev().take(4).rev() {
            render::message(message);
        }
    }
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let flow = if trimmed.starts_with('/') {
                    slash_command(&workbench, trimmed).await
                } else {
                    run_turn(&session, trimmed).await;
                    Flow::Continue
                };
                if let Flow::Quit = flow {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    super::save_snapshot(&workbench, &store).await?;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

/// Submits one turn; Ctrl-C while it is in flight cancels it.
async fn run_turn(session: &ConversationSession, text: &str) {
    println!("{}", "Thinking... (Ctrl-C to cancel)".bright_black());

    let submit = session.submit(text);
    tokio::pin!(submit);
    let result = loop {
        tokio::select! {
            result = &mut submit => break result,
            _ = tokio::signal::ctrl_c() => {
                if session.cancel() {
                    println!("{}", "Cancelling...".yellow());
                }
            }
        }
    };

    match result {
        Ok(TurnOutcome::Committed { message, artifact }) => {
            render::message(&message);
            if let Some(artifact) = &artifact {
                render::artifact(artifact);
            }
        }
        Ok(TurnOutcome::Failed(error)) => render::error(&error),
        Ok(TurnOutcome::Cancelled) => println!("{}", "Cancelled.".bright_black()),
        Err(SessionError::Busy) => {
            println!("{}", "Still working on the previous message.".yellow())
        }
        Err(SessionError::EmptyMessage) => {}
    }
}

async fn slash_command(workbench: &Workbench, line: &str) -> Flow {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    let gallery = workbench.gallery();

    match command {
        "/quit" | "/exit" => return Flow::Quit,
        "/help" => print_help(),
        "/clear" => match workbench.session().clear() {
            Ok(()) => println!("{}", "Conversation cleared. Designs are kept.".bright_black()),
            Err(err) => println!("{}", err.to_string().yellow()),
        },
        "/gallery" => {
            let index = gallery.read().await;
            render::page(&index.page("", viewport(workbench, 0)));
        }
        "/search" => {
            if arg.is_empty() {
                println!("{}", "Usage: /search <query>".yellow());
            } else {
                let mut index = gallery.write().await;
                index.remember_search(arg);
                render::page(&index.page(arg, viewport(workbench, 0)));
            }
        }
        "/recent" => {
            let index = gallery.read().await;
            if index.recent_searches().is_empty() {
                println!("{}", "No recent searches.".bright_black());
            }
            for query in index.recent_searches() {
                println!("  {}", query);
            }
            let popular: Vec<String> = index
                .popular_tags(None)
                .into_iter()
                .map(|t| format!("{} ({})", t.tag, t.count))
                .collect();
            if !popular.is_empty() {
                println!("{} {}", "Popular tags:".bright_black(), popular.join(", "));
            }
        }
        "/sort" => match arg.parse::<SortKey>() {
            Ok(key) => {
                let mut index = gallery.write().await;
                index.sorted_by(key);
                println!("{}", format!("Gallery sorted by {key}.").bright_black());
            }
            Err(err) => println!("{}", err.yellow()),
        },
        "/stats" => {
            let range = if arg.is_empty() {
                Ok(TimeRange::Week)
            } else {
                arg.parse::<TimeRange>()
            };
            match range {
                Ok(range) => render::stats(&gallery.read().await.stats(range, Utc::now())),
                Err(err) => println!("{}", err.yellow()),
            }
        }
        other => println!("{}", format!("Unknown command: {other}").bright_black()),
    }
    Flow::Continue
}

fn viewport(workbench: &Workbench, page: usize) -> Viewport {
    let settings = &workbench.config().gallery;
    // One row less than a full page so the window holds exactly GALLERY_ROWS.
    let rows = GALLERY_ROWS as f64;
    Viewport {
        scroll_offset: page as f64 * rows * settings.item_height,
        viewport_height: (rows - 1.0) * settings.item_height,
        item_height: settings.item_height,
        overscan: 0,
    }
}

fn print_help() {
    let lines = [
        ("/gallery", "list designs in the current sort order"),
        ("/search <query>", "search designs (synonyms included)"),
        ("/sort <key>", "newest, oldest or title"),
        ("/stats [range]", "week, month or all"),
        ("/recent", "recent searches and popular tags"),
        ("/clear", "clear the conversation (designs are kept)"),
        ("/quit", "save and exit"),
    ];
    for (command, description) in lines {
        println!("  {} {}", format!("{command:<18}").bright_cyan(), description);
    }
}
