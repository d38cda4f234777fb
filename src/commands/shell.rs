//! Interactive session.
//!
//! One controller lives for the whole session, so search results, optimistic
//! saves and refreshes all act on the same state.

use super::favorites::{find_repository, print_saved};
use super::search::print_repositories;
use super::Context;
use anyhow::Result;
use repofav::{RefreshOutcome, RefreshTrigger, RepoId, SearchOutcome, SyncController};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  search <user>       list a GitHub user's repositories
  save <id|name>      save a listed repository
  unsave <id|name>    remove a repository from favorites
  list                show the listed repositories again
  favorites           show the listed repositories you've saved
  refresh             reload favorites from the backend
  help                this text
  quit                leave";

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Search(&'a str),
    Save(&'a str),
    Unsave(&'a str),
    List,
    Favorites,
    Refresh,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    let line = line.trim();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };
    match (cmd, arg) {
        ("", _) => Line::Empty,
        ("search", a) if !a.is_empty() => Line::Search(a),
        ("save", a) if !a.is_empty() => Line::Save(a),
        ("unsave", a) if !a.is_empty() => Line::Unsave(a),
        ("list" | "ls", _) => Line::List,
        ("favorites" | "favs", _) => Line::Favorites,
        ("refresh", _) => Line::Refresh,
        ("help" | "?", _) => Line::Help,
        ("quit" | "exit", _) => Line::Quit,
        _ => Line::Unknown(line),
    }
}

pub async fn run_shell(ctx: &Context) -> Result<()> {
    let controller = ctx.controller()?;

    println!("repofav shell on {}. Type 'help' for commands.", ctx.backend_url);
    if let Err(e) = controller.enter_view().await {
        eprintln!("Couldn't load your favorites: {}", e.user_message());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("repofav> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            Line::Quit => break,
            Line::Empty => {}
            Line::Help => println!("{}", HELP),
            Line::Unknown(input) => println!("Unknown command: {}. Try 'help'.", input),
            Line::List => print_repositories(&controller.repositories()),
            Line::Favorites => print_saved(&controller.favorite_repositories()),
            Line::Refresh => refresh(&controller).await,
            Line::Search(user) => search(&controller, user).await,
            Line::Save(selector) => save(&controller, selector).await,
            Line::Unsave(selector) => unsave(&controller, selector).await,
        }
    }
    Ok(())
}

async fn refresh(controller: &SyncController) {
    match controller.request_refresh(RefreshTrigger::Manual).await {
        Ok(RefreshOutcome::Applied { favorites }) => println!("{} favorites loaded.", favorites),
        Ok(_) => println!("Favorites are up to date."),
        Err(e) => eprintln!("Refresh failed: {}", e.user_message()),
    }
}

async fn search(controller: &SyncController, user: &str) {
    match controller.search(user).await {
        Ok(SearchOutcome::Loaded {
            repositories,
            refresh_error,
        }) => {
            print_repositories(&repositories);
            if let Some(message) = refresh_error {
                eprintln!("Couldn't load your favorites: {}", message);
            }
        }
        Ok(SearchOutcome::Stale) => {}
        Err(e) => eprintln!("Search failed: {}", e.user_message()),
    }
}

async fn save(controller: &SyncController, selector: &str) {
    let Some(repo) = find_repository(&controller.repositories(), selector) else {
        println!("No listed repository matches '{}'. Search first.", selector);
        return;
    };
    match controller.save(&repo).await {
        Ok(()) => println!("✓ Saved {}", repo.name),
        Err(e) => eprintln!("Save failed: {}", e.user_message()),
    }
}

async fn unsave(controller: &SyncController, selector: &str) {
    let id = match find_repository(&controller.repositories(), selector) {
        Some(repo) => repo.id,
        None => match selector.parse::<RepoId>() {
            Ok(id) => id,
            Err(_) => {
                println!("No listed repository matches '{}'.", selector);
                return;
            }
        },
    };
    match controller.unsave(id).await {
        Ok(()) => println!("✓ Removed {} from favorites", id),
        Err(e) => eprintln!("Unsave failed: {}", e.user_message()),
    }
}
