use super::Context;
use anyhow::Result;
use repofav::{Repository, SearchOutcome};

pub async fn search_repos(ctx: &Context, user: &str) -> Result<()> {
    let controller = ctx.controller()?;

    if let SearchOutcome::Loaded {
        repositories,
        refresh_error,
    } = controller.search(user).await?
    {
        print_repositories(&repositories);
        if let Some(message) = refresh_error {
            eprintln!("Couldn't load your favorites: {}", message);
        }
    }
    Ok(())
}

pub(crate) fn print_repositories(repos: &[Repository]) {
    if repos.is_empty() {
        println!("No repositories found.");
        return;
    }

    println!("\nFound {} repositories:\n", repos.len());
    for repo in repos {
        print_repository(repo);
    }
}

pub(crate) fn print_repository(repo: &Repository) {
    let marker = if repo.is_favorited() { "✓" } else { " " };
    println!("  {} {}  (id {})", marker, repo.name, repo.id);
    println!("    ⭐ {}  {}", repo.stars, repo.language);
    println!("    {}", repo.description);
    println!("    {}\n", repo.url);
}
