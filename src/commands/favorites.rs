use super::search::print_repository;
use super::Context;
use anyhow::{anyhow, Result};
use repofav::{RepoId, Repository, SearchOutcome};

/// Match by id when the selector is numeric, otherwise by name (case-insensitive).
pub(crate) fn find_repository(repos: &[Repository], selector: &str) -> Option<Repository> {
    let by_id = selector.parse::<RepoId>().ok();
    repos
        .iter()
        .find(|r| match by_id {
            Some(id) => r.id == id,
            None => r.name.eq_ignore_ascii_case(selector.trim()),
        })
        .cloned()
}

pub async fn save_repo(ctx: &Context, user: &str, selector: &str) -> Result<()> {
    let controller = ctx.controller()?;

    let repositories = match controller.search(user).await? {
        SearchOutcome::Loaded { repositories, .. } => repositories,
        SearchOutcome::Stale => controller.repositories(),
    };
    let repo = find_repository(&repositories, selector)
        .ok_or_else(|| anyhow!("{} has no repository matching '{}'", user, selector))?;

    if repo.is_favorited() {
        println!("{} is already saved.", repo.name);
        return Ok(());
    }

    controller.save(&repo).await?;
    println!("✓ Saved {}", repo.name);
    Ok(())
}

pub async fn unsave_repo(ctx: &Context, id: RepoId) -> Result<()> {
    let controller = ctx.controller()?;
    controller.unsave(id).await?;
    println!("✓ Removed {} from favorites", id);
    Ok(())
}

pub async fn list_favorites(ctx: &Context) -> Result<()> {
    let credential = ctx.credential()?;
    let entries = ctx.backend()?.list_favorites(&credential).await?;

    if entries.is_empty() {
        println!("No favorites saved yet.");
        return Ok(());
    }

    println!("Your favorite repositories:\n");
    for entry in entries {
        let id = RepoId::normalize(&entry.repo_id)?;
        let name = entry.repo_name.as_deref().unwrap_or("(unnamed)");
        println!("  ✓ {}  (id {})", name, id);
        if let Some(stars) = entry.stars {
            println!("    ⭐ {}  {}", stars, entry.language.as_deref().unwrap_or("Unknown"));
        }
        if let Some(url) = &entry.html_url {
            println!("    {}", url);
        }
        println!();
    }
    Ok(())
}

/// Print the saved repositories picked out by the controller.
pub(crate) fn print_saved(saved: &[Repository]) {
    if saved.is_empty() {
        println!("None of the listed repositories are saved.");
        return;
    }
    for repo in saved {
        print_repository(repo);
    }
}
