use crate::favorites::FavoritesSet;
use crate::types::Repository;

/// Re-derive `is_favorited` on every repository from `favorites`.
///
/// Returns a new collection in the same order; the input is left untouched.
pub fn reconcile(collection: &[Repository], favorites: &FavoritesSet) -> Vec<Repository> {
    collection
        .iter()
        .map(|repo| {
            let favorited = favorites.contains(repo.id);
            repo.clone().with_favorited(favorited)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{RawId, RepoId};
    use crate::types::RepositoryRecord;

    fn repo(id: impl Into<RawId>, name: &str) -> Repository {
        Repository::from_record(RepositoryRecord {
            repo_id: id.into(),
            repo_name: name.to_string(),
            description: None,
            stars: 1,
            html_url: format!("https://github.com/octo/{name}"),
            language: Some("Rust".to_string()),
        })
        .unwrap()
    }

    fn favorites(ids: &[u64]) -> FavoritesSet {
        ids.iter().copied().map(RepoId::new).collect()
    }

    #[test]
    fn flags_follow_membership() {
        let repos = vec![repo(1u64, "a"), repo("2", "b"), repo(3u64, "c")];
        let out = reconcile(&repos, &favorites(&[2, 3]));
        let flags: Vec<_> = out.iter().map(|r| r.is_favorited()).collect();
        assert_eq!(flags, vec![false, true, true]);
        let names: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn string_id_from_search_matches() {
        let repos = vec![repo("7", "octo")];
        let out = reconcile(&repos, &favorites(&[7]));
        assert!(out[0].is_favorited());
    }

    #[test]
    fn input_is_not_mutated() {
        let repos = vec![repo(5u64, "x")];
        let before = repos.clone();
        let _ = reconcile(&repos, &favorites(&[5]));
        assert_eq!(repos, before);
    }

    #[test]
    fn clears_stale_flags_and_is_idempotent() {
        let repos = reconcile(&[repo(5u64, "x"), repo(6u64, "y")], &favorites(&[5, 6]));
        let favs = favorites(&[6]);
        let once = reconcile(&repos, &favs);
        let twice = reconcile(&once, &favs);
        assert_eq!(once, twice);
        assert!(!once[0].is_favorited());
        assert!(once[1].is_favorited());
        // only the flag moves
        assert_eq!(once[0].name, repos[0].name);
        assert_eq!(once[0].stars, repos[0].stars);
    }
}
