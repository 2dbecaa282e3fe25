use std::path::Path;

/// Write `content` to `path` below `root`, creating parent directories.
pub(crate) fn write(root: &Path, path: &str, content: impl AsRef<[u8]>) {
    let path = root.join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Stage every non-ignored change in the working tree, including deletions.
pub(crate) fn stage_all(repo: &git2::Repository) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["."].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["."].iter(), None).unwrap();
    index.write().unwrap();
}

/// Commit the staged index on top of `HEAD`, if there is one.
pub(crate) fn commit(repo: &git2::Repository, message: &str) -> git2::Oid {
    let signature =
        git2::Signature::new("Example User", "test@example.com", &git2::Time::new(0, 0)).unwrap();
    let tree = repo
        .find_tree(repo.index().unwrap().write_tree().unwrap())
        .unwrap();
    let parents = match repo.head().and_then(|head| head.peel_to_commit()) {
        Ok(parent) => vec![parent],
        Err(_) => vec![],
    };
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents.iter().collect::<Vec<_>>(),
    )
    .unwrap()
}

/// Build a throwaway repository from a sequence of commits, then optionally
/// stage more files, write unstaged files and delete files.
///
/// Evaluates to `(tempdir, repository)`; the repository lives as long as the
/// tempdir.
macro_rules! git_test {
    (
        $($message:literal: [$($path:literal => $content:expr),*])*
        $(staged: [$($spath:literal => $scontent:expr),*])?
        $(working: [$($wpath:literal => $wcontent:expr),*])?
        $(deleted: [$($dpath:literal),*])?
    ) => {{
        let tempdir = ::tempfile::tempdir().unwrap();
        let repo = ::git2::Repository::init(tempdir.path()).unwrap();
        $({
            $($crate::testing::write(tempdir.path(), $path, $content);)*
            $crate::testing::stage_all(&repo);
            $crate::testing::commit(&repo, $message);
        })*
        $({
            $($crate::testing::write(tempdir.path(), $spath, $scontent);)*
            $crate::testing::stage_all(&repo);
        })?
        $($($crate::testing::write(tempdir.path(), $wpath, $wcontent);)*)?
        $($(::std::fs::remove_file(tempdir.path().join($dpath)).unwrap();)*)?
        (tempdir, repo)
    }};
}

pub(crate) use git_test;
