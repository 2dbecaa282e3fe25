use std::path::Path;

use bstr::{BString, ByteVec};

use super::Backend;
use crate::{Error, Result};

/// A [`Backend`] answering from a git repository through libgit2.
pub struct GitBackend {
    repository: git2::Repository,
}

impl GitBackend {
    /// Open the repository containing `path`, searching parent directories
    /// the way `git` itself does.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repository = git2::Repository::discover(path).map_err(|source| Error::Repository {
            path: path.to_owned(),
            source,
        })?;
        if repository.is_bare() {
            return Err(Error::Repository {
                path: path.to_owned(),
                source: git2::Error::from_str("bare repositories are not supported"),
            });
        }
        tracing::debug!(workdir = ?repository.workdir(), "opened repository");
        Ok(Self { repository })
    }

    fn tree(&self, revision: &str) -> Result<git2::Tree<'_>> {
        self.repository
            .revparse_single(revision)
            .and_then(|object| object.peel_to_tree())
            .map_err(|source| Error::Revision {
                revision: revision.to_owned(),
                source,
            })
    }
}

impl From<git2::Repository> for GitBackend {
    fn from(repository: git2::Repository) -> Self {
        Self { repository }
    }
}

impl Backend for GitBackend {
    fn untracked(&self) -> Result<BString> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self
            .repository
            .statuses(Some(&mut options))
            .map_err(|error| Error::backend("failed to list untracked files", error))?;

        let mut output = BString::default();
        for entry in statuses.iter().filter(|entry| entry.status().is_wt_new()) {
            output.push_str(entry.path_bytes());
            output.push_byte(b'\n');
        }
        Ok(output)
    }

    fn diff_names(&self, revisions: &[&str]) -> Result<BString> {
        let mut options = git2::DiffOptions::new();
        let mut diff = match *revisions {
            [from] => {
                let from_tree = self.tree(from)?;
                self.repository
                    .diff_tree_to_workdir_with_index(Some(&from_tree), Some(&mut options))
            }
            [from, to] => {
                let from_tree = self.tree(from)?;
                let to_tree = self.tree(to)?;
                self.repository
                    .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), Some(&mut options))
            }
            _ => Err(git2::Error::from_str(&format!(
                "expected one or two revisions, got {}",
                revisions.len()
            ))),
        }
        .map_err(|error| Error::backend(format!("failed to diff {revisions:?}"), error))?;

        // Like `git diff --name-only`, a rename is reported under its new name.
        diff.find_similar(Some(git2::DiffFindOptions::new().renames(true)))
            .map_err(|error| Error::backend("failed to detect renames", error))?;

        let mut output = BString::default();
        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path_bytes() else {
                continue;
            };
            output.push_str(path);
            output.push_byte(b'\n');
        }
        Ok(output)
    }
}
