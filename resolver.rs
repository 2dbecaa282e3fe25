use bstr::{BString, ByteSlice};

use crate::{Backend, Result};

/// Compute the files that changed between `base` and `current`.
///
/// An empty `current` means the working tree: modified tracked files show up
/// through the diff against `base`, and untracked (but not ignored) files are
/// added on top. The result is sorted and holds every path once.
pub fn changed_files(backend: impl Backend, base: &str, current: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();

    if current.is_empty() {
        let untracked = split_lines(backend.untracked()?);
        tracing::debug!(count = untracked.len(), "untracked files");
        files.extend(untracked);
    }

    let revisions = if current.is_empty() {
        vec![base]
    } else {
        vec![base, current]
    };
    let diffed = split_lines(backend.diff_names(&revisions)?);
    tracing::debug!(count = diffed.len(), ?revisions, "diffed files");
    files.extend(diffed);

    files.sort();
    files.dedup();
    Ok(files)
}

fn split_lines(output: BString) -> Vec<String> {
    let output = output.trim();
    if output.is_empty() {
        return Vec::new();
    }
    output
        .lines()
        .map(|line| line.to_str_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use indoc::indoc;

    use super::*;
    use crate::{testing::git_test, Error, GitBackend};

    /// Replays canned output and records the revisions it was asked about.
    #[derive(Default)]
    struct FakeBackend {
        untracked: &'static str,
        diff: &'static str,
        requests: RefCell<Vec<Vec<String>>>,
    }

    impl Backend for FakeBackend {
        fn untracked(&self) -> Result<BString> {
            Ok(self.untracked.into())
        }

        fn diff_names(&self, revisions: &[&str]) -> Result<BString> {
            self.requests
                .borrow_mut()
                .push(revisions.iter().map(|revision| revision.to_string()).collect());
            Ok(self.diff.into())
        }
    }

    struct FailingBackend;

    impl Backend for FailingBackend {
        fn untracked(&self) -> Result<BString> {
            Err(Error::backend("status", git2::Error::from_str("boom")))
        }

        fn diff_names(&self, revisions: &[&str]) -> Result<BString> {
            Err(Error::Revision {
                revision: revisions[0].to_owned(),
                source: git2::Error::from_str("not found"),
            })
        }
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines("".into()).is_empty());
        assert!(split_lines(" \n\n".into()).is_empty());
        insta::assert_debug_snapshot!(split_lines("\n b\na\n".into()), @r###"
        [
            "b",
            "a",
        ]
        "###);
    }

    #[test]
    fn test_split_lines_non_utf8() {
        let output = BString::from(&b"caf\xe9.txt\nok.txt\n"[..]);
        assert_eq!(split_lines(output), ["caf\u{fffd}.txt", "ok.txt"]);
    }

    #[test]
    fn test_working_tree_merges_both_sources() {
        let backend = FakeBackend {
            untracked: "new/z.txt\nb.txt\n",
            diff: "c.txt\na.txt\n",
            ..Default::default()
        };

        insta::assert_debug_snapshot!(changed_files(&backend, "HEAD", "").unwrap(), @r###"
        [
            "a.txt",
            "b.txt",
            "c.txt",
            "new/z.txt",
        ]
        "###);
        insta::assert_compact_json_snapshot!(backend.requests.take(), @r###"[["HEAD"]]"###);
    }

    #[test]
    fn test_revision_pair_skips_untracked() {
        let backend = FakeBackend {
            untracked: "ignored-by-pair\n",
            diff: "b\na\n",
            ..Default::default()
        };

        insta::assert_debug_snapshot!(changed_files(&backend, "HEAD~1", "HEAD").unwrap(), @r###"
        [
            "a",
            "b",
        ]
        "###);
        insta::assert_compact_json_snapshot!(backend.requests.take(), @r###"[["HEAD~1", "HEAD"]]"###);
    }

    #[test]
    fn test_overlapping_sources_are_collapsed() {
        let backend = FakeBackend {
            untracked: "a\nb\n",
            diff: "b\nc\n",
            ..Default::default()
        };

        insta::assert_debug_snapshot!(changed_files(&backend, "HEAD", "").unwrap(), @r###"
        [
            "a",
            "b",
            "c",
        ]
        "###);
    }

    #[test]
    fn test_nothing_changed() {
        let backend = FakeBackend::default();

        assert!(changed_files(&backend, "HEAD", "").unwrap().is_empty());
    }

    #[test]
    fn test_backend_errors_surface() {
        assert!(matches!(
            changed_files(FailingBackend, "HEAD", ""),
            Err(Error::Backend { .. })
        ));
        assert!(matches!(
            changed_files(FailingBackend, "HEAD", "HEAD"),
            Err(Error::Revision { revision, .. }) if revision == "HEAD"
        ));
    }

    /// A hundred committed files, a commit touching the first five, then five
    /// modified and five brand-new files left uncommitted.
    fn hundred_files() -> (tempfile::TempDir, git2::Repository) {
        let (tempdir, repo) = git_test! {};
        let root = tempdir.path();
        for i in 0..100 {
            crate::testing::write(root, &format!("file{i}.txt"), "Hello world");
        }
        crate::testing::stage_all(&repo);
        crate::testing::commit(&repo, "Initial commit");
        for i in 0..5 {
            crate::testing::write(root, &format!("file{i}.txt"), "Updated");
        }
        crate::testing::stage_all(&repo);
        crate::testing::commit(&repo, "Edit 5 files");
        for i in 5..10 {
            crate::testing::write(root, &format!("file{i}.txt"), "Updated (uncommitted)");
            crate::testing::write(root, &format!("file{}.txt", 100 + i), "New");
        }
        (tempdir, repo)
    }

    #[test]
    fn test_last_commit() {
        let (_tempdir, repo) = hundred_files();

        let backend = GitBackend::from(repo);
        insta::assert_compact_json_snapshot!(
            changed_files(&backend, "HEAD~1", "HEAD").unwrap(),
            @r###"["file0.txt", "file1.txt", "file2.txt", "file3.txt", "file4.txt"]"###
        );
    }

    #[test]
    fn test_same_revision() {
        let (_tempdir, repo) = hundred_files();

        let backend = GitBackend::from(repo);
        assert!(changed_files(&backend, "HEAD", "HEAD").unwrap().is_empty());
    }

    #[test]
    fn test_uncommitted_and_untracked() {
        let (_tempdir, repo) = hundred_files();

        let backend = GitBackend::from(repo);
        let files = changed_files(&backend, "HEAD", "").unwrap();
        insta::assert_snapshot!(files.join("\n"), @r###"
        file105.txt
        file106.txt
        file107.txt
        file108.txt
        file109.txt
        file5.txt
        file6.txt
        file7.txt
        file8.txt
        file9.txt
        "###);
        assert_eq!(files, changed_files(&backend, "HEAD", "").unwrap());
    }

    #[test]
    fn test_untracked_directory_is_listed_file_by_file() {
        let (_tempdir, repo) = git_test! {
            "initial commit": [".gitignore" => indoc! {"
                target/
            "}, "lib.rs" => ""]
            working: ["docs/a.md" => "a", "docs/deep/b.md" => "b", "target/out" => "x"]
        };

        let backend = GitBackend::from(repo);
        insta::assert_debug_snapshot!(changed_files(&backend, "HEAD", "").unwrap(), @r###"
        [
            "docs/a.md",
            "docs/deep/b.md",
        ]
        "###);
    }
}
