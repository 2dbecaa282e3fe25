mod git;

use bstr::BString;

pub use git::GitBackend;

use crate::Result;

/// The two read-only queries the change resolver needs from version control.
///
/// Both return newline-separated repository-relative paths. The output may
/// carry surrounding whitespace and is empty when nothing qualifies.
///
/// Paths are matched and printed as UTF-8: bytes that are not valid UTF-8
/// come out as U+FFFD, and a path containing a newline reads as two paths.
pub trait Backend {
    /// List files in the working tree that are neither tracked nor ignored.
    fn untracked(&self) -> Result<BString>;

    /// List the names of files that differ across `revisions`.
    ///
    /// With a single revision its tree is compared against the working tree;
    /// with two, the first tree is compared against the second.
    fn diff_names(&self, revisions: &[&str]) -> Result<BString>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn untracked(&self) -> Result<BString> {
        (**self).untracked()
    }

    fn diff_names(&self, revisions: &[&str]) -> Result<BString> {
        (**self).diff_names(revisions)
    }
}
