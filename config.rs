/// Revision diffed against when none is given.
pub const DEFAULT_BASE: &str = "HEAD";

/// Everything one invocation needs, resolved once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Revision to diff against.
    pub base: String,
    /// Revision to diff to. Empty means the working tree, untracked files
    /// included.
    pub current: String,
    /// Globs selecting the changed files of interest.
    pub patterns: Vec<String>,
    /// Program and arguments to run when something matched. May be empty.
    pub command: Vec<String>,
    /// Print matched files to standard output.
    pub list: bool,
    /// Exit successfully even when nothing matched.
    pub zero_exit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_owned(),
            current: String::new(),
            patterns: Vec::new(),
            command: Vec::new(),
            list: true,
            zero_exit: false,
        }
    }
}
