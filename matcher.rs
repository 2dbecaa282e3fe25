use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::{Error, Result};

/// Compiled glob patterns, kept in the order they were given.
///
/// `*`, `?` and character classes stay within one path component. `**`
/// crosses directories wherever it appears, so `**/*.rs` and `**.rs` both
/// match `lib.rs` and `src/lib.rs`.
#[derive(Debug, Clone)]
pub struct Patterns {
    sets: Vec<GlobSet>,
}

impl Patterns {
    pub fn compile(patterns: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Self> {
        let sets = patterns
            .into_iter()
            .map(|pattern| compile(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if sets.is_empty() {
            return Err(Error::Usage("must specify at least one glob".into()));
        }
        Ok(Self { sets })
    }

    /// Collect the files matching each pattern, one pattern after another.
    ///
    /// A file matching several patterns is listed once per pattern.
    pub fn matches<'f>(&self, files: &'f [String]) -> Vec<&'f str> {
        self.sets
            .iter()
            .flat_map(|set| {
                files
                    .iter()
                    .filter(move |file| set.is_match(file.as_str()))
                    .map(String::as_str)
            })
            .collect()
    }
}

fn compile(pattern: &str) -> Result<GlobSet> {
    let invalid = |reason: String| Error::Pattern {
        pattern: pattern.to_owned(),
        reason,
    };
    let mut builder = GlobSetBuilder::new();
    for alternative in expand(pattern).map_err(invalid)? {
        let glob = GlobBuilder::new(&alternative)
            .literal_separator(true)
            .build()
            .map_err(|error| invalid(error.kind().to_string()))?;
        builder.add(glob);
    }
    builder.build().map_err(|error| invalid(error.to_string()))
}

/// Spell out `**` that is not a whole path component.
///
/// globset only lets `**` cross directories as `**/`, `/**/` or `/**`.
/// Anywhere else it is replaced by two alternatives: `*` for a match within
/// one component and `*/**/*` for a match spanning several, so `src/**.rs`
/// becomes `src/*.rs` and `src/*/**/*.rs`.
fn expand(pattern: &str) -> Result<Vec<String>, String> {
    let chars = pattern.chars().collect::<Vec<_>>();
    let mut alternatives = vec![String::new()];
    let push = |alternatives: &mut Vec<String>, text: &[char]| {
        for alternative in alternatives.iter_mut() {
            alternative.extend(text);
        }
    };

    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let end = match chars[i] {
            '\\' => (i + 2).min(chars.len()),
            '[' => {
                // A `]` right after `[`, `[!` or `[^` belongs to the class.
                let mut end = i + 1;
                if matches!(chars.get(end), Some('!' | '^')) {
                    end += 1;
                }
                if chars.get(end) == Some(&']') {
                    end += 1;
                }
                while end < chars.len() && chars[end] != ']' {
                    end += 1;
                }
                (end + 1).min(chars.len())
            }
            '*' => {
                let mut end = i;
                while chars.get(end) == Some(&'*') {
                    end += 1;
                }
                if end - i == 1 {
                    push(&mut alternatives, &['*']);
                    i = end;
                    continue;
                }
                let component =
                    (i == 0 || chars[i - 1] == '/') && (end == chars.len() || chars[end] == '/');
                if component {
                    push(&mut alternatives, &['*', '*']);
                } else if depth > 0 {
                    return Err("`**` inside `{...}` must be a whole path component".into());
                } else {
                    alternatives = alternatives
                        .into_iter()
                        .flat_map(|prefix| [format!("{prefix}*"), format!("{prefix}*/**/*")])
                        .collect();
                }
                i = end;
                continue;
            }
            '{' => {
                depth += 1;
                i + 1
            }
            '}' => {
                depth = depth.saturating_sub(1);
                i + 1
            }
            _ => i + 1,
        };
        push(&mut alternatives, &chars[i..end]);
        i = end;
    }
    Ok(alternatives)
}
