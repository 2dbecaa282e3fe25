mod backend;
mod config;
mod dispatch;
mod error;
mod matcher;
mod resolver;

pub use backend::{Backend, GitBackend};
pub use config::{Options, DEFAULT_BASE};
pub use dispatch::{dispatch, run, Outcome, ProcessRunner, Runner};
pub use error::{Error, Result};
pub use matcher::Patterns;
pub use resolver::changed_files;

#[cfg(test)]
mod testing;
