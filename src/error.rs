use std::fmt;

use thiserror::Error;

/// The trie operation that rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Contains,
    Get,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Contains => "contains",
            Operation::Get => "get",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TrieError {
    #[error("`{}` was called with an empty word", .0)]
    EmptyInput(Operation),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {name}: {err}")]
    Io {
        name: String,
        #[source]
        err: std::io::Error,
    },

    #[error("{}", .0)]
    Trie(#[from] TrieError),

    #[error("No words were read from {}", .0)]
    NoWords(String),
}
