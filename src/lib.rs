//! An in-memory prefix tree for dictionary lookups and prefix expansion.

pub mod error;
pub mod source;
pub mod trie;

pub use error::{LoadError, Operation, TrieError};
pub use source::{load, load_into, FileSource, InlineSource, StdinSource, WordSource};
pub use trie::Trie;
