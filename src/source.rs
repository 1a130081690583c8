use std::{io, path::PathBuf};

use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::trie::Trie;

/// Somewhere a whitespace-separated word list can be read from.
#[async_trait::async_trait]
pub trait WordSource {
    /// A human readable name for the source, used in logs and errors.
    fn name(&self) -> String;

    async fn read_to_string(&self) -> Result<String, LoadError>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl WordSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_to_string(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| LoadError::Io {
                name: self.name(),
                err,
            })
    }
}

/// Reads everything piped into the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

#[async_trait::async_trait]
impl WordSource for StdinSource {
    fn name(&self) -> String {
        "stdin".to_string()
    }

    async fn read_to_string(&self) -> Result<String, LoadError> {
        let mut stdin = tokio::io::stdin();
        let mut buf = Vec::with_capacity(256);
        stdin
            .read_to_end(&mut buf)
            .await
            .map_err(|err| LoadError::Io {
                name: self.name(),
                err,
            })?;
        decode(self.name(), buf)
    }
}

/// Rejects bytes that are not UTF-8 the same way `tokio::fs::read_to_string`
/// does, with an `InvalidData` I/O error.
fn decode(name: String, buf: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(buf).map_err(|e| LoadError::Io {
        name,
        err: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

#[derive(Debug, Clone)]
pub struct InlineSource(pub String);

#[async_trait::async_trait]
impl WordSource for InlineSource {
    fn name(&self) -> String {
        "inline words".to_string()
    }

    async fn read_to_string(&self) -> Result<String, LoadError> {
        Ok(self.0.clone())
    }
}

/// Reads `source` into `trie`, lowercasing every whitespace-separated token.
/// Returns the number of words that were not already stored.
pub async fn load_into<S>(trie: &mut Trie, source: &S) -> Result<usize, LoadError>
where
    S: WordSource + Sync + ?Sized,
{
    let text = source.read_to_string().await?;
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return Err(LoadError::NoWords(source.name()));
    }

    let added = trie.extend_words(&words)?;
    info!("Loaded {} words from {}", added, source.name());
    debug!(
        "{} tokens read, {} words stored in total",
        words.len(),
        trie.len()
    );
    Ok(added)
}

/// Builds a fresh trie from a single source.
pub async fn load<S>(source: &S) -> Result<Trie, LoadError>
where
    S: WordSource + Sync + ?Sized,
{
    let mut trie = Trie::new();
    load_into(&mut trie, source).await?;
    Ok(trie)
}
