//! In-memory source provider.

use std::io::Cursor;
use std::sync::Mutex;

use indexmap::IndexMap;

use super::{AUTHOR_PLACEHOLDER, ContentStream, SourceError, SourceProvider};

/// Serves a fixed set of files; every reference sees the same content.
#[derive(Debug, Default)]
pub struct InMemorySource {
    files: IndexMap<String, Vec<u8>>,
    tags: Vec<String>,
    author: Option<String>,
    opened: Mutex<IndexMap<String, usize>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// How many times `path` has been opened.
    pub fn open_count(&self, path: &str) -> usize {
        let opened = self.opened.lock().unwrap_or_else(|p| p.into_inner());
        opened.get(path).copied().unwrap_or(0)
    }
}

impl SourceProvider for InMemorySource {
    fn list_tracked_files(
        &self,
        _reference: Option<&str>,
        filter: &dyn Fn(&str) -> bool,
    ) -> Result<Vec<String>, SourceError> {
        Ok(self
            .files
            .keys()
            .filter(|p| filter(p.as_str()))
            .cloned()
            .collect())
    }

    fn tags_at(&self, _reference: Option<&str>) -> Vec<String> {
        self.tags.clone()
    }

    fn author_of(&self, _reference: Option<&str>) -> String {
        self.author
            .clone()
            .unwrap_or_else(|| AUTHOR_PLACEHOLDER.to_string())
    }

    fn open_content(
        &self,
        path: &str,
        _reference: Option<&str>,
    ) -> Result<ContentStream, SourceError> {
        let content = self.files.get(path).ok_or_else(|| SourceError::Missing {
            path: path.to_string(),
        })?;
        let mut opened = self.opened.lock().unwrap_or_else(|p| p.into_inner());
        *opened.entry(path.to_string()).or_insert(0) += 1;
        Ok(Box::new(Cursor::new(content.clone())))
    }
}
