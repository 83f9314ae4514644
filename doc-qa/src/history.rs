//! Search records and the per-session history list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::QaError, repository::RepositoryChoice};

/// Number of records shown in the "recent searches" view.
pub const RECENT_LIMIT: usize = 5;

/// One completed search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    query: String,
    answer: String,
    repository: RepositoryChoice,
    created_at: DateTime<Utc>,
}

impl SearchRecord {
    /// # Errors
    /// [`QaError::InvalidRecord`] if `query` or `answer` is blank.
    pub fn new(
        query: impl Into<String>,
        answer: impl Into<String>,
        repository: RepositoryChoice,
    ) -> Result<Self, QaError> {
        let query = query.into();
        let answer = answer.into();
        if query.trim().is_empty() {
            return Err(QaError::InvalidRecord("query is empty"));
        }
        if answer.trim().is_empty() {
            return Err(QaError::InvalidRecord("answer is empty"));
        }
        Ok(Self {
            query,
            answer,
            repository,
            created_at: Utc::now(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn repository(&self) -> RepositoryChoice {
        self.repository
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Query clipped to `max_chars` characters, for list titles.
    pub fn title(&self, max_chars: usize) -> String {
        self.query.chars().take(max_chars).collect()
    }
}

/// Append-only list of the session's completed searches.
#[derive(Debug, Default, Clone)]
pub struct SearchHistory {
    records: Vec<SearchRecord>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SearchRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record, oldest first.
    pub fn all(&self) -> &[SearchRecord] {
        &self.records
    }

    /// The last `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &SearchRecord> {
        let start = self.records.len().saturating_sub(limit);
        self.records[start..].iter().rev()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
