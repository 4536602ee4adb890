//! Location search control.
//!
//! Holds the typed query and decides whether a submission may go out. The
//! store re-validates every submission, so bypassing this control cannot
//! start overlapping searches.

use crate::error::SearchError;

/// Trims a raw location label, rejecting blank input.
pub fn normalize_location(raw: &str) -> Result<String, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyLocation);
    }
    Ok(trimmed.to_string())
}

/// Text input + submit button of the dashboard header.
#[derive(Debug, Clone, Default)]
pub struct LocationSearch {
    query: String,
}

impl LocationSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The input is disabled while a search is loading.
    pub fn accepts_input(&self, loading: bool) -> bool {
        !loading
    }

    /// Appends a typed character. Returns false if the input is disabled.
    pub fn push(&mut self, c: char, loading: bool) -> bool {
        if !self.accepts_input(loading) {
            return false;
        }
        self.query.push(c);
        true
    }

    /// Removes the last character. Returns false if the input is disabled.
    pub fn backspace(&mut self, loading: bool) -> bool {
        if !self.accepts_input(loading) {
            return false;
        }
        self.query.pop().is_some()
    }

    /// Submit is enabled only for a non-blank query while idle.
    pub fn can_submit(&self, loading: bool) -> bool {
        !loading && !self.query.trim().is_empty()
    }

    /// Returns the trimmed location to search for, if submission is allowed.
    ///
    /// The query text is kept after submitting.
    pub fn submit(&self, loading: bool) -> Option<String> {
        if loading {
            return None;
        }
        normalize_location(&self.query).ok()
    }

    /// Label of the submit button.
    pub fn button_label(&self, loading: bool) -> &'static str {
        if loading {
            "···"
        } else {
            "SCAN"
        }
    }
}
