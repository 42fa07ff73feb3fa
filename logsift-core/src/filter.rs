use serde::{Deserialize, Serialize};

/// Criteria a log line must satisfy to survive filtering.
///
/// Both clauses are plain case-insensitive substring checks. An empty
/// keyword set and an absent level each pass vacuously, so a default
/// `FilterCriteria` matches every line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// OR-set of keywords; a line passes when it contains at least one.
    pub keywords: Vec<String>,
    /// Log level token; a line passes when it contains the token.
    pub level: Option<String>,
}

impl FilterCriteria {
    pub fn new(keywords: Vec<String>, level: Option<String>) -> Self {
        Self { keywords, level }
    }

    /// True when the criteria impose no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.level.as_deref().map_or(true, str::is_empty)
    }

    /// Check a single line against both clauses.
    pub fn matches(&self, line: &str) -> bool {
        let line_lower = line.to_lowercase();

        if !self.keywords.is_empty()
            && !self
                .keywords
                .iter()
                .any(|k| line_lower.contains(&k.to_lowercase()))
        {
            return false;
        }

        if let Some(level) = self.level.as_deref() {
            if !level.is_empty() && !line_lower.contains(&level.to_lowercase()) {
                return false;
            }
        }

        true
    }
}
