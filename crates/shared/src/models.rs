use serde::{Deserialize, Serialize};

/// A Hacker News item: a story, comment, job or poll.
///
/// Every field except `id` may be missing from the API response, so absent
/// values are kept as `None` rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: Option<String>,
    pub url: Option<String>,
    pub score: Option<i64>,
    pub by: Option<String>,
    pub text: Option<String>,
    pub kids: Option<Vec<u64>>,
    pub dead: Option<bool>,
    pub deleted: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Item {
    /// Score, treating a missing score as 0
    pub fn score(&self) -> i64 {
        self.score.unwrap_or(0)
    }

    pub fn kids(&self) -> &[u64] {
        self.kids.as_deref().unwrap_or(&[])
    }

    /// Author and body, if the item has both and neither is empty.
    pub fn attribution(&self) -> Option<(&str, &str)> {
        let by = self.by.as_deref().filter(|s| !s.is_empty())?;
        let text = self.text.as_deref().filter(|s| !s.is_empty())?;
        Some((by, text))
    }

    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or("No URL - text post on HN")
    }

    /// True when the item has a non-empty title
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}
