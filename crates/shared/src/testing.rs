use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::FetchError;
use crate::hn::ItemSource;
use crate::models::Item;

/// In-memory item store that remembers which ids were requested.
#[derive(Default)]
pub struct FakeSource {
    top: Vec<u64>,
    items: HashMap<u64, Item>,
    requested: Mutex<Vec<u64>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, ids: &[u64]) -> Self {
        self.top = ids.to_vec();
        self
    }

    pub fn with(mut self, item: Item) -> Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn requested(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemSource for FakeSource {
    async fn top_story_ids(&self) -> Result<Vec<u64>, FetchError> {
        Ok(self.top.clone())
    }

    async fn item(&self, id: u64) -> Result<Option<Item>, FetchError> {
        self.requested.lock().unwrap().push(id);
        Ok(self.items.get(&id).cloned())
    }
}

pub fn story(id: u64, title: &str, score: Option<i64>) -> Item {
    Item {
        id,
        title: Some(title.to_string()),
        score,
        kind: Some("story".to_string()),
        ..Default::default()
    }
}

pub fn comment(id: u64, by: &str, text: &str, kids: &[u64]) -> Item {
    Item {
        id,
        by: Some(by.to_string()),
        text: Some(text.to_string()),
        kids: (!kids.is_empty()).then(|| kids.to_vec()),
        kind: Some("comment".to_string()),
        ..Default::default()
    }
}

/// A comment whose author and body have been removed.
pub fn removed(id: u64, kids: &[u64]) -> Item {
    Item {
        id,
        deleted: Some(true),
        kids: (!kids.is_empty()).then(|| kids.to_vec()),
        kind: Some("comment".to_string()),
        ..Default::default()
    }
}
