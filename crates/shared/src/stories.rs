use crate::error::FetchError;
use crate::hn::ItemSource;
use crate::models::Item;

/// How many of the top-ranked stories are offered for selection
pub const TOP_STORY_LIMIT: usize = 10;

/// Fetch the first `limit` top stories, ordered by score (highest first).
///
/// Ids that resolve to no record, or to a record without a title, are
/// skipped. Stories with equal scores keep their ranking order.
pub async fn list_top_stories<S>(source: &S, limit: usize) -> Result<Vec<Item>, FetchError>
where
    S: ItemSource + ?Sized,
{
    let ids = source.top_story_ids().await?;

    let mut stories = Vec::with_capacity(limit.min(ids.len()));
    for id in ids.into_iter().take(limit) {
        match source.item(id).await? {
            Some(item) if item.has_title() => stories.push(item),
            _ => tracing::debug!(id, "skipping missing or untitled story"),
        }
    }

    // sort_by is stable, so ties stay in ranking order
    stories.sort_by(|a, b| b.score().cmp(&a.score()));

    Ok(stories)
}
