use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;

use crate::error::FetchError;
use crate::hn::ItemSource;

/// Bounds on how much of a comment tree is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Top-level comments used as traversal roots
    pub max_roots: usize,
    /// Replies followed under each comment
    pub max_replies: usize,
    /// Deepest level visited; roots are depth 0
    pub max_depth: usize,
    /// Attributed comments collected across the whole story
    pub max_comments: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_roots: 10,
            max_replies: 3,
            max_depth: 2,
            max_comments: 30,
        }
    }
}

/// How comment bodies are rendered into the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentFormat {
    /// Body exactly as the API returns it (HTML fragments and entities)
    #[default]
    Raw,
    /// Body converted to plain text on a single line
    PlainText,
}

impl CommentFormat {
    fn render(self, body: &str) -> String {
        match self {
            CommentFormat::Raw => body.to_string(),
            CommentFormat::PlainText => {
                let text = html2text::from_read(body.as_bytes(), 10_000);
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            }
        }
    }
}

/// Accumulated state of one comment walk.
#[derive(Debug, Default)]
pub struct CommentTrace {
    lines: Vec<String>,
    visited: HashSet<u64>,
    count: usize,
}

impl CommentTrace {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of attributed comments recorded
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_visited(&self, id: u64) -> bool {
        self.visited.contains(&id)
    }

    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }

    fn record(&mut self, id: u64, by: &str, text: &str) {
        self.lines.push(format!("{}: {}", by, text));
        self.visited.insert(id);
        self.count += 1;
    }
}

struct Walker<'a, S: ?Sized> {
    source: &'a S,
    limits: TraversalLimits,
    format: CommentFormat,
}

impl<'a, S> Walker<'a, S>
where
    S: ItemSource + ?Sized,
{
    fn visit<'b>(
        &'b self,
        trace: &'b mut CommentTrace,
        id: u64,
        depth: usize,
    ) -> BoxFuture<'b, Result<(), FetchError>> {
        async move {
            if trace.count >= self.limits.max_comments
                || depth > self.limits.max_depth
                || trace.visited.contains(&id)
            {
                return Ok(());
            }

            let Some(item) = self.source.item(id).await? else {
                tracing::debug!(id, "comment has no record");
                return Ok(());
            };

            match item.attribution() {
                Some((by, text)) => trace.record(id, by, &self.format.render(text)),
                // Removed comments are not recorded, but replies under them still are
                None => tracing::debug!(id, "comment has no author or text"),
            }

            for &kid in item.kids().iter().take(self.limits.max_replies) {
                self.visit(trace, kid, depth + 1).await?;
            }

            Ok(())
        }
        .boxed()
    }
}

/// Walk the comment tree under `story_id` depth-first, left to right.
pub async fn trace_comments<S>(
    source: &S,
    story_id: u64,
    limits: TraversalLimits,
    format: CommentFormat,
) -> Result<CommentTrace, FetchError>
where
    S: ItemSource + ?Sized,
{
    let mut trace = CommentTrace::default();

    let Some(story) = source.item(story_id).await? else {
        return Ok(trace);
    };

    let walker = Walker {
        source,
        limits,
        format,
    };
    for &root in story.kids().iter().take(limits.max_roots) {
        walker.visit(&mut trace, root, 0).await?;
    }

    Ok(trace)
}

/// Collect up to `limits.max_comments` comments as `"author: text"` lines.
///
/// Returns an empty string when the story has no comments.
pub async fn collect_comments<S>(
    source: &S,
    story_id: u64,
    limits: TraversalLimits,
    format: CommentFormat,
) -> Result<String, FetchError>
where
    S: ItemSource + ?Sized,
{
    let trace = trace_comments(source, story_id, limits, format).await?;
    Ok(trace.into_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{comment, removed, story, FakeSource};

    const STORY: u64 = 1;

    fn story_with_kids(kids: &[u64]) -> crate::models::Item {
        let mut item = story(STORY, "Ask HN: Anything", Some(100));
        item.kids = Some(kids.to_vec());
        item
    }

    async fn collect(source: &FakeSource) -> String {
        collect_comments(source, STORY, TraversalLimits::default(), CommentFormat::Raw)
            .await
            .unwrap()
    }

    async fn trace(source: &FakeSource) -> CommentTrace {
        trace_comments(source, STORY, TraversalLimits::default(), CommentFormat::Raw)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_two_roots_in_order() {
        let source = FakeSource::new()
            .with(story_with_kids(&[10, 11]))
            .with(comment(10, "alice", "First!", &[]))
            .with(comment(11, "bob", "Second.", &[]));

        let text = collect(&source).await;
        assert_eq!(text, "alice: First!\nbob: Second.");
    }

    #[tokio::test]
    async fn test_no_kids_is_empty() {
        let source = FakeSource::new().with(story(STORY, "Quiet", Some(3)));

        let text = collect(&source).await;
        assert_eq!(text, "");
        assert_eq!(source.requested(), vec![STORY]);
    }

    #[tokio::test]
    async fn test_missing_story_is_empty() {
        let source = FakeSource::new();
        let text = collect(&source).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_removed_comment_still_walks_replies() {
        let source = FakeSource::new()
            .with(story_with_kids(&[10]))
            .with(removed(10, &[20]))
            .with(comment(20, "carol", "Still here", &[]));

        let trace = trace(&source).await;
        assert_eq!(trace.lines(), &["carol: Still here".to_string()]);
        assert_eq!(trace.count(), 1);
        assert!(!trace.has_visited(10));
        assert!(trace.has_visited(20));
    }

    #[tokio::test]
    async fn test_depth_limit() {
        // 10 -> 20 -> 30 -> 40, depths 0..=3
        let source = FakeSource::new()
            .with(story_with_kids(&[10]))
            .with(comment(10, "a", "depth 0", &[20]))
            .with(comment(20, "b", "depth 1", &[30]))
            .with(comment(30, "c", "depth 2", &[40]))
            .with(comment(40, "d", "depth 3", &[]));

        let text = collect(&source).await;
        assert_eq!(text, "a: depth 0\nb: depth 1\nc: depth 2");
        assert!(!source.requested().contains(&40));

        let shallow = TraversalLimits {
            max_depth: 1,
            ..TraversalLimits::default()
        };
        let text = collect_comments(&source, STORY, shallow, CommentFormat::Raw)
            .await
            .unwrap();
        assert_eq!(text, "a: depth 0\nb: depth 1");
    }

    #[tokio::test]
    async fn test_only_first_three_replies() {
        let source = FakeSource::new()
            .with(story_with_kids(&[10]))
            .with(comment(10, "op", "root", &[21, 22, 23, 24]))
            .with(comment(21, "r1", "one", &[]))
            .with(comment(22, "r2", "two", &[]))
            .with(comment(23, "r3", "three", &[]))
            .with(comment(24, "r4", "four", &[]));

        let text = collect(&source).await;
        assert_eq!(text, "op: root\nr1: one\nr2: two\nr3: three");
        assert!(!source.requested().contains(&24));
    }

    #[tokio::test]
    async fn test_depth_first_order() {
        let source = FakeSource::new()
            .with(story_with_kids(&[10, 11]))
            .with(comment(10, "a", "root a", &[20]))
            .with(comment(20, "a1", "reply to a", &[]))
            .with(comment(11, "b", "root b", &[]));

        let text = collect(&source).await;
        assert_eq!(text, "a: root a\na1: reply to a\nb: root b");
    }

    #[tokio::test]
    async fn test_global_cap() {
        // 10 roots, each with 3 replies, each of those with 3 replies: 130 comments
        let roots: Vec<u64> = (0..10).map(|r| 1000 + r).collect();
        let mut source = FakeSource::new().with(story_with_kids(&roots));
        for &root in &roots {
            let replies: Vec<u64> = (0..3).map(|i| root * 10 + i).collect();
            source = source.with(comment(root, "root", "r", &replies));
            for &reply in &replies {
                let leaves: Vec<u64> = (0..3).map(|i| reply * 10 + i).collect();
                source = source.with(comment(reply, "reply", "r", &leaves));
                for &leaf in &leaves {
                    source = source.with(comment(leaf, "leaf", "l", &[]));
                }
            }
        }

        let trace = trace(&source).await;
        assert_eq!(trace.count(), 30);
        assert_eq!(trace.lines().len(), 30);
        // Story plus exactly the 30 recorded comments; nothing after the cap
        assert_eq!(source.requested().len(), 31);
        // First root subtree is 13 comments, second 13, then 4 from the third
        assert!(trace.has_visited(1002));
        assert!(!trace.has_visited(1003));
    }

    #[tokio::test]
    async fn test_duplicate_ids_processed_once() {
        // 10 and 11 both reply with 20; 20 refers back to 10
        let source = FakeSource::new()
            .with(story_with_kids(&[10, 11, 10]))
            .with(comment(10, "a", "root", &[20]))
            .with(comment(11, "b", "other root", &[20]))
            .with(comment(20, "c", "shared reply", &[10]));

        let text = collect(&source).await;
        assert_eq!(text, "a: root\nc: shared reply\nb: other root");
    }

    #[tokio::test]
    async fn test_only_first_ten_roots() {
        let roots: Vec<u64> = (100..115).collect();
        let mut source = FakeSource::new().with(story_with_kids(&roots));
        for &id in &roots {
            source = source.with(comment(id, "user", "hi", &[]));
        }

        let trace = trace(&source).await;
        assert_eq!(trace.count(), 10);
        assert!(trace.has_visited(109));
        assert!(!trace.has_visited(110));
    }

    #[tokio::test]
    async fn test_plain_text_format() {
        let source = FakeSource::new()
            .with(story_with_kids(&[10]))
            .with(comment(10, "dang", "It&#x27;s fine<p>Really", &[]));

        let raw = collect(&source).await;
        assert_eq!(raw, "dang: It&#x27;s fine<p>Really");

        let plain =
            collect_comments(&source, STORY, TraversalLimits::default(), CommentFormat::PlainText)
                .await
                .unwrap();
        assert!(plain.starts_with("dang: It's fine"));
        assert!(plain.contains("Really"));
        assert!(!plain.contains('<'));
        assert!(!plain.contains('\n'));
    }
}
