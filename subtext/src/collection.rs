//! Collection classification and flat expansion.

use crate::client::PlatformClient;

/// URL path markers that denote a collection (favorites or generic list).
const COLLECTION_MARKERS: &[&str] = &["favlist", "list"];

/// A video or collection locator, classified once at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoRef {
    locator: String,
    collection: bool,
}

impl VideoRef {
    /// Classify a raw locator by substring test against the collection
    /// markers. The flag never changes afterwards.
    pub fn classify(locator: impl Into<String>) -> Self {
        let locator = locator.into();
        let collection = COLLECTION_MARKERS
            .iter()
            .any(|marker| locator.contains(marker));

        Self {
            locator,
            collection,
        }
    }

    /// A locator known to denote a single video. Expanded members go through
    /// here: expansion is one level deep, members are never re-classified.
    fn single(locator: String) -> Self {
        Self {
            locator,
            collection: false,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }
}

/// Expand every collection reference in place, keeping the relative order of
/// the input references and the platform's reported member order.
///
/// A member entry yields its canonical locator when present, falling back to
/// the full page locator; entries with neither are dropped silently. A failed
/// expansion logs the error, contributes zero members, and the run continues.
pub fn flatten(client: &impl PlatformClient, refs: &[String]) -> Vec<VideoRef> {
    let mut videos = Vec::new();

    for raw in refs {
        let reference = VideoRef::classify(raw.as_str());

        if !reference.is_collection() {
            videos.push(reference);
            continue;
        }

        match client.expand(reference.locator()) {
            Ok(entries) => {
                let before = videos.len();
                videos.extend(
                    entries
                        .into_iter()
                        .filter_map(|entry| entry.url.or(entry.webpage_url))
                        .map(VideoRef::single),
                );
                tracing::info!(
                    collection = reference.locator(),
                    members = videos.len() - before,
                    "expanded collection"
                );
            }
            Err(err) => {
                tracing::error!(
                    collection = reference.locator(),
                    error = %err,
                    "collection expansion failed, skipping"
                );
            }
        }
    }

    videos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorites_list_is_a_collection() {
        assert!(VideoRef::classify("https://x/space/1/favlist/2/list").is_collection());
    }

    #[test]
    fn plain_video_is_not_a_collection() {
        assert!(!VideoRef::classify("https://x/video/av123").is_collection());
    }

    #[test]
    fn generic_list_is_a_collection() {
        assert!(VideoRef::classify("https://x/medialist/detail/ml1").is_collection());
    }

    #[test]
    fn locator_is_kept_verbatim() {
        let reference = VideoRef::classify("https://x/video/av123?p=2");
        assert_eq!(reference.locator(), "https://x/video/av123?p=2");
    }
}
