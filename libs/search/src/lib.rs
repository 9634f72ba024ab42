use entity::prelude::*;

mod state;

pub use state::FilterState;

/// Posts matching both the tag filter and the free-text query, in their
/// original order.
///
/// `active_tag` must match a hashtag exactly. The query is trimmed and
/// compared case-insensitively against the title and every hashtag. With
/// neither filter active the input comes back unchanged.
pub fn compute_visible(
    posts: &[PostEntity],
    query: &str,
    active_tag: Option<&str>,
) -> Vec<PostEntity> {
    let query = query.trim().to_lowercase();

    posts
        .iter()
        .filter(|post| active_tag.map_or(true, |tag| post.has_hashtag(tag)))
        .filter(|post| query.is_empty() || matches_query(post, &query))
        .cloned()
        .collect()
}

/// `query` must already be trimmed and lowercased.
fn matches_query(post: &PostEntity, query: &str) -> bool {
    post.title.to_lowercase().contains(query)
        || post
            .hashtags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

/// Distinct hashtags in order of first appearance.
pub fn all_hashtags(posts: &[PostEntity]) -> Vec<String> {
    let mut tags: Vec<String> = vec![];
    for tag in posts.iter().flat_map(|post| post.hashtags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn post(id: &str, title: &str, hashtags: &[&str]) -> PostEntity {
        PostEntity {
            id: PostId::from(id),
            title: title.to_string(),
            hashtags: hashtags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn ids(posts: &[PostEntity]) -> Vec<&str> {
        posts.iter().map(|p| p.id.0.as_str()).collect()
    }

    fn fixture() -> Vec<PostEntity> {
        vec![
            post("1", "Catan night", &["board", "Strategy"]),
            post("2", "Negroni", &["classic", "bitter"]),
            post("3", "Blue Train", &["jazz", "classic"]),
            post("4", "Ticket to Ride", &["board"]),
            post("5", "Oud Wood", &[]),
        ]
    }

    #[test]
    fn test_no_filter_returns_everything_in_order() {
        // Arrange
        let posts = fixture();

        // Act
        let visible = compute_visible(&posts, "", None);

        // Assert
        assert_eq!(visible, posts);
    }

    #[test]
    fn test_whitespace_query_behaves_as_empty() {
        let posts = fixture();

        let visible = compute_visible(&posts, "  \t ", None);

        assert_eq!(visible, posts);
    }

    #[test]
    fn test_tag_filter_is_exact_subset() {
        // Arrange
        let posts = fixture();

        // Act
        let visible = compute_visible(&posts, "", Some("classic"));

        // Assert
        assert_eq!(ids(&visible), ["2", "3"]);
        assert!(visible.iter().all(|p| p.has_hashtag("classic")));
    }

    #[test]
    fn test_tag_filter_is_case_sensitive() {
        let posts = fixture();

        let lower = compute_visible(&posts, "", Some("strategy"));
        let exact = compute_visible(&posts, "", Some("Strategy"));

        assert!(lower.is_empty());
        assert_eq!(ids(&exact), ["1"]);
    }

    #[test]
    fn test_tag_with_no_posts_yields_empty() {
        let posts = fixture();

        let visible = compute_visible(&posts, "", Some("perfume"));

        assert!(visible.is_empty());
    }

    #[test]
    fn test_query_matches_title_or_hashtag_case_insensitively() {
        // Arrange
        let posts = fixture();

        // Act
        let by_title = compute_visible(&posts, "  TRAIN ", None);
        let by_tag = compute_visible(&posts, "strat", None);
        let by_both = compute_visible(&posts, "o", None);

        // Assert
        assert_eq!(ids(&by_title), ["3"]);
        assert_eq!(ids(&by_tag), ["1"]);
        assert_eq!(ids(&by_both), ["1", "2", "4", "5"]);
    }

    #[test]
    fn test_query_narrows_tag_result() {
        // Arrange
        let posts = fixture();

        // Act
        let visible = compute_visible(&posts, "ticket", Some("board"));

        // Assert
        assert_eq!(ids(&visible), ["4"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let posts = fixture();
        for (query, tag) in [
            ("", None),
            ("o", None),
            ("", Some("board")),
            ("cl", Some("classic")),
            ("zzz", Some("jazz")),
        ] {
            // Act
            let once = compute_visible(&posts, query, tag);
            let twice = compute_visible(&once, query, tag);

            // Assert
            assert_eq!(once, twice, "query={query:?} tag={tag:?}");
        }
    }

    #[test]
    fn test_all_hashtags_keeps_first_appearance_order() {
        let posts = fixture();

        let tags = all_hashtags(&posts);

        assert_eq!(tags, ["board", "Strategy", "classic", "bitter", "jazz"]);
    }
}
