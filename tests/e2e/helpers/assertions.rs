use pretty_assertions::assert_eq;
use travel_with_me::domain::auth::TokenResponse;
use travel_with_me::domain::feed::{FeedPostRequest, FeedResponse};
use travel_with_me::domain::tag::TagResponse;

/// A feed as returned right after posting `request`
pub fn assert_posted_feed(feed: &FeedResponse, request: &FeedPostRequest, nickname: &str) {
    assert!(feed.id > 0, "Feed ID should be positive");
    assert_eq!(feed.contents, request.contents);
    assert_eq!(feed.location, request.location);
    assert_eq!(feed.tags, request.tags);
    assert_eq!(feed.nickname, nickname);
    assert_eq!(feed.like_count, 0);
    assert_eq!(feed.comment_count, 0);
    assert!(!feed.liked);
}

pub fn assert_token_response(tokens: &TokenResponse) {
    assert!(!tokens.access_token.is_empty(), "Missing access token");
    assert!(!tokens.refresh_token.is_empty(), "Missing refresh token");
    assert!(tokens.expires_in > 0, "expiresIn should be positive");
}

/// Every tag contains `fragment` (case-insensitively) and there are at most `size`
pub fn assert_tags_match(tags: &[TagResponse], fragment: &str, size: usize) {
    assert!(tags.len() <= size, "Expected at most {} tags, got {}", size, tags.len());
    let fragment = fragment.to_lowercase();
    for tag in tags {
        assert!(
            tag.name.to_lowercase().contains(&fragment),
            "Tag '{}' does not contain '{}'",
            tag.name,
            fragment
        );
    }
}
