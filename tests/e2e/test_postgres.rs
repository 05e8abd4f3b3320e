// Feed, tag and like scenarios against the Postgres repositories.
// They start a PostgreSQL container, so they only run with a Docker daemon:
//   cargo test --test e2e_tests postgres -- --ignored

use crate::e2e::helpers;

use helpers::assertions::{assert_posted_feed, assert_tags_match};
use helpers::stub_data::{MockFeed, MockMember};
use helpers::PgFeedTestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use travel_with_me::domain::feed::{FeedResponse, NewFeed};
use travel_with_me::domain::tag::TagResponse;
use travel_with_me::error::{AppError, ErrorCode};
use travel_with_me::infrastructure::repositories::{
    FeedRepository, LikeRepository, PgFeedRepository, PgLikeRepository,
};

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_keeps_posted_tags_in_order(ctx: &PgFeedTestContext) {
    let request = MockFeed::post_dto();
    assert_posted_feed(&ctx.feed, &request, MockMember::NICKNAME);

    let mut reversed = request.clone();
    reversed.tags.reverse();
    let response = ctx
        .client()
        .post_multipart_with_token("/feed", &reversed, None, &ctx.tokens)
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let created: FeedResponse = response.single();
    assert_eq!(created.tags, vec![MockFeed::tag_name(2), MockFeed::tag_name(1)]);

    let fetched: FeedResponse = ctx
        .client()
        .get_with_token(&format!("/feed/{}", created.id), &ctx.tokens)
        .await
        .unwrap()
        .single();
    assert_eq!(fetched, created);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_lists_feeds_newest_first(ctx: &PgFeedTestContext) {
    ctx.base
        .fixtures
        .create_multiple_feeds(ctx.member.id, 3)
        .await
        .unwrap();

    let first_page: Vec<FeedResponse> = ctx
        .client()
        .get_with_token_and_params("/feed", &ctx.tokens, &[("size", MockFeed::SIZE.to_string())])
        .await
        .unwrap()
        .many();
    let ids: Vec<i64> = first_page.iter().map(|feed| feed.id).collect();
    assert_eq!(ids, vec![4, 3]);

    let second_page: Vec<FeedResponse> = ctx
        .client()
        .get_with_token_and_params(
            "/feed",
            &ctx.tokens,
            &[
                ("lastFeedId", "3".to_string()),
                ("size", MockFeed::SIZE.to_string()),
            ],
        )
        .await
        .unwrap()
        .many();
    let ids: Vec<i64> = second_page.iter().map(|feed| feed.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_replaces_tags_on_patch(ctx: &PgFeedTestContext) {
    let response = ctx
        .client()
        .patch_with_token(
            &ctx.feed_path(),
            &json!({ "tags": ["seaside", MockFeed::tag_name(1)] }),
            &ctx.tokens,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let feed: FeedResponse = response.single();
    assert_eq!(feed.tags, vec!["seaside".to_string(), MockFeed::tag_name(1)]);
    assert_eq!(feed.contents, ctx.feed.contents);

    // The new name joins the catalog
    let tags: Vec<TagResponse> = ctx
        .client()
        .get_with_token_and_params("/feed/tags", &ctx.tokens, &[("tagName", "SEA".to_string())])
        .await
        .unwrap()
        .many();
    let names: Vec<String> = tags.into_iter().map(|tag| tag.name).collect();
    assert_eq!(names, vec!["seaside".to_string()]);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_finds_tags_by_fragment(ctx: &PgFeedTestContext) {
    ctx.base
        .fixtures
        .create_tags(&["100%_jeju".to_string(), "busan".to_string()])
        .await
        .unwrap();

    let tags: Vec<TagResponse> = ctx
        .client()
        .get_with_token_and_params(
            "/feed/tags",
            &ctx.tokens,
            &[
                ("tagName", MockFeed::TAG_NAME.to_string()),
                ("size", MockFeed::SIZE.to_string()),
            ],
        )
        .await
        .unwrap()
        .many();
    assert_tags_match(&tags, MockFeed::TAG_NAME, MockFeed::SIZE as usize);
    assert_eq!(tags.len(), 2);

    // LIKE wildcards in the fragment match literally
    let tags: Vec<TagResponse> = ctx
        .client()
        .get_with_token_and_params("/feed/tags", &ctx.tokens, &[("tagName", "%_".to_string())])
        .await
        .unwrap()
        .many();
    let names: Vec<String> = tags.into_iter().map(|tag| tag.name).collect();
    assert_eq!(names, vec!["100%_jeju".to_string()]);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_likes_and_cancels(ctx: &PgFeedTestContext) {
    let (_, other_tokens) = ctx.other_member().await;

    ctx.client()
        .post_with_token(&ctx.likes_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client()
        .post_with_token(&ctx.likes_path(), &other_tokens)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client()
        .post_with_token(&ctx.likes_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_error(ErrorCode::AlreadyLikedFeed);

    let feed: FeedResponse = ctx
        .client()
        .get_with_token(&ctx.feed_path(), &ctx.tokens)
        .await
        .unwrap()
        .single();
    assert_eq!(feed.like_count, 2);
    assert!(feed.liked);

    ctx.client()
        .delete_with_token(&ctx.likes_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client()
        .delete_with_token(&ctx.likes_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_error(ErrorCode::UnableToCancelLike);

    let feed: FeedResponse = ctx
        .client()
        .get_with_token(&ctx.feed_path(), &ctx.tokens)
        .await
        .unwrap()
        .single();
    assert_eq!(feed.like_count, 1);
    assert!(!feed.liked);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_deletes_a_feed_with_its_likes(ctx: &PgFeedTestContext) {
    ctx.base
        .fixtures
        .like_feed(ctx.member.id, ctx.feed.id)
        .await
        .unwrap();

    ctx.client()
        .delete_with_token(&ctx.feed_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client()
        .get_with_token(&ctx.feed_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_error(ErrorCode::FeedNotFound);
    ctx.client()
        .post_with_token(&ctx.likes_path(), &ctx.tokens)
        .await
        .unwrap()
        .assert_error(ErrorCode::FeedNotFound);
}

#[test_context(PgFeedTestContext)]
#[tokio::test]
#[ignore = "needs a Docker daemon"]
async fn postgres_maps_missing_references_to_not_found(ctx: &PgFeedTestContext) {
    let pool = ctx.database().pool.clone();
    let likes = PgLikeRepository::new(pool.clone());
    let feeds = PgFeedRepository::new(pool);

    let result = likes.insert(ctx.feed.id + 1000, ctx.member.id).await;
    assert!(matches!(
        result,
        Err(AppError::Business(ErrorCode::FeedNotFound))
    ));

    let result = likes.insert(ctx.feed.id, ctx.member.id + 1000).await;
    assert!(matches!(
        result,
        Err(AppError::Business(ErrorCode::MemberNotFound))
    ));

    let result = feeds
        .create(NewFeed {
            member_id: ctx.member.id + 1000,
            contents: MockFeed::CONTENTS.to_string(),
            location: MockFeed::LOCATION.to_string(),
            tags: vec![],
            image_path: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(AppError::Business(ErrorCode::MemberNotFound))
    ));
}
