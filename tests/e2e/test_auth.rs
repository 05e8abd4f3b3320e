use crate::e2e::helpers;

use helpers::api_client::TokenPair;
use helpers::assertions::assert_token_response;
use helpers::stub_data::MockMember;
use helpers::{FeedTestContext, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use travel_with_me::domain::auth::TokenResponse;
use travel_with_me::error::ErrorCode;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_login_with_valid_credentials(ctx: &TestContext) {
    ctx.fixtures
        .create_member(MockMember::sign_up_request())
        .await
        .unwrap();

    let response = ctx
        .client
        .post_json(
            "/auth/login",
            &json!({ "email": MockMember::EMAIL, "password": MockMember::PASSWORD }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let tokens: TokenResponse = response.single();
    assert_token_response(&tokens);
    assert_eq!(tokens.expires_in, ctx.config.jwt_expiration_hours * 3600);

    // Tokens are mirrored into the response headers
    assert_eq!(
        response.header("authorization"),
        Some(&format!("Bearer {}", tokens.access_token))
    );
    assert_eq!(response.header("refresh"), Some(&tokens.refresh_token));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_wrong_password(ctx: &TestContext) {
    ctx.fixtures
        .create_member(MockMember::sign_up_request())
        .await
        .unwrap();

    let response = ctx
        .client
        .post_json(
            "/auth/login",
            &json!({ "email": MockMember::EMAIL, "password": "wrong-password" }),
        )
        .await
        .unwrap();

    response.assert_error(ErrorCode::InvalidCredentials);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_unknown_email(ctx: &TestContext) {
    let response = ctx
        .client
        .post_json(
            "/auth/login",
            &json!({ "email": "nobody@travelwithme.com", "password": MockMember::PASSWORD }),
        )
        .await
        .unwrap();

    response.assert_error(ErrorCode::InvalidCredentials);
}

#[test_context(FeedTestContext)]
#[tokio::test]
async fn it_should_reissue_and_rotate_the_refresh_token(ctx: &FeedTestContext) {
    let old_refresh = ctx.tokens.refresh_token.clone().unwrap();

    let response = ctx
        .client()
        .post_with_refresh("/auth/reissue", &old_refresh)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let tokens: TokenResponse = response.single();
    assert_token_response(&tokens);
    assert_ne!(tokens.refresh_token, old_refresh);

    // The presented refresh token is spent
    let response = ctx
        .client()
        .post_with_refresh("/auth/reissue", &old_refresh)
        .await
        .unwrap();
    response.assert_error(ErrorCode::InvalidRefreshToken);

    // The new pair is usable
    let pair = TokenPair::new(tokens.access_token, tokens.refresh_token);
    ctx.client()
        .get_with_token(&ctx.feed_path(), &pair)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_tampered_refresh_token(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_refresh("/auth/reissue", "aGVsbG8=")
        .await
        .unwrap();

    response.assert_error(ErrorCode::InvalidRefreshToken);
}

#[test_context(FeedTestContext)]
#[tokio::test]
async fn it_should_revoke_refresh_tokens_on_logout(ctx: &FeedTestContext) {
    let response = ctx
        .client()
        .post_with_token("/auth/logout", &ctx.tokens)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let refresh = ctx.tokens.refresh_token.clone().unwrap();
    let response = ctx
        .client()
        .post_with_refresh("/auth/reissue", &refresh)
        .await
        .unwrap();
    response.assert_error(ErrorCode::InvalidRefreshToken);

    // An expired access token can no longer be renewed either
    let expired = ctx
        .base
        .services
        .auth
        .jwt()
        .generate_token_with_expiry(
            ctx.member.id,
            &ctx.member.email,
            chrono::Utc::now() - chrono::Duration::hours(1),
        )
        .unwrap();
    let response = ctx
        .client()
        .get_with_token(&ctx.feed_path(), &TokenPair::new(expired, refresh))
        .await
        .unwrap();
    response.assert_error(ErrorCode::InvalidRefreshToken);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_authentication_for_logout(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_token("/auth/logout", &TokenPair::access_only("garbage"))
        .await
        .unwrap();

    response.assert_error(ErrorCode::InvalidAccessToken);
}
