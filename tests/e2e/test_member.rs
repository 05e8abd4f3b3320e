use crate::e2e::helpers;

use helpers::stub_data::MockMember;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use travel_with_me::domain::member::MemberResponse;
use travel_with_me::error::ErrorCode;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_sign_up_a_member(ctx: &TestContext) {
    let response = ctx
        .client
        .post_json("/members/signup", &MockMember::sign_up_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let member: MemberResponse = response.single();
    assert!(member.id > 0);
    assert_eq!(member.email, MockMember::EMAIL);
    assert_eq!(member.nickname, MockMember::NICKNAME);

    // The password hash never leaves the server
    let data = response.body.as_ref().unwrap().get("data").unwrap();
    assert!(data.get("passwordHash").is_none());
    assert!(data.get("password_hash").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_normalize_the_email_on_sign_up(ctx: &TestContext) {
    let response = ctx
        .client
        .post_json(
            "/members/signup",
            &json!({
                "email": "  Traveler@TravelWithMe.com ",
                "password": MockMember::PASSWORD,
                "nickname": MockMember::NICKNAME
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let member: MemberResponse = response.single();
    assert_eq!(member.email, MockMember::EMAIL);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_duplicate_email(ctx: &TestContext) {
    ctx.fixtures
        .create_member(MockMember::sign_up_request())
        .await
        .unwrap();

    let response = ctx
        .client
        .post_json("/members/signup", &MockMember::sign_up_request())
        .await
        .unwrap();

    response.assert_error(ErrorCode::DuplicateEmail);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_invalid_sign_up(ctx: &TestContext) {
    let response = ctx
        .client
        .post_json(
            "/members/signup",
            &json!({
                "email": "not-an-email",
                "password": "short",
                "nickname": MockMember::NICKNAME
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.error();
    assert_eq!(error.status, 400);
    assert!(error.message.contains("email"));
    assert!(error.message.contains("password"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_malformed_body(ctx: &TestContext) {
    let response = ctx
        .client
        .post_json("/members/signup", &json!({ "email": MockMember::EMAIL }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.error().status, 400);
}
