use reqwest::StatusCode;

use crate::common::{MockBrowser, TEST_EMAIL, TEST_NAME, TEST_PASSWORD, TestServer};
use crate::common::mock_browser::location;

#[tokio::test]
async fn test_form_post_without_token_is_rejected_without_side_effects() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);
    browser.get("/user/signup").await;

    let response = browser
        .post_form(
            "/user/signup",
            &[
                ("name", TEST_NAME),
                ("email", TEST_EMAIL),
                ("password", TEST_PASSWORD),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Bad Request");

    // The account was never created
    let response = browser.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Email or Password is incorrect")
    );
}

#[tokio::test]
async fn test_token_from_another_session_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let victim = MockBrowser::new(&server.base_url);
    let attacker = MockBrowser::new(&server.base_url);

    let stolen = attacker.csrf_token("/user/login").await;
    victim.get("/user/login").await;

    let response = victim
        .post_form(
            "/user/login",
            &[
                ("email", TEST_EMAIL),
                ("password", TEST_PASSWORD),
                ("csrf_token", stolen.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_is_stable_within_a_session() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let first = browser.csrf_token("/user/login").await;
    let second = browser.csrf_token("/user/signup").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_csrf_check_runs_before_gate() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    // Anonymous but with a valid token: passes CSRF, stopped by the gate
    let response = browser
        .submit(
            "/user/login",
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "7")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    // Without a token the CSRF stage answers first
    let response = browser
        .post_form(
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "7")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
