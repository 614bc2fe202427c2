use reqwest::StatusCode;
use snippetbox::UserStore;

use crate::common::mock_browser::location;
use crate::common::{MockBrowser, TEST_EMAIL, TEST_NAME, TEST_PASSWORD, TestServer};

fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.value().to_string())
}

#[tokio::test]
async fn test_signup_then_login() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.signup(TEST_NAME, TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    // Flash is shown exactly once
    let body = browser.get_body("/user/login").await;
    assert!(body.contains("Your signup was successful. Please log in."));
    let body = browser.get_body("/user/login").await;
    assert!(!body.contains("Your signup was successful. Please log in."));

    let response = browser.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/snippet/create");

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-store");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let server = TestServer::start().await.unwrap();
    server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.signup("Bob", TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Address is already in use")
    );
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.signup("", "not-an-email", "short").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("This field cannot be blank"));
    assert!(body.contains("This field is invalid"));
    assert!(body.contains("This field is too short (minimum is 10 characters)"));
}

#[tokio::test]
async fn test_login_failure_keeps_email() {
    let server = TestServer::start().await.unwrap();
    server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.login(TEST_EMAIL, "wrong-password").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Email or Password is incorrect"));
    assert!(body.contains(TEST_EMAIL));

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_renews_session_token() {
    let server = TestServer::start().await.unwrap();
    server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let before = session_cookie(&browser.get("/user/login").await).unwrap();
    let response = browser.login(TEST_EMAIL, TEST_PASSWORD).await;
    let after = session_cookie(&response).unwrap();

    assert_ne!(before, after);
}

#[tokio::test]
async fn test_logout() {
    let server = TestServer::start().await.unwrap();
    server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);
    browser.login(TEST_EMAIL, TEST_PASSWORD).await;

    // The logout form lives in the layout of every page
    let response = browser.submit("/", "/user/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let body = browser.get_body("/").await;
    assert!(body.contains("been logged out successfully!"));
    assert!(body.contains("href=\"/user/login\""));

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

#[tokio::test]
async fn test_deactivated_user_is_signed_out() {
    let server = TestServer::start().await.unwrap();
    let id = server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);
    browser.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(
        browser.get("/snippet/create").await.status(),
        StatusCode::OK
    );

    server.users.set_active(id, false).await.unwrap();

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    // Reactivating does not restore the dropped sign-in
    server.users.set_active(id, true).await.unwrap();
    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
