use reqwest::StatusCode;
use snippetbox::UserStore;

use crate::common::mock_browser::location;
use crate::common::{MockBrowser, TEST_EMAIL, TEST_NAME, TEST_PASSWORD, TestServer};

async fn signed_in(server: &TestServer) -> MockBrowser {
    server
        .users
        .insert(TEST_NAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    let browser = MockBrowser::new(&server.base_url);
    let response = browser.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    browser
}

#[tokio::test]
async fn test_create_and_show_snippet() {
    let server = TestServer::start().await.unwrap();
    let browser = signed_in(&server).await;

    let response = browser
        .submit(
            "/snippet/create",
            "/snippet/create",
            &[
                ("title", "O snail"),
                ("content", "Climb Mount Fuji, but slowly, slowly!"),
                ("expires", "7"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/snippet/1");

    let body = browser.get_body("/snippet/1").await;
    assert!(body.contains("O snail"));
    assert!(body.contains("Climb Mount Fuji, but slowly, slowly!"));
    assert!(body.contains("Snippet successfully created!"));

    let body = browser.get_body("/snippet/1").await;
    assert!(!body.contains("Snippet successfully created!"));

    // Visible to anonymous visitors too
    let anonymous = MockBrowser::new(&server.base_url);
    let body = anonymous.get_body("/").await;
    assert!(body.contains("O snail"));
    assert!(body.contains("href=\"/snippet/1\""));
}

#[tokio::test]
async fn test_create_snippet_validation() {
    let server = TestServer::start().await.unwrap();
    let browser = signed_in(&server).await;
    let long_title = "x".repeat(101);

    let response = browser
        .submit(
            "/snippet/create",
            "/snippet/create",
            &[
                ("title", long_title.as_str()),
                ("content", ""),
                ("expires", "30"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("This field is too long (maximum is 100 characters)"));
    assert!(body.contains("This field cannot be blank"));
    assert!(body.contains("This field is invalid"));

    assert_eq!(
        browser.get("/snippet/1").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_missing_snippets() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    for path in ["/snippet/1", "/snippet/0", "/snippet/x"] {
        let response = browser.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(response.text().await.unwrap(), "Not Found");
    }
}

#[tokio::test]
async fn test_security_headers_and_ping() {
    let server = TestServer::start().await.unwrap();
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.get("/ping").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "deny");
    assert_eq!(response.headers()["x-xss-protection"], "1; mode=block");
    assert_eq!(response.text().await.unwrap(), "OK");
}
