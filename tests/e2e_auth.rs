//! E2E tests for the login, callback and logout endpoints

mod common;

use common::{APP_URL, StubProvider, TestServer, find_cookie, location, set_cookies};
use reqwest::StatusCode;
use supportchat::error::AppError;
use url::Url;

#[tokio::test]
async fn test_login_redirects_to_scalekit_with_callback_url() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/auth/login"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FOUND);
    let target = Url::parse(&location(&response)).expect("absolute redirect");
    assert_eq!(target.host_str(), Some("supportchat-test.scalekit.dev"));
    assert_eq!(target.path(), "/oauth/authorize");

    let redirect_uri = target
        .query_pairs()
        .find(|(key, _)| key == "redirect_uri")
        .map(|(_, value)| value.into_owned());
    assert_eq!(
        redirect_uri.as_deref(),
        Some(format!("{APP_URL}/api/auth/callback").as_str())
    );
    assert!(
        target
            .query_pairs()
            .any(|(key, value)| key == "client_id" && value == "skc_test_client")
    );
}

#[tokio::test]
async fn test_callback_without_code_is_rejected() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/auth/callback"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty());
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body, serde_json::json!({ "error": "No code provided" }));
}

#[tokio::test]
async fn test_callback_with_empty_code_or_provider_error_is_rejected() {
    let server = TestServer::new().await;

    for query in ["?code=", "?error=access_denied&error_description=User%20cancelled"] {
        let response = server
            .client
            .get(server.url(&format!("/api/auth/callback{query}")))
            .send()
            .await
            .expect("request succeeds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["error"], "No code provided");
    }
}

#[tokio::test]
async fn test_callback_sets_access_token_cookie_and_redirects_home() {
    let provider = StubProvider::returning_token("T", "ada@example.com");
    let server = TestServer::with_provider(provider.clone()).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?code=validcode"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("{APP_URL}/"));

    let access_token = find_cookie(&response, "access_token").expect("access_token cookie");
    assert!(access_token.starts_with("access_token=T;"));
    assert!(access_token.contains("HttpOnly"));
    assert!(access_token.contains("SameSite=Lax"));
    assert!(access_token.contains("Max-Age=604800"));
    assert!(access_token.contains("Path=/"));

    let session = find_cookie(&response, "session").expect("session cookie");
    assert!(session.contains("HttpOnly"));

    let exchanges = provider.exchanges.lock().unwrap().clone();
    assert_eq!(
        exchanges,
        vec![(
            "validcode".to_string(),
            format!("{APP_URL}/api/auth/callback")
        )]
    );
}

#[tokio::test]
async fn test_callback_with_repeated_code_exchanges_the_first() {
    let provider = StubProvider::returning_token("T", "ada@example.com");
    let server = TestServer::with_provider(provider.clone()).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?code=a&code=b"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(find_cookie(&response, "access_token").is_some());

    let codes: Vec<String> = provider
        .exchanges
        .lock()
        .unwrap()
        .iter()
        .map(|(code, _)| code.clone())
        .collect();
    assert_eq!(codes, vec!["a".to_string()]);
}

#[tokio::test]
async fn test_callback_with_malformed_query_returns_json_error() {
    let provider = StubProvider::returning_token("T", "ada@example.com");
    let server = TestServer::with_provider(provider.clone()).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?%%%&&=&code"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body, serde_json::json!({ "error": "No code provided" }));
    assert!(provider.exchanges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_without_provider_email_sets_no_cookie() {
    let server = TestServer::with_provider(StubProvider::returning_without_email("T")).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?code=validcode"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_callback_rejected_code_returns_unauthorized_without_cookie() {
    let provider = StubProvider::failing_with(|| {
        AppError::ProviderRejected("invalid_grant: code expired".to_string())
    });
    let server = TestServer::with_provider(provider).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?code=stale"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(find_cookie(&response, "access_token").is_none());
    let body: serde_json::Value = response.json().await.expect("json body");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_callback_provider_outage_returns_bad_gateway() {
    let provider = StubProvider::failing_with(|| {
        AppError::ProviderUnavailable("token endpoint returned 503".to_string())
    });
    let server = TestServer::with_provider(provider).await;

    let response = server
        .client
        .get(server.url("/api/auth/callback?code=validcode"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_cookies() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/auth/logout"))
        .header("Cookie", server.session_cookie_header("ada@example.com"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);

    let access_token = find_cookie(&response, "access_token").expect("access_token removal");
    assert!(access_token.contains("Max-Age=0"));
    let session = find_cookie(&response, "session").expect("session removal");
    assert!(session.contains("Max-Age=0"));

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_logout_without_cookies_still_succeeds() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/auth/logout"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&response, "access_token").is_some());
}

#[tokio::test]
async fn test_logout_rejects_get() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/auth/logout"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
