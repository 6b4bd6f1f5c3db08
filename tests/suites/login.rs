use crate::common::{
    BAD_LOGIN, CookieJar, GOOD_LOGIN, body_string, create_state, create_test_config,
    json_request, key, offline_checker,
};
use http::header::{SET_COOKIE, HeaderValue};
use http::request::Parts;
use http::{Method, StatusCode};
use securelogin::{
    AppState, CheckerFn, FailureReporter, LoginError, LoginHandler, ReaderFn, WriterFn, route,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CountingReporter {
    count: Mutex<usize>,
}

impl FailureReporter for CountingReporter {
    fn report(&self, _request: &Parts, _error: &LoginError) {
        *self.count.lock().unwrap() += 1;
    }
}

#[tokio::test]
async fn test_login_walkthrough() {
    let state = create_state();
    let mut jar = CookieJar::default();

    let response = route(
        &state,
        json_request(Method::POST, "/api/login", GOOD_LOGIN, &jar),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    jar.store(response.headers());
    assert_eq!(body_string(response).await, r#"{"login_key":"u123"}"#);
    assert!(jar.get("login").is_some());

    let response = route(&state, json_request(Method::GET, "/api/whoami", "", &jar)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "u123");

    let anonymous = CookieJar::default();
    let response = route(
        &state,
        json_request(Method::GET, "/api/whoami", "", &anonymous),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = route(
        &state,
        json_request(Method::DELETE, "/api/login", "", &jar),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    jar.store(response.headers());
    assert!(jar.get("login").is_none());

    let response = route(&state, json_request(Method::GET, "/api/whoami", "", &jar)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_credentials_set_no_cookie() {
    let state = create_state();
    let jar = CookieJar::default();

    let response = route(
        &state,
        json_request(Method::POST, "/api/login", BAD_LOGIN, &jar),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_put_is_not_allowed() {
    let state = create_state();
    let response = route(
        &state,
        json_request(Method::PUT, "/api/login", GOOD_LOGIN, &CookieJar::default()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_logout_through_method_override() {
    let state = create_state();
    let mut jar = CookieJar::default();

    let response = route(
        &state,
        json_request(Method::POST, "/api/login", GOOD_LOGIN, &jar),
    )
    .await;
    jar.store(response.headers());

    let response = route(
        &state,
        json_request(Method::POST, "/api/login?_method=DELETE", "", &jar),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    jar.store(response.headers());
    assert!(jar.get("login").is_none());
}

#[tokio::test]
async fn test_tampered_cookie_reads_as_nobody() {
    let state = create_state();
    let mut jar = CookieJar::default();

    let response = route(
        &state,
        json_request(Method::POST, "/api/login", GOOD_LOGIN, &jar),
    )
    .await;
    jar.store(response.headers());

    let value = jar.get("login").unwrap().to_string();
    let flipped = if value.ends_with('A') { 'B' } else { 'A' };
    let tampered = format!("{}{flipped}", &value[..value.len() - 1]);
    let mut headers = http::HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&format!("login={tampered}")).unwrap(),
    );
    jar.store(&headers);

    let response = route(&state, json_request(Method::GET, "/api/whoami", "", &jar)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_checker_outage_is_reported_not_leaked() {
    let reporter = Arc::new(CountingReporter::default());
    let state = AppState::from_config(
        &create_test_config(),
        Arc::new(CheckerFn::new(offline_checker)),
    )
    .with_reporter(reporter.clone());

    let response = route(
        &state,
        json_request(Method::POST, "/api/login", GOOD_LOGIN, &CookieJar::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(body_string(response).await.is_empty());
    assert_eq!(*reporter.count.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_closure_collaborators() {
    let checker = CheckerFn::new(|username, password| {
        if password == "open sesame" {
            Ok(key(username))
        } else {
            Err(LoginError::CredentialsRejected)
        }
    });
    let writer = WriterFn::new(|_request, headers, identity| {
        let value = identity.map(|i| i.login_key().to_string()).unwrap_or_default();
        let header = HeaderValue::from_str(&format!("user={value}"))
            .map_err(|e| LoginError::Storage(e.to_string()))?;
        headers.insert(SET_COOKIE, header);
        Ok(())
    });
    let reader = ReaderFn::new(|request| {
        Ok(request
            .headers
            .get(http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("user="))
            .filter(|v| !v.is_empty())
            .map(key))
    });

    let handler = LoginHandler::new(Arc::new(checker), Arc::new(writer));
    let state = AppState::new(handler, Arc::new(reader), 1024);
    let mut jar = CookieJar::default();

    let response = route(
        &state,
        json_request(
            Method::POST,
            "/api/login",
            r#"{"username":"ali","password":"open sesame"}"#,
            &jar,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    jar.store(response.headers());

    let response = route(&state, json_request(Method::GET, "/api/whoami", "", &jar)).await;
    assert_eq!(body_string(response).await, "ali");
}
