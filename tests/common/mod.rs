use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{HeaderMap, Method, Request, Response};
use http_body_util::{BodyExt, Full};
use securelogin::{
    AppState, Config, CookieAttributes, CookieCrypto, DemoAccount, Identity, LoginError,
    LoginKey, StaticChecker,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const GOOD_LOGIN: &str = r#"{"username":"you@example.com","password":"testtest"}"#;
pub const BAD_LOGIN: &str = r#"{"username":"you@example.com","password":"wrongpass"}"#;

pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        crypto: CookieCrypto::new(b"fedcba9876543210").unwrap(),
        cookie: CookieAttributes {
            path: Some("/".to_string()),
            ..CookieAttributes::default()
        },
        method_override_param: Some("_method".to_string()),
        max_body_bytes: 1024,
        concurrency_limit: 16,
        demo_account: Some(example_account()),
        log_format: "pretty".to_string(),
    })
}

pub fn example_account() -> DemoAccount {
    DemoAccount {
        username: "you@example.com".to_string(),
        password: "testtest".to_string(),
        login_key: "u123".to_string(),
    }
}

pub fn create_state() -> AppState {
    let config = create_test_config();
    AppState::from_config(&config, Arc::new(StaticChecker::new(example_account())))
}

pub fn json_request(method: Method, uri: &str, body: &str, cookies: &CookieJar) -> Request<Bytes> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(header) = cookies.header() {
        builder = builder.header(COOKIE, header);
    }
    builder.body(Bytes::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Minimal client-side cookie store: remembers the last value per name and
/// drops cookies that arrive with `Max-Age=0`.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn store(&mut self, headers: &HeaderMap) {
        for header in headers.get_all(SET_COOKIE) {
            let cookie = cookie::Cookie::parse(header.to_str().unwrap().to_string()).unwrap();
            self.cookies.retain(|(name, _)| name != cookie.name());
            let removed = cookie
                .max_age()
                .is_some_and(|age| age.whole_seconds() <= 0);
            if !removed {
                self.cookies
                    .push((cookie.name().to_string(), cookie.value().to_string()));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Spawns the full server on an ephemeral port and returns its address.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(securelogin::serve(listener, Arc::new(state), 16));
    addr
}

/// Checker whose credential store is down.
pub fn offline_checker(_username: &str, _password: &str) -> securelogin::Result<Box<dyn Identity>> {
    Err(LoginError::backend(std::io::Error::other("credential store offline")))
}

pub fn key(value: &str) -> Box<dyn Identity> {
    Box::new(LoginKey::new(value))
}
