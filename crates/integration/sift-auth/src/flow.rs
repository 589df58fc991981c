//! Authorization-code flow against the Spotify accounts service

use serde::Deserialize;
use tracing::{debug, info};

use sift_core::{Error, Result, SiftConfig};

use crate::pkce::PkceChallenge;
use crate::tokens::TokenCache;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";
const TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";

/// Everything the app touches: library read/write, playlist read/write,
/// and the browse endpoints.
pub const OAUTH_SCOPES: &[&str] = &[
    "user-library-read",
    "user-library-modify",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-top-read",
    "user-read-recently-played",
];

/// Token endpoint response for both exchange and refresh grants.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    /// Absent on refresh responses; the old refresh token stays valid
    pub refresh_token: Option<String>,
}

/// Build the user-facing authorization URL.
pub fn authorize_url(client_id: &str, redirect_uri: &str, pkce: &PkceChallenge) -> String {
    let url = url::Url::parse_with_params(
        AUTHORIZE_ENDPOINT,
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("scope", &OAUTH_SCOPES.join(" ")),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", &pkce.challenge),
        ],
    )
    .expect("static authorize endpoint parses");
    url.to_string()
}

/// Block on one loopback redirect and pull the authorization code out of
/// it. Runs on a plain thread; callers wrap it in `spawn_blocking`.
fn wait_for_callback(port: u16) -> Result<String> {
    let server = tiny_http::Server::http(("127.0.0.1", port))
        .map_err(|err| Error::Io(format!("cannot bind loopback port {port}: {err}")))?;
    info!(port, "waiting for the browser redirect");

    for request in server.incoming_requests() {
        let full = format!("http://127.0.0.1:{port}{}", request.url());
        let parsed = url::Url::parse(&full)
            .map_err(|err| Error::Malformed(format!("bad callback url: {err}")))?;

        let mut code = None;
        let mut oauth_error = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => oauth_error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = oauth_error {
            let _ = request.respond(html_response("Authorization failed. You can close this tab."));
            return Err(Error::Auth(format!("authorization denied: {error}")));
        }
        if let Some(code) = code {
            let _ = request.respond(html_response("Signed in. You can close this tab."));
            return Ok(code);
        }
        // favicon probes and the like: answer and keep waiting
        let _ = request.respond(html_response("Waiting for Spotify..."));
    }

    Err(Error::Auth("callback listener closed without a code".to_string()))
}

fn html_response(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let html = format!("<html><body><p>{body}</p></body></html>");
    tiny_http::Response::from_string(html).with_header(
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..])
            .expect("static header"),
    )
}

/// Exchange an authorization code for tokens. Public PKCE client: the
/// client id rides in the form body, no Basic auth.
pub async fn exchange_code(
    http: &reqwest::Client,
    client_id: &str,
    code: &str,
    redirect_uri: &str,
    verifier: &str,
) -> Result<TokenResponse> {
    request_token(
        http,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("code_verifier", verifier),
        ],
    )
    .await
}

/// Trade a refresh token for a fresh access token.
pub async fn refresh_token(
    http: &reqwest::Client,
    client_id: &str,
    refresh: &str,
) -> Result<TokenResponse> {
    request_token(
        http,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh),
            ("client_id", client_id),
        ],
    )
    .await
}

async fn request_token(http: &reqwest::Client, form: &[(&str, &str)]) -> Result<TokenResponse> {
    let response = http
        .post(TOKEN_ENDPOINT)
        .form(form)
        .send()
        .await
        .map_err(|err| Error::Network(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("token endpoint HTTP {status}: {message}")));
    }
    response
        .json::<TokenResponse>()
        .await
        .map_err(|err| Error::Malformed(err.to_string()))
}

/// Run the tail of the login flow: wait for the redirect carrying the
/// code, exchange it, and persist the resulting token cache.
///
/// The caller has already shown `authorize_url(..)` to the user.
pub async fn complete_login(config: &SiftConfig, pkce: PkceChallenge) -> Result<TokenCache> {
    let client_id = config.require_client_id()?.to_string();
    let redirect_uri = config.redirect_uri();
    let port = config.redirect_port;

    let code = tokio::task::spawn_blocking(move || wait_for_callback(port))
        .await
        .map_err(|err| Error::Io(format!("callback listener panicked: {err}")))??;
    debug!("authorization code received");

    let http = reqwest::Client::new();
    let response = exchange_code(&http, &client_id, &code, &redirect_uri, &pkce.verifier).await?;
    let cache = TokenCache::from_response(response);
    cache.save()?;
    info!("login complete, tokens cached");
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_pkce_params() {
        let pkce = PkceChallenge::generate();
        let url = authorize_url("client123", "http://127.0.0.1:8898/callback", &pkce);

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client123"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("code_challenge={}", pkce.challenge)));
        assert!(url.contains("user-library-read"));
    }

    #[test]
    fn token_response_parses_without_refresh_token() {
        let json = r#"{"access_token": "at", "token_type": "Bearer", "expires_in": 3600, "scope": "user-library-read"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "at");
        assert_eq!(response.expires_in, 3600);
        assert!(response.refresh_token.is_none());
    }

    /// A port the OS just handed out and released; avoids collisions
    /// with the environment and between parallel tests.
    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[tokio::test]
    async fn callback_listener_extracts_the_code() {
        let port = free_port();
        let handle = tokio::task::spawn_blocking(move || wait_for_callback(port));
        // give the listener a moment to bind
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let body = reqwest::get(format!("http://127.0.0.1:{port}/callback?code=abc123&state=x"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Signed in"));

        let code = handle.await.unwrap().unwrap();
        assert_eq!(code, "abc123");
    }

    #[tokio::test]
    async fn callback_listener_reports_denial() {
        let port = free_port();
        let handle = tokio::task::spawn_blocking(move || wait_for_callback(port));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let _ = reqwest::get(format!("http://127.0.0.1:{port}/callback?error=access_denied")).await;

        assert!(matches!(handle.await.unwrap(), Err(Error::Auth(_))));
    }
}
