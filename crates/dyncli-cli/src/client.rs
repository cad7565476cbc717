use std::sync::RwLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dyncli_gslb::{ApiPath, ApiTransport, Envelope, Method, TransportError};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.dynect.net/REST/";

const AUTH_HEADER: &str = "Auth-Token";

#[derive(Debug, Deserialize)]
struct SessionData {
    token: String,
}

/// Dynect REST client holding the session token of a logged-in user
pub struct DynectClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl DynectClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API URL: {base_url}");
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &ApiPath) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.segments()).push("");
        }
        if !path.query().is_empty() {
            url.query_pairs_mut().extend_pairs(path.query());
        }
        url
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Open a session; later requests carry its token.
    pub async fn login(
        &self,
        customer: &str,
        username: &str,
        password: &str,
    ) -> Result<(), TransportError> {
        let body = json!({
            "customer_name": customer,
            "user_name": username,
            "password": password,
        });
        let session: SessionData = self
            .execute(Method::Post, &ApiPath::new(["Session"]), Some(body))
            .await?
            .into_data()?;
        self.set_token(Some(session.token));
        Ok(())
    }

    /// Close the session. A client that never logged in has nothing to close.
    pub async fn logout(&self) -> Result<(), TransportError> {
        if !self.is_logged_in() {
            return Ok(());
        }
        self.execute(Method::Delete, &ApiPath::new(["Session"]), None)
            .await?
            .into_data::<Value>()?;
        self.set_token(None);
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Envelope, TransportError> {
        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut req = self
            .http
            .request(method, self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = self.token() {
            req = req.header(AUTH_HEADER, token);
        }
        if let Some(body) = &body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::Http(format!("Failed to connect to server: {e}")))?;
        handle_response(resp).await
    }
}

#[async_trait]
impl ApiTransport for DynectClient {
    async fn send(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<Value>,
    ) -> Result<Envelope, TransportError> {
        self.execute(method, path, body).await
    }
}

/// Failed calls still carry an envelope with messages, so any body that
/// parses as one is returned whatever the HTTP status.
async fn handle_response(resp: reqwest::Response) -> Result<Envelope, TransportError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<Envelope>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(TransportError::Http(format!("HTTP {status}: {body}"))),
        Err(e) => Err(TransportError::Decode(e.to_string())),
    }
}
