//! Async HTTP client wrapping the Unison JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use unison_core::{
  contact::{Contact, ContactId, LinkPrecedence},
  view::ConsolidatedIdentity,
};

/// Connection settings for the Unison API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Unison JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentifyBody<'a> {
  email:        Option<&'a str>,
  phone_number: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct IdentifyResponse {
  contact: ConsolidatedIdentity,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Identify ──────────────────────────────────────────────────────────────

  /// `POST /identify`
  pub async fn identify(
    &self,
    email: Option<&str>,
    phone_number: Option<&str>,
  ) -> Result<ConsolidatedIdentity> {
    let resp = self
      .client
      .post(self.url("/identify"))
      .json(&IdentifyBody { email, phone_number })
      .send()
      .await
      .context("POST /identify failed")?;

    let body: IdentifyResponse = decode(resp, "POST /identify").await?;
    Ok(body.contact)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  /// `GET /contacts/{id}`
  pub async fn get_contact(&self, id: ContactId) -> Result<Contact> {
    let what = format!("GET /contacts/{id}");
    let resp = self
      .client
      .get(self.url(&format!("/contacts/{id}")))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    decode(resp, &what).await
  }

  /// `GET /contacts/{id}/identity`
  pub async fn identity_of(&self, id: ContactId) -> Result<ConsolidatedIdentity> {
    let what = format!("GET /contacts/{id}/identity");
    let resp = self
      .client
      .get(self.url(&format!("/contacts/{id}/identity")))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    let body: IdentifyResponse = decode(resp, &what).await?;
    Ok(body.contact)
  }

  /// `GET /contacts[?precedence=<p>][&limit=<n>]`
  pub async fn list_contacts(
    &self,
    precedence: Option<LinkPrecedence>,
    limit: Option<usize>,
  ) -> Result<Vec<Contact>> {
    let mut query = Vec::new();
    if let Some(p) = precedence {
      query.push(("precedence", p.to_string()));
    }
    if let Some(n) = limit {
      query.push(("limit", n.to_string()));
    }

    let resp = self
      .client
      .get(self.url("/contacts"))
      .query(&query)
      .send()
      .await
      .context("GET /contacts failed")?;
    decode(resp, "GET /contacts").await
  }
}

/// Deserialise a successful response, or turn a failed one into an error
/// carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(anyhow!("{what} → {}", describe_failure(status, &body)));
  }
  resp.json().await.with_context(|| format!("deserialising {what} response"))
}

/// `"<status>: <message>"` using the `error` field of a JSON error body when
/// the server sent one.
fn describe_failure(status: StatusCode, body: &str) -> String {
  let message = serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
  match message {
    Some(m) => format!("{status}: {m}"),
    None => status.to_string(),
  }
}
