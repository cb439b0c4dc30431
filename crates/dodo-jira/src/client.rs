//! Async HTTP client for the Jira search endpoint.

use std::time::Duration;

use dodo_core::item::{WorkItemRecord, WorkItemSource};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result, parse::parse_search};

fn default_max_results() -> u32 { 500 }

/// Connection settings for a Jira instance, deserialised from the `[jira]`
/// config section.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
  /// Base URL, e.g. `https://jira.example.com`.
  pub url:         String,
  #[serde(default)]
  pub username:    String,
  #[serde(default)]
  pub password:    String,
  /// JQL selecting the work items that feed the pet.
  pub jql:         String,
  #[serde(default = "default_max_results")]
  pub max_results: u32,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct JiraClient {
  client: Client,
  config: JiraConfig,
}

impl JiraClient {
  pub fn new(config: JiraConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/rest/api/2/search",
      self.config.url.trim_end_matches('/')
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// `GET /rest/api/2/search?jql=<jql>&expand=changelog`
  pub async fn search(&self) -> Result<Vec<WorkItemRecord>> {
    let url = self.url();
    debug!(%url, jql = %self.config.jql, "sending search request");

    let resp = self
      .auth(self.client.get(&url))
      .query(&[
        ("jql", self.config.jql.as_str()),
        ("expand", "changelog"),
      ])
      .query(&[("maxResults", self.config.max_results)])
      .send()
      .await?;

    let status = resp.status();
    let body = resp.bytes().await?;
    debug!(%status, bytes = body.len(), "search response");

    if !status.is_success() {
      return Err(Error::Status {
        status,
        body: String::from_utf8_lossy(&body).chars().take(512).collect(),
      });
    }
    parse_search(&body)
  }
}

impl WorkItemSource for JiraClient {
  type Error = Error;

  async fn fetch(&self) -> Result<Vec<WorkItemRecord>> { self.search().await }
}
