//! Thin client for the GitHub repository listing.

use std::time::Duration;

use reqwest::{Client, StatusCode};

/// Outcome of a repository lookup that reached GitHub.
#[derive(Debug)]
pub enum RepoLookup {
  /// Upstream answered 200; the body is passed through untouched.
  Found(serde_json::Value),
  /// Upstream answered anything else (or the name cannot be a GitHub login).
  Missing(Option<StatusCode>),
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GithubClient {
  client:      Client,
  api_url:     String,
  credentials: Option<(String, String)>,
}

impl GithubClient {
  /// `client_id` and `client_secret` are only sent when both are set.
  pub fn new(
    api_url: &str,
    client_id: Option<String>,
    client_secret: Option<String>,
  ) -> reqwest::Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self {
      client,
      api_url: api_url.trim_end_matches('/').to_owned(),
      credentials: client_id.zip(client_secret),
    })
  }

  /// The user's five oldest-created public repositories.
  pub async fn repos(&self, username: &str) -> reqwest::Result<RepoLookup> {
    if !is_valid_login(username) {
      return Ok(RepoLookup::Missing(None));
    }

    let mut req = self
      .client
      .get(format!("{}/users/{username}/repos", self.api_url))
      .query(&[("per_page", "5"), ("sort", "created"), ("direction", "asc")]);
    if let Some((id, secret)) = &self.credentials {
      req = req.basic_auth(id, Some(secret));
    }

    let resp = req.send().await?;
    if resp.status() != StatusCode::OK {
      return Ok(RepoLookup::Missing(Some(resp.status())));
    }
    Ok(RepoLookup::Found(resp.json().await?))
  }
}

/// GitHub logins are ASCII alphanumerics and single hyphens, at most 39 long.
fn is_valid_login(name: &str) -> bool {
  !name.is_empty()
    && name.len() <= 39
    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn login_validation() {
    assert!(is_valid_login("octocat"));
    assert!(is_valid_login("some-user-42"));
    assert!(!is_valid_login(""));
    assert!(!is_valid_login("../admin"));
    assert!(!is_valid_login("a?b=c"));
    assert!(!is_valid_login(&"x".repeat(40)));
  }

  #[tokio::test]
  async fn invalid_login_skips_upstream() {
    // Port 1 is never contacted: the name is rejected first.
    let client = GithubClient::new("http://127.0.0.1:1", None, None).unwrap();
    let lookup = client.repos("not/a/user").await.unwrap();
    assert!(matches!(lookup, RepoLookup::Missing(None)));
  }
}
