//! @ai:module:intent Export a repository's issue and pull request activity to Markdown
//! @ai:module:layer infrastructure
//! @ai:module:public_api GitHubClient, GitHubItem, validate_repo
//! @ai:module:stateless false

use crate::config::GitHubConfig;
use crate::sources::{http_client, write_export};
use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::sync::OnceLock;

const PER_PAGE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// @ai:intent Issue or pull request as returned by the issues endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubItem {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub user: Option<GitHubUser>,
}

impl GitHubItem {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// @ai:intent Check an `owner/repo` identifier before it is used in URLs and paths
/// @ai:effects pure
pub fn validate_repo(repo: &str) -> Result<()> {
    static REPO: OnceLock<Regex> = OnceLock::new();
    let pattern = REPO.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

    if !pattern.is_match(repo) {
        bail!("Invalid repository '{}': expected the form owner/repo", repo);
    }
    Ok(())
}

/// @ai:intent Fetches repository activity from the GitHub REST API
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    export_dir: PathBuf,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("export_dir", &self.export_dir)
            .finish()
    }
}

impl GitHubClient {
    /// @ai:intent Create a client; the token is optional and passed through unchanged
    /// @ai:effects pure
    pub fn new(
        config: &GitHubConfig,
        token: Option<String>,
        export_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            export_dir: export_dir.into(),
        })
    }

    /// @ai:effects env
    pub fn from_env(config: &GitHubConfig, export_dir: impl Into<PathBuf>) -> Result<Self> {
        let token = std::env::var(&config.token_env).ok();
        if token.is_none() {
            tracing::warn!(
                "{} is not set; GitHub requests are unauthenticated",
                config.token_env
            );
        }
        Self::new(config, token, export_dir)
    }

    /// @ai:intent List issues and pull requests updated on or after `since`
    /// @ai:effects network
    pub async fn fetch_updated_since(
        &self,
        repo: &str,
        since: NaiveDate,
    ) -> Result<Vec<GitHubItem>> {
        let url = format!("{}/repos/{}/issues", self.api_url, repo);
        let since = format!("{}T00:00:00Z", since.format("%Y-%m-%d"));
        let per_page = PER_PAGE.to_string();
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let mut request = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.github+json")
                .query(&[
                    ("state", "all"),
                    ("since", since.as_str()),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ]);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to fetch issues for {}", repo))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                bail!("GitHub API error ({}) for {}: {}", status, repo, body);
            }

            let batch: Vec<GitHubItem> = response
                .json()
                .await
                .with_context(|| format!("Failed to parse issues for {}", repo))?;
            let last_page = batch.len() < PER_PAGE;
            items.extend(batch);

            if last_page {
                break;
            }
            page += 1;
        }

        tracing::info!("Fetched {} issues and pull requests for {}", items.len(), repo);
        Ok(items)
    }

    /// @ai:intent Export the last `days` days of activity
    /// @ai:effects network, fs:write, time
    pub async fn export_progress_by_date_range(&self, repo: &str, days: u32) -> Result<PathBuf> {
        let until = Local::now().date_naive();
        let since = until - Duration::days(i64::from(days));
        self.export_progress_between(repo, since, until).await
    }

    /// @ai:intent Export activity between two dates
    /// @ai:post file is `<export_dir>/<owner_repo>/<since>_to_<until>.md`
    /// @ai:effects network, fs:write
    pub async fn export_progress_between(
        &self,
        repo: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<PathBuf> {
        validate_repo(repo)?;

        let items = self.fetch_updated_since(repo, since).await?;
        let content = render_progress(repo, since, until, &items);

        let path = self
            .export_dir
            .join(repo.replace('/', "_"))
            .join(format!("{}_to_{}.md", since, until));
        write_export(&path, &content)?;

        tracing::info!("Exported progress for {} to {}", repo, path.display());
        Ok(path)
    }
}

/// @ai:intent Render repository activity as the Markdown digest fed to the model
/// @ai:effects pure
pub fn render_progress(
    repo: &str,
    since: NaiveDate,
    until: NaiveDate,
    items: &[GitHubItem],
) -> String {
    let (pulls, issues): (Vec<&GitHubItem>, Vec<&GitHubItem>) =
        items.iter().partition(|item| item.is_pull_request());

    let mut output = String::new();
    writeln!(output, "# Progress for {} ({} to {})", repo, since, until).unwrap();
    writeln!(output).unwrap();

    for (heading, group) in [("Issues", &issues), ("Pull Requests", &pulls)] {
        writeln!(output, "## {} ({})", heading, group.len()).unwrap();
        if group.is_empty() {
            writeln!(output, "- None").unwrap();
        }
        for item in group {
            writeln!(output, "- {} #{} [{}]", item.title, item.number, item.state).unwrap();
        }
        writeln!(output).unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn item(number: u64, title: &str, state: &str, pull: bool) -> GitHubItem {
        GitHubItem {
            number,
            title: title.to_string(),
            state: state.to_string(),
            html_url: format!("https://github.com/owner/repo/issues/{}", number),
            pull_request: pull.then(|| serde_json::json!({})),
            user: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_repo() {
        assert!(validate_repo("langchain-ai/langchain").is_ok());
        assert!(validate_repo("owner/repo.rs").is_ok());
        assert!(validate_repo("no-slash").is_err());
        assert!(validate_repo("../etc/passwd").is_err());
        assert!(validate_repo("a/b/c").is_err());
    }

    #[test]
    fn test_render_splits_issues_and_pull_requests() {
        let items = vec![
            item(1, "fix bug", "closed", false),
            item(2, "add feature", "open", true),
        ];

        let rendered = render_progress("owner/repo", date(2024, 8, 20), date(2024, 8, 22), &items);

        assert_eq!(
            rendered,
            "# Progress for owner/repo (2024-08-20 to 2024-08-22)\n\n\
             ## Issues (1)\n- fix bug #1 [closed]\n\n\
             ## Pull Requests (1)\n- add feature #2 [open]\n\n"
        );
    }

    #[test]
    fn test_render_marks_empty_sections() {
        let rendered = render_progress("owner/repo", date(2024, 8, 20), date(2024, 8, 21), &[]);
        assert!(rendered.contains("## Issues (0)\n- None"));
        assert!(rendered.contains("## Pull Requests (0)\n- None"));
    }

    #[tokio::test]
    async fn test_export_writes_dated_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/owner/repo/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "all".into()),
                Matcher::UrlEncoded("since".into(), "2024-08-20T00:00:00Z".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"number":7,"title":"docs: update guide","state":"closed","html_url":"https://github.com/owner/repo/pull/7","pull_request":{}}]"#,
            )
            .expect(1)
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let config = GitHubConfig {
            api_url: server.url(),
            ..Default::default()
        };
        let client = GitHubClient::new(&config, Some("ghp_test".to_string()), temp.path()).unwrap();

        let path = client
            .export_progress_between("owner/repo", date(2024, 8, 20), date(2024, 8, 22))
            .await
            .unwrap();

        assert_eq!(path, temp.path().join("owner_repo").join("2024-08-20_to_2024-08-22.md"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("- docs: update guide #7 [closed]"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/owner/missing/issues")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let config = GitHubConfig {
            api_url: server.url(),
            ..Default::default()
        };
        let client = GitHubClient::new(&config, None, temp.path()).unwrap();

        let err = client
            .export_progress_between("owner/missing", date(2024, 8, 20), date(2024, 8, 22))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
