//! @ai:module:intent Export the Hacker News front page to Markdown
//! @ai:module:layer infrastructure
//! @ai:module:public_api HackerNewsClient, Story, render_top_stories
//! @ai:module:stateless false

use crate::config::HackerNewsConfig;
use crate::sources::{http_client, write_export};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct RawItem {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    by: String,
    #[serde(default)]
    time: i64,
    #[serde(default)]
    descendants: i64,
}

/// @ai:intent A top story that has both a title and a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub by: String,
    pub time: i64,
    /// Comment count.
    pub descendants: i64,
}

impl RawItem {
    fn into_story(self) -> Option<Story> {
        Some(Story {
            id: self.id,
            title: self.title?,
            url: self.url?,
            score: self.score,
            by: self.by,
            time: self.time,
            descendants: self.descendants,
        })
    }
}

/// @ai:intent Fetches top stories from the Hacker News Firebase API
#[derive(Debug)]
pub struct HackerNewsClient {
    client: reqwest::Client,
    api_url: String,
    limit: usize,
    export_dir: PathBuf,
}

impl HackerNewsClient {
    /// @ai:effects pure
    pub fn new(config: &HackerNewsConfig, export_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            limit: config.limit,
            export_dir: export_dir.into(),
        })
    }

    /// @ai:intent Fetch the first `limit` top stories, skipping items that fail or lack a link
    /// @ai:effects network
    pub async fn top_stories(&self) -> Result<Vec<Story>> {
        let ids: Vec<u64> = self
            .client
            .get(format!("{}/topstories.json", self.api_url))
            .send()
            .await
            .context("Failed to fetch Hacker News top stories")?
            .error_for_status()
            .context("Hacker News top stories request failed")?
            .json()
            .await
            .context("Failed to parse Hacker News top stories")?;

        let mut stories = Vec::new();
        for id in ids.into_iter().take(self.limit) {
            match self.fetch_story(id).await {
                Ok(Some(story)) => stories.push(story),
                Ok(None) => tracing::debug!("Skipping item {} without title or url", id),
                Err(e) => tracing::warn!("Failed to fetch Hacker News item {}: {:#}", id, e),
            }
        }

        tracing::info!("Fetched {} Hacker News top stories", stories.len());
        Ok(stories)
    }

    /// @ai:effects network
    async fn fetch_story(&self, id: u64) -> Result<Option<Story>> {
        let item: Option<RawItem> = self
            .client
            .get(format!("{}/item/{}.json", self.api_url, id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(item.and_then(RawItem::into_story))
    }

    /// @ai:intent Export top stories to `<export_dir>/hacker_news/top_stories_<timestamp>.md`
    /// @ai:effects network, fs:write, time
    pub async fn export_top_stories(&self) -> Result<PathBuf> {
        let stories = self.top_stories().await?;
        let now = Local::now();
        let content = render_top_stories(&stories, now);

        let path = self
            .export_dir
            .join("hacker_news")
            .join(format!("top_stories_{}.md", now.format("%Y-%m-%d_%H-%M-%S")));
        write_export(&path, &content)?;

        tracing::info!("Exported Hacker News top stories to {}", path.display());
        Ok(path)
    }
}

/// @ai:intent Render stories as the Markdown digest fed to the model
/// @ai:effects pure
pub fn render_top_stories(stories: &[Story], generated_at: DateTime<Local>) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "# Hacker News Top Stories ({})",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .unwrap();
    writeln!(output).unwrap();

    for (i, story) in stories.iter().enumerate() {
        let posted = DateTime::from_timestamp(story.time, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        writeln!(output, "### {}. {}", i + 1, story.title).unwrap();
        writeln!(output, "- URL: {}", story.url).unwrap();
        writeln!(output, "- Score: {}", story.score).unwrap();
        writeln!(output, "- Author: {}", story.by).unwrap();
        writeln!(output, "- Posted: {}", posted).unwrap();
        writeln!(output, "- Comments: {}", story.descendants).unwrap();
        writeln!(output).unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_items_without_url_are_dropped() {
        let ask_hn: RawItem = serde_json::from_str(
            r#"{"id":1,"title":"Ask HN: Tools?","score":10,"by":"pg","time":0}"#,
        )
        .unwrap();
        assert!(ask_hn.into_story().is_none());

        let link: RawItem = serde_json::from_str(
            r#"{"id":2,"title":"Rust 2.0","url":"https://example.com","score":300,"by":"steve","time":1700000000,"descendants":120}"#,
        )
        .unwrap();
        let story = link.into_story().unwrap();
        assert_eq!(story.title, "Rust 2.0");
        assert_eq!(story.descendants, 120);
    }

    #[test]
    fn test_render_numbers_stories() {
        let stories = vec![Story {
            id: 2,
            title: "Rust 2.0".to_string(),
            url: "https://example.com".to_string(),
            score: 300,
            by: "steve".to_string(),
            time: 1_700_000_000,
            descendants: 120,
        }];

        let rendered = render_top_stories(&stories, Local::now());

        assert!(rendered.starts_with("# Hacker News Top Stories ("));
        assert!(rendered.contains(
            "### 1. Rust 2.0\n- URL: https://example.com\n- Score: 300\n- Author: steve\n"
        ));
        assert!(rendered.contains("- Comments: 120"));
    }

    #[tokio::test]
    async fn test_export_skips_failed_and_linkless_items() {
        let mut server = mockito::Server::new_async().await;
        let _ids = server
            .mock("GET", "/topstories.json")
            .with_status(200)
            .with_body("[1, 2, 3, 4]")
            .create_async()
            .await;
        let _ask = server
            .mock("GET", "/item/1.json")
            .with_status(200)
            .with_body(r#"{"id":1,"title":"Ask HN: Tools?","time":0}"#)
            .create_async()
            .await;
        let _link = server
            .mock("GET", "/item/2.json")
            .with_status(200)
            .with_body(
                r#"{"id":2,"title":"Rust 2.0","url":"https://example.com","score":300,"by":"steve","time":1700000000}"#,
            )
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/item/3.json")
            .with_status(500)
            .create_async()
            .await;
        let unrequested = server
            .mock("GET", "/item/4.json")
            .expect(0)
            .create_async()
            .await;

        let temp = TempDir::new().unwrap();
        let config = HackerNewsConfig {
            api_url: server.url(),
            limit: 3,
        };
        let client = HackerNewsClient::new(&config, temp.path()).unwrap();

        let path = client.export_top_stories().await.unwrap();

        assert!(path.starts_with(temp.path().join("hacker_news")));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("### 1. Rust 2.0"));
        assert!(!content.contains("Ask HN"));
        unrequested.assert_async().await;
    }
}
