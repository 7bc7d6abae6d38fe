//! 项目解析器测试

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::resolver::*;
use crate::error::AppError;
use crate::notion::NotionClient;
use crate::toggl::{TimeEntry, TogglClient};

/// 记录调用并返回预设结果的 MockLookup
struct MockLookup {
    pages: HashMap<String, String>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockLookup {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

#[async_trait]
impl ProjectPageLookup for MockLookup {
    async fn find_project_page(&self, name: &str) -> Result<Option<String>, AppError> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.failing.iter().any(|f| f == name) {
            return Err(AppError::Network("connection reset".to_string()));
        }
        Ok(self.pages.get(name).cloned())
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_sentinel_names_are_never_looked_up() {
    let lookup = MockLookup::new(&[("No Project", "should-not-match"), ("Unknown", "nope")]);

    let pages = resolve_project_pages(&lookup, &names(&["No Project", "Unknown"])).await;

    assert!(pages.is_empty());
    assert!(lookup.calls().is_empty());
}

#[tokio::test]
async fn test_resolves_matches_and_skips_misses() {
    let lookup = MockLookup::new(&[("Website", "page-web")]);

    let pages = resolve_project_pages(&lookup, &names(&["Website", "Reading", "No Project"])).await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages.get("Website").map(String::as_str), Some("page-web"));
    assert_eq!(lookup.calls(), names(&["Reading", "Website"]));
}

#[tokio::test]
async fn test_failed_lookup_does_not_affect_siblings() {
    let lookup = MockLookup::new(&[("Website", "page-web"), ("Reading", "page-read")])
        .failing_on("Reading");

    let pages = resolve_project_pages(&lookup, &names(&["Website", "Reading"])).await;

    assert_eq!(pages.len(), 1);
    assert!(pages.contains_key("Website"));
    assert!(!pages.contains_key("Reading"));
    assert_eq!(lookup.calls().len(), 2);
}

#[tokio::test]
async fn test_duplicate_names_looked_up_once() {
    let lookup = MockLookup::new(&[("Website", "page-web")]);

    resolve_project_pages(&lookup, &names(&["Website", "Website"])).await;

    assert_eq!(lookup.calls(), names(&["Website"]));
}

#[tokio::test]
async fn test_notion_lookup_queries_exact_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/project-db/query"))
        .and(body_partial_json(json!({
            "filter": { "property": "Project Name", "title": { "equals": "Website" } },
            "page_size": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "object": "page", "id": "page-web", "properties": {} }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notion = NotionClient::new(server.uri(), Some("secret".to_string()));
    let lookup = NotionProjectLookup::new(&notion, "project-db");

    assert_eq!(
        lookup.find_project_page("Website").await.unwrap(),
        Some("page-web".to_string())
    );
}

#[tokio::test]
async fn test_notion_lookup_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/project-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let notion = NotionClient::new(server.uri(), Some("secret".to_string()));
    let lookup = NotionProjectLookup::new(&notion, "project-db");

    assert_eq!(lookup.find_project_page("Ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_summarize_empty_entries_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let toggl = TogglClient::new(server.uri(), Some("token".to_string()));
    let aggregation = summarize_by_project(&toggl, &[]).await.unwrap();

    assert!(aggregation.summaries.is_empty());
    assert_eq!(aggregation.total_seconds, 0);
}

#[tokio::test]
async fn test_summarize_uses_first_entry_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/11/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Website" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 5, 10, 1, 0, 0).unwrap();
    let make = |id: i64, workspace_id: i64| TimeEntry {
        id,
        description: Some("Build".to_string()),
        start,
        stop: Some(start + chrono::Duration::minutes(30)),
        duration: 1800,
        project_id: Some(1),
        workspace_id,
    };

    let toggl = TogglClient::new(server.uri(), Some("token".to_string()));
    let aggregation = summarize_by_project(&toggl, &[make(1, 11), make(2, 12)])
        .await
        .unwrap();

    assert_eq!(aggregation.summaries.len(), 1);
    assert_eq!(aggregation.summaries[0].project_name, "Website");
    assert_eq!(aggregation.total_seconds, 3600);
}
