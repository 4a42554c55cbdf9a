use async_trait::async_trait;
use regex::Regex;
use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CanvasApiConfig;
use crate::document::{Document, COURSE_KEY, SOURCE_KEY, TIMESTAMP_KEY};
use crate::loader::{DocumentLoader, LoaderError};

const MAX_RATE_LIMIT_RETRIES: usize = 5;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Kind of Canvas resource fetched by the API loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Assignment,
    Quiz,
    Announcement,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Assignment => "assignment",
            ResourceKind::Quiz => "quiz",
            ResourceKind::Announcement => "announcement",
        }
    }

    fn title_field(self) -> &'static str {
        match self {
            ResourceKind::Assignment => "name",
            ResourceKind::Quiz | ResourceKind::Announcement => "title",
        }
    }

    fn body_field(self) -> &'static str {
        match self {
            ResourceKind::Assignment | ResourceKind::Quiz => "description",
            ResourceKind::Announcement => "message",
        }
    }
}

/// Loads assignments, quizzes and announcements of a live Canvas course
pub struct CanvasApiLoader {
    client: Client,
    base_url: Url,
    course_id: u64,
    token: String,
    retry_delay: Duration,
}

impl CanvasApiLoader {
    pub fn new(config: &CanvasApiConfig) -> Result<Self, LoaderError> {
        let course_id = config
            .course_id
            .ok_or_else(|| LoaderError::Config("Canvas course ID is not set".to_string()))?;
        let token = config
            .token
            .clone()
            .ok_or_else(|| LoaderError::Config("Canvas API token is not set".to_string()))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| LoaderError::Config(format!("Invalid URL: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            course_id,
            token,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn load_endpoint(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
        kind: ResourceKind,
    ) -> Result<Vec<Document>, LoaderError> {
        let mut documents = Vec::new();
        let mut next = Some(self.endpoint(path));
        let mut params = params;

        while let Some(url) = next {
            let response = self.get(&url, &params).await?;
            next = next_link(response.headers());
            // pagination links already carry the query
            params.clear();

            let items: Vec<Value> = response.json().await?;
            debug!(kind = kind.as_str(), count = items.len(), "fetched Canvas page");
            documents.extend(
                items
                    .iter()
                    .map(|item| item_to_document(item, kind, self.course_id)),
            );
        }

        Ok(documents)
    }

    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Response, LoaderError> {
        let mut retries = 0;
        loop {
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .query(params)
                .send()
                .await?;
            let delay = rate_limit_delay(response.headers());

            if response.status() == StatusCode::TOO_MANY_REQUESTS
                && retries < MAX_RATE_LIMIT_RETRIES
            {
                retries += 1;
                let delay = delay.unwrap_or(self.retry_delay);
                warn!(url, retries, delay_secs = delay.as_secs(), "rate limited by Canvas");
                sleep(delay).await;
                continue;
            }

            if let Some(delay) = delay {
                debug!(delay_secs = delay.as_secs(), "waiting for Canvas rate limit reset");
                sleep(delay).await;
            }
            return Ok(response.error_for_status()?);
        }
    }
}

#[async_trait]
impl DocumentLoader for CanvasApiLoader {
    async fn load(&self) -> Result<Vec<Document>, LoaderError> {
        let course = self.course_id;
        let mut documents = Vec::new();

        documents.extend(
            self.load_endpoint(
                &format!("/api/v1/courses/{}/assignments", course),
                Vec::new(),
                ResourceKind::Assignment,
            )
            .await?,
        );
        documents.extend(
            self.load_endpoint(
                &format!("/api/v1/courses/{}/quizzes", course),
                Vec::new(),
                ResourceKind::Quiz,
            )
            .await?,
        );
        documents.extend(
            self.load_endpoint(
                "/api/v1/announcements",
                vec![("context_codes[]", format!("course_{}", course))],
                ResourceKind::Announcement,
            )
            .await?,
        );

        info!(course_id = course, documents = documents.len(), "loaded Canvas course via API");
        Ok(documents)
    }
}

fn str_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Convert one API item into a document
pub fn item_to_document(item: &Value, kind: ResourceKind, course_id: u64) -> Document {
    let content = format!(
        "{}\n\n{}",
        str_field(item, kind.title_field()).unwrap_or_default(),
        str_field(item, kind.body_field()).unwrap_or_default()
    );

    let mut doc = Document::new(content)
        .with_metadata("course_id", course_id)
        .with_metadata(COURSE_KEY, course_id.to_string())
        .with_metadata("resource_type", kind.as_str());

    if let Some(source) = str_field(item, "html_url").filter(|s| !s.is_empty()) {
        doc = doc.with_metadata(SOURCE_KEY, source);
    }
    if let Some(id) = item.get("id") {
        doc = doc.with_metadata("id", id.clone());
    }
    let timestamp = ["updated_at", "created_at", "posted_at"]
        .iter()
        .find_map(|key| str_field(item, key).filter(|s| !s.is_empty()));
    if let Some(timestamp) = timestamp {
        doc = doc.with_metadata(TIMESTAMP_KEY, timestamp);
    }

    doc
}

fn link_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("link pattern is valid"))
}

/// URL of the next page from a `Link` header, if any
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(reqwest::header::LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|part| link_pattern().captures(part).map(|caps| caps[1].to_string()))
}

/// Delay requested by `Retry-After`, or by an exhausted `X-Rate-Limit-Remaining`
pub fn rate_limit_delay(headers: &HeaderMap) -> Option<Duration> {
    let header_secs = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    let remaining = headers
        .get("x-rate-limit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    let secs = match header_secs("retry-after") {
        Some(secs) => secs,
        None if remaining == Some("0") => header_secs("x-rate-limit-reset")?,
        None => return None,
    };
    (secs > 0).then(|| Duration::from_secs(secs))
}
