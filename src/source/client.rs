//! Blocking client for the Notion REST API.

use std::env;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{BlockSource, PostSource};
use crate::error::{Error, Result};
use crate::model::{Block, ListPage, PageObject};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Options for connecting to the Notion API.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Integration token
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Value of the `Notion-Version` header
    pub notion_version: String,

    /// Per-request timeout (None = no timeout)
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    /// Create options for the given integration token.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Read options from `NOTION_API_KEY` and, if set, `NOTION_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("NOTION_API_KEY")
            .map_err(|_| Error::Config("NOTION_API_KEY is not set".into()))?;
        let mut options = Self::new(api_key);
        if let Ok(base_url) = env::var("NOTION_BASE_URL") {
            options = options.with_base_url(base_url);
        }
        Ok(options)
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API version header.
    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Notion API client implementing [`BlockSource`] and [`PostSource`].
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
}

impl NotionClient {
    /// Build a client from options.
    pub fn new(options: ClientOptions) -> Result<Self> {
        if options.api_key.trim().is_empty() {
            return Err(Error::Config("API key is empty".into()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", options.api_key.trim()))
            .map_err(|_| Error::Config("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let version = HeaderValue::from_str(&options.notion_version).map_err(|_| {
            Error::Config(format!("Invalid Notion version: {}", options.notion_version))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("notion-version", version);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("unnotion/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl BlockSource for NotionClient {
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage<Block>> {
        let url = self.url(&format!("blocks/{}/children", block_id));
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor.to_string()));
        }

        log::debug!("GET {} (cursor: {:?})", url, cursor);
        let response = self.http.get(&url).query(&query).send()?;
        Self::decode(response)
    }
}

impl PostSource for NotionClient {
    fn query_posts(
        &self,
        database_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage<PageObject>> {
        let url = self.url(&format!("databases/{}/query", database_id));
        let mut body = serde_json::json!({ "page_size": page_size });
        if let Some(cursor) = cursor {
            body["start_cursor"] = serde_json::Value::from(cursor);
        }

        log::debug!("POST {} (cursor: {:?})", url, cursor);
        let response = self.http.post(&url).json(&body).send()?;
        Self::decode(response)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Build an [`Error::Api`] from a non-success response body.
fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => Error::Api {
            status,
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => Error::Api {
            status,
            code: "unknown".to_string(),
            message: body.trim().to_string(),
        },
    }
}
