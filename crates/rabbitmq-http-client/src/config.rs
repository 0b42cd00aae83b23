//! Connection options and file-based configuration
//!
//! Options can be built programmatically or loaded from YAML, TOML or JSON:
//!
//! ```yaml
//! endpoint: "http://localhost:15672"
//! username: "monitoring"
//! password: "s3cret"
//! timeout_ms: 30000
//! max_redirects: 3
//! ```

use std::path::Path;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Credentials used when neither the URL nor the options supply any
pub const DEFAULT_USERNAME: &str = "guest";
pub const DEFAULT_PASSWORD: &str = "guest";

/// Redirect hops followed before a request fails
pub const DEFAULT_MAX_REDIRECTS: usize = 3;

/// Base path used when the endpoint URL has an empty or root path
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Options applied when building a [`Client`](crate::Client)
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Total request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// Connect timeout; `None` keeps the transport default
    pub connect_timeout: Option<Duration>,
    pub max_redirects: usize,
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            timeout: None,
            connect_timeout: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: None,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// Serializable client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Management API endpoint, e.g. `http://localhost:15672`
    pub endpoint: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Connect timeout in milliseconds
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            timeout_ms: None,
            connect_timeout_ms: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn to_options(&self) -> ClientOptions {
        ClientOptions {
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            max_redirects: self.max_redirects,
            user_agent: None,
        }
    }
}

/// Basic authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Pick credentials: URL userinfo, then options, then `guest`/`guest`.
///
/// Username and password are resolved independently.
pub fn resolve_credentials(url: &Url, options: &ClientOptions) -> Credentials {
    let from_url_user = Some(url.username())
        .filter(|u| !u.is_empty())
        .map(decode_userinfo);
    let from_url_password = url.password().map(decode_userinfo);

    Credentials {
        username: from_url_user
            .or_else(|| options.username.clone())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        password: from_url_password
            .or_else(|| options.password.clone())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
    }
}

fn decode_userinfo(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Normalize an endpoint into the base URL all request paths are joined onto.
///
/// Applies the `/api` default base path, strips userinfo, drops any query or
/// fragment and guarantees a trailing slash.
pub fn normalize_endpoint(url: &Url) -> Result<Url> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    }

    let mut base = url.clone();
    // Infallible for http(s) URLs, which always have a host.
    let _ = base.set_username("");
    let _ = base.set_password(None);
    base.set_query(None);
    base.set_fragment(None);

    let path = match base.path() {
        "" | "/" => DEFAULT_BASE_PATH.to_string(),
        p => p.to_string(),
    };
    if path.ends_with('/') {
        base.set_path(&path);
    } else {
        base.set_path(&format!("{}/", path));
    }
    Ok(base)
}
