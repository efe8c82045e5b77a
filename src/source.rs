//! Text resources that may live on disk or behind a URL (venues CSV, overrides JSON).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a text resource comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

/// Failure to obtain a resource.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
}

impl Source {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    pub fn fetch_text(&self) -> Result<String, LoadError> {
        match self {
            Self::Path(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Self::Url(url) => {
                let response = ureq::get(url)
                    .set("User-Agent", concat!("VeganPlaces/", env!("CARGO_PKG_VERSION")))
                    .timeout(FETCH_TIMEOUT)
                    .call()
                    .map_err(|e| match e {
                        ureq::Error::Status(status, _) => LoadError::Status { url: url.clone(), status },
                        other => LoadError::Network { url: url.clone(), message: other.to_string() },
                    })?;
                response.into_string().map_err(|e| LoadError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Source> for String {
    fn from(s: Source) -> Self {
        s.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{}", u),
        }
    }
}
