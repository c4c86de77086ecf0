// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Where data resources are read from.
///
/// Resource paths are site-absolute (`/backend/people.csv`); for a directory
/// source they are resolved under the directory root.
#[derive(Debug, Clone)]
pub enum Source {
    Http { client: Client, base: Url },
    Dir(PathBuf),
}

impl Source {
    /// `http://` / `https://` becomes an HTTP source, anything else a
    /// directory.
    pub fn parse(spec: &str, client: Client) -> Result<Self> {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            let base = Url::parse(spec).with_context(|| format!("parsing source URL {}", spec))?;
            Ok(Source::Http { client, base })
        } else {
            Ok(Source::Dir(PathBuf::from(spec)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Http { base, .. } => base.to_string(),
            Source::Dir(root) => root.display().to_string(),
        }
    }

    fn url_for(base: &Url, path: &str) -> Result<Url> {
        base.join(path)
            .with_context(|| format!("joining {} onto {}", path, base))
    }

    fn file_for(root: &Path, path: &str) -> PathBuf {
        root.join(path.trim_start_matches('/'))
    }

    /// Fetch a text resource. Any transport error or non-success status is
    /// returned as an error.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        match self {
            Source::Http { client, base } => {
                let url = Self::url_for(base, path)?;
                debug!("Fetching text from {}", url);
                client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("GET {} failed", url))?
                    .error_for_status()
                    .with_context(|| format!("Non-success status {}", url))?
                    .text()
                    .await
                    .with_context(|| format!("Reading text from {}", url))
            }
            Source::Dir(root) => {
                let file = Self::file_for(root, path);
                debug!("Reading text from {}", file.display());
                tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("reading {}", file.display()))
            }
        }
    }

    /// Fetch a binary resource.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        match self {
            Source::Http { client, base } => {
                let url = Self::url_for(base, path)?;
                debug!("Fetching bytes from {}", url);
                let bytes = client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("GET {} failed", url))?
                    .error_for_status()
                    .with_context(|| format!("Non-success status {}", url))?
                    .bytes()
                    .await
                    .with_context(|| format!("Reading body from {}", url))?;
                Ok(bytes.to_vec())
            }
            Source::Dir(root) => {
                let file = Self::file_for(root, path);
                debug!("Reading bytes from {}", file.display());
                tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("reading {}", file.display()))
            }
        }
    }
}
