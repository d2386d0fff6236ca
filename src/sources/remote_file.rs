//! Remote image download.
//!
//! Downloads a URL into a local directory so the file can be attached to a
//! status as media. Only successful `image/*` responses no larger than
//! [`MAX_IMAGE_BYTES`] are kept.

use async_trait::async_trait;
use log::{debug, info};
use rand::Rng;
use reqwest::{header::CONTENT_TYPE, Client};
use std::path::{Path, PathBuf};
use url::Url;

use crate::content::FetchedImage;
use crate::error::{Error, Result};

use super::FileFetcher;

/// Largest image accepted for upload as tweet media (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Downloads files over HTTP into `download_dir`.
#[derive(Debug, Clone)]
pub struct HttpFileFetcher {
    client: Client,
    download_dir: PathBuf,
}

impl HttpFileFetcher {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        HttpFileFetcher {
            client: Client::new(),
            download_dir: download_dir.into(),
        }
    }
}

/// Derives a file name from the last path segment of `url`, keeping only
/// characters that are safe in a file name.
fn file_name_for(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let cleaned: String = segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(64)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// File extensions for an image MIME type, canonical first.
fn extensions_for(mime_type: &str) -> &'static [&'static str] {
    match mime_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => &["jpg", "jpeg"],
        "image/png" => &["png"],
        "image/gif" => &["gif"],
        "image/webp" => &["webp"],
        _ => &[],
    }
}

/// Makes sure `name` ends in an extension matching `mime_type`, so search
/// results without one (`.../images?q=...`) are still stored as images.
fn with_extension(name: String, mime_type: &str) -> String {
    let extensions = extensions_for(mime_type);
    let current = Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match (extensions.first(), current) {
        (Some(_), Some(ext)) if extensions.contains(&ext.as_str()) => name,
        (Some(canonical), _) => format!("{}.{}", name, canonical),
        (None, _) => name,
    }
}

/// Reduces a `Content-Type` header value to its lowercased MIME type.
fn mime_type_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Writes `bytes` under `dir` with a random prefix so repeated downloads of the
/// same name do not overwrite each other.
async fn persist(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let prefix: u32 = rand::thread_rng().gen();
    let path = dir.join(format!("{:08x}-{}", prefix, name));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    /// Downloads `url` into the download directory.
    ///
    /// # Returns
    ///
    /// - `Ok(FetchedImage)`: A temporary image carrying the server's MIME type
    /// - `Err(Error::DownloadFailure)`: On a network error, a non-success status,
    ///   a non-image or empty body, or a body larger than [`MAX_IMAGE_BYTES`]
    /// - `Err(Error::Io)`: If the file cannot be written
    async fn fetch(&self, url: &Url) -> Result<FetchedImage> {
        debug!("Downloading {}", url);

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::download(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url.as_str(), format!("status {}", status)));
        }

        let mime_type = mime_type_of(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default(),
        );
        if !mime_type.starts_with("image/") {
            return Err(Error::download(
                url.as_str(),
                format!("unexpected content type '{}'", mime_type),
            ));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_IMAGE_BYTES as u64 {
                return Err(Error::download(
                    url.as_str(),
                    format!("{} bytes exceeds the {} byte limit", length, MAX_IMAGE_BYTES),
                ));
            }
        }

        // Content-Length may be absent or wrong; enforce the limit while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::download(url.as_str(), e.to_string()))?
        {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(Error::download(
                    url.as_str(),
                    format!("body exceeds the {} byte limit", MAX_IMAGE_BYTES),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(Error::download(url.as_str(), "empty body"));
        }

        let name = with_extension(file_name_for(url), &mime_type);
        let path = persist(&self.download_dir, &name, &bytes).await?;
        info!(
            "Downloaded {} bytes of {} to {}",
            bytes.len(),
            mime_type,
            path.display()
        );
        Ok(FetchedImage::downloaded(path, mime_type))
    }
}
