//! Media upload for Twitter API.
//!
//! Uploads a local image through the v2 media endpoint so it can be attached
//! to a tweet by its media id.

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;

use crate::config::TwitterConfig;
use crate::content::FetchedImage;
use crate::error::{Error, Result};

use super::api::{build_oauth2_user_context_header, send_authenticated_request, API_BASE};

/// Guesses the MIME type of an image from its file extension.
fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Extracts the media id from an upload response.
fn parse_media_id(response_text: &str) -> Result<String> {
    let json_response: Value = serde_json::from_str(response_text)?;
    json_response
        .get("data")
        .and_then(|data| data.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::unavailable("Twitter media upload", "response contained no media id"))
}

/// Uploads an image and returns its media id.
///
/// The MIME type reported when the image was downloaded takes precedence;
/// configured files fall back to their extension.
///
/// # Errors
///
/// Fails if the file cannot be read, the request fails, or the response
/// carries no media id.
pub(crate) async fn upload_media(
    client: &Client,
    config: &TwitterConfig,
    image: &FetchedImage,
) -> Result<String> {
    let path = image.path();
    let mime_type = image.mime_type().unwrap_or_else(|| mime_type_for(path));
    info!("Uploading {} media from {}", mime_type, path.display());

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    debug!("Media file '{}' is {} bytes", file_name, bytes.len());

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_type)?;
    let form = Form::new()
        .text("media_category", "tweet_image")
        .part("media", part);

    let request_builder = client
        .post(format!("{}/media/upload", API_BASE))
        .header(
            "Authorization",
            build_oauth2_user_context_header(&config.access_token),
        )
        .multipart(form);

    let response_text = send_authenticated_request(request_builder, "upload_media").await?;
    let media_id = parse_media_id(&response_text)?;
    info!("Uploaded media with id {}", media_id);
    Ok(media_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("/tmp/fox.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("owl.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("image")), "application/octet-stream");
    }

    #[test]
    fn test_parse_media_id() {
        let body = r#"{"data": {"id": "1880028106020515840", "media_key": "3_1880028106020515840"}}"#;
        assert_eq!(parse_media_id(body).unwrap(), "1880028106020515840");
        assert!(parse_media_id(r#"{"errors": []}"#).is_err());
    }
}
