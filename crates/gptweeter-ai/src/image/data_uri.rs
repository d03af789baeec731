//! `data:` URI encoding for generated images.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::debug;

use crate::http::{check_status, send_error};
use crate::AiError;

/// Mime type for raw image bytes with no other hint.
pub const DEFAULT_MIME: &str = "image/png";

/// Guess an image mime type from the extension of a URL's path.
pub fn mime_from_url(url: &str) -> &'static str {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => DEFAULT_MIME,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Download `url` and encode the body, typed by the URL's extension.
pub(crate) async fn fetch_as_data_uri(
    http: &reqwest::Client,
    url: &str,
) -> Result<String, AiError> {
    let response = http.get(url).send().await.map_err(send_error)?;
    let bytes = check_status(response)
        .await?
        .bytes()
        .await
        .map_err(send_error)?;
    debug!(url, bytes = bytes.len(), "fetched generated image");
    Ok(encode_data_uri(mime_from_url(url), &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_path_extension() {
        assert_eq!(mime_from_url("https://cdn.example/a/out.jpg"), "image/jpeg");
        assert_eq!(mime_from_url("https://cdn.example/a/out.JPEG"), "image/jpeg");
        assert_eq!(mime_from_url("https://cdn.example/out.webp"), "image/webp");
        assert_eq!(mime_from_url("https://cdn.example/out.gif"), "image/gif");
        assert_eq!(mime_from_url("https://cdn.example/out.png"), "image/png");
    }

    #[test]
    fn query_string_is_ignored() {
        assert_eq!(
            mime_from_url("https://blob.example/img.webp?sig=abc.png&se=2024"),
            "image/webp"
        );
    }

    #[test]
    fn unknown_or_missing_extension_is_png() {
        assert_eq!(mime_from_url("https://cdn.example/image"), "image/png");
        assert_eq!(mime_from_url("https://cdn.example/file.tiff"), "image/png");
        assert_eq!(mime_from_url("not a url.jpg?x=1"), "image/jpeg");
    }

    #[test]
    fn encodes_standard_base64() {
        assert_eq!(
            encode_data_uri("image/png", b"duck"),
            "data:image/png;base64,ZHVjaw=="
        );
        assert_eq!(encode_data_uri("image/gif", &[]), "data:image/gif;base64,");
    }
}
