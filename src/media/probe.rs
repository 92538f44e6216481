// Photo URL verification: fetch the bytes and prove they decode as an image
use std::time::Duration;

use tokio::time::timeout;

/// How long a candidate photo URL gets to respond and decode.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheap scheme precheck, applied before any network call.
pub fn has_supported_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Whether the bytes decode as a supported image format.
pub fn decodes_as_image(bytes: &[u8]) -> bool {
    image::load_from_memory(bytes).is_ok()
}

async fn fetch_and_decode(client: &reqwest::Client, url: &str) -> anyhow::Result<()> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    if decodes_as_image(&bytes) {
        Ok(())
    } else {
        anyhow::bail!("response is not a decodable image")
    }
}

/// Verify that `url` serves a loadable image.
///
/// Treated as invalid on any transport error, non-success status, decode
/// failure, or when nothing resolves within [`PROBE_TIMEOUT`].
pub async fn check_image_url(client: &reqwest::Client, url: &str) -> bool {
    match timeout(PROBE_TIMEOUT, fetch_and_decode(client, url)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::debug!("image probe failed for {}: {}", url, e);
            false
        }
        Err(_) => {
            tracing::debug!("image probe timed out for {}", url);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 transparent PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_scheme_precheck() {
        assert!(has_supported_scheme("http://example.com/a.png"));
        assert!(has_supported_scheme("https://example.com/a.png"));
        assert!(!has_supported_scheme("ftp://x.png"));
        assert!(!has_supported_scheme("file:///tmp/a.png"));
        assert!(!has_supported_scheme("example.com/a.png"));
    }

    #[test]
    fn test_png_bytes_decode() {
        assert!(decodes_as_image(TINY_PNG));
    }

    #[test]
    fn test_non_image_bytes_rejected() {
        assert!(!decodes_as_image(b"<html>not an image</html>"));
        assert!(!decodes_as_image(&[]));
    }

    #[test]
    fn test_truncated_image_rejected() {
        // A valid header with the rest of the stream missing must not pass.
        assert!(!decodes_as_image(&TINY_PNG[..20]));
    }
}
