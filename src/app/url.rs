//! URL normalization for command-line targets.

use log::warn;

/// Longest URL accepted from the command line.
const MAX_URL_LENGTH: usize = 2048;

/// Normalizes a command-line URL.
///
/// A URL without a scheme gets `https://` prepended. Returns `None` (and logs
/// a warning) for URLs that are too long, do not parse, or use a scheme other
/// than http/https.
pub fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        );
        return None;
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Some(normalized),
            scheme => {
                warn!("Skipping unsupported scheme {scheme} for URL: {url}");
                None
            }
        },
        Err(e) => {
            warn!("Skipping invalid URL {url}: {e}");
            None
        }
    }
}
