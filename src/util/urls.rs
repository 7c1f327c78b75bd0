use thiserror::Error;
use url::Url;

/// Errors from base URL validation.
#[derive(Error, Debug)]
pub enum UrlError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP is only accepted for local test servers.
    #[error("Insecure base URL: HTTPS required (except localhost)")]
    Insecure,
    /// The URL cannot carry path segments (e.g. `mailto:`).
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),
}

/// Validates a configured API or site base URL.
///
/// Only `https` is accepted, except `http` against `localhost`/`127.0.0.1`
/// so tests can point at a local mock server.
///
/// ```
/// use newsdesk::util::validate_base_url;
///
/// assert!(validate_base_url("https://news.example.com").is_ok());
/// assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
/// assert!(validate_base_url("http://news.example.com").is_err());
/// ```
pub fn validate_base_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw)?;

    match url.scheme() {
        "https" => {}
        "http" => {
            let local = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
            if !local {
                return Err(UrlError::Insecure);
            }
            tracing::debug!(base_url = %url, "Using plain HTTP base URL (localhost only)");
        }
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(raw.to_owned()));
    }

    Ok(url)
}

/// Appends percent-encoded path segments to `base`, keeping any path prefix.
pub fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Resolves an article image reference to an absolute URL.
///
/// Values already starting with `http` are used as-is; anything else is a
/// site-relative path appended to `site_base`. Missing or blank values fall
/// back to `default_image`.
pub fn resolve_image_url(site_base: &str, raw: Option<&str>, default_image: &str) -> String {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw {
        Some(src) if src.starts_with("http") => src.to_string(),
        Some(path) => format!("{}{}", site_base.trim_end_matches('/'), ensure_slash(path)),
        None if default_image.starts_with("http") => default_image.to_string(),
        None => format!(
            "{}{}",
            site_base.trim_end_matches('/'),
            ensure_slash(default_image)
        ),
    }
}

fn ensure_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
