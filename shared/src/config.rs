use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

/// Client-wide settings. One base URL for every screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub search_delay: Duration,
    pub access_key: String,
    pub username_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_delay: DEFAULT_SEARCH_DELAY,
            access_key: "access".to_string(),
            username_key: "username".to_string(),
        }
    }
}

impl ClientConfig {
    /// Blank input falls back to the default base.
    pub fn with_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let mut config = Self::default();
        if !trimmed.is_empty() {
            config.base_url = trimmed.to_string();
        }
        config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Media fields come back either absolute or as `/media/...` paths.
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            self.url(path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_blank() {
        assert_eq!(
            ClientConfig::with_base_url("https://api.example.com/").base_url,
            "https://api.example.com"
        );
        assert_eq!(ClientConfig::with_base_url("  ").base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn media_urls() {
        let config = ClientConfig::default();
        assert_eq!(
            config.media_url("/media/profiles/a.png"),
            "http://127.0.0.1:8000/media/profiles/a.png"
        );
        assert_eq!(
            config.media_url("media/x.pdf"),
            "http://127.0.0.1:8000/media/x.pdf"
        );
        assert_eq!(config.media_url("https://cdn/x.pdf"), "https://cdn/x.pdf");
    }
}
