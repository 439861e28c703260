use std::fmt;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Never send the token.
    None,
    /// Send it when one is stored.
    Optional,
    /// Refuse to send the request without one.
    Required,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part<F> {
    Text(String),
    File(F),
}

/// Ordered multipart form. `F` is the platform's file handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Multipart<F> {
    parts: Vec<(String, Part<F>)>,
}

impl<F> Default for Multipart<F> {
    fn default() -> Self {
        Self { parts: Vec::new() }
    }
}

impl<F> Multipart<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.parts
            .push((name.to_string(), Part::Text(value.to_string())));
        self
    }

    /// Add a text part only when the value is non-empty.
    pub fn text_if_set(self, name: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self
        } else {
            self.text(name, value)
        }
    }

    pub fn file(mut self, name: &str, file: F) -> Self {
        self.parts.push((name.to_string(), Part::File(file)));
        self
    }

    pub fn file_if_set(self, name: &str, file: Option<F>) -> Self {
        match file {
            Some(f) => self.file(name, f),
            None => self,
        }
    }

    pub fn parts(&self) -> &[(String, Part<F>)] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<(String, Part<F>)> {
        self.parts
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, p)| match p {
            Part::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body<F> {
    Empty,
    Json(String),
    Multipart(Multipart<F>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest<F> {
    pub method: Method,
    /// Absolute URL, base included.
    pub url: String,
    pub bearer: Option<String>,
    pub body: Body<F>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends one request. The browser build uses gloo-net; tests script it.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type File;

    async fn send(&self, request: ApiRequest<Self::File>) -> Result<RawResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_skips_unset_values() {
        let form: Multipart<&str> = Multipart::new()
            .text("title", "Intro")
            .text_if_set("video_url", "  ")
            .file_if_set("file", None)
            .file("thumbnail", "thumb.png");

        let names: Vec<_> = form.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["title", "thumbnail"]);
        assert_eq!(form.get_text("title"), Some("Intro"));
    }

    #[test]
    fn success_range() {
        assert!(RawResponse { status: 204, body: String::new() }.is_success());
        assert!(!RawResponse { status: 301, body: String::new() }.is_success());
    }
}
