//! Page snapshots: location, markup and title of a loaded document.
//!
//! A `PageDocument` is what the page context scans. The CLI builds one by
//! fetching a URL with libcurl, or from a saved HTML file.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;

use crate::url_model::PageLocation;

/// A loaded page the scanner can inspect.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub location: PageLocation,
    /// Raw serialized markup, scanned as text by the manifest pass.
    pub markup: String,
    /// Text of `<title>`, trimmed; empty if absent.
    pub title: String,
}

impl PageDocument {
    /// Builds a snapshot for `page_url`. Fails only if the URL is unparseable.
    pub fn new(page_url: &str, markup: impl Into<String>) -> Result<Self> {
        let location =
            PageLocation::parse(page_url).with_context(|| format!("invalid page URL: {page_url}"))?;
        let markup = markup.into();
        let title = document_title(&Html::parse_document(&markup));
        Ok(Self {
            location,
            markup,
            title,
        })
    }

    /// Page title, or `fallback` when the page has none.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}

fn document_title(document: &Html) -> String {
    let selector = match Selector::parse("title") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };
    document
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Fetches `url` with a single GET and returns the body as text.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn fetch_page(url: &str, user_agent: &str) -> Result<String> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.useragent(user_agent)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.accept_encoding("")?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
