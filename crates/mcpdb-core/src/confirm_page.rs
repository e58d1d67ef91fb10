//! Google Drive confirmation interstitial.
//!
//! Files Drive cannot virus-scan (large ones) are served behind an HTML page
//! with a "Download anyway" link or form. This module digs the real download
//! URL out of that page, or the reason Drive refused to serve the file.

use crate::error::FetchError;
use regex::Regex;
use url::Url;

/// Upper bound on how much of an HTML response is inspected.
pub const MAX_PAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Extracts the URL that serves the file from a Drive confirmation page.
///
/// Tries, in order: a `/uc?export=download` link, the `download-form` with
/// its hidden inputs, and an embedded JSON `downloadUrl`. `page_url` is the
/// URL that served the page; relative links resolve against it.
pub fn confirmation_url(html: &str, page_url: &str) -> Result<String, FetchError> {
    if let Some(url) = uc_link(html, page_url) {
        return Ok(url);
    }
    if let Some(url) = download_form(html, page_url) {
        return Ok(url);
    }
    if let Some(url) = json_download_url(html) {
        return Ok(url);
    }
    match error_caption(html) {
        Some(reason) => Err(FetchError::DriveRefused(reason)),
        None => Err(FetchError::NotShared),
    }
}

fn uc_link(html: &str, page_url: &str) -> Option<String> {
    let re = Regex::new(r#"href="(/uc\?export=download[^"]+)""#).ok()?;
    let href = unescape_html(re.captures(html)?.get(1)?.as_str());
    let url = Url::parse(page_url).ok()?.join(&href).ok()?;
    Some(url.into())
}

fn download_form(html: &str, page_url: &str) -> Option<String> {
    let form_re =
        Regex::new(r#"(?s)<form\b([^>]*\bid="download-form"[^>]*)>(.*?)</form>"#).ok()?;
    let caps = form_re.captures(html)?;
    let attrs = caps.get(1)?.as_str();
    let body = caps.get(2)?.as_str();

    let action = attr(attrs, "action")?;
    let mut url = Url::parse(page_url).ok()?.join(&action).ok()?;

    let input_re = Regex::new(r#"<input\b[^>]*>"#).ok()?;
    let hidden: Vec<(String, String)> = input_re
        .find_iter(body)
        .map(|m| m.as_str())
        .filter(|tag| attr(tag, "type").as_deref() == Some("hidden"))
        .filter_map(|tag| Some((attr(tag, "name")?, attr(tag, "value").unwrap_or_default())))
        .collect();

    if !hidden.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &hidden {
            pairs.append_pair(name, value);
        }
    }
    Some(url.into())
}

fn json_download_url(html: &str) -> Option<String> {
    let re = Regex::new(r#""downloadUrl":"([^"]+)""#).ok()?;
    let raw = re.captures(html)?.get(1)?.as_str();
    Some(raw.replace("\\u003d", "=").replace("\\u0026", "&"))
}

fn error_caption(html: &str) -> Option<String> {
    let re = Regex::new(r#"(?s)<p class="uc-error-subcaption">(.*?)</p>"#).ok()?;
    let text = unescape_html(re.captures(html)?.get(1)?.as_str().trim());
    (!text.is_empty()).then_some(text)
}

/// Value of `name="..."` inside a tag's attribute text (HTML-unescaped).
fn attr(tag: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(r#"\b{}="([^"]*)""#, regex::escape(name))).ok()?;
    Some(unescape_html(re.captures(tag)?.get(1)?.as_str()))
}

fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
