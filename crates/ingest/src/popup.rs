use std::fmt::Write as _;

use url::{ParseError, Url};

use crate::record::PointOfInterest;

/// Detail panel shown when a marker is opened. Rendered once at marker
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    html: String,
}

impl Popup {
    pub fn render(poi: &PointOfInterest) -> Self {
        let mut html = String::from("<div class=\"popup-content\">");

        let name = escape(&poi.name);
        if !is_linkable(&poi.external_link) {
            let _ = write!(html, "<span class=\"popup-title\">{name}</span>");
        } else {
            let _ = write!(
                html,
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"popup-title\">{name}</a>",
                escape(&poi.external_link)
            );
        }

        let _ = write!(html, "<p>{}</p>", escape(&poi.description));
        if !poi.price.is_empty() {
            let _ = write!(
                html,
                "<div class=\"price-badge\"><span>{}</span></div>",
                escape(&poi.price)
            );
        }
        if !poi.address.is_empty() {
            let _ = write!(
                html,
                "<p class=\"popup-address\">{}</p>",
                escape(&poi.address)
            );
        }
        if !poi.pro_tip.is_empty() {
            let _ = write!(
                html,
                "<div class=\"protip\"><span class=\"label\">Pro Tip:</span> {}</div>",
                escape(&poi.pro_tip)
            );
        }

        html.push_str("</div>");
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Only web and relative targets become anchors.
fn is_linkable(link: &str) -> bool {
    if link.is_empty() {
        return false;
    }
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
