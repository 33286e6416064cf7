//! Signal extractors: pure functions over raw markup. Each one is
//! priority-ordered pattern matching, not a DOM parse — the first matching
//! candidate wins, and malformed input yields `None`/empty, never a panic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use brandscan_common::{BlogInfo, Contact};

use crate::signatures::{Signature, KNOWN_GENERATORS, SOCIAL_DOMAINS};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

static META_DESC_NAME_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+name\s*=\s*["']description["'][^>]+content\s*=\s*["'](.*?)["'][^>]*>"#)
        .expect("valid regex")
});
static META_DESC_CONTENT_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+content\s*=\s*["'](.*?)["'][^>]+name\s*=\s*["']description["'][^>]*>"#)
        .expect("valid regex")
});

static OG_IMAGE_PROP_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+property\s*=\s*["']og:image["'][^>]+content\s*=\s*["'](.*?)["'][^>]*>"#)
        .expect("valid regex")
});
static OG_IMAGE_CONTENT_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+content\s*=\s*["'](.*?)["'][^>]+property\s*=\s*["']og:image["'][^>]*>"#)
        .expect("valid regex")
});

static FAVICON_REL_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]+rel\s*=\s*["'](?:shortcut )?icon["'][^>]+href\s*=\s*["']([^"']+)["']"#)
        .expect("valid regex")
});
static FAVICON_HREF_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]+href\s*=\s*["']([^"']+)["'][^>]+rel\s*=\s*["'](?:shortcut )?icon["']"#)
        .expect("valid regex")
});

static SHOPIFY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)cdn\.shopify\.com|Shopify\.theme").expect("valid regex"));
static WORDPRESS_ASSETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)wp-content|wp-includes").expect("valid regex"));
static GENERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name\s*=\s*["']generator["'][^>]+content\s*=\s*["']([^"']+)["']"#)
        .expect("valid regex")
});
static SQUARESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)squarespace\.com|static1\.squarespace").expect("valid regex")
});
static WIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wix\.com|parastorage\.com|wixstatic\.com").expect("valid regex")
});
static WEBFLOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)webflow").expect("valid regex"));
static WEBFLOW_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)data-wf-").expect("valid regex"));

static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]+href\s*=\s*["']([^"']+)["'][^>]*>"#).expect("valid regex")
});
static SCRIPT_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]+src\s*=\s*["']([^"']+)["'][^>]*>"#).expect("valid regex")
});
static JSON_LD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static MAILTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)mailto:([^"'<>\s]+)"#).expect("valid regex"));
static TEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tel:([^"'<>\s]+)"#).expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid regex")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:©|\bcopyright\b)[^0-9]*(\d{4})").expect("valid regex")
});

static BLOG_POST_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]+href\s*=\s*["']([^"']*/blog/[^"']+)["'][^>]*>"#).expect("valid regex")
});
static BLOG_HINT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/blog/",
        r"(?i)/posts?/",
        r"(?i)/articles?/",
        r#"(?i)class\s*=\s*["'][^"']*blog[^"']*["']"#,
        r#"(?i)class\s*=\s*["'][^"']*post[^"']*["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static DEC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").expect("valid regex"));
static HEX_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#x([0-9a-fA-F]+);").expect("valid regex"));

/// Decode numeric character references and the common named entities.
/// Applied to every fact that carries visible text; skipping it produces
/// visibly wrong output (`&amp;` in titles), so it is a correctness step,
/// not a heuristic.
pub fn decode_entities(text: &str) -> String {
    let text = DEC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    let text = HEX_ENTITY_RE.replace_all(&text, |caps: &regex::Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .map(|c| decode_entities(c[1].trim()))
}

pub fn extract_meta_description(html: &str) -> Option<String> {
    META_DESC_NAME_FIRST_RE
        .captures(html)
        .or_else(|| META_DESC_CONTENT_FIRST_RE.captures(html))
        .map(|c| decode_entities(c[1].trim()))
}

pub fn extract_og_image(html: &str) -> Option<String> {
    OG_IMAGE_PROP_FIRST_RE
        .captures(html)
        .or_else(|| OG_IMAGE_CONTENT_FIRST_RE.captures(html))
        .map(|c| c[1].trim().to_string())
}

/// Declared icon link if any, otherwise `/favicon.ico` resolved against the
/// page URL.
pub fn extract_favicon(html: &str, base_url: &str) -> Option<String> {
    let base = url::Url::parse(base_url).ok();

    if let Some(caps) = FAVICON_REL_FIRST_RE
        .captures(html)
        .or_else(|| FAVICON_HREF_FIRST_RE.captures(html))
    {
        let href = caps[1].trim();
        return match &base {
            Some(b) => Some(b.join(href).map(|u| u.to_string()).unwrap_or_else(|_| href.to_string())),
            None => Some(href.to_string()),
        };
    }

    base.and_then(|b| b.join("/favicon.ico").ok()).map(|u| u.to_string())
}

/// Classify which platform built the page. Precedence is fixed: commerce
/// signatures are the most specific and least likely to false-positive, so
/// they are checked before the generic content-management markers, which in
/// turn outrank the self-reported generator tag.
pub fn detect_platform(html: &str, generators: &[(&str, &str)]) -> String {
    if SHOPIFY_RE.is_match(html) {
        return "Shopify".to_string();
    }
    if WORDPRESS_ASSETS_RE.is_match(html) {
        return "WordPress".to_string();
    }
    if let Some(caps) = GENERATOR_RE.captures(html) {
        let content = caps[1].to_lowercase();
        for (needle, name) in generators {
            if content.contains(needle) {
                return (*name).to_string();
            }
        }
    }
    if SQUARESPACE_RE.is_match(html) {
        return "Squarespace".to_string();
    }
    if WIX_RE.is_match(html) {
        return "Wix".to_string();
    }
    if WEBFLOW_RE.is_match(html) && WEBFLOW_DATA_RE.is_match(html) {
        return "Webflow".to_string();
    }

    "Custom".to_string()
}

pub fn extract_social_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in ANCHOR_HREF_RE.captures_iter(html) {
        let href = caps[1].trim().to_string();
        if SOCIAL_DOMAINS.iter().any(|d| href.contains(d)) && seen.insert(href.clone()) {
            links.push(href);
        }
    }

    links
}

/// Hostnames of every external script source, resolved against the page URL.
pub fn extract_script_domains(html: &str, base_url: &str) -> Vec<String> {
    let base = url::Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for caps in SCRIPT_SRC_RE.captures_iter(html) {
        let src = caps[1].trim();
        let resolved = match url::Url::parse(src) {
            Ok(u) => Some(u),
            Err(_) => base.as_ref().and_then(|b| b.join(src).ok()),
        };
        if let Some(host) = resolved.as_ref().and_then(|u| u.host_str()) {
            if seen.insert(host.to_string()) {
                domains.push(host.to_string());
            }
        }
    }

    domains
}

/// Parse every JSON-LD block, silently skipping malformed ones.
pub fn extract_structured_data(html: &str) -> Vec<serde_json::Value> {
    JSON_LD_RE
        .captures_iter(html)
        .filter_map(|caps| serde_json::from_str(&caps[1]).ok())
        .collect()
}

/// Contact details with a fallback chain: explicit mailto/tel links win;
/// failing that, email/phone shaped patterns scanned from the text.
pub fn extract_contact(html: &str) -> Contact {
    let mut contact = Contact::default();

    if let Some(caps) = MAILTO_RE.captures(html) {
        let address = caps[1].split('?').next().unwrap_or(&caps[1]);
        contact.email = Some(decode_entities(address));
    }
    if let Some(caps) = TEL_RE.captures(html) {
        let number = &caps[1];
        contact.phone = Some(
            urlencoding::decode(number)
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| number.to_string()),
        );
    }

    if contact.email.is_none() {
        if let Some(m) = EMAIL_RE.find(html) {
            contact.email = Some(m.as_str().to_string());
        }
    }
    if contact.phone.is_none() {
        let text = strip_tags(html);
        if let Some(m) = PHONE_RE.find(&text) {
            contact.phone = Some(m.as_str().trim().to_string());
        }
    }

    contact
}

pub fn extract_copyright_year(html: &str) -> Option<String> {
    let text = strip_tags(html);
    COPYRIGHT_RE.captures(&text).map(|c| c[1].to_string())
}

/// Names of every signature whose pattern matches the markup.
pub fn detect_signatures(html: &str, signatures: &[Signature]) -> Vec<String> {
    signatures
        .iter()
        .filter(|sig| sig.pattern.is_match(html))
        .map(|sig| sig.name.clone())
        .collect()
}

/// Blog detection combines path/class-name hints with counted post links.
/// Post-link evidence outranks absent path hints: links alone flip
/// `detected` to true.
pub fn detect_blog(html: &str, base_url: &str) -> BlogInfo {
    let mut blog = BlogInfo::default();

    if BLOG_HINT_RES.iter().any(|re| re.is_match(html)) {
        blog.detected = true;
    }

    let base = url::Url::parse(base_url).ok();
    let mut post_links = Vec::new();
    for caps in BLOG_POST_LINK_RE.captures_iter(html) {
        let href = caps[1].trim();
        if href == "/blog/" || href == "/blog" {
            continue;
        }
        let resolved = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.to_string());
        post_links.push(resolved);
    }

    if !post_links.is_empty() {
        blog.detected = true;
        blog.post_count = post_links.len();
        blog.last_post_url = post_links.into_iter().next();
    }

    blog
}
