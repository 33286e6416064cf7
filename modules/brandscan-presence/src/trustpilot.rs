//! Trustpilot is probed by domain, not handle: one direct review-page
//! lookup, with best-effort rating and review-count extraction from the
//! body when the page exists.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use brandscan_common::{PlatformPresence, TriState};
use brandscan_fetch::{FetchOptions, Fetcher};

static RATING_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""ratingValue"\s*:\s*"?([\d.]+)"?"#).expect("valid regex")
});
static RATING_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-rating="([\d.]+)""#).expect("valid regex"));
static RATING_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TrustScore\s+([\d.]+)").expect("valid regex"));

static COUNT_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""reviewCount"\s*:\s*"?(\d+)"?"#).expect("valid regex")
});
static COUNT_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*)\s+reviews?").expect("valid regex"));

fn extract_rating(body: &str) -> Option<f64> {
    RATING_JSON_RE
        .captures(body)
        .or_else(|| RATING_ATTR_RE.captures(body))
        .or_else(|| RATING_TEXT_RE.captures(body))
        .and_then(|c| c[1].parse().ok())
}

fn extract_review_count(body: &str) -> Option<u64> {
    COUNT_JSON_RE
        .captures(body)
        .or_else(|| COUNT_TEXT_RE.captures(body))
        .and_then(|c| c[1].replace(',', "").parse().ok())
}

pub async fn check_trustpilot(
    fetcher: &dyn Fetcher,
    domain: &str,
    opts: &FetchOptions,
) -> PlatformPresence {
    let url = format!("https://www.trustpilot.com/review/{domain}");

    let mut presence = PlatformPresence {
        name: "Trustpilot".to_string(),
        url: url.clone(),
        found: TriState::Unknown,
        handle_matched: None,
        rating: None,
        review_count: None,
        notes: String::new(),
    };

    match fetcher.fetch(&url, opts).await {
        Ok(res) if res.status == 200 => {
            presence.found = TriState::Present;
            presence.rating = extract_rating(&res.body);
            presence.review_count = extract_review_count(&res.body);
            info!(
                domain,
                rating = ?presence.rating,
                reviews = ?presence.review_count,
                "Trustpilot page found"
            );
        }
        Ok(res) if res.status == 404 => {
            presence.found = TriState::Absent;
            presence.notes = "No Trustpilot page for this domain".to_string();
        }
        Ok(res) => {
            presence.found = TriState::Absent;
            presence.notes = format!("HTTP {}", res.status);
        }
        Err(e) => {
            presence.notes = e.to_string();
        }
    }

    presence
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscan_fetch::testing::StaticFetcher;

    #[tokio::test]
    async fn found_page_extracts_rating_and_count() {
        let body = r#"
            <script type="application/ld+json">
                {"aggregateRating": {"ratingValue": "4.6", "reviewCount": "1234"}}
            </script>
        "#;
        let fetcher = StaticFetcher::new().ok("https://www.trustpilot.com/review/", 200, body);

        let presence =
            check_trustpilot(&fetcher, "example.com", &FetchOptions::default()).await;

        assert_eq!(presence.found, TriState::Present);
        assert_eq!(presence.rating, Some(4.6));
        assert_eq!(presence.review_count, Some(1234));
    }

    #[tokio::test]
    async fn visible_text_fallbacks_apply() {
        let body = "TrustScore 4.2 based on 2,105 reviews";
        let fetcher = StaticFetcher::new().ok("https://www.trustpilot.com/review/", 200, body);

        let presence =
            check_trustpilot(&fetcher, "example.com", &FetchOptions::default()).await;

        assert_eq!(presence.rating, Some(4.2));
        assert_eq!(presence.review_count, Some(2105));
    }

    #[tokio::test]
    async fn missing_page_is_absent_with_note() {
        let fetcher = StaticFetcher::new().ok("https://www.trustpilot.com/review/", 404, "");

        let presence =
            check_trustpilot(&fetcher, "example.com", &FetchOptions::default()).await;

        assert_eq!(presence.found, TriState::Absent);
        assert_eq!(presence.notes, "No Trustpilot page for this domain");
    }

    #[tokio::test]
    async fn transport_failure_stays_unknown() {
        let fetcher = StaticFetcher::new().err("https://www.trustpilot.com/", "timeout");

        let presence =
            check_trustpilot(&fetcher, "example.com", &FetchOptions::default()).await;

        assert_eq!(presence.found, TriState::Unknown);
        assert!(presence.notes.contains("timeout"));
    }
}
