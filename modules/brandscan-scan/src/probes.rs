//! Auxiliary site probes: sitemap, robots.txt, and conventional-path
//! checks. Each probe issues its own fetches and converts every failure
//! into its documented default — none of them can abort a scan.

use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use tracing::warn;

use brandscan_common::{RobotsInfo, SitemapInfo};
use brandscan_fetch::{FetchOptions, Fetcher};

use crate::signatures::COMMON_PATHS;

/// Robots bodies above this size are treated as absent rather than
/// retained verbatim.
pub const ROBOTS_MAX_BYTES: usize = 500_000;

static URL_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<url>").expect("valid regex"));
static SITEMAP_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<sitemap>").expect("valid regex"));

fn join_path(base_url: &str, path: &str) -> Option<String> {
    url::Url::parse(base_url)
        .ok()?
        .join(path)
        .ok()
        .map(|u| u.to_string())
}

/// Fetch `/sitemap.xml` and count entry markers. Marker counting is an
/// approximation, not XML parsing.
pub async fn check_sitemap(
    fetcher: &dyn Fetcher,
    base_url: &str,
    opts: &FetchOptions,
) -> SitemapInfo {
    let Some(sitemap_url) = join_path(base_url, "/sitemap.xml") else {
        return SitemapInfo::default();
    };

    match fetcher.fetch(&sitemap_url, opts).await {
        Ok(res) if res.status == 200 && res.body.contains("<url") => SitemapInfo {
            exists: true,
            url: Some(sitemap_url),
            pages: URL_ENTRY_RE.find_iter(&res.body).count(),
        },
        Ok(res) if res.status == 200 && res.body.contains("<sitemap>") => SitemapInfo {
            exists: true,
            url: Some(sitemap_url),
            pages: SITEMAP_ENTRY_RE.find_iter(&res.body).count(),
        },
        Ok(_) => SitemapInfo {
            exists: false,
            url: Some(sitemap_url),
            pages: 0,
        },
        Err(e) => {
            warn!(url = sitemap_url, error = %e, "Sitemap check failed");
            SitemapInfo {
                exists: false,
                url: Some(sitemap_url),
                pages: 0,
            }
        }
    }
}

/// Fetch `/robots.txt`; present only when 200 and under the size ceiling.
pub async fn check_robots(
    fetcher: &dyn Fetcher,
    base_url: &str,
    opts: &FetchOptions,
) -> RobotsInfo {
    let Some(robots_url) = join_path(base_url, "/robots.txt") else {
        return RobotsInfo::default();
    };

    match fetcher.fetch(&robots_url, opts).await {
        Ok(res) if res.status == 200 && res.body.len() < ROBOTS_MAX_BYTES => RobotsInfo {
            exists: true,
            content: Some(res.body.trim().to_string()),
        },
        Ok(_) => RobotsInfo::default(),
        Err(e) => {
            warn!(url = robots_url, error = %e, "Robots check failed");
            RobotsInfo::default()
        }
    }
}

/// Probe the conventional paths concurrently. A path is broken only on an
/// explicit 404; 5xx and transport failures say nothing about the path
/// itself and are not reported.
pub async fn check_broken_paths(
    fetcher: &dyn Fetcher,
    base_url: &str,
    opts: &FetchOptions,
) -> Vec<String> {
    let checks = COMMON_PATHS.iter().map(|path| async move {
        let status = match join_path(base_url, path) {
            Some(full_url) => fetcher.status_of(&full_url, opts).await,
            None => None,
        };
        (*path, status)
    });

    join_all(checks)
        .await
        .into_iter()
        .filter(|(_, status)| *status == Some(404))
        .map(|(path, _)| path.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscan_fetch::testing::StaticFetcher;

    const BASE: &str = "https://example.com/";

    #[tokio::test]
    async fn sitemap_counts_url_entries() {
        let body = "<urlset><url><loc>a</loc></url><url><loc>b</loc></url><url><loc>c</loc></url></urlset>";
        let fetcher = StaticFetcher::new().ok("https://example.com/sitemap.xml", 200, body);

        let sitemap = check_sitemap(&fetcher, BASE, &FetchOptions::default()).await;
        assert!(sitemap.exists);
        assert_eq!(sitemap.pages, 3);
        assert_eq!(
            sitemap.url.as_deref(),
            Some("https://example.com/sitemap.xml")
        );
    }

    #[tokio::test]
    async fn sitemap_index_counts_sitemap_entries() {
        let body = "<sitemapindex><sitemap><loc>a</loc></sitemap><sitemap><loc>b</loc></sitemap></sitemapindex>";
        let fetcher = StaticFetcher::new().ok("https://example.com/sitemap.xml", 200, body);

        let sitemap = check_sitemap(&fetcher, BASE, &FetchOptions::default()).await;
        assert!(sitemap.exists);
        assert_eq!(sitemap.pages, 2);
    }

    #[tokio::test]
    async fn missing_sitemap_keeps_url_for_reporting() {
        let fetcher = StaticFetcher::new();
        let sitemap = check_sitemap(&fetcher, BASE, &FetchOptions::default()).await;
        assert!(!sitemap.exists);
        assert_eq!(sitemap.pages, 0);
        assert!(sitemap.url.is_some());
    }

    #[tokio::test]
    async fn robots_present_and_trimmed() {
        let fetcher = StaticFetcher::new().ok(
            "https://example.com/robots.txt",
            200,
            "User-agent: *\nDisallow:\n",
        );

        let robots = check_robots(&fetcher, BASE, &FetchOptions::default()).await;
        assert!(robots.exists);
        assert_eq!(robots.content.as_deref(), Some("User-agent: *\nDisallow:"));
    }

    #[tokio::test]
    async fn oversized_robots_is_treated_as_absent() {
        let huge = "x".repeat(ROBOTS_MAX_BYTES);
        let fetcher = StaticFetcher::new().ok("https://example.com/robots.txt", 200, &huge);

        let robots = check_robots(&fetcher, BASE, &FetchOptions::default()).await;
        assert!(!robots.exists);
        assert!(robots.content.is_none());
    }

    #[tokio::test]
    async fn only_explicit_404_is_broken() {
        // /about 404s, /contact 500s, /services dies in transport; only the
        // 404 is reported (5xx exclusion is deliberate and preserved).
        let fetcher = StaticFetcher::new()
            .ok("https://example.com/about", 404, "")
            .ok("https://example.com/contact", 500, "")
            .err("https://example.com/services", "connection reset")
            .ok("https://example.com/", 200, "");

        let broken = check_broken_paths(&fetcher, BASE, &FetchOptions::default()).await;
        assert_eq!(broken, vec!["/about"]);
    }
}
