//! Top-level audit orchestration. The homepage stage must resolve first —
//! every extractor reads its body — then the auxiliary probes and the
//! presence prober run concurrently. No subsystem failure stops the merge;
//! a complete record always comes back.

use std::sync::Arc;

use tracing::info;

use brandscan_common::{BrandScanError, SiteAuditRecord};
use brandscan_fetch::{FetchOptions, Fetcher};
use brandscan_presence::PresenceProber;
use brandscan_scan::{normalize_target, SiteScanner};

/// Host of the normalized target, without a leading `www.`.
fn domain_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

/// First label of the domain, the conventional handle stem when the
/// operator supplies none (e.g. `willow-leather.com` → `willow-leather`).
fn default_handle(domain: &str) -> String {
    domain.split('.').next().unwrap_or(domain).to_string()
}

pub struct Auditor {
    scanner: SiteScanner,
    prober: PresenceProber,
}

impl Auditor {
    pub fn new(fetcher: Arc<dyn Fetcher>, opts: FetchOptions) -> Self {
        Self {
            scanner: SiteScanner::new(fetcher.clone(), opts.clone()),
            prober: PresenceProber::new(fetcher, opts),
        }
    }

    pub async fn audit(
        &self,
        target: &str,
        business_name: Option<&str>,
        handle: Option<&str>,
    ) -> Result<SiteAuditRecord, BrandScanError> {
        let url = normalize_target(target)?;
        let domain = domain_of(&url);
        let handle = handle
            .map(str::to_string)
            .unwrap_or_else(|| default_handle(&domain));
        let business_name = business_name.map(str::to_string).unwrap_or_else(|| handle.clone());

        info!(url, domain, handle, "Starting audit");

        // Homepage stage first; the probes need nothing from it beyond the
        // normalized URL, so everything after runs concurrently.
        let mut site = self.scanner.scan_homepage(&url).await;

        let (aux, presence) = tokio::join!(
            self.scanner.aux_probes(&url),
            self.prober.probe(&business_name, &handle, &domain),
        );

        let (sitemap, robots, broken) = aux;
        site.sitemap = sitemap;
        site.robots_txt = robots;
        site.broken_paths = broken;

        Ok(SiteAuditRecord {
            site,
            handles_tried: presence.handles_tried,
            platforms: presence.platforms,
            registry: presence.registry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscan_common::TriState;
    use brandscan_fetch::testing::StaticFetcher;

    #[test]
    fn domain_strips_www() {
        assert_eq!(domain_of("https://www.example.com/x"), "example.com");
        assert_eq!(domain_of("https://shop.example.org"), "shop.example.org");
    }

    #[test]
    fn handle_defaults_to_first_label() {
        assert_eq!(default_handle("willow-leather.com"), "willow-leather");
    }

    #[tokio::test]
    async fn audit_merges_site_and_presence() {
        let homepage = r#"
            <title>Willow Leather</title>
            <meta name="generator" content="WordPress 6.0">
            <a href="mailto:info@example.com">email</a>
        "#;
        let fetcher = StaticFetcher::new()
            .ok("https://example.com/sitemap.xml", 200, "<urlset><url></url></urlset>")
            .ok("https://www.youtube.com/@willow-leather", 200, "channel")
            .err("https://www.trustpilot.com/", "timeout")
            .ok("https://example.com", 200, homepage)
            .err("https://", "network unreachable");

        let auditor = Auditor::new(Arc::new(fetcher), FetchOptions::default());
        let record = auditor
            .audit("example.com", Some("Willow Leather"), Some("willow-leather"))
            .await
            .expect("audit");

        assert_eq!(record.site.platform.as_deref(), Some("WordPress"));
        assert_eq!(
            record.site.contact.email.as_deref(),
            Some("info@example.com")
        );
        assert!(record.site.sitemap.exists);

        let youtube = record
            .platforms
            .iter()
            .find(|p| p.name == "YouTube")
            .expect("youtube probed");
        assert_eq!(youtube.found, TriState::Present);
        assert_eq!(youtube.handle_matched.as_deref(), Some("willow-leather"));

        let trustpilot = record
            .platforms
            .iter()
            .find(|p| p.name == "Trustpilot")
            .expect("trustpilot probed");
        assert_eq!(trustpilot.found, TriState::Unknown);
    }
}
