//! Site-scan orchestration: homepage fetch, extractor application, then the
//! auxiliary probes in parallel. Subsystem failures are absorbed into
//! defaults; the scanner always hands back a complete audit.

use std::sync::Arc;

use tracing::{info, warn};

use brandscan_common::{BrandScanError, SiteAudit};
use brandscan_fetch::{FetchOptions, Fetcher};

use crate::extract;
use crate::probes;
use crate::signatures::{
    default_email_capture_signatures, default_review_signatures, Signature, KNOWN_GENERATORS,
};

/// Prefix bare domains with https and reject anything unparseable. Fails
/// before any network activity.
pub fn normalize_target(target: &str) -> Result<String, BrandScanError> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(BrandScanError::InvalidTarget(target.to_string()));
    }

    let lower = trimmed.to_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    url::Url::parse(&with_scheme)
        .map_err(|_| BrandScanError::InvalidTarget(target.to_string()))?;
    Ok(with_scheme)
}

pub struct SiteScanner {
    fetcher: Arc<dyn Fetcher>,
    opts: FetchOptions,
    review_signatures: Vec<Signature>,
    email_capture_signatures: Vec<Signature>,
}

impl SiteScanner {
    pub fn new(fetcher: Arc<dyn Fetcher>, opts: FetchOptions) -> Self {
        Self {
            fetcher,
            opts,
            review_signatures: default_review_signatures(),
            email_capture_signatures: default_email_capture_signatures(),
        }
    }

    /// Swap in custom fingerprint tables.
    pub fn with_signatures(mut self, review: Vec<Signature>, email_capture: Vec<Signature>) -> Self {
        self.review_signatures = review;
        self.email_capture_signatures = email_capture;
        self
    }

    /// Full scan: homepage stage, then the auxiliary probes concurrently.
    pub async fn scan(&self, target: &str) -> Result<SiteAudit, BrandScanError> {
        let url = normalize_target(target)?;
        let mut audit = self.scan_homepage(&url).await;

        let (sitemap, robots, broken) = self.aux_probes(&url).await;
        audit.sitemap = sitemap;
        audit.robots_txt = robots;
        audit.broken_paths = broken;

        info!(url, platform = ?audit.platform, "Site scan complete");
        Ok(audit)
    }

    /// Fetch the homepage and apply every extractor to its body. A failed
    /// fetch leaves the extractor fields at their defaults — the audit is
    /// still returned so the probes can run.
    pub async fn scan_homepage(&self, url: &str) -> SiteAudit {
        let mut audit = SiteAudit::empty(url);

        let html = match self.fetcher.fetch(url, &self.opts).await {
            Ok(res) => {
                info!(url, status = res.status, bytes = res.body.len(), "Homepage fetched");
                res.body
            }
            Err(e) => {
                warn!(url, error = %e, "Homepage fetch failed");
                return audit;
            }
        };

        audit.page_size_bytes = html.len();
        audit.title = extract::extract_title(&html);
        audit.meta_description = extract::extract_meta_description(&html);
        audit.platform = Some(extract::detect_platform(&html, &KNOWN_GENERATORS));
        audit.social_links = extract::extract_social_links(&html);
        audit.scripts = extract::extract_script_domains(&html, url);
        audit.structured_data = extract::extract_structured_data(&html);
        audit.contact = extract::extract_contact(&html);
        audit.copyright_year = extract::extract_copyright_year(&html);
        audit.og_image = extract::extract_og_image(&html);
        audit.favicon = extract::extract_favicon(&html, url);
        audit.review_widgets = extract::detect_signatures(&html, &self.review_signatures);
        audit.email_capture = extract::detect_signatures(&html, &self.email_capture_signatures);
        audit.blog = extract::detect_blog(&html, url);

        audit
    }

    /// Run the sitemap, robots, and broken-path checks concurrently. Each
    /// probe fails independently into its default value.
    pub async fn aux_probes(
        &self,
        url: &str,
    ) -> (
        brandscan_common::SitemapInfo,
        brandscan_common::RobotsInfo,
        Vec<String>,
    ) {
        tokio::join!(
            probes::check_sitemap(self.fetcher.as_ref(), url, &self.opts),
            probes::check_robots(self.fetcher.as_ref(), url, &self.opts),
            probes::check_broken_paths(self.fetcher.as_ref(), url, &self.opts),
        )
    }
}
