//! Per-platform presence probing. Every handle variant is attempted
//! concurrently; the attempt set reduces to one tri-state verdict per
//! platform. Transport failures and definitive negatives are kept apart —
//! they mean different things downstream.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use brandscan_common::{PlatformPresence, PresenceReport, TriState};
use brandscan_fetch::{FetchOptions, Fetcher};

use crate::handles::generate_handles;
use crate::registry;
use crate::trustpilot;

/// Which slice of the handle set a platform is probed with. Marketplace
/// shops tend to register only the exact or concatenated name, so trying
/// the full set there just burns requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSet {
    Full,
    ExactAndJoined,
}

#[derive(Debug, Clone)]
pub struct PlatformSpec {
    pub name: &'static str,
    pub url_template: &'static str,
    pub variants: VariantSet,
}

pub fn default_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec {
            name: "Pinterest",
            url_template: "https://www.pinterest.co.uk/{handle}/",
            variants: VariantSet::Full,
        },
        PlatformSpec {
            name: "YouTube",
            url_template: "https://www.youtube.com/@{handle}",
            variants: VariantSet::Full,
        },
        PlatformSpec {
            name: "Etsy",
            url_template: "https://www.etsy.com/uk/shop/{handle}",
            variants: VariantSet::ExactAndJoined,
        },
        PlatformSpec {
            name: "Facebook",
            url_template: "https://www.facebook.com/{handle}/",
            variants: VariantSet::Full,
        },
    ]
}

/// One handle variant's probe outcome.
struct Attempt {
    handle: String,
    url: String,
    outcome: Result<u16, String>,
}

/// Reduce a platform's attempts into a verdict. The first 200 in
/// generation order wins; any definitive status without a 200 is a
/// confirmed `Absent`; only all-transport-failure is `Unknown`.
fn reduce(name: &str, attempts: Vec<Attempt>) -> PlatformPresence {
    let fallback_url = attempts
        .first()
        .map(|a| a.url.clone())
        .unwrap_or_default();

    if let Some(hit) = attempts
        .iter()
        .find(|a| matches!(a.outcome, Ok(200)))
    {
        return PlatformPresence {
            name: name.to_string(),
            url: hit.url.clone(),
            found: TriState::Present,
            handle_matched: Some(hit.handle.clone()),
            rating: None,
            review_count: None,
            notes: String::new(),
        };
    }

    let statuses: Vec<u16> = attempts
        .iter()
        .filter_map(|a| a.outcome.as_ref().ok().copied())
        .collect();

    if statuses.is_empty() {
        let mut errors: Vec<String> = Vec::new();
        for attempt in &attempts {
            if let Err(reason) = &attempt.outcome {
                if !errors.contains(reason) {
                    errors.push(reason.clone());
                }
            }
        }
        return PlatformPresence {
            name: name.to_string(),
            url: fallback_url,
            found: TriState::Unknown,
            handle_matched: None,
            rating: None,
            review_count: None,
            notes: errors.join("; "),
        };
    }

    let mut distinct: Vec<String> = Vec::new();
    for status in &statuses {
        let s = status.to_string();
        if !distinct.contains(&s) {
            distinct.push(s);
        }
    }

    PlatformPresence {
        name: name.to_string(),
        url: fallback_url,
        found: TriState::Absent,
        handle_matched: None,
        rating: None,
        review_count: None,
        notes: format!(
            "Tried {} handles, statuses: {}",
            attempts.len(),
            distinct.join(", ")
        ),
    }
}

pub struct PresenceProber {
    fetcher: Arc<dyn Fetcher>,
    opts: FetchOptions,
    platforms: Vec<PlatformSpec>,
}

impl PresenceProber {
    pub fn new(fetcher: Arc<dyn Fetcher>, opts: FetchOptions) -> Self {
        Self {
            fetcher,
            opts,
            platforms: default_platforms(),
        }
    }

    /// Swap in a custom platform table.
    pub fn with_platforms(mut self, platforms: Vec<PlatformSpec>) -> Self {
        self.platforms = platforms;
        self
    }

    fn variant_subset(&self, spec: &PlatformSpec, handles: &[String]) -> Vec<String> {
        match spec.variants {
            VariantSet::Full => handles.to_vec(),
            VariantSet::ExactAndJoined => {
                let mut subset = Vec::new();
                if let Some(exact) = handles.first() {
                    subset.push(exact.clone());
                }
                let joined = handles
                    .iter()
                    .find(|h| !h.contains(['-', '.', '_']))
                    .or(handles.first());
                if let Some(joined) = joined {
                    if !subset.contains(joined) {
                        subset.push(joined.clone());
                    }
                }
                subset
            }
        }
    }

    /// Probe one platform with every applicable handle variant; attempts
    /// are in flight simultaneously, none waiting on another.
    pub async fn probe_platform(
        &self,
        spec: &PlatformSpec,
        handles: &[String],
    ) -> PlatformPresence {
        let subset = self.variant_subset(spec, handles);

        let attempts = join_all(subset.into_iter().map(|handle| {
            let url = spec.url_template.replace("{handle}", &handle);
            async move {
                let outcome = match self.fetcher.fetch(&url, &self.opts).await {
                    Ok(res) => Ok(res.status),
                    Err(e) => Err(e.to_string()),
                };
                Attempt {
                    handle,
                    url,
                    outcome,
                }
            }
        }))
        .await;

        let verdict = reduce(spec.name, attempts);
        info!(
            platform = spec.name,
            found = ?verdict.found,
            handle = ?verdict.handle_matched,
            "Platform probe complete"
        );
        verdict
    }

    /// Probe every platform plus the review-aggregator and registry
    /// lookups, all concurrently. Failure of one branch never cancels the
    /// others; each reduces to its own verdict.
    pub async fn probe(
        &self,
        business_name: &str,
        handle: &str,
        domain: &str,
    ) -> PresenceReport {
        let handles = generate_handles(handle);
        info!(
            business_name,
            domain,
            variants = handles.len(),
            "Starting presence probe"
        );

        let platform_checks = join_all(
            self.platforms
                .iter()
                .map(|spec| self.probe_platform(spec, &handles)),
        );

        let (trustpilot, mut platforms, registry) = tokio::join!(
            trustpilot::check_trustpilot(self.fetcher.as_ref(), domain, &self.opts),
            platform_checks,
            registry::search_companies_house(self.fetcher.as_ref(), business_name, &self.opts),
        );

        if registry.found == TriState::Unknown && !registry.notes.is_empty() {
            warn!(notes = registry.notes, "Registry lookup inconclusive");
        }

        platforms.insert(0, trustpilot);

        PresenceReport {
            business_name: business_name.to_string(),
            domain: domain.to_string(),
            handles_tried: handles,
            platforms,
            registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscan_fetch::testing::StaticFetcher;

    fn spec(template: &'static str) -> PlatformSpec {
        PlatformSpec {
            name: "TestPlatform",
            url_template: template,
            variants: VariantSet::Full,
        }
    }

    fn prober(fetcher: StaticFetcher) -> PresenceProber {
        PresenceProber::new(Arc::new(fetcher), FetchOptions::default())
    }

    #[tokio::test]
    async fn any_200_wins_regardless_of_order() {
        // Variants resolve to 404, transport error, 200; the 200 decides.
        let fetcher = StaticFetcher::new()
            .ok("https://t.example/willow-leather", 404, "")
            .err("https://t.example/willow.leather", "timeout")
            .ok("https://t.example/willowleather", 200, "profile")
            .ok("https://t.example/willow_leather", 404, "");

        let handles = generate_handles("willow-leather");
        let verdict = prober(fetcher)
            .probe_platform(&spec("https://t.example/{handle}"), &handles)
            .await;

        assert_eq!(verdict.found, TriState::Present);
        assert_eq!(verdict.handle_matched.as_deref(), Some("willowleather"));
        assert_eq!(verdict.url, "https://t.example/willowleather");
    }

    #[tokio::test]
    async fn definitive_statuses_without_200_are_absent() {
        let fetcher = StaticFetcher::new()
            .ok("https://t.example/acme-co", 404, "")
            .ok("https://t.example/acme.co", 403, "")
            .ok("https://t.example/acmeco", 404, "")
            .ok("https://t.example/acme_co", 403, "");

        let handles = generate_handles("acme-co");
        let verdict = prober(fetcher)
            .probe_platform(&spec("https://t.example/{handle}"), &handles)
            .await;

        assert_eq!(verdict.found, TriState::Absent);
        assert_eq!(verdict.handle_matched, None);
        assert!(verdict.notes.contains("Tried 4 handles"));
        assert!(verdict.notes.contains("404"));
        assert!(verdict.notes.contains("403"));
    }

    #[tokio::test]
    async fn all_transport_failures_are_unknown_not_absent() {
        let fetcher = StaticFetcher::new().err("https://t.example/", "connection refused");

        let handles = generate_handles("acme");
        let verdict = prober(fetcher)
            .probe_platform(&spec("https://t.example/{handle}"), &handles)
            .await;

        assert_eq!(verdict.found, TriState::Unknown);
        assert!(verdict.notes.contains("connection refused"));
    }

    #[tokio::test]
    async fn marketplace_subset_tries_exact_and_joined_only() {
        // Every URL answers 404 so the attempt count lands in the notes.
        let fetcher = StaticFetcher::new().ok("https://shop.example/", 404, "");

        let handles = generate_handles("willow-leather");
        let narrow = PlatformSpec {
            name: "Etsy",
            url_template: "https://shop.example/{handle}",
            variants: VariantSet::ExactAndJoined,
        };
        let verdict = prober(fetcher).probe_platform(&narrow, &handles).await;

        assert!(verdict.notes.contains("Tried 2 handles"));
    }

    #[tokio::test]
    async fn mixed_error_and_status_is_absent() {
        // One transport failure plus one definitive 404: something was
        // learned, so the verdict is a confirmed negative.
        let fetcher = StaticFetcher::new()
            .err("https://t.example/a-b", "reset")
            .ok("https://t.example/a.b", 404, "")
            .ok("https://t.example/ab", 404, "")
            .err("https://t.example/a_b", "reset");

        let handles = generate_handles("a-b");
        let verdict = prober(fetcher)
            .probe_platform(&spec("https://t.example/{handle}"), &handles)
            .await;

        assert_eq!(verdict.found, TriState::Absent);
    }

    #[tokio::test]
    async fn full_probe_isolates_failing_branches() {
        // Every network call fails; the report still carries a verdict for
        // every platform plus the registry.
        let fetcher = StaticFetcher::new().err("https://", "network down");

        let report = prober(fetcher)
            .probe("Willow Leather", "willow-leather", "willow-leather.com")
            .await;

        // Trustpilot plus the four handle platforms.
        assert_eq!(report.platforms.len(), 5);
        assert!(report
            .platforms
            .iter()
            .all(|p| p.found == TriState::Unknown));
        assert_eq!(report.registry.found, TriState::Unknown);
        assert_eq!(report.handles_tried[0], "willow-leather");
    }
}
