use serde::{Deserialize, Serialize};

/// Three-valued presence verdict. `Absent` is a confirmed negative (a
/// definitive HTTP status was observed); `Unknown` means every attempt died
/// at the transport level, so nothing was learned. The two must never be
/// collapsed into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    Present,
    Absent,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapInfo {
    pub exists: bool,
    pub url: Option<String>,
    pub pages: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobotsInfo {
    pub exists: bool,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogInfo {
    pub detected: bool,
    pub post_count: usize,
    pub last_post_url: Option<String>,
}

/// Everything learned about a website in one scan. Built once by the
/// scanner and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAudit {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub platform: Option<String>,
    pub social_links: Vec<String>,
    pub scripts: Vec<String>,
    pub structured_data: Vec<serde_json::Value>,
    pub contact: Contact,
    pub copyright_year: Option<String>,
    pub ssl: bool,
    pub sitemap: SitemapInfo,
    pub robots_txt: RobotsInfo,
    pub blog: BlogInfo,
    pub review_widgets: Vec<String>,
    pub email_capture: Vec<String>,
    pub broken_paths: Vec<String>,
    pub og_image: Option<String>,
    pub favicon: Option<String>,
    pub page_size_bytes: usize,
}

impl SiteAudit {
    /// An audit with every field at its documented default. The scanner
    /// starts from this and fills in whatever each subsystem delivers.
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            meta_description: None,
            platform: None,
            social_links: Vec::new(),
            scripts: Vec::new(),
            structured_data: Vec::new(),
            contact: Contact::default(),
            copyright_year: None,
            ssl: url.starts_with("https:"),
            sitemap: SitemapInfo::default(),
            robots_txt: RobotsInfo::default(),
            blog: BlogInfo::default(),
            review_widgets: Vec::new(),
            email_capture: Vec::new(),
            broken_paths: Vec::new(),
            og_image: None,
            favicon: None,
            page_size_bytes: 0,
        }
    }
}

/// One platform's verdict after probing every handle variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPresence {
    pub name: String,
    pub url: String,
    pub found: TriState,
    pub handle_matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    pub notes: String,
}

/// Company-registry search outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryLookup {
    pub found: TriState,
    pub company_name: Option<String>,
    pub company_number: Option<String>,
    pub status: Option<String>,
    pub notes: String,
}

impl RegistryLookup {
    pub fn unknown(notes: &str) -> Self {
        Self {
            found: TriState::Unknown,
            company_name: None,
            company_number: None,
            status: None,
            notes: notes.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceReport {
    pub business_name: String,
    pub domain: String,
    pub handles_tried: Vec<String>,
    pub platforms: Vec<PlatformPresence>,
    pub registry: RegistryLookup,
}

/// Full merged output of one audit run: site scan plus presence probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAuditRecord {
    pub site: SiteAudit,
    pub handles_tried: Vec<String>,
    pub platforms: Vec<PlatformPresence>,
    pub registry: RegistryLookup,
}
