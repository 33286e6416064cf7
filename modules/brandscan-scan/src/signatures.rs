//! Fingerprint tables. These are configuration data, not logic: detectors
//! take a slice of signatures so the tables can be extended or swapped out
//! without touching extraction code.

use regex::Regex;

/// A named fingerprint: the tool's display name plus the markup pattern
/// that betrays it.
#[derive(Debug)]
pub struct Signature {
    pub name: String,
    pub pattern: Regex,
}

impl Signature {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: Regex::new(pattern).expect("valid signature pattern"),
        }
    }
}

pub fn default_review_signatures() -> Vec<Signature> {
    vec![
        Signature::new("Judge.me", r"(?i)judge\.me|judgeme"),
        Signature::new("Yotpo", r"(?i)yotpo"),
        Signature::new("Trustpilot", r"(?i)trustpilot"),
        Signature::new("Stamped", r"(?i)stamped\.io"),
        Signature::new("Loox", r"(?i)loox\.io"),
        Signature::new("Okendo", r"(?i)okendo"),
        Signature::new("Reviews.io", r"(?i)reviews\.io"),
        Signature::new("Bazaarvoice", r"(?i)bazaarvoice"),
        Signature::new("PowerReviews", r"(?i)powerreviews"),
        Signature::new("Feefo", r"(?i)feefo"),
        Signature::new("Google Reviews", r"(?i)google.*review"),
    ]
}

pub fn default_email_capture_signatures() -> Vec<Signature> {
    vec![
        Signature::new("Mailchimp", r"(?i)mailchimp|list-manage\.com|mc\.us"),
        Signature::new("Klaviyo", r"(?i)klaviyo"),
        Signature::new("ConvertKit", r"(?i)convertkit"),
        Signature::new("ActiveCampaign", r"(?i)activecampaign"),
        Signature::new("Omnisend", r"(?i)omnisend"),
        Signature::new("Drip", r"(?i)getdrip\.com"),
        Signature::new("HubSpot", r"(?i)hubspot"),
        Signature::new("Sendinblue", r"(?i)sendinblue|brevo"),
        Signature::new("MailerLite", r"(?i)mailerlite"),
        Signature::new("Privy", r"(?i)privy\.com"),
        Signature::new("Justuno", r"(?i)justuno"),
        Signature::new("OptinMonster", r"(?i)optinmonster"),
        Signature::new("Sumo", r"(?i)sumo\.com"),
        Signature::new("Poptin", r"(?i)poptin"),
    ]
}

/// Hostnames that mark an anchor as a social profile link.
pub const SOCIAL_DOMAINS: [&str; 8] = [
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "pinterest.com",
    "youtube.com",
    "tiktok.com",
];

/// Generator-meta content substrings mapped to platform names, checked in
/// order against the lowercased tag content.
pub const KNOWN_GENERATORS: [(&str, &str); 6] = [
    ("wordpress", "WordPress"),
    ("squarespace", "Squarespace"),
    ("wix", "Wix"),
    ("webflow", "Webflow"),
    ("drupal", "Drupal"),
    ("joomla", "Joomla"),
];

/// Conventional paths probed by the broken-path check.
pub const COMMON_PATHS: [&str; 7] = [
    "/about",
    "/contact",
    "/services",
    "/blog",
    "/faq",
    "/privacy-policy",
    "/terms",
];
