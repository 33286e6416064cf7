//! Companies House lookup: one search request by business name, typed
//! parse of the response, top hit reported. Parse failures become notes,
//! never errors.

use serde::Deserialize;
use tracing::info;
use url::form_urlencoded;

use brandscan_common::{RegistryLookup, TriState};
use brandscan_fetch::{FetchOptions, Fetcher};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company_number: Option<String>,
    #[serde(default)]
    company_status: Option<String>,
}

fn capitalize(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub async fn search_companies_house(
    fetcher: &dyn Fetcher,
    business_name: &str,
    opts: &FetchOptions,
) -> RegistryLookup {
    let encoded: String = form_urlencoded::byte_serialize(business_name.as_bytes()).collect();
    let url = format!(
        "https://api.company-information.service.gov.uk/search/companies?q={encoded}"
    );

    let res = match fetcher.fetch(&url, opts).await {
        Ok(res) => res,
        Err(e) => return RegistryLookup::unknown(&e.to_string()),
    };

    if res.status != 200 {
        return RegistryLookup::unknown(&format!("HTTP {}", res.status));
    }

    let data: SearchResponse = match serde_json::from_str(&res.body) {
        Ok(data) => data,
        Err(_) => return RegistryLookup::unknown("Failed to parse JSON response"),
    };

    let Some(top) = data.items.into_iter().next() else {
        return RegistryLookup {
            found: TriState::Absent,
            company_name: None,
            company_number: None,
            status: None,
            notes: "No matching companies found".to_string(),
        };
    };

    info!(
        business_name,
        company = ?top.title,
        number = ?top.company_number,
        "Registry match"
    );

    RegistryLookup {
        found: TriState::Present,
        company_name: top.title,
        company_number: top.company_number,
        status: top.company_status.as_deref().map(capitalize),
        notes: String::new(),
    }
}
