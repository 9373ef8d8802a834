//! Admin and API URL construction.
//!
//! Loads and saves both ask for depth 0 and the `null` fallback-locale policy
//! so a saved response lines up with what the form was initialised from.

use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::config::AdminConfig;

/// Relationship depth requested on load and save.
pub const DEPTH: u32 = 0;

/// Fallback-locale policy requested on load and save.
pub const FALLBACK_LOCALE: &str = "null";

/// What the document loader should fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "kebab-case")]
pub enum FetchTarget {
    /// Nothing to fetch: creating a new document.
    Skip,
    Url(String),
}

impl FetchTarget {
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchTarget::Skip => None,
            FetchTarget::Url(url) => Some(url),
        }
    }
}

/// `{admin}/collections/{slug}`
pub fn collection_list_url(config: &AdminConfig, slug: &str) -> String {
    format!("{}/collections/{}", config.routes.admin, slug)
}

/// `{admin}/collections/{slug}/{id}`
pub fn edit_url(config: &AdminConfig, slug: &str, id: &str) -> String {
    format!(
        "{}/collections/{}/{}",
        config.routes.admin,
        slug,
        encode(id)
    )
}

/// `{admin}/not-found`
pub fn not_found_url(config: &AdminConfig) -> String {
    format!("{}/not-found", config.routes.admin)
}

/// `{server}{api}/{slug}`
fn collection_api_url(config: &AdminConfig, slug: &str) -> String {
    format!("{}{}/{}", config.server_url, config.routes.api, slug)
}

/// The document fetch for an edit form, or [`FetchTarget::Skip`] when creating.
///
/// Requests the unresolved draft snapshot in the current locale.
pub fn fetch_target(
    config: &AdminConfig,
    slug: &str,
    id: Option<&str>,
    is_editing: bool,
    locale: &str,
) -> FetchTarget {
    match id {
        Some(id) if is_editing => FetchTarget::Url(format!(
            "{}/{}?locale={}&fallback-locale={}&depth={}&draft=true",
            collection_api_url(config, slug),
            encode(id),
            encode(locale),
            FALLBACK_LOCALE,
            DEPTH
        )),
        _ => FetchTarget::Skip,
    }
}

/// The document's REST URL; `?draft=true` when the collection has drafts.
pub fn api_url(config: &AdminConfig, slug: &str, id: &str, drafts: bool) -> String {
    let base = format!("{}/{}", collection_api_url(config, slug), encode(id));
    if drafts {
        format!("{base}?draft=true")
    } else {
        base
    }
}

/// The form submit target: the collection when creating, the document when editing.
pub fn save_action(config: &AdminConfig, slug: &str, id: Option<&str>, locale: &str) -> String {
    let target = match id {
        Some(id) => format!("{}/{}", collection_api_url(config, slug), encode(id)),
        None => collection_api_url(config, slug),
    };
    format!(
        "{target}?locale={}&depth={}&fallback-locale={}",
        encode(locale),
        DEPTH,
        FALLBACK_LOCALE
    )
}
