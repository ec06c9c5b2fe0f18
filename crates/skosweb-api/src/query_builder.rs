//! Translation of listing query parameters into a provider [`Query`].

use serde::Deserialize;

use skosweb_core::defaults::{MODE_DIJIT_FILTERING_SELECT, QUERY_MODE, WILDCARD};
use skosweb_core::{CollectionDepth, CollectionFilter, MatchFilter, ProviderFilter, Query, ThingType};

/// Query parameters accepted by the listing and search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub mode: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub thing_type: Option<String>,
    pub collection: Option<String>,
    #[serde(rename = "match")]
    pub match_uri: Option<String>,
    pub match_type: Option<String>,
    pub sort: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "providers.ids")]
    pub provider_ids: Option<String>,
    #[serde(rename = "providers.subject")]
    pub provider_subject: Option<String>,
}

impl ListingParams {
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(QUERY_MODE)
    }

    /// Provider selection for cross-scheme searches.
    pub fn provider_filter(&self) -> ProviderFilter {
        let ids = self.provider_ids.as_ref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        });
        ProviderFilter {
            ids,
            subject: self.provider_subject.clone(),
        }
    }
}

/// A provider query plus the flags steering the rest of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltQuery {
    pub query: Query,
    /// Wildcards were stripped from the label; results must be refined.
    pub postprocess: bool,
    /// Skip the provider entirely and answer with an empty list.
    pub no_result: bool,
}

/// Build the provider query for `params`.
pub fn build_query(params: &ListingParams) -> BuiltQuery {
    let filtering_select = params.mode() == MODE_DIJIT_FILTERING_SELECT;
    let label = params.label.as_deref();
    let mut built = BuiltQuery {
        no_result: filtering_select && label == Some(""),
        ..Default::default()
    };

    built.query.thing_type = params
        .thing_type
        .as_deref()
        .and_then(|t| t.parse::<ThingType>().ok());

    if let Some(label) = label.filter(|l| !l.is_empty() && *l != "*") {
        if filtering_select && label.contains(WILDCARD) {
            built.query.label = Some(label.replace(WILDCARD, ""));
            built.postprocess = true;
        } else {
            built.query.label = Some(label.to_string());
        }
    }

    built.query.collection = params.collection.as_ref().map(|id| CollectionFilter {
        id: id.clone(),
        depth: CollectionDepth::All,
    });

    built.query.matches = params.match_uri.as_ref().map(|uri| MatchFilter {
        uri: uri.clone(),
        match_type: params.match_type.clone(),
    });

    built
}
