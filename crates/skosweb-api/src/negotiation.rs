//! Content negotiation between JSON and JSON-LD.

use std::fmt;
use std::str::FromStr;

use serde_json::Value as JsonValue;

use skosweb_core::defaults::JSONLD_CONTEXT_PATH;
use skosweb_core::{Error, Result};

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";

/// How a response body is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationStrategy {
    Json,
    JsonLd,
}

impl SerializationStrategy {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => APPLICATION_JSON,
            Self::JsonLd => APPLICATION_LD_JSON,
        }
    }
}

/// The kinds of resources served, as far as negotiation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ConceptScheme,
    ConceptSchemeList,
    Thing,
    ThingList,
    Context,
    /// Top concepts, display trees, expansions and URI lookups.
    JsonOnly,
}

impl ResourceKind {
    pub fn supports_jsonld(&self) -> bool {
        !matches!(self, Self::JsonOnly)
    }
}

#[derive(Debug)]
struct MediaRange<'a> {
    media_type: &'a str,
    quality: f32,
}

fn parse_accept(accept: &str) -> Vec<MediaRange<'_>> {
    accept
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let media_type = pieces.next()?.trim();
            if media_type.is_empty() {
                return None;
            }
            let quality = pieces
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange {
                media_type,
                quality,
            })
        })
        .collect()
}

/// Quality of `media_type` under the most specific matching range, and the
/// position of an exact match in the header.
fn quality_of(ranges: &[MediaRange<'_>], media_type: &str) -> (f32, Option<usize>) {
    let exact = ranges
        .iter()
        .position(|r| r.media_type.eq_ignore_ascii_case(media_type));
    if let Some(index) = exact {
        return (ranges[index].quality, Some(index));
    }
    let family = media_type.split('/').next().unwrap_or(media_type);
    let quality = ranges
        .iter()
        .find(|r| {
            r.media_type
                .strip_suffix("/*")
                .is_some_and(|f| f.eq_ignore_ascii_case(family))
        })
        .or_else(|| ranges.iter().find(|r| r.media_type == "*/*"))
        .map_or(0.0, |r| r.quality);
    (quality, None)
}

/// Pick the serialization for a resource given the request's `Accept`
/// header.
///
/// JSON-LD is chosen only when the resource has a JSON-LD form and the
/// client prefers `application/ld+json`; ties go to the type the client
/// listed first, and wildcards or a missing header mean JSON.
pub fn negotiate(kind: ResourceKind, accept: Option<&str>) -> SerializationStrategy {
    if !kind.supports_jsonld() {
        return SerializationStrategy::Json;
    }
    let Some(accept) = accept else {
        return SerializationStrategy::Json;
    };

    let ranges = parse_accept(accept);
    let (ld_quality, ld_index) = quality_of(&ranges, APPLICATION_LD_JSON);
    let (json_quality, json_index) = quality_of(&ranges, APPLICATION_JSON);

    let prefers_ld = if ld_quality > json_quality {
        true
    } else if ld_quality == json_quality && ld_quality > 0.0 {
        match (ld_index, json_index) {
            (Some(ld), Some(json)) => ld < json,
            (Some(_), None) => true,
            _ => false,
        }
    } else {
        false
    };

    if prefers_ld {
        SerializationStrategy::JsonLd
    } else {
        SerializationStrategy::Json
    }
}

/// How JSON-LD documents reference the SKOS context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMode {
    /// `@context` is the URL of the served context document.
    #[default]
    Url,
    /// `@context` embeds the context object.
    Inline,
}

impl ContextMode {
    /// The `@context` value for documents served under `public_url`.
    pub fn context_value(&self, public_url: &str) -> Result<JsonValue> {
        match self {
            Self::Url => Ok(JsonValue::String(format!(
                "{}{}",
                public_url.trim_end_matches('/'),
                JSONLD_CONTEXT_PATH
            ))),
            Self::Inline => skosweb_registry::inline_context(),
        }
    }
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::Inline => write!(f, "inline"),
        }
    }
}

impl FromStr for ContextMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "inline" => Ok(Self::Inline),
            other => Err(Error::Config(format!(
                "SKOS_JSONLD_CONTEXT must be 'url' or 'inline', got '{}'",
                other
            ))),
        }
    }
}
