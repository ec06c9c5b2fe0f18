//! End-to-end tests driving the router in-process against the TREES
//! vocabulary.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use skosweb_api::{build_app, ApiConfig, AppState, RegistryProvider, RegistryScope};
use skosweb_registry::test_fixtures::{trees_registry, TREES_URI};

fn app_with(config: ApiConfig) -> Router {
    let provider: Arc<dyn RegistryProvider> = config
        .registry_scope
        .provider(Arc::new(|| Ok(trees_registry())))
        .unwrap();
    let state = AppState::new(&config, provider).unwrap();
    build_app(state, &config)
}

fn app() -> Router {
    app_with(ApiConfig {
        public_url: "http://localhost:6543".to_string(),
        ..Default::default()
    })
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn get(uri: &str) -> Response {
    send(app(), Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn get_with(uri: &str, name: header::HeaderName, value: &str) -> Response {
    send(
        app(),
        Request::get(uri).header(name, value).body(Body::empty()).unwrap(),
    )
    .await
}

async fn json_body(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn list(uri: &str) -> Vec<JsonValue> {
    let response = get(uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    json_body(response).await.as_array().unwrap().clone()
}

fn header_value<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

fn ids(items: &[JsonValue]) -> Vec<i64> {
    items.iter().map(|i| i["id"].as_i64().unwrap()).collect()
}

// =============================================================================
// CONCEPT SCHEMES
// =============================================================================

#[tokio::test]
async fn test_list_conceptschemes() {
    let schemes = list("/conceptschemes").await;
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0]["id"], "TREES");
    assert_eq!(schemes[0]["uri"], TREES_URI);
    // The provider's own default language, not the server's.
    assert_eq!(schemes[0]["label"], "Verschillende soorten bomen");
    assert_eq!(schemes[0]["subject"], serde_json::json!([]));

    let schemes = list("/conceptschemes?language=en").await;
    assert_eq!(schemes[0]["label"], "Different types of trees");
}

#[tokio::test]
async fn test_list_conceptschemes_jsonld() {
    let response = get_with("/conceptschemes", header::ACCEPT, "application/ld+json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CONTENT_TYPE),
        "application/ld+json"
    );
    let body = json_body(response).await;
    assert_eq!(body[0]["@context"], "http://localhost:6543/jsonld/context/skos");
    assert_eq!(body[0]["type"], "skos:ConceptScheme");
}

#[tokio::test]
async fn test_get_conceptscheme() {
    let response = get("/conceptschemes/TREES").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "application/json");

    let scheme = json_body(response).await;
    for key in ["id", "uri", "label", "subject", "labels", "notes", "sources"] {
        assert!(scheme.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(scheme["id"], "TREES");
    assert_eq!(scheme["uri"], TREES_URI);
    assert_eq!(scheme["label"], "Verschillende soorten bomen");
    assert_eq!(scheme["labels"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_conceptscheme_by_uri() {
    let response = get("/conceptschemes/http%3A%2F%2Fpython.com%2Ftrees").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], "TREES");
}

#[tokio::test]
async fn test_get_conceptscheme_jsonld() {
    for response in [
        get("/conceptschemes/TREES.jsonld").await,
        get_with("/conceptschemes/TREES", header::ACCEPT, "application/ld+json").await,
    ] {
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_value(&response, header::CONTENT_TYPE),
            "application/ld+json"
        );
        let body = json_body(response).await;
        assert_eq!(body["@context"], "http://localhost:6543/jsonld/context/skos");
        assert_eq!(body["uri"], TREES_URI);
        assert_eq!(body["type"], "skos:ConceptScheme");
    }
}

#[tokio::test]
async fn test_unknown_conceptscheme_is_404() {
    for uri in [
        "/conceptschemes/BIRDS",
        "/conceptschemes/BIRDS/c",
        "/conceptschemes/BIRDS/topconcepts",
        "/conceptschemes/BIRDS/displaytop",
        "/conceptschemes/BIRDS/c/1",
        "/conceptschemes/BIRDS/c/1/expand",
    ] {
        let response = get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
        assert!(json_body(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn test_top_concepts() {
    let top = list("/conceptschemes/TREES/topconcepts").await;
    assert_eq!(top.len(), 2);
    for concept in &top {
        for key in ["id", "uri", "label"] {
            assert!(concept.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(concept["type"], "concept");
    }
}

#[tokio::test]
async fn test_display_top_and_children() {
    let top = list("/conceptschemes/TREES/displaytop").await;
    assert!(top.iter().any(|t| t["type"] == "collection"));

    let children = list("/conceptschemes/TREES/c/3/displaychildren").await;
    assert_eq!(ids(&children), vec![1, 2]);

    let children = list("/conceptschemes/TREES/c/1/displaychildren").await;
    assert!(children.is_empty());

    let response = get("/conceptschemes/TREES/c/999999/displaychildren").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expand() {
    let expanded = list("/conceptschemes/TREES/c/1/expand").await;
    assert_eq!(expanded, vec![serde_json::json!(1)]);

    let expanded = list("/conceptschemes/TREES/c/3/expand").await;
    assert_eq!(expanded.len(), 2);
    assert!(expanded.contains(&serde_json::json!(1)));
    assert!(expanded.contains(&serde_json::json!(2)));

    let response = get("/conceptschemes/TREES/c/999999/expand").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// LISTING
// =============================================================================

#[tokio::test]
async fn test_listing_without_params() {
    let response = get("/conceptschemes/TREES/c").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-2/3");
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_range() {
    let response = get_with("/conceptschemes/TREES/c", header::RANGE, "items=2-2").await;
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 2-2/3");
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

    let response = get_with("/conceptschemes/TREES/c", header::RANGE, "items=a-2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-2/3");
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_filters() {
    assert_eq!(list("/conceptschemes/TREES/c?type=concept").await.len(), 2);
    assert_eq!(list("/conceptschemes/TREES/c?type=collection").await.len(), 1);
    assert_eq!(list("/conceptschemes/TREES/c?type=conceptscheme").await.len(), 3);
    assert_eq!(
        ids(&list("/conceptschemes/TREES/c?collection=3").await),
        vec![1, 2]
    );
    assert_eq!(list("/conceptschemes/TREES/c?label=Larc").await.len(), 1);
    assert_eq!(
        ids(&list(
            "/conceptschemes/TREES/c?match=http://id.python.org/different/types/of/trees/nr/1/the/larch"
        )
        .await),
        vec![1]
    );
}

#[tokio::test]
async fn test_listing_unknown_collection_is_400() {
    let response = get("/conceptschemes/TREES/c?collection=999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_filtering_select_mode() {
    let base = "/conceptschemes/TREES/c?mode=dijitFilteringSelect";
    assert_eq!(list(&format!("{}&label=*", base)).await.len(), 3);
    assert_eq!(list(&format!("{}&type=concept&label=*", base)).await.len(), 2);
    assert_eq!(list(&format!("{}&label=", base)).await.len(), 0);
    assert_eq!(list(&format!("{}&type=concept&label=", base)).await.len(), 0);
    assert_eq!(list(&format!("{}&label=De%20*", base)).await.len(), 2);
    assert_eq!(
        list(&format!("{}&label=De%20*&language=nl-BE", base)).await.len(),
        2
    );
    assert_eq!(ids(&list(&format!("{}&label=*iks", base)).await), vec![1]);
    assert_eq!(ids(&list(&format!("{}&label=*Larik*", base)).await), vec![1]);
}

#[tokio::test]
async fn test_empty_filtering_select_listing_has_empty_range() {
    let response = get("/conceptschemes/TREES/c?mode=dijitFilteringSelect&label=").await;
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-0/0");
}

#[tokio::test]
async fn test_listing_sort() {
    assert_eq!(ids(&list("/conceptschemes/TREES/c?sort=-id").await)[0], 3);
    assert_eq!(ids(&list("/conceptschemes/TREES/c?sort=id").await)[0], 1);
    assert_eq!(ids(&list("/conceptschemes/TREES/c?sort=%2Bid").await)[0], 1);

    let labels: Vec<JsonValue> = list("/conceptschemes/TREES/c?sort=label")
        .await
        .into_iter()
        .map(|i| i["label"].clone())
        .collect();
    assert_eq!(
        labels,
        vec!["Bomen per soort", "De Lariks", "De Paardekastanje"]
    );

    // An unescaped plus decodes to a space.
    let plus: Vec<JsonValue> = list("/conceptschemes/TREES/c?sort=+label")
        .await
        .into_iter()
        .map(|i| i["label"].clone())
        .collect();
    assert_eq!(plus, labels);

    let descending = list("/conceptschemes/TREES/c?sort=-label").await;
    assert_eq!(descending[0]["label"], "De Paardekastanje");

    assert_eq!(
        ids(&list("/conceptschemes/TREES/c?sort=-foo").await),
        ids(&list("/conceptschemes/TREES/c").await)
    );
}

#[tokio::test]
async fn test_listing_language() {
    let items = list("/conceptschemes/TREES/c?type=concept&language=en&sort=id").await;
    assert_eq!(items[0]["label"], "The Larch");
    assert_eq!(items[1]["label"], "The Chestnut");
}

#[tokio::test]
async fn test_listing_jsonld_context_on_first_item_only() {
    let response = get_with("/conceptschemes/TREES/c", header::ACCEPT, "application/ld+json").await;
    assert_eq!(
        header_value(&response, header::CONTENT_TYPE),
        "application/ld+json"
    );
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-2/3");
    let items = json_body(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items[0].get("@context").is_some());
    assert!(items[1].get("@context").is_none());
    assert!(items[2].get("@context").is_none());
}

// =============================================================================
// CONCEPTS AND COLLECTIONS
// =============================================================================

#[tokio::test]
async fn test_get_concept() {
    let response = get("/conceptschemes/TREES/c/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let concept = json_body(response).await;

    assert_eq!(concept["id"], 1);
    assert_eq!(concept["type"], "concept");
    assert_eq!(concept["label"], "De Lariks");
    assert_eq!(concept["concept_scheme"]["uri"], TREES_URI);
    for key in ["narrower", "broader", "related", "member_of", "subordinate_arrays", "matches"] {
        assert!(concept.get(key).is_some(), "missing {}", key);
    }
    assert!(concept.get("members").is_none());
}

#[tokio::test]
async fn test_get_collection() {
    let collection = json_body(get("/conceptschemes/TREES/c/3").await).await;

    assert_eq!(collection["type"], "collection");
    assert_eq!(collection["label"], "Bomen per soort");
    assert_eq!(ids(collection["members"].as_array().unwrap()), vec![1, 2]);
    for key in ["narrower", "broader", "related"] {
        assert!(collection.get(key).is_none(), "unexpected {}", key);
    }
}

#[tokio::test]
async fn test_get_concept_jsonld() {
    for response in [
        get("/conceptschemes/TREES/c/1.jsonld").await,
        get_with("/conceptschemes/TREES/c/1", header::ACCEPT, "application/ld+json").await,
    ] {
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_value(&response, header::CONTENT_TYPE),
            "application/ld+json"
        );
        let body = json_body(response).await;
        assert_eq!(body["@context"], "http://localhost:6543/jsonld/context/skos");
        assert_eq!(body["uri"], "http://python.com/trees/larch");
        assert_eq!(body["type"], "skos:Concept");
    }
}

#[tokio::test]
async fn test_inline_jsonld_context() {
    let app = app_with(ApiConfig {
        context_mode: "inline".parse().unwrap(),
        ..Default::default()
    });
    let response = send(
        app,
        Request::get("/conceptschemes/TREES/c/3.jsonld")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let body = json_body(response).await;
    assert!(body["@context"].is_object());
    assert_eq!(body["type"], "skos:Collection");
}

#[tokio::test]
async fn test_unknown_concept_is_404() {
    let response = get("/conceptschemes/TREES/c/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_numeric_ids_match_only_their_textual_form() {
    for uri in [
        "/conceptschemes/TREES/c/01",
        "/conceptschemes/TREES/c/+1",
        "/conceptschemes/TREES/c/001/expand",
        "/conceptschemes/TREES/c/03/displaychildren",
    ] {
        assert_eq!(get(uri).await.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }
    assert_eq!(
        get("/conceptschemes/TREES/c/1").await.status(),
        StatusCode::OK
    );
}

// =============================================================================
// CROSS-SCHEME SEARCH
// =============================================================================

#[tokio::test]
async fn test_search_all_providers() {
    let response = get("/c").await;
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-2/3");
    let items = json_body(response).await;
    for item in items.as_array().unwrap() {
        assert_eq!(item["concept_scheme"]["id"], "TREES");
        assert_eq!(item["concept_scheme"]["uri"], TREES_URI);
    }

    assert_eq!(list("/c?type=concept").await.len(), 2);
    assert_eq!(list("/c?providers.ids=TREES&label=Larc").await.len(), 1);
    assert_eq!(list("/c?providers.ids=BIRDS").await.len(), 0);
    assert_eq!(list("/c?providers.subject=biology").await.len(), 0);
    assert_eq!(
        list("/c?mode=dijitFilteringSelect&label=De%20*").await.len(),
        2
    );
}

// =============================================================================
// URIS
// =============================================================================

#[tokio::test]
async fn test_uris_requires_uri() {
    let response = get("/uris").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_uris_resolves_scheme_and_concept() {
    let scheme = json_body(get("/uris?uri=http://python.com/trees").await).await;
    assert_eq!(
        scheme,
        serde_json::json!({"id": "TREES", "uri": TREES_URI, "type": "concept_scheme"})
    );

    let larch = json_body(get("/uris?uri=http://python.com/trees/larch").await).await;
    assert_eq!(larch["id"], 1);
    assert_eq!(larch["type"], "concept");
    assert_eq!(
        larch["concept_scheme"],
        serde_json::json!({"id": "TREES", "uri": TREES_URI})
    );

    let response = get("/uris?uri=http://python.com/trees/oak").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deprecated_uris_path() {
    let from_path = json_body(get("/uris/http://python.com/trees").await).await;
    let from_query = json_body(get("/uris?uri=http://python.com/trees").await).await;
    assert_eq!(from_path, from_query);
}

// =============================================================================
// JSON-LD CONTEXT AND MIDDLEWARE
// =============================================================================

#[tokio::test]
async fn test_jsonld_context_document() {
    let as_json = get_with("/jsonld/context/skos", header::ACCEPT, "application/json").await;
    assert_eq!(as_json.status(), StatusCode::OK);
    assert_eq!(header_value(&as_json, header::CONTENT_TYPE), "application/json");
    assert_eq!(
        header_value(&as_json, header::CACHE_CONTROL),
        "public, max-age=86400"
    );

    let as_ld = get_with("/jsonld/context/skos", header::ACCEPT, "application/ld+json").await;
    assert_eq!(header_value(&as_ld, header::CONTENT_TYPE), "application/ld+json");

    let json = json_body(as_json).await;
    assert_eq!(json, json_body(as_ld).await);
    assert!(json["@context"].is_object());
}

#[tokio::test]
async fn test_request_id_is_set() {
    let response = get("/conceptschemes").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cors_exposes_content_range() {
    let response = get_with("/conceptschemes/TREES/c", header::ORIGIN, "http://localhost:3000").await;
    assert_eq!(
        header_value(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://localhost:3000"
    );
    assert!(header_value(&response, header::ACCESS_CONTROL_EXPOSE_HEADERS)
        .to_lowercase()
        .contains("content-range"));
}

#[tokio::test]
async fn test_request_scoped_registry() {
    let app = app_with(ApiConfig {
        registry_scope: RegistryScope::Request,
        ..Default::default()
    });
    let response = send(
        app,
        Request::get("/conceptschemes/TREES/c").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_RANGE), "items 0-2/3");
}
