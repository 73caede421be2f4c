//! Schema-level tests executing GraphQL documents against the composed schema.

use std::sync::Arc;
use std::time::Duration;

use async_graphql::{Request, Response, Value, Variables};
use axum::http::HeaderMap;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use futures_util::StreamExt;

use starwars_domain::Episode;
use starwars_persistence::InMemoryCharacterRepository;
use starwars_graphql_api::auth::{RequestInterceptor, TestIdentity};
use starwars_graphql_api::events::{EventTopic, InMemoryEventRegistry};
use starwars_graphql_api::{
    build_schema, default_policies, ApiContext, ApiContextBuilder, ApiSchema, SchemaOptions,
};

fn schema() -> ApiSchema {
    let ctx = ApiContext::in_memory(16).expect("in-memory context");
    build_schema(ctx, default_policies(), SchemaOptions::default())
}

fn with_test_identity(query: &str) -> Request {
    Request::new(query).data(TestIdentity::new().principal(&HeaderMap::new()))
}

fn json(response: &Response) -> serde_json::Value {
    response.data.clone().into_json().expect("data as json")
}

fn first_error_code(response: &Response) -> Option<Value> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code").cloned())
}

// =============================================================================
// QUERIES
// =============================================================================

#[tokio::test]
async fn test_hero_defaults_to_r2d2() {
    let response = schema().execute("{ hero { id name } }").await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        json(&response),
        serde_json::json!({ "hero": { "id": "2001", "name": "R2-D2" } })
    );
}

#[tokio::test]
async fn test_hero_of_empire_is_luke() {
    let response = schema()
        .execute(r#"{ hero(episode: EMPIRE) { name ... on Human { height(unit: FOOT) } } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = json(&response);
    assert_eq!(data["hero"]["name"], "Luke Skywalker");
    let feet = data["hero"]["height"].as_f64().expect("height");
    assert!((feet - 1.72 * 3.28084).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_hero_is_not_found() {
    let characters = InMemoryCharacterRepository::from_json("{}").expect("empty seed");
    let ctx = ApiContextBuilder::new()
        .with_characters(Arc::new(characters))
        .build()
        .expect("context");
    let schema = build_schema(ctx, default_policies(), SchemaOptions::default());

    let response = schema.execute("{ hero { id } }").await;
    assert_eq!(first_error_code(&response), Some(Value::from("NOT_FOUND")));
    assert_eq!(
        response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("status").cloned()),
        Some(Value::from(404_u16))
    );
}

#[tokio::test]
async fn test_character_skips_unknown_ids() {
    let response = schema()
        .execute(r#"{ character(ids: ["2000", "9999", "1003"]) { id } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        json(&response),
        serde_json::json!({ "character": [{ "id": "2000" }, { "id": "1003" }] })
    );
}

#[tokio::test]
async fn test_search_spans_union_members() {
    let response = schema()
        .execute(
            r#"{
                search(text: "a") {
                    __typename
                    ... on Human { name }
                    ... on Droid { name }
                    ... on Starship { name }
                }
            }"#,
        )
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = json(&response);
    let typenames: Vec<&str> = data["search"]
        .as_array()
        .expect("search results")
        .iter()
        .filter_map(|hit| hit["__typename"].as_str())
        .collect();
    assert!(typenames.contains(&"Human"));
    assert!(typenames.contains(&"Starship"));
}

#[tokio::test]
async fn test_friends_connection_pages_forward() {
    let schema = schema();
    let first = schema
        .execute(
            r#"{ human(id: "1000") { friendsConnection(first: 2) {
                totalCount
                edges { cursor node { id } }
                pageInfo { hasNextPage endCursor }
            } } }"#,
        )
        .await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);

    let data = json(&first);
    let conn = &data["human"]["friendsConnection"];
    assert_eq!(conn["totalCount"], 4);
    assert_eq!(conn["edges"][0]["node"]["id"], "1002");
    assert_eq!(conn["edges"][1]["node"]["id"], "1003");
    assert_eq!(conn["pageInfo"]["hasNextPage"], true);

    let end = conn["pageInfo"]["endCursor"].as_str().expect("end cursor");
    let second = schema
        .execute(format!(
            r#"{{ human(id: "1000") {{ friendsConnection(first: 2, after: "{end}") {{
                edges {{ node {{ id }} }}
                pageInfo {{ hasNextPage hasPreviousPage }}
            }} }} }}"#
        ))
        .await;
    assert!(second.errors.is_empty(), "{:?}", second.errors);

    let data = json(&second);
    let conn = &data["human"]["friendsConnection"];
    assert_eq!(conn["edges"][0]["node"]["id"], "2000");
    assert_eq!(conn["edges"][1]["node"]["id"], "2001");
    assert_eq!(conn["pageInfo"]["hasNextPage"], false);
    assert_eq!(conn["pageInfo"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn test_page_size_above_maximum_is_rejected() {
    let response = schema()
        .execute(r#"{ human(id: "1000") { friendsConnection(first: 51) { totalCount } } }"#)
        .await;
    assert_eq!(first_error_code(&response), Some(Value::from("INVALID_INPUT")));
}

#[tokio::test]
async fn test_negative_pagination_amount_fails_parsing() {
    let response = schema()
        .execute(r#"{ human(id: "1000") { friendsConnection(first: -1) { totalCount } } }"#)
        .await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn test_service_segment_is_merged() {
    let response = schema().execute("{ health version reviewCount }").await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = json(&response);
    assert_eq!(data["health"], "OK");
    assert_eq!(data["version"], starwars_graphql_api::VERSION);
    assert_eq!(data["reviewCount"], 0);
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[tokio::test]
async fn test_home_planet_requires_country_claim() {
    let query = r#"{ human(id: "1000") { name homePlanet } }"#;

    let anonymous = schema().execute(query).await;
    assert_eq!(
        first_error_code(&anonymous),
        Some(Value::from("AUTH_NOT_AUTHENTICATED"))
    );

    let authorized = schema().execute(with_test_identity(query)).await;
    assert!(authorized.errors.is_empty(), "{:?}", authorized.errors);
    assert_eq!(json(&authorized)["human"]["homePlanet"], "Tatooine");
}

#[tokio::test]
async fn test_unguarded_fields_stay_public() {
    let response = schema()
        .execute(r#"{ human(id: "1000") { name appearsIn } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
}

#[tokio::test]
async fn test_create_review_requires_policy() {
    let mutation = r#"mutation {
        createReview(episode: JEDI, review: { stars: 5, commentary: "Great" }) { stars }
    }"#;

    let anonymous = schema().execute(mutation).await;
    assert_eq!(
        first_error_code(&anonymous),
        Some(Value::from("AUTH_NOT_AUTHENTICATED"))
    );

    let schema = schema();
    let created = schema.execute(with_test_identity(mutation)).await;
    assert!(created.errors.is_empty(), "{:?}", created.errors);
    assert_eq!(json(&created)["createReview"]["stars"], 5);

    let reviews = schema.execute("{ reviews(episode: JEDI) { stars commentary } }").await;
    assert_eq!(
        json(&reviews),
        serde_json::json!({ "reviews": [{ "stars": 5, "commentary": "Great" }] })
    );
}

#[tokio::test]
async fn test_create_review_validates_stars() {
    let response = schema()
        .execute(with_test_identity(
            r#"mutation { createReview(episode: JEDI, review: { stars: 6 }) { stars } }"#,
        ))
        .await;
    assert!(!response.errors.is_empty());
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

#[tokio::test]
async fn test_on_review_delivers_new_reviews() {
    let registry = Arc::new(InMemoryEventRegistry::new(16));
    let ctx = ApiContextBuilder::new()
        .with_events(registry.clone())
        .build()
        .expect("context");
    let schema = build_schema(ctx, default_policies(), SchemaOptions::default());

    let mut stream = schema.execute_stream("subscription { onReview(episode: EMPIRE) { stars commentary } }");
    let next = tokio::spawn(async move { stream.next().await });

    let topic = EventTopic::OnReview(Episode::Empire);
    for _ in 0..100 {
        if registry.subscriber_count(topic).await > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(registry.subscriber_count(topic).await, 1);

    let commentary: String = Sentence(3..8).fake();
    let created = schema
        .execute(
            with_test_identity(
                "mutation($review: ReviewInput!) { createReview(episode: EMPIRE, review: $review) { stars } }",
            )
            .variables(Variables::from_json(serde_json::json!({
                "review": { "stars": 4, "commentary": commentary }
            }))),
        )
        .await;
    assert!(created.errors.is_empty(), "{:?}", created.errors);

    let event = tokio::time::timeout(Duration::from_secs(2), next)
        .await
        .expect("event before timeout")
        .expect("task joined")
        .expect("stream item");
    assert!(event.errors.is_empty(), "{:?}", event.errors);
    assert_eq!(
        json(&event),
        serde_json::json!({ "onReview": { "stars": 4, "commentary": commentary } })
    );
}

#[tokio::test]
async fn test_review_for_other_episode_is_not_delivered() {
    let registry = Arc::new(InMemoryEventRegistry::new(16));
    let ctx = ApiContextBuilder::new()
        .with_events(registry.clone())
        .build()
        .expect("context");
    let schema = build_schema(ctx, default_policies(), SchemaOptions::default());

    let created = schema
        .execute(with_test_identity(
            r#"mutation { createReview(episode: JEDI, review: { stars: 3 }) { stars } }"#,
        ))
        .await;
    assert!(created.errors.is_empty(), "{:?}", created.errors);
    assert_eq!(
        registry
            .subscriber_count(EventTopic::OnReview(Episode::Empire))
            .await,
        0
    );
}
