use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Envelope, DUPLICATE_MESSAGE};
use tower::ServiceExt;

const ACCOUNT_ID: &str = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn create_body() -> String {
    format!(
        r#"{{"data":{{"id":"{ACCOUNT_ID}","organisation_id":"eb0bd6f5-c3f5-44b2-b677-acd23cdde73c","type":"accounts","attributes":{{"country":"GB"}}}}}}"#
    )
}

// --- create ---

#[tokio::test]
async fn create_account_returns_201_with_version_zero() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/organisation/accounts", &create_body()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: Envelope = body_json(resp).await;
    assert_eq!(envelope.data.id.to_string(), ACCOUNT_ID);
    assert_eq!(envelope.data.version, 0);
    assert_eq!(envelope.data.attributes.unwrap()["country"], "GB");
}

#[tokio::test]
async fn create_account_malformed_payload_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/organisation/accounts",
            r#"{"data":{"id":"invalid account id"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error_message"].is_string());
}

// --- fetch ---

#[tokio::test]
async fn fetch_account_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "GET",
            &format!("/v1/organisation/accounts/{ACCOUNT_ID}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(
        body["error_message"],
        format!("record {ACCOUNT_ID} does not exist")
    );
}

#[tokio::test]
async fn fetch_account_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/v1/organisation/accounts/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error_message"], "id is not a valid uuid");
}

// --- delete ---

#[tokio::test]
async fn delete_account_not_found_has_empty_body() {
    let resp = app()
        .oneshot(empty_request(
            "DELETE",
            &format!("/v1/organisation/accounts/{ACCOUNT_ID}?version=0"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- full lifecycle ---

#[tokio::test]
async fn account_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();
    let account_uri = format!("/v1/organisation/accounts/{ACCOUNT_ID}");

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v1/organisation/accounts", &create_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // duplicate create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v1/organisation/accounts", &create_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error_message"], DUPLICATE_MESSAGE);

    // fetch
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &account_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Envelope = body_json(resp).await;
    assert_eq!(fetched.data.id.to_string(), ACCOUNT_ID);

    // delete with the wrong version
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("{account_uri}?version=7")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("{account_uri}?version=0")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // fetch after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &account_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
