use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

pub const DUPLICATE_MESSAGE: &str =
    "Account cannot be created as it violates a duplicate constraint";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Account,
}

#[derive(Serialize)]
struct ErrorBody {
    error_message: String,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<i64>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(ACCOUNTS_PATH, post(create_account))
        .route(
            &format!("{ACCOUNTS_PATH}/{{id}}"),
            get(fetch_account).delete(delete_account),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error_message: message.into(),
    };
    (status, Json(body)).into_response()
}

fn parse_id(raw: &str) -> Result<Uuid, Response> {
    raw.parse()
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "id is not a valid uuid"))
}

async fn create_account(
    State(db): State<Db>,
    payload: Result<Json<Envelope>, JsonRejection>,
) -> Response {
    let Json(Envelope { mut data }) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected account payload");
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let mut accounts = db.write().await;
    if accounts.contains_key(&data.id) {
        return failure(StatusCode::CONFLICT, DUPLICATE_MESSAGE);
    }
    data.version = 0;
    accounts.insert(data.id, data.clone());
    tracing::info!(id = %data.id, "account created");
    (StatusCode::CREATED, Json(Envelope { data })).into_response()
}

async fn fetch_account(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let accounts = db.read().await;
    match accounts.get(&id) {
        Some(account) => Json(Envelope {
            data: account.clone(),
        })
        .into_response(),
        None => failure(StatusCode::NOT_FOUND, format!("record {id} does not exist")),
    }
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let mut accounts = db.write().await;
    let Some(account) = accounts.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if params.version != Some(account.version) {
        return failure(StatusCode::CONFLICT, "invalid version");
    }
    accounts.remove(&id);
    tracing::info!(%id, "account deleted");
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_type_tag() {
        let account = Account {
            id: Uuid::nil(),
            organisation_id: Uuid::nil(),
            resource_type: "accounts".to_string(),
            version: 0,
            attributes: None,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["type"], "accounts");
        assert_eq!(json["version"], 0);
        assert!(json.get("attributes").is_none());
    }

    #[test]
    fn envelope_defaults_version() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"data":{"id":"00000000-0000-0000-0000-000000000001","organisation_id":"00000000-0000-0000-0000-000000000002","type":"accounts"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.data.version, 0);
    }

    #[test]
    fn envelope_rejects_missing_organisation() {
        let result: Result<Envelope, _> = serde_json::from_str(
            r#"{"data":{"id":"00000000-0000-0000-0000-000000000001","type":"accounts"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
        assert_eq!(
            parse_id("00000000-0000-0000-0000-000000000000").ok(),
            Some(Uuid::nil())
        );
    }
}
