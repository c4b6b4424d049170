use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{
    access,
    error::ApiError,
    models::{
        product::{ProductList, ProductParams},
        user::{LoginRequest, MeResponse, RegisterRequest, RegisterResponse},
    },
    AppState,
};

fn invalid_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected request body: {}", rejection);
    ApiError::BadInput("invalid request body".to_string())
}

fn invalid_query(rejection: QueryRejection) -> ApiError {
    tracing::debug!("Rejected query string: {}", rejection);
    ApiError::BadInput("invalid query string".to_string())
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(invalid_body)?;
    let id = access::register(&state, &req.user_name, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "user created".to_string(),
            id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(invalid_body)?;
    let resp = access::login(&state, &req.user_name, &req.password).await?;
    Ok(Json(resp))
}

pub async fn products(
    State(state): State<AppState>,
    query: Result<Query<ProductParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query.map_err(invalid_query)?;
    let items = access::list_products(&state, &params).await?;
    Ok(Json(ProductList { items }))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let id = access::authenticate(&state, header)?;
    Ok(Json(MeResponse { id }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/register-user", post(register))
        .route("/login-user", post(login))
        .route("/products", get(products))
        .route("/me", get(me))
        .with_state(state)
}
