//! Operations exposed to the HTTP layer. Every failure leaves here as an
//! [`ApiError`].

use crate::{
    error::ApiError,
    models::{
        product::{ProductItem, ProductParams},
        user::LoginResponse,
    },
    query::build_query,
    store::products::fetch_products,
    AppState,
};

pub const TOKEN_TYPE: &str = "Bearer";

fn require_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadInput(
            "username and password required".to_string(),
        ));
    }
    Ok(())
}

pub async fn register(state: &AppState, username: &str, password: &str) -> Result<i64, ApiError> {
    require_credentials(username, password)?;

    let id = state.users.create_user(username, password).await?;
    tracing::info!(user_id = id, "User registered");
    Ok(id)
}

pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    require_credentials(username, password)?;

    let user = state
        .users
        .verify_credentials(username, password)
        .await
        .inspect_err(|e| tracing::debug!("Login rejected: {}", e))?;

    let access_token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    })
}

pub async fn list_products(
    state: &AppState,
    params: &ProductParams,
) -> Result<Vec<ProductItem>, ApiError> {
    let spec = build_query(
        params.name.as_deref(),
        params.min_price.as_deref(),
        params.max_price.as_deref(),
        params.order_by.as_deref(),
        params.sort_in.as_deref(),
    )?;

    let products = fetch_products(&state.db, &spec).await?;
    Ok(products.into_iter().map(ProductItem::from).collect())
}

/// Resolves an `Authorization` header value to a user id.
pub fn authenticate(state: &AppState, header: Option<&str>) -> Result<i64, ApiError> {
    let token = header
        .and_then(|h| h.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(TOKEN_TYPE))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    Ok(state.tokens.validate(token)?)
}
