//! Category listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, AuthenticatedUser, Error,
    category::{CategoryType, get_categories},
    db::lock_connection,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional filter for the category list.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only list categories of this type. Empty means no filter.
    #[serde(default, rename = "type")]
    pub category_type: Option<String>,
}

/// List the categories of the logged in user.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesState>,
    user: AuthenticatedUser,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, Error> {
    let category_type = match query.category_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<CategoryType>()?),
    };

    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories(user.user_id, category_type, &connection)?;

    Ok(Json(json!({ "categories": categories })))
}
