//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, AuthenticatedUser, Error,
    category::{CategoryForm, CategoryType, create_category},
    db::lock_connection,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a category owned by the logged in user.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    user: AuthenticatedUser,
    Json(form): Json<CategoryForm>,
) -> Result<impl IntoResponse, Error> {
    let name = form.name.trim();

    if name.is_empty() || form.category_type.is_empty() {
        return Err(Error::MissingFields("Name and type are required"));
    }

    let category_type: CategoryType = form.category_type.parse()?;

    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(user.user_id, name, category_type, &connection)?;

    tracing::debug!("User {} created category {}.", user.user_id, category.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "category": category,
        })),
    ))
}
