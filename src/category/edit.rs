//! Category editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, AuthenticatedUser, Error,
    category::{CategoryForm, CategoryType, CategoryUpdate, get_category, update_category},
    database_id::{CategoryID, IdPath},
    db::lock_connection,
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Update the name and/or type of a category owned by the logged in user.
///
/// Empty fields in the request body are left unchanged.
pub async fn update_category_endpoint(
    IdPath(category_id): IdPath<CategoryID>,
    State(state): State<UpdateCategoryState>,
    user: AuthenticatedUser,
    Json(form): Json<CategoryForm>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;

    // Check ownership before validating so other users' IDs always look missing.
    get_category(category_id, user.user_id, &connection)?;

    let name = form.name.trim();
    let update = CategoryUpdate {
        name: (!name.is_empty()).then(|| name.to_owned()),
        category_type: match form.category_type.as_str() {
            "" => None,
            raw => Some(raw.parse::<CategoryType>()?),
        },
    };

    let category = update_category(category_id, user.user_id, update, &connection)?;

    Ok(Json(json!({
        "message": "Category updated successfully",
        "category": category,
    })))
}
