//! Category deletion endpoint.

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
    category::delete_category,
    database_id::{CategoryID, IdPath},
    db::lock_connection,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a category owned by the logged in user.
///
/// A category that still has transactions is not deleted and the client gets a 409 response.
pub async fn delete_category_endpoint(
    IdPath(category_id): IdPath<CategoryID>,
    State(state): State<DeleteCategoryState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(category_id, user.user_id, &connection) {
        Ok(()) => Ok(Json(json!({ "message": "Category deleted successfully" }))),
        Err(Error::CategoryInUse) => {
            tracing::debug!(
                "User {} tried to delete category {category_id} which has transactions.",
                user.user_id
            );
            Err(Error::CategoryInUse)
        }
        Err(error) => Err(error),
    }
}
