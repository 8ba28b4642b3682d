//! Defines the endpoint for listing transactions a page at a time.
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
    database_id::CategoryID,
    db::lock_connection,
    pagination::PaginationConfig,
    transaction::{
        domain::parse_date,
        query::{TransactionFilter, count_transactions, get_transactions},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for filtering and paging the transaction list.
///
/// Parameters are kept as strings so that empty values can be ignored and
/// bad page numbers can fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Only list transactions in this category.
    pub category_id: Option<String>,
    /// Only list transactions on or after this date.
    pub start_date: Option<String>,
    /// Only list transactions on or before this date.
    pub end_date: Option<String>,
    /// The one-based page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub limit: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl TransactionQuery {
    fn filter(&self) -> Result<TransactionFilter, Error> {
        Ok(TransactionFilter {
            category_id: non_empty(&self.category_id)
                .map(|raw| raw.parse::<CategoryID>().map_err(|_| Error::InvalidCategoryID))
                .transpose()?,
            start_date: non_empty(&self.start_date).map(parse_date).transpose()?,
            end_date: non_empty(&self.end_date).map(parse_date).transpose()?,
        })
    }
}

/// List the transactions of the logged in user, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    user: AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, Error> {
    let filter = query.filter()?;
    let page = state
        .pagination_config
        .resolve(query.page.as_deref(), query.limit.as_deref());

    let connection = lock_connection(&state.db_connection)?;
    let total = count_transactions(user.user_id, &filter, &connection)?;
    let transactions = get_transactions(user.user_id, &filter, page, &connection)?;

    Ok(Json(json!({
        "data": transactions,
        "meta": page.meta(total),
    })))
}
