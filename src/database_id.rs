//! Database ID type definitions.

use axum::extract::{FromRequestParts, Path};

use crate::Error;

/// Alias for the integer type used for mapping to category IDs.
pub type CategoryID = i64;
/// Alias for the integer type used for mapping to transaction IDs.
pub type TransactionID = i64;

/// Extracts a database ID from the request path.
///
/// Unlike [Path], a rejected ID is reported as [Error::InvalidID] with a JSON body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(Error))]
pub struct IdPath<T>(pub T);
