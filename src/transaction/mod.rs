//! Transactions record money earned or spent against one of the user's categories.

mod create_endpoint;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
mod query;

pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use domain::{
    DATE_FORMAT, NewTransaction, Transaction, TransactionUpdate, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, parse_date, update_transaction,
};
pub use edit_endpoint::update_transaction_endpoint;
pub use form::TransactionForm;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionFilter, count_transactions, get_transactions};
