//! Income and expense categories that group a user's transactions.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    DEFAULT_CATEGORIES, create_category, create_category_table, create_default_categories,
    delete_category, get_categories, get_category, map_category_row, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryForm, CategoryType, CategoryUpdate};
pub use edit::update_category_endpoint;
pub use list::list_categories_endpoint;
