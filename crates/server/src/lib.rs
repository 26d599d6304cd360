pub mod app_state;
pub mod config;
pub mod db;
pub mod dinosaurs;
pub mod errors;
pub mod grocery_query;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod rows;

pub use app_state::AppState;
pub use db::GroceryStore;
pub use dinosaurs::DinosaurCatalog;
pub use handlers::router;
