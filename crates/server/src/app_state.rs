use std::sync::Arc;

use crate::db::GroceryStore;
use crate::dinosaurs::DinosaurCatalog;

#[derive(Clone)]
pub struct AppState {
    pub store: GroceryStore,
    pub dinosaurs: Arc<DinosaurCatalog>,
}

impl AppState {
    pub fn new(store: GroceryStore, dinosaurs: DinosaurCatalog) -> Self {
        Self {
            store,
            dinosaurs: Arc::new(dinosaurs),
        }
    }
}
