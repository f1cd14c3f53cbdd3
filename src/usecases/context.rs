use crate::{
    domain::store::SeedSnapshot,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub seed: SeedSnapshot,
}

impl AppContext {
    pub fn new(config: AppConfig, layout: StorageLayout, seed: SeedSnapshot) -> Self {
        Self {
            config,
            layout,
            seed,
        }
    }
}
