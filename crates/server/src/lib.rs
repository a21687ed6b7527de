use std::sync::Arc;

use db::DBService;
use services::services::{content::ContentService, locale_registry::LocaleRegistry};

pub mod config;
pub mod error;
pub mod routes;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    content: ContentService,
}

impl AppState {
    pub fn new(db: DBService, registry: Arc<LocaleRegistry>) -> Self {
        let content = ContentService::new(db.pool.clone(), registry);
        Self { db, content }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }

    pub fn registry(&self) -> &Arc<LocaleRegistry> {
        self.content.registry()
    }
}
