use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::media::MediaStore;
use crate::services::tasks::TaskRegistry;
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator.
    pub db: DatabaseConnection,
    /// Pub/sub transport for room connections.
    pub registry: Arc<WsRegistry>,
    /// Task provider registry, built once at process start.
    pub tasks: Arc<TaskRegistry>,
    /// Blob storage collaborator for paintings and avatars.
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, tasks: Arc<TaskRegistry>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            db,
            registry: Arc::new(WsRegistry::new()),
            tasks,
            media,
        }
    }
}
