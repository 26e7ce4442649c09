use crate::db::RegistrarDb;

/// State shared by every request handler.
pub struct AppState {
    /// The scheduling store. Handlers read through it on every request.
    pub db: RegistrarDb,
}

impl AppState {
    pub fn new(db: RegistrarDb) -> Self {
        Self { db }
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        tracing::info!("Database connection closed");
    }
}
