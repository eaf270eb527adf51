use std::sync::Arc;

use sources::ResultsSession;
use storage::models::InactiveDivisions;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ResultsSession>,
    pub inactive: Arc<InactiveDivisions>,
}

impl AppState {
    pub fn new(session: ResultsSession, inactive: InactiveDivisions) -> Self {
        Self {
            session: Arc::new(session),
            inactive: Arc::new(inactive),
        }
    }
}
