use std::sync::Arc;

use crate::db::UserDbClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub users: UserDbClient,
}
