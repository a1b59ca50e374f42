use crate::config::Config;

/// Shared application state injected into the router.
/// Layout runs hold no shared state; each request builds its own.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
