//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    ClickRecorder, LinkService, MonthlyLedger, RedirectService, StatsService,
};
use crate::domain::validation::ClickValidator;
use crate::infrastructure::persistence::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    /// Prefix for `short_url` in responses.
    pub base_url: String,
}

impl AppState {
    /// Wires every service over one set of repositories.
    pub fn new(
        repositories: Repositories,
        validator: Arc<dyn ClickValidator>,
        base_url: impl Into<String>,
        code_length: usize,
    ) -> Self {
        let recorder = Arc::new(ClickRecorder::new(
            repositories.clicks,
            validator,
            MonthlyLedger::default(),
        ));

        Self {
            link_service: Arc::new(LinkService::with_code_length(
                repositories.links.clone(),
                code_length,
            )),
            redirect_service: Arc::new(RedirectService::new(
                repositories.links.clone(),
                recorder,
            )),
            stats_service: Arc::new(StatsService::new(repositories.links, repositories.stats)),
            base_url: base_url.into(),
        }
    }
}
