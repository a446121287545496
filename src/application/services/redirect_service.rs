//! Redirect resolution with click recording.

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::click_recorder::ClickRecorder;
use crate::domain::entities::Click;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// What a redirect request resolved to.
#[derive(Debug, Clone)]
pub enum RedirectOutcome {
    /// The code exists and the click was committed.
    Found { target_url: String, click: Click },
    /// No link has this code. Nothing was written.
    NotFound,
}

impl RedirectOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RedirectOutcome::Found { .. })
    }

    pub fn target_url(&self) -> Option<&str> {
        match self {
            RedirectOutcome::Found { target_url, .. } => Some(target_url),
            RedirectOutcome::NotFound => None,
        }
    }
}

/// Resolves short codes and records the click before handing back the target.
pub struct RedirectService {
    link_repository: Arc<dyn LinkRepository>,
    recorder: Arc<ClickRecorder>,
}

impl RedirectService {
    pub fn new(link_repository: Arc<dyn LinkRepository>, recorder: Arc<ClickRecorder>) -> Self {
        Self {
            link_repository,
            recorder,
        }
    }

    /// Looks up `code` and, if it exists, records a click stamped with the
    /// current UTC time.
    ///
    /// The target is only returned once the click, its validation outcome and
    /// the monthly aggregate are committed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the lookup or the recording fails.
    /// An unknown code is not an error: it yields [`RedirectOutcome::NotFound`].
    pub async fn handle_redirect(&self, code: &str) -> Result<RedirectOutcome, AppError> {
        let Some(link) = self.link_repository.find_by_code(code).await? else {
            tracing::debug!(code, "Short code not found");
            return Ok(RedirectOutcome::NotFound);
        };

        let recorded = self.recorder.record_click(link.id, Utc::now()).await?;

        Ok(RedirectOutcome::Found {
            target_url: link.original_url,
            click: recorded.click,
        })
    }
}
