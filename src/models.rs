use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::services::image_lookup::ImageLookup;
use crate::services::quiz_state::QuizState;

/// One selectable trivia subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureEntry {
    pub name: String,
    pub hint: String,
}

impl FigureEntry {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }
}

/// Returns the calendar day a request belongs to
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Application state shared across all handlers
pub struct AppState {
    pub quiz: Mutex<QuizState>,
    pub images: Arc<dyn ImageLookup>,
    pub fallback_image: String,
    pub clock: Clock,
}

impl AppState {
    pub fn lock_quiz(&self) -> Result<MutexGuard<'_, QuizState>, QuizError> {
        self.quiz
            .lock()
            .map_err(|e| {
                let detail = format!("quiz state lock poisoned: {}", e);
                error!("{}", detail);
                QuizError::Internal(detail)
            })
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub name: String,
    pub hint: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
