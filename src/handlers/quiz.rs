use actix_web::{get, web, HttpResponse};
use log::{debug, info};

use crate::error::QuizError;
use crate::models::{AppState, QuizResponse};
use crate::services::figure_pool::DEFAULT_HINT;
use crate::services::image_lookup::ImageOutcome;

const UNKNOWN_NAME: &str = "Unknown";

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[get("/api/quiz")]
pub async fn get_quiz(data: web::Data<AppState>) -> Result<HttpResponse, QuizError> {
    let today = data.today();

    // The lock is released before the image lookup is awaited
    let draw = {
        let mut quiz = data.lock_quiz()?;
        quiz.draw(today, &mut rand::thread_rng())?
    };

    let mut payload = QuizResponse {
        name: or_default(&draw.figure.name, UNKNOWN_NAME),
        hint: or_default(&draw.figure.hint, DEFAULT_HINT),
        image_url: data.fallback_image.clone(),
        remaining: None,
    };

    if let ImageOutcome::Found(url) = data.images.lookup(&draw.figure.name).await {
        payload.image_url = url;
    }

    let (served, remaining) = {
        let mut quiz = data.lock_quiz()?;
        let remaining = quiz.consume(draw.day);
        debug!(
            "Drew index {}, {} of {} figures used on {}",
            draw.index,
            quiz.used_indices().len(),
            quiz.daily_set().len(),
            quiz.day()
        );
        (quiz.call_count(), remaining)
    };
    payload.remaining = Some(remaining);

    info!("Served figure {} (request {} today, {} left)", payload.name, served, remaining);
    Ok(HttpResponse::Ok().json(payload))
}
