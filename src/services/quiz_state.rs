use std::collections::HashSet;

use chrono::NaiveDate;
use log::{error, info, warn};
use rand::Rng;

use crate::error::QuizError;
use crate::models::FigureEntry;
use crate::services::daily_set::{has_day_changed, select_daily_set};
use crate::services::rate_limiter::DailyQuota;
use crate::services::tracker::DrawTracker;

/// A figure handed out by [`QuizState::draw`], tagged with the day it was
/// drawn on so the quota is charged to the right day.
#[derive(Debug, Clone)]
pub struct Draw {
    pub figure: FigureEntry,
    pub index: usize,
    pub day: NaiveDate,
}

/// Day-scoped quiz state: the daily set, what was served from it, and how
/// many requests were served. Everything resets lazily on the first
/// request of a new calendar day.
#[derive(Debug)]
pub struct QuizState {
    pool: Vec<FigureEntry>,
    daily_size: usize,
    daily_set: Vec<FigureEntry>,
    tracker: DrawTracker,
    quota: DailyQuota,
    day: NaiveDate,
}

impl QuizState {
    pub fn new<R: Rng + ?Sized>(
        pool: Vec<FigureEntry>,
        daily_size: usize,
        daily_limit: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Self {
        let daily_set = select_daily_set(&pool, daily_size, rng);
        info!("Daily set for {}: {}", today, names(&daily_set));

        Self {
            pool,
            daily_size,
            daily_set,
            tracker: DrawTracker::new(),
            quota: DailyQuota::new(daily_limit),
            day: today,
        }
    }

    pub fn daily_set(&self) -> &[FigureEntry] {
        &self.daily_set
    }

    pub fn used_indices(&self) -> &HashSet<usize> {
        self.tracker.used()
    }

    pub fn call_count(&self) -> u32 {
        self.quota.count()
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Re-seed all day-scoped state if `today` is a different calendar day.
    /// Returns whether a rollover happened.
    pub fn roll_over<R: Rng + ?Sized>(&mut self, today: NaiveDate, rng: &mut R) -> bool {
        if !has_day_changed(self.day, today) {
            return false;
        }

        self.day = today;
        self.daily_set = select_daily_set(&self.pool, self.daily_size, rng);
        self.tracker.reset();
        self.quota.reset();
        info!("New day {} detected, daily set refreshed: {}", today, names(&self.daily_set));
        true
    }

    /// Rollover check, quota pre-check and draw, in that order. The quota is
    /// not charged here; see [`QuizState::consume`].
    pub fn draw<R: Rng + ?Sized>(&mut self, today: NaiveDate, rng: &mut R) -> Result<Draw, QuizError> {
        self.roll_over(today, rng);

        if let Err(e) = self.quota.check() {
            warn!("Rejecting request, {} of {} served today", self.quota.count(), self.quota.limit());
            return Err(e);
        }

        let index = self.tracker.draw(self.daily_set.len(), rng).map_err(|e| {
            error!("Figure selection failed: {:?}", e);
            e
        })?;

        let figure = self
            .daily_set
            .get(index)
            .cloned()
            .ok_or_else(|| {
                error!("Drew index {} outside daily set of {}", index, self.daily_set.len());
                QuizError::SelectionFailure(format!("index {} out of range", index))
            })?;

        Ok(Draw { figure, index, day: self.day })
    }

    /// Charge a served request against the day it was drawn on and return
    /// the remaining quota. A draw from a day that has since rolled over is
    /// not charged to the new day.
    pub fn consume(&mut self, day: NaiveDate) -> u32 {
        if day == self.day {
            self.quota.consume()
        } else {
            self.quota.remaining()
        }
    }
}

fn names(set: &[FigureEntry]) -> String {
    set.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
}
