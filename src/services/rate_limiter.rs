use crate::error::QuizError;

/// Per-day request ceiling. The counter never exceeds `limit`.
#[derive(Debug, Clone)]
pub struct DailyQuota {
    count: u32,
    limit: u32,
}

impl DailyQuota {
    pub fn new(limit: u32) -> Self {
        Self { count: 0, limit }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.limit - self.count
    }

    /// Pre-check only; nothing is consumed here
    pub fn check(&self) -> Result<(), QuizError> {
        if self.count >= self.limit {
            return Err(QuizError::RateLimitExceeded { limit: self.limit });
        }
        Ok(())
    }

    /// Charge one served request and return what is left for the day
    pub fn consume(&mut self) -> u32 {
        if self.count < self.limit {
            self.count += 1;
        }
        self.remaining()
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
