pub mod daily_set;
pub mod figure_pool;
pub mod image_lookup;
pub mod quiz_state;
pub mod rate_limiter;
pub mod tracker;
