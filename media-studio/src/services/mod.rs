pub mod generation;
pub mod metrics;
pub mod providers;
pub mod rate_limiter;
pub mod transcoder;

pub use generation::GenerationService;
pub use rate_limiter::DailyQuota;
