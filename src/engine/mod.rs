pub mod progression;
pub mod scoring;

pub use progression::StreakPolicy;
