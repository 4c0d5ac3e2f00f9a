//! Recommendation roulette: candidate preparation, wheel geometry and
//! forward-turning respins.

mod recommendations;
mod session;
mod wheel;

pub use recommendations::{
    FALLBACK_TITLES, RecommendationClient, pick_target, prepare_candidates,
};
pub use session::RouletteSession;
pub use wheel::{
    MAX_SEGMENTS, MIN_FULL_TURNS, SPIN_DURATION, SpinPlan, Wheel,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouletteError {
    #[error("The wheel needs at least one title")]
    NoCandidates,

    #[error("The wheel holds at most {MAX_SEGMENTS} titles, got {0}")]
    TooManyCandidates(usize),

    #[error("{0:?} is not on the wheel")]
    UnknownTarget(String),
}
