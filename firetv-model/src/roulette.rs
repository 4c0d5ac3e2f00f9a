#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the recommender should interpret the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RouletteMode {
    /// Free-form prompt.
    #[default]
    Chaos,
    /// Seeded from the user's own history.
    User,
}

impl RouletteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouletteMode::Chaos => "chaos",
            RouletteMode::User => "user",
        }
    }
}

/// Body forwarded to the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RecommendationInput {
    pub input: String,
    pub mode: RouletteMode,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SpinRequest {
    /// Candidates to spin over. When empty the recommender is asked instead.
    pub titles: Vec<String>,
    /// Force the wheel to land on this title.
    pub target: Option<String>,
    /// Passed to the recommender when `titles` is empty.
    pub prompt: Option<String>,
    pub mode: RouletteMode,
    pub user_id: Option<String>,
    /// Absolute angle the wheel rests at from the previous spin. A respin
    /// sends the last `rotationDegrees` here so the wheel keeps turning
    /// forward.
    pub from_rotation: Option<f64>,
}

/// Everything a client needs to animate the wheel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SpinResponse {
    pub titles: Vec<String>,
    pub selected: String,
    pub segment_index: usize,
    /// Absolute angle to animate to.
    pub rotation_degrees: f64,
    pub duration_ms: u64,
}
