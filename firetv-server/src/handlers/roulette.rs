use axum::{Json, extract::State};
use firetv_core::{
    RouletteError, RouletteSession, Wheel,
    roulette::pick_target,
};
use firetv_model::{RecommendationInput, SpinRequest, SpinResponse};
use tracing::debug;

use crate::infra::{app_state::AppState, errors::AppResult};

/// Plan a spin over the given titles, or over the recommender's picks when
/// none are given. The landing title is the requested target if any,
/// otherwise a uniformly random segment. A respin passes the previous
/// `rotationDegrees` as `fromRotation` and keeps turning forward from there.
pub async fn spin_handler(
    State(state): State<AppState>,
    Json(request): Json<SpinRequest>,
) -> AppResult<Json<SpinResponse>> {
    let SpinRequest {
        titles,
        target,
        prompt,
        mode,
        user_id,
        from_rotation,
    } = request;

    let titles = if titles.is_empty() {
        let input = RecommendationInput {
            input: prompt.unwrap_or_default(),
            mode,
            user_id,
        };
        state.recommender.candidates(&input).await
    } else {
        titles
    };

    let wheel = Wheel::new(titles)?;
    let mut rng = rand::rng();
    let target = match target {
        Some(target) => target,
        None => {
            let index =
                pick_target(wheel.titles(), &mut rng).ok_or(RouletteError::NoCandidates)?;
            wheel.titles()[index].clone()
        }
    };

    let mut session = RouletteSession::resume(wheel, from_rotation.unwrap_or(0.0));
    let plan = session.spin(&target, &mut rng)?;
    debug!(
        "Spin lands on {:?} after {:.1} degrees",
        plan.title, plan.rotation_degrees
    );

    Ok(Json(SpinResponse {
        titles: session.wheel().titles().to_vec(),
        selected: plan.title,
        segment_index: plan.index,
        rotation_degrees: plan.rotation_degrees,
        duration_ms: u64::try_from(plan.duration.as_millis()).unwrap_or(u64::MAX),
    }))
}
