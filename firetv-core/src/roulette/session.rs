use rand::Rng;

use super::{RouletteError, SpinPlan, Wheel};

/// A wheel and the absolute angle it currently rests at.
///
/// The target of every spin is chosen by the caller. Each spin continues
/// from the resting angle, so a respin keeps the wheel turning forward
/// instead of snapping back to zero.
#[derive(Debug, Clone)]
pub struct RouletteSession {
    wheel: Wheel,
    total_rotation: f64,
}

impl RouletteSession {
    pub fn new(wheel: Wheel) -> Self {
        Self::resume(wheel, 0.0)
    }

    /// Pick up a wheel a client left at `rotation` degrees. Negative or
    /// non-finite angles restart from zero.
    pub fn resume(wheel: Wheel, rotation: f64) -> Self {
        let total_rotation = if rotation.is_finite() && rotation >= 0.0 {
            rotation
        } else {
            0.0
        };
        Self {
            wheel,
            total_rotation,
        }
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Absolute wheel angle to animate to.
    pub fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    /// Spin toward `target`. The returned plan carries the absolute angle
    /// the wheel ends at.
    pub fn spin<R: Rng>(
        &mut self,
        target: &str,
        rng: &mut R,
    ) -> Result<SpinPlan, RouletteError> {
        let mut plan = self.wheel.spin(target, rng)?;
        let resting = self.total_rotation.rem_euclid(360.0);
        self.total_rotation += plan.rotation_degrees - resting;
        plan.rotation_degrees = self.total_rotation;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::roulette::MIN_FULL_TURNS;

    fn wheel() -> Wheel {
        let titles = ["Heat", "Alien", "Dune", "Up"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        Wheel::new(titles).unwrap()
    }

    #[test]
    fn first_spin_matches_the_wheel_plan() {
        let mut session = RouletteSession::new(wheel());
        let plan = session
            .spin("Dune", &mut StdRng::seed_from_u64(3))
            .unwrap();
        let fresh = wheel().spin("Dune", &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(plan, fresh);
        assert_eq!(session.total_rotation(), plan.rotation_degrees);
    }

    #[test]
    fn respin_keeps_turning_forward_and_lands_on_new_target() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = RouletteSession::new(wheel());

        let first = session.spin("Heat", &mut rng).unwrap().rotation_degrees;
        let second = session.spin("Up", &mut rng).unwrap();

        assert!(second.rotation_degrees - first >= f64::from(MIN_FULL_TURNS - 1) * 360.0);
        assert_eq!(second.title, "Up");
        assert_eq!(
            session.wheel().segment_under_pointer(second.rotation_degrees),
            3
        );
    }

    #[test]
    fn resumed_wheel_starts_from_the_client_angle() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = RouletteSession::resume(wheel(), 7_245.0);

        let plan = session.spin("Alien", &mut rng).unwrap();
        assert!(plan.rotation_degrees > 7_245.0 + 360.0);
        assert_eq!(session.wheel().segment_under_pointer(plan.rotation_degrees), 1);
    }

    #[test]
    fn bogus_angles_restart_from_zero() {
        for angle in [-90.0, f64::NAN, f64::INFINITY] {
            assert_eq!(RouletteSession::resume(wheel(), angle).total_rotation(), 0.0);
        }
    }

    #[test]
    fn unknown_target_leaves_the_wheel_where_it_was() {
        let mut session = RouletteSession::resume(wheel(), 400.0);
        assert!(matches!(
            session.spin("Jaws", &mut StdRng::seed_from_u64(1)),
            Err(RouletteError::UnknownTarget(_))
        ));
        assert_eq!(session.total_rotation(), 400.0);
    }
}
