use std::time::Duration;

use rand::Rng;

use super::RouletteError;

pub const MAX_SEGMENTS: usize = 8;
pub const MIN_FULL_TURNS: u32 = 5;
/// Extra full turns drawn on top of the minimum, inclusive.
pub const MAX_EXTRA_TURNS: u32 = 3;
pub const SPIN_DURATION: Duration = Duration::from_millis(4_000);

/// Where a spin will come to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub index: usize,
    pub title: String,
    /// Clockwise rotation from the resting position, in degrees.
    pub rotation_degrees: f64,
    pub duration: Duration,
}

/// Wheel of equal segments laid out clockwise from the pointer at 0°.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    titles: Vec<String>,
}

impl Wheel {
    pub fn new(titles: Vec<String>) -> Result<Self, RouletteError> {
        match titles.len() {
            0 => Err(RouletteError::NoCandidates),
            n if n > MAX_SEGMENTS => Err(RouletteError::TooManyCandidates(n)),
            _ => Ok(Self { titles }),
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn segment_angle(&self) -> f64 {
        360.0 / self.titles.len() as f64
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    /// Centre of segment `index`, measured clockwise from the pointer.
    pub fn segment_center(&self, index: usize) -> f64 {
        let segment = self.segment_angle();
        segment * index as f64 + segment / 2.0
    }

    /// Rotation that parks segment `index` under the pointer after
    /// `full_turns` complete revolutions.
    pub fn rotation_for(&self, index: usize, full_turns: u32) -> f64 {
        let offset = 360.0 - self.segment_center(index);
        f64::from(full_turns) * 360.0 + offset
    }

    /// Segment under the pointer once the wheel has turned `rotation`
    /// degrees clockwise.
    pub fn segment_under_pointer(&self, rotation: f64) -> usize {
        let under = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
        let index = (under / self.segment_angle()).floor() as usize;
        index.min(self.titles.len() - 1)
    }

    pub fn spin<R: Rng>(
        &self,
        target: &str,
        rng: &mut R,
    ) -> Result<SpinPlan, RouletteError> {
        let index = self
            .index_of(target)
            .ok_or_else(|| RouletteError::UnknownTarget(target.to_string()))?;
        let turns = MIN_FULL_TURNS + rng.random_range(0..=MAX_EXTRA_TURNS);
        Ok(SpinPlan {
            index,
            title: self.titles[index].clone(),
            rotation_degrees: self.rotation_for(index, turns),
            duration: SPIN_DURATION,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn wheel(n: usize) -> Wheel {
        Wheel::new((0..n).map(|i| format!("Title {i}")).collect()).unwrap()
    }

    #[test]
    fn every_target_lands_under_the_pointer() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=MAX_SEGMENTS {
            let wheel = wheel(n);
            for i in 0..n {
                let plan = wheel.spin(&format!("Title {i}"), &mut rng).unwrap();
                assert_eq!(plan.index, i);
                assert_eq!(wheel.segment_under_pointer(plan.rotation_degrees), i);
                assert!(plan.rotation_degrees >= f64::from(MIN_FULL_TURNS) * 360.0);
                assert_eq!(plan.duration, Duration::from_secs(4));
            }
        }
    }

    #[test]
    fn eight_segment_geometry() {
        let wheel = wheel(8);
        assert_eq!(wheel.segment_angle(), 45.0);
        assert_eq!(wheel.segment_center(0), 22.5);
        assert_eq!(wheel.rotation_for(0, 5), 1800.0 + 337.5);
        assert_eq!(wheel.rotation_for(7, 5), 1800.0 + 22.5);
        assert_eq!(wheel.segment_under_pointer(0.0), 0);
        assert_eq!(wheel.segment_under_pointer(10.0), 7);
    }

    #[test]
    fn rejects_bad_wheels_and_targets() {
        assert_eq!(Wheel::new(vec![]), Err(RouletteError::NoCandidates));
        assert_eq!(
            Wheel::new(vec!["x".to_string(); 9]),
            Err(RouletteError::TooManyCandidates(9))
        );
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            wheel(3).spin("missing", &mut rng),
            Err(RouletteError::UnknownTarget(_))
        ));
    }
}
