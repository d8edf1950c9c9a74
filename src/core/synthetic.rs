use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

use crate::indicators::registry::{Frequency, MetricDefinition};
use crate::models::{round2, Observation};

/// Years of history before the current year covered by example data.
pub const TRAILING_YEARS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pattern {
    Up,
    Down,
    Cycle,
    Random,
}

/// Shape and value band used when a metric has to be filled with example data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackProfile {
    pub min: f64,
    pub max: f64,
    pub pattern: Pattern,
}

impl FallbackProfile {
    /// Inverted bounds are swapped.
    pub fn new(min: f64, max: f64, pattern: Pattern) -> Self {
        let (min, max) = ordered(min, max);
        Self { min, max, pattern }
    }

    /// The band as an ordered, finite pair, whatever the fields hold.
    pub fn bounds(&self) -> (f64, f64) {
        ordered(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        let (min, max) = self.bounds();
        value >= min && value <= max
    }
}

/// A NaN or infinite bound collapses onto the other one; two bad bounds collapse to zero.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    let a = a.is_finite().then_some(a);
    let b = b.is_finite().then_some(b);
    match (a, b) {
        (Some(a), Some(b)) => (a.min(b), a.max(b)),
        (Some(v), None) | (None, Some(v)) => (v, v),
        (None, None) => (0.0, 0.0),
    }
}

fn period_months(frequency: Frequency) -> &'static [u32] {
    match frequency {
        Frequency::Annual => &[1],
        Frequency::Quarterly => &[1, 4, 7, 10],
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    }
}

/// First-of-period dates from January `TRAILING_YEARS` back through the period containing `today`.
fn period_dates(frequency: Frequency, today: NaiveDate) -> Vec<NaiveDate> {
    let months = period_months(frequency);
    let start_year = today.year() - TRAILING_YEARS;

    (start_year..=today.year())
        .flat_map(|year| months.iter().map(move |&month| (year, month)))
        .filter_map(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1))
        .filter(|date| *date <= today)
        .collect()
}

/// Generates bounded example data for a metric. Never fails and never touches the network.
pub fn generate<R: Rng>(metric: &MetricDefinition, today: NaiveDate, rng: &mut R) -> Vec<Observation> {
    let pattern = metric.fallback.pattern;
    let (min, max) = metric.fallback.bounds();
    let span = max - min;
    let dates = period_dates(metric.frequency, today);
    let total = dates.len().max(1) as f64;

    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let progress = i as f64 / total;
            let raw = match pattern {
                Pattern::Up => min + span * progress + rng.gen_range(-2.5..2.5),
                Pattern::Down => max - span * progress + rng.gen_range(-2.5..2.5),
                Pattern::Cycle => {
                    min + span / 2.0 + span / 2.0 * (progress * PI * 4.0).sin() + rng.gen_range(-1.5..1.5)
                }
                Pattern::Random => min + rng.gen::<f64>() * span,
            };
            Observation { date, value: round2(raw.clamp(min, max)) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::registry::{Catalog, Category, MetricKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn definition(frequency: Frequency, profile: FallbackProfile) -> MetricDefinition {
        MetricDefinition {
            id: "test-metric".into(),
            title: "Test Metric".into(),
            description: String::new(),
            unit: "%".into(),
            category: Category::Economic,
            frequency,
            is_percentage: true,
            kind: MetricKind::Unmapped,
            fallback: profile,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_monthly_window() {
        let metric = definition(Frequency::Monthly, FallbackProfile::new(0.0, 100.0, Pattern::Random));
        let data = generate(&metric, today(), &mut StdRng::seed_from_u64(7));

        assert_eq!(data.first().unwrap().date, NaiveDate::from_ymd_opt(2014, 1, 1).unwrap());
        assert_eq!(data.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(data.len(), 10 * 12 + 5);
    }

    #[test]
    fn test_quarterly_dates() {
        let metric = definition(Frequency::Quarterly, FallbackProfile::new(60.0, 130.0, Pattern::Up));
        let data = generate(&metric, today(), &mut StdRng::seed_from_u64(7));

        let months: Vec<u32> = data.iter().take(4).map(|o| o.date.month()).collect();
        assert_eq!(months, vec![1, 4, 7, 10]);
        assert_eq!(data.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn test_every_pattern_stays_in_band_and_ascends() {
        for pattern in [Pattern::Up, Pattern::Down, Pattern::Cycle, Pattern::Random] {
            let profile = FallbackProfile::new(-2.0, 3.0, pattern);
            let metric = definition(Frequency::Monthly, profile);
            let data = generate(&metric, today(), &mut StdRng::seed_from_u64(42));

            assert!(!data.is_empty());
            assert!(data.iter().all(|o| profile.contains(o.value)), "{:?} escaped its band", pattern);
            assert!(data.windows(2).all(|w| w[0].date < w[1].date));
            assert!(data.iter().all(|o| round2(o.value) == o.value));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let metric = definition(Frequency::Monthly, FallbackProfile::new(3.0, 15.0, Pattern::Cycle));
        let a = generate(&metric, today(), &mut StdRng::seed_from_u64(99));
        let b = generate(&metric, today(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rising_shape() {
        let metric = definition(Frequency::Quarterly, FallbackProfile::new(0.0, 1000.0, Pattern::Up));
        let data = generate(&metric, today(), &mut StdRng::seed_from_u64(1));
        assert!(data.last().unwrap().value > data.first().unwrap().value);
    }

    #[test]
    fn test_inverted_band_is_swapped() {
        let profile = FallbackProfile::new(10.0, 5.0, Pattern::Random);
        assert_eq!((profile.min, profile.max), (5.0, 10.0));

        let data = generate(&definition(Frequency::Monthly, profile), today(), &mut StdRng::seed_from_u64(3));
        assert!(!data.is_empty());
        assert!(data.iter().all(|o| (5.0..=10.0).contains(&o.value)));
    }

    #[test]
    fn test_malformed_band_never_panics() {
        // Fields are public, so a profile can bypass `new`.
        let raw = [
            FallbackProfile { min: 10.0, max: 5.0, pattern: Pattern::Up },
            FallbackProfile { min: f64::NAN, max: 5.0, pattern: Pattern::Cycle },
            FallbackProfile { min: 1.0, max: f64::INFINITY, pattern: Pattern::Down },
            FallbackProfile { min: f64::NAN, max: f64::NAN, pattern: Pattern::Random },
        ];
        for profile in raw {
            let data = generate(&definition(Frequency::Quarterly, profile), today(), &mut StdRng::seed_from_u64(5));
            let (min, max) = profile.bounds();
            assert!(data.iter().all(|o| o.value.is_finite() && o.value >= min && o.value <= max));
        }
    }

    #[test]
    fn test_catalog_profiles_hold() {
        let mut rng = StdRng::seed_from_u64(2024);
        for metric in Catalog::standard().metrics() {
            let data = generate(metric, today(), &mut rng);
            assert!(data.iter().all(|o| metric.fallback.contains(o.value)), "{} escaped its band", metric.id);
        }
    }
}
