//! Synthetic incident sample generation.
//!
//! Demo mode for running the chart without a dataset on disk. The generator
//! draws from a fixed roster of manufacturers with incidence weights shaped
//! like real general-aviation data: light-aircraft makes dominate the row
//! count with small fatality bursts, airliner makes are rare but severe.
//! Non-fatal incidents leave the fatality cell empty, which is how the real
//! exports look and which exercises the zero-default downstream.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Poisson;

use crate::domain::IncidentRecord;
use crate::error::AppError;
use crate::io::IngestedData;

const YEAR_MIN: i32 = 1982;
const YEAR_MAX: i32 = 2008;

struct MakeProfile {
    name: &'static str,
    /// Relative share of generated incidents.
    weight: u32,
    /// Probability that an incident has any fatalities at all.
    fatal_prob: f64,
    /// Mean of the Poisson fatality burst for fatal incidents.
    burst_mean: f64,
}

const MAKES: &[MakeProfile] = &[
    MakeProfile { name: "Cessna", weight: 34, fatal_prob: 0.18, burst_mean: 1.4 },
    MakeProfile { name: "Piper", weight: 26, fatal_prob: 0.20, burst_mean: 1.6 },
    MakeProfile { name: "Beech", weight: 12, fatal_prob: 0.24, burst_mean: 2.0 },
    MakeProfile { name: "Bell", weight: 8, fatal_prob: 0.22, burst_mean: 1.8 },
    MakeProfile { name: "Mooney", weight: 6, fatal_prob: 0.20, burst_mean: 1.3 },
    MakeProfile { name: "Robinson", weight: 5, fatal_prob: 0.23, burst_mean: 1.2 },
    MakeProfile { name: "Boeing", weight: 6, fatal_prob: 0.07, burst_mean: 45.0 },
    MakeProfile { name: "Airbus", weight: 3, fatal_prob: 0.06, burst_mean: 60.0 },
];

/// Generate `count` synthetic incident records.
///
/// The same `(count, seed)` pair always produces the same records.
pub fn generate_sample(count: usize, seed: u64) -> Result<IngestedData, AppError> {
    if count == 0 {
        return Err(AppError::usage("Sample count must be > 0."));
    }

    let weighted = WeightedIndex::new(MAKES.iter().map(|m| m.weight))
        .map_err(|e| AppError::runtime(format!("Sample weighting error: {e}")))?;

    let mut bursts = Vec::with_capacity(MAKES.len());
    for make in MAKES {
        let poisson = Poisson::new(make.burst_mean)
            .map_err(|e| AppError::runtime(format!("Burst distribution error: {e}")))?;
        bursts.push(poisson);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(count);

    for _ in 0..count {
        let at = weighted.sample(&mut rng);
        let make = &MAKES[at];

        let year = rng.gen_range(YEAR_MIN..=YEAR_MAX);
        let month = rng.gen_range(1..=12u32);
        // Capped at 28 so every generated date is valid in every month.
        let day = rng.gen_range(1..=28u32);
        let event_date = format!("{year:04}-{month:02}-{day:02}");

        let roll: f64 = rng.r#gen();
        let fatalities = if roll < make.fatal_prob {
            let burst: f64 = bursts[at].sample(&mut rng);
            Some((burst as u32).max(1))
        } else {
            // Blank cell, like real exports for non-fatal incidents.
            None
        };

        records.push(IncidentRecord {
            event_date,
            fatalities,
            manufacturer: make.name.to_string(),
        });
    }

    let rows_defaulted = records.iter().filter(|r| r.fatalities.is_none()).count();

    Ok(IngestedData {
        records,
        row_errors: Vec::new(),
        rows_read: count,
        rows_undated: 0,
        rows_defaulted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::parse_event_year;

    #[test]
    fn same_seed_reproduces_records() {
        let a = generate_sample(100, 7).unwrap();
        let b = generate_sample(100, 7).unwrap();
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate_sample(100, 1).unwrap();
        let b = generate_sample(100, 2).unwrap();
        assert_ne!(a.records, b.records);
    }

    #[test]
    fn generates_requested_count() {
        let data = generate_sample(25, 7).unwrap();
        assert_eq!(data.records.len(), 25);
        assert_eq!(data.rows_read, 25);
        assert_eq!(data.rows_undated, 0);
    }

    #[test]
    fn zero_count_is_a_usage_error() {
        let err = generate_sample(0, 7).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn every_generated_date_parses_in_range() {
        let data = generate_sample(200, 7).unwrap();
        for record in &data.records {
            let year = parse_event_year(&record.event_date)
                .unwrap_or_else(|| panic!("unparseable date {:?}", record.event_date));
            assert!((YEAR_MIN..=YEAR_MAX).contains(&year));
        }
    }

    #[test]
    fn fatal_incidents_have_at_least_one_fatality() {
        let data = generate_sample(200, 7).unwrap();
        for record in &data.records {
            if let Some(count) = record.fatalities {
                assert!(count >= 1);
            }
        }
    }

    #[test]
    fn sample_covers_multiple_manufacturers() {
        let data = generate_sample(200, 7).unwrap();
        let mut names: Vec<&str> = Vec::new();
        for record in &data.records {
            if !names.contains(&record.manufacturer.as_str()) {
                names.push(&record.manufacturer);
            }
        }
        assert!(names.len() >= 3, "expected several makes, got {names:?}");
    }
}
