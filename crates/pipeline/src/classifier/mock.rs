//! Stand-in classifier used when no scoring model is loaded.

use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use var_core::incident::{Classification, IncidentType};

/// Confidence range of randomly drawn classifications.
pub const MOCK_CONFIDENCE_RANGE: RangeInclusive<f64> = 0.70..=0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MockMode {
    /// Uniform over the six labels, confidence uniform in
    /// [`MOCK_CONFIDENCE_RANGE`].
    Random,
    /// Always the same answer.
    Fixed(Classification),
}

#[derive(Debug)]
pub struct MockClassifier {
    mode: MockMode,
    rng: Mutex<StdRng>,
}

impl MockClassifier {
    /// Random mode. A seed makes the sequence of answers reproducible.
    pub fn random(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            mode: MockMode::Random,
            rng: Mutex::new(rng),
        }
    }

    /// Fixed mode, answering `(incident_type, confidence)` every time.
    pub fn fixed(incident_type: IncidentType, confidence: f64) -> Self {
        Self {
            mode: MockMode::Fixed(Classification::new(incident_type, confidence)),
            rng: Mutex::new(StdRng::seed_from_u64(0)),
        }
    }

    pub fn pick(&self) -> Classification {
        match self.mode {
            MockMode::Fixed(c) => c,
            MockMode::Random => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                let idx = rng.random_range(0..IncidentType::LABELED.len());
                let confidence = rng.random_range(MOCK_CONFIDENCE_RANGE);
                Classification::new(IncidentType::LABELED[idx], confidence)
            }
        }
    }
}
