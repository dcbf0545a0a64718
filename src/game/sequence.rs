use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::config::GameConfig;
use super::symbol::Symbol;

/// One timed instruction of a playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStep {
    pub symbol: Symbol,
    /// How long the pad stays lit
    pub highlight: Duration,
    /// Dark time after the pad goes off, zero for the last step
    pub gap_after: Duration,
}

/// Ordered playback steps for the whole sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackPlan {
    pub steps: Vec<PlaybackStep>,
}

impl PlaybackPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Wall-clock time needed to execute the plan
    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| step.highlight + step.gap_after)
            .sum()
    }
}

/// Owns the target sequence and extends it one random symbol at a time
pub struct SequenceEngine<R = StdRng> {
    sequence: Vec<Symbol>,
    highlight: Duration,
    gap: Duration,
    rng: R,
}

impl SequenceEngine<StdRng> {
    /// Create an engine seeded from OS entropy
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine that produces the same sequence for the same seed
    pub fn seeded(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SequenceEngine<R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Self {
        Self {
            sequence: Vec::new(),
            highlight: config.highlight(),
            gap: config.gap(),
            rng,
        }
    }

    /// Append one uniformly drawn symbol and return it
    pub fn generate_next(&mut self) -> Symbol {
        let index = self.rng.gen_range(0..Symbol::ALL.len());
        let symbol = Symbol::ALL[index];
        self.sequence.push(symbol);
        symbol
    }

    pub fn build_playback_plan(&self) -> PlaybackPlan {
        let last = self.sequence.len().saturating_sub(1);
        let steps = self
            .sequence
            .iter()
            .enumerate()
            .map(|(i, &symbol)| PlaybackStep {
                symbol,
                highlight: self.highlight,
                gap_after: if i == last { Duration::ZERO } else { self.gap },
            })
            .collect();

        PlaybackPlan { steps }
    }

    pub fn reset(&mut self) {
        self.sequence.clear();
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, symbol: Symbol) {
        self.sequence.push(symbol);
    }
}
