//! Stagger distribution
//!
//! A stagger spreads the start of one tween across a group of targets. The
//! total spread is `amount` seconds: the target farthest from the origin starts
//! `amount` seconds after the nearest one, everything else in proportion.

use folio_core::{FolioError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// How targets are arranged when measuring their distance from the origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerPattern {
    /// Targets form a single row in document order
    #[default]
    Linear,
    /// Targets fill a grid row by row
    Grid { rows: usize, cols: usize },
    /// Targets are ranked in a shuffled order
    Random,
}

/// Where the stagger starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerOrigin {
    #[default]
    Start,
    Center,
    End,
    /// From the outermost targets inward
    Edges,
    /// Shuffled order, independent of layout
    Random,
    /// From a specific target index
    Index(usize),
}

/// Stagger configuration for a group tween
#[derive(Clone, Debug, PartialEq)]
pub struct Stagger {
    pub pattern: StaggerPattern,
    pub origin: StaggerOrigin,
    /// Total spread in seconds
    pub amount: f32,
    /// Seed for random ordering; `None` draws a fresh order per registration
    pub seed: Option<u64>,
}

impl Stagger {
    pub fn linear(amount: f32) -> Self {
        Self {
            pattern: StaggerPattern::Linear,
            origin: StaggerOrigin::Start,
            amount,
            seed: None,
        }
    }

    pub fn grid(rows: usize, cols: usize, amount: f32) -> Self {
        Self {
            pattern: StaggerPattern::Grid { rows, cols },
            ..Self::linear(amount)
        }
    }

    pub fn random(amount: f32) -> Self {
        Self {
            pattern: StaggerPattern::Random,
            ..Self::linear(amount)
        }
    }

    /// Builder: set the origin
    pub fn from(mut self, origin: StaggerOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Builder: make random ordering reproducible
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FolioError::invalid(format!(
                "stagger amount must be a non-negative duration, got {}",
                self.amount
            )));
        }
        if let StaggerPattern::Grid { rows, cols } = self.pattern {
            if rows == 0 || cols == 0 {
                return Err(FolioError::invalid(format!(
                    "stagger grid must be at least 1x1, got {rows}x{cols}"
                )));
            }
        }
        Ok(())
    }

    /// Start offsets in seconds for `count` targets, in target order
    pub fn offsets(&self, count: usize) -> Result<Vec<f32>> {
        self.validate()?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let distances = if self.pattern == StaggerPattern::Random
            || self.origin == StaggerOrigin::Random
        {
            self.shuffled_ranks(count)
        } else {
            match self.pattern {
                StaggerPattern::Grid { cols, .. } => self.grid_distances(count, cols),
                _ => self.linear_distances(count),
            }
        };

        let max = distances.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return Ok(vec![0.0; count]);
        }
        Ok(distances
            .into_iter()
            .map(|d| d / max * self.amount)
            .collect())
    }

    fn linear_distances(&self, count: usize) -> Vec<f32> {
        let last = (count - 1) as f32;
        let center = last / 2.0;
        (0..count)
            .map(|i| {
                let i = i as f32;
                match self.origin {
                    StaggerOrigin::Start | StaggerOrigin::Random => i,
                    StaggerOrigin::End => last - i,
                    StaggerOrigin::Center => (i - center).abs(),
                    StaggerOrigin::Edges => center - (i - center).abs(),
                    StaggerOrigin::Index(k) => (i - k as f32).abs(),
                }
            })
            .collect()
    }

    fn grid_distances(&self, count: usize, cols: usize) -> Vec<f32> {
        let rows = count.div_ceil(cols);
        let cell = |i: usize| ((i / cols) as f32, (i % cols) as f32);
        let last = ((rows - 1) as f32, (cols.min(count) - 1) as f32);
        let center = (last.0 / 2.0, last.1 / 2.0);
        let dist = |a: (f32, f32), b: (f32, f32)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();

        let origin = match self.origin {
            StaggerOrigin::End => last,
            StaggerOrigin::Center | StaggerOrigin::Edges => center,
            StaggerOrigin::Index(k) => cell(k.min(count - 1)),
            StaggerOrigin::Start | StaggerOrigin::Random => (0.0, 0.0),
        };

        let distances: Vec<f32> = (0..count).map(|i| dist(cell(i), origin)).collect();
        if self.origin == StaggerOrigin::Edges {
            let max = distances.iter().copied().fold(0.0f32, f32::max);
            return distances.into_iter().map(|d| max - d).collect();
        }
        distances
    }

    fn shuffled_ranks(&self, count: usize) -> Vec<f32> {
        let mut ranks: Vec<f32> = (0..count).map(|i| i as f32).collect();
        match self.seed {
            Some(seed) => ranks.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => ranks.shuffle(&mut rand::rng()),
        }
        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_linear_from_start() {
        let offsets = Stagger::linear(1.0).offsets(5).unwrap();
        assert!(approx(&offsets, &[0.0, 0.25, 0.5, 0.75, 1.0]));
    }

    #[test]
    fn test_linear_from_end_and_center() {
        let end = Stagger::linear(1.0).from(StaggerOrigin::End).offsets(3).unwrap();
        assert!(approx(&end, &[1.0, 0.5, 0.0]));

        let center = Stagger::linear(1.0)
            .from(StaggerOrigin::Center)
            .offsets(5)
            .unwrap();
        assert!(approx(&center, &[1.0, 0.5, 0.0, 0.5, 1.0]));

        let edges = Stagger::linear(1.0)
            .from(StaggerOrigin::Edges)
            .offsets(5)
            .unwrap();
        assert!(approx(&edges, &[0.0, 0.5, 1.0, 0.5, 0.0]));
    }

    #[test]
    fn test_grid_from_center() {
        let offsets = Stagger::grid(3, 3, 1.0)
            .from(StaggerOrigin::Center)
            .offsets(9)
            .unwrap();
        // center cell starts first, corners last
        assert_eq!(offsets[4], 0.0);
        assert!((offsets[0] - 1.0).abs() < 1e-5);
        assert!((offsets[8] - 1.0).abs() < 1e-5);
        assert!(offsets[1] < offsets[0]);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let stagger = Stagger::grid(5, 5, 1.0)
            .from(StaggerOrigin::Random)
            .seeded(42);
        let a = stagger.offsets(25).unwrap();
        let b = stagger.offsets(25).unwrap();
        assert_eq!(a, b);

        // a shuffled rank assignment still spans the whole amount
        let mut sorted = a.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(sorted[0], 0.0);
        assert!((sorted[24] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = Stagger::linear(-0.5).offsets(3).unwrap_err();
        assert!(matches!(err, FolioError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(Stagger::linear(1.0).offsets(0).unwrap().is_empty());
        assert_eq!(Stagger::linear(1.0).offsets(1).unwrap(), vec![0.0]);
        assert!(Stagger::grid(0, 5, 1.0).offsets(3).is_err());
    }
}
