//! Repeated k-fold assignment
//!
//! Each repeat shuffles the row indices with a [`Pcg64`] generator and deals
//! them round-robin into `folds` groups, so fold sizes differ by at most one.
//! The generator is seeded once from [`ResamplingConfig::seed`] and carried
//! across repeats: the same configuration always yields the same folds.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResamplingConfig {
    pub folds: usize,
    pub repeats: usize,
    pub seed: u64,
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            repeats: 5,
            seed: 825,
        }
    }
}

/// Rows held out together in one repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fold {
    pub repeat: usize,
    pub fold: usize,
    /// Held-out row indices, ascending.
    pub holdout: Vec<usize>,
}

impl Fold {
    /// Row indices not in the holdout, ascending.
    #[must_use]
    pub fn training(&self, rows: usize) -> Vec<usize> {
        (0..rows)
            .filter(|i| self.holdout.binary_search(i).is_err())
            .collect()
    }
}

impl ResamplingConfig {
    pub fn validate(&self, rows: usize) -> Result<(), ModelError> {
        if self.repeats == 0 {
            return Err(ModelError::NoRepeats);
        }
        if self.folds < 2 || self.folds > rows {
            return Err(ModelError::InvalidFolds {
                folds: self.folds,
                rows,
            });
        }
        Ok(())
    }

    /// Fold number of every row, one vector per repeat.
    pub fn fold_assignments(&self, rows: usize) -> Result<Vec<Vec<usize>>, ModelError> {
        self.validate(rows)?;

        let mut rng = Pcg64::seed_from_u64(self.seed);
        let mut order = (0..rows).collect::<Vec<_>>();
        let assignments = (0..self.repeats)
            .map(|_| {
                order.shuffle(&mut rng);
                let mut fold_of = vec![0; rows];
                for (position, &row) in order.iter().enumerate() {
                    fold_of[row] = position % self.folds;
                }
                fold_of
            })
            .collect();
        Ok(assignments)
    }

    /// Every holdout fold, ordered by repeat then fold.
    pub fn folds(&self, rows: usize) -> Result<Vec<Fold>, ModelError> {
        let assignments = self.fold_assignments(rows)?;
        let mut folds = Vec::with_capacity(self.repeats * self.folds);
        for (repeat, fold_of) in assignments.iter().enumerate() {
            for fold in 0..self.folds {
                let holdout = fold_of
                    .iter()
                    .enumerate()
                    .filter(|&(_, &f)| f == fold)
                    .map(|(row, _)| row)
                    .collect();
                folds.push(Fold {
                    repeat,
                    fold,
                    holdout,
                });
            }
        }
        Ok(folds)
    }
}
