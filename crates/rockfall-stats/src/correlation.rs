//! Pairwise Pearson correlation over named columns.
//!
//! Each pair uses only the rows where both columns are present
//! (pairwise-complete observations). Pairs with fewer than two complete rows
//! or with zero variance in either column have no defined correlation.

use std::iter;

use serde::Serialize;

/// Symmetric correlation matrix between named numeric columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    /// Column names, in row/column order of `values`.
    pub names: Vec<String>,
    /// `values[i][j]` is the correlation of column `i` with column `j`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Computes the correlation matrix of equally long columns.
    ///
    /// # Panics
    ///
    /// Panics if `names` and `columns` differ in length or the columns are
    /// not all the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockfall_stats::correlation::CorrelationMatrix;
    ///
    /// let x = vec![Some(1.0), Some(2.0), Some(3.0)];
    /// let y = vec![Some(2.0), Some(4.0), Some(6.0)];
    /// let matrix = CorrelationMatrix::new(vec!["x".into(), "y".into()], &[x, y]);
    /// assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new(names: Vec<String>, columns: &[Vec<Option<f64>>]) -> Self {
        assert_eq!(names.len(), columns.len(), "one name per column");
        if let Some(first) = columns.first() {
            assert!(
                columns.iter().all(|c| c.len() == first.len()),
                "columns must have equal length"
            );
        }

        let values = columns
            .iter()
            .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
            .collect();
        Self { names, values }
    }

    /// Looks up the correlation between two columns by name.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        self.values[i][j]
    }
}

/// Pearson correlation of two columns over their pairwise-complete rows.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs = iter::zip(a, b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if crate::is_present(*x) && crate::is_present(*y) => Some((*x, *y)),
            _ => None,
        })
        .collect::<Vec<_>>();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_negative() {
        let a = [1.0, 2.0, 3.0, 4.0].map(Some);
        let b = [8.0, 6.0, 4.0, 2.0].map(Some);
        assert!((pearson(&a, &b).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete() {
        let a = [Some(1.0), None, Some(2.0), Some(3.0)];
        let b = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_undefined() {
        let a = [1.0, 2.0, 3.0].map(Some);
        let b = [5.0, 5.0, 5.0].map(Some);
        assert_eq!(pearson(&a, &b), None);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(4.0), Some(3.0)],
            vec![Some(2.0), Some(1.0), Some(5.0), Some(2.5)],
            vec![Some(0.5), Some(0.1), Some(0.9), Some(0.7)],
        ];
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let matrix = CorrelationMatrix::new(names, &columns);
        for i in 0..3 {
            assert!((matrix.values[i][i].unwrap() - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
        assert_eq!(matrix.get("a", "missing"), None);
    }
}
