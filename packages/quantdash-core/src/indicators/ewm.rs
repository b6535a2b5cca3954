//! Exponentially weighted mean with bias-adjusted weights.

/// Exponentially weighted moving average over a series with missing values.
///
/// The smoothing factor is given as a center of mass: `alpha = 1 / (1 + com)`.
/// Weights are bias-adjusted, so position `t` holds
///
/// ```text
/// sum_k (1 - alpha)^k * x[t - k]  /  sum_k (1 - alpha)^k
/// ```
///
/// over every observation seen so far. Missing values still age the earlier
/// weights but contribute nothing themselves. A position is `None` until at
/// least `min_periods` observations have been seen.
pub fn ewm_mean(values: &[Option<f64>], com: f64, min_periods: usize) -> Vec<Option<f64>> {
    let decay = 1.0 - 1.0 / (1.0 + com);
    let min_periods = min_periods.max(1);

    let mut result = Vec::with_capacity(values.len());
    let mut weighted: Option<f64> = None;
    let mut old_weight = 1.0;
    let mut observations = 0usize;

    for &value in values {
        if value.is_some() {
            observations += 1;
        }

        match (weighted, value) {
            (Some(current), value) => {
                old_weight *= decay;
                if let Some(x) = value {
                    weighted = Some((old_weight * current + x) / (old_weight + 1.0));
                    old_weight += 1.0;
                }
            }
            (None, Some(x)) => weighted = Some(x),
            (None, None) => {}
        }

        result.push(if observations >= min_periods {
            weighted
        } else {
            None
        });
    }

    result
}
