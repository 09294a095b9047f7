//! Distance and similarity measures over feature vectors
//!
//! Distances are mapped into similarities in `[0, 1]`, where 1 means the two
//! vectors are indistinguishable.

/// Guards the chi-square denominator against empty bins
pub const HISTOGRAM_EPSILON: f64 = 1e-10;

/// Whether two vectors can be compared element-wise
///
/// Both must be non-empty, of equal length and contain only finite values.
pub fn comparable(a: &[f64], b: &[f64]) -> bool {
    !a.is_empty()
        && a.len() == b.len()
        && a.iter().chain(b.iter()).all(|value| value.is_finite())
}

/// Chi-square distance `Σ (a - b)² / (a + b + ε)` between two histograms
///
/// For histograms that each sum to one the result lies in `[0, 2]`.
pub fn chi_square_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x - y).powi(2) / (x + y + HISTOGRAM_EPSILON))
        .sum()
}

/// Euclidean (L2) distance
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity clamped to `[0, 1]`
///
/// Opposed directions clamp to zero; a zero vector on either side has no
/// direction and also yields zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Map a distance onto `[0, 1]` as `1 - min(distance / max_distance, 1)`
///
/// A non-positive `max_distance` leaves nothing to normalize by and reports
/// full similarity.
pub const fn distance_to_similarity(distance: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 {
        return 1.0;
    }

    (1.0 - (distance / max_distance).min(1.0)).max(0.0)
}
