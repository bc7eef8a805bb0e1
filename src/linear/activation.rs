//! Output activations mapping raw scores to probabilities.

use crate::common_types::Scalar;

/// Logistic function `1 / (1 + e^-z)`.
///
/// Uses the split formulation so `exp` is only ever taken of a non-positive
/// argument, then clamps into `[eps, 1 - eps]`. The result is therefore strictly
/// inside `(0, 1)` even for scores whose exact sigmoid rounds to 0 or 1.
pub fn sigmoid<F: Scalar>(z: F) -> F {
    let p = if z >= F::zero() {
        F::one() / (F::one() + (-z).exp())
    } else {
        let e = z.exp();
        e / (F::one() + e)
    };
    clamp_probability(p)
}

/// Clamps `p` into `[eps, 1 - eps]` so its logarithm and that of its complement are finite.
pub fn clamp_probability<F: Scalar>(p: F) -> F {
    let eps = F::prob_epsilon();
    p.max(eps).min(F::one() - eps)
}

/// Softmax of `scores` written into `out`, shifted by the maximum score for stability.
///
/// `out` must have the same length as `scores`. Every output is clamped away from 0,
/// so they sum to 1 only up to that clamping.
pub fn softmax_into<F: Scalar>(scores: &[F], out: &mut [F]) {
    let max = scores.iter().copied().fold(F::neg_infinity(), F::max);
    let mut total = F::zero();
    for (o, &s) in out.iter_mut().zip(scores) {
        *o = (s - max).exp();
        total = total + *o;
    }
    for o in out.iter_mut() {
        *o = (*o / total).max(F::prob_epsilon());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_sigmoid_at_zero() {
        assert_eq!(sigmoid(0.0_f64), 0.5);
        assert_eq!(sigmoid(0.0_f32), 0.5);
    }

    #[rstest]
    #[case(1e3)]
    #[case(-1e3)]
    #[case(40.0)]
    #[case(-40.0)]
    #[case(f64::MAX)]
    #[case(f64::MIN)]
    fn test_sigmoid_strictly_inside_unit_interval(#[case] z: f64) {
        let p = sigmoid(z);
        assert!(p > 0.0 && p < 1.0, "sigmoid({z}) = {p}");
        let q = sigmoid(z as f32);
        assert!(q > 0.0 && q < 1.0, "sigmoid({z} as f32) = {q}");
    }

    #[test]
    fn test_sigmoid_is_monotonic() {
        let mut previous = sigmoid(-50.0_f64);
        for i in -499..=500 {
            let z = i as f64 / 10.0;
            let p = sigmoid(z);
            assert!(p >= previous, "sigmoid decreased at {z}");
            previous = p;
        }
        assert!(sigmoid(-1.0_f64) < sigmoid(0.0) && sigmoid(0.0_f64) < sigmoid(1.0));
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for z in [0.1_f64, 1.0, 3.5, 10.0] {
            assert_abs_diff_eq!(sigmoid(z) + sigmoid(-z), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let scores = [1.0_f64, 2.0, 3.0];
        let mut out = [0.0; 3];
        softmax_into(&scores, &mut out);
        assert_abs_diff_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(out[2] > out[1] && out[1] > out[0]);
    }

    #[test]
    fn test_softmax_large_scores_do_not_overflow() {
        let scores = [1000.0_f64, 1000.0, -1000.0];
        let mut out = [0.0; 3];
        softmax_into(&scores, &mut out);
        assert_abs_diff_eq!(out[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], 0.5, epsilon = 1e-12);
        assert!(out[2] > 0.0);
    }
}
