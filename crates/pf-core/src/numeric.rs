use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Round to two decimal places. Controller outputs and decoded register
/// values are reported at this resolution.
pub fn round2(v: Real) -> Real {
    (v * 100.0).round() / 100.0
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn round2_basic() {
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(-3.456), -3.46);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    proptest::proptest! {
        #[test]
        fn round2_is_idempotent_and_close(v in -1.0e6f64..1.0e6f64) {
            let rounded = round2(v);
            proptest::prop_assert!((rounded - v).abs() <= 0.005 + 1e-9);
            proptest::prop_assert_eq!(round2(rounded), rounded);
        }
    }
}
