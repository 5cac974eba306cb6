use crate::RnError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for comparing derived quantities.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-12,
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, RnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RnError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`; used for distances and tolerances.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, RnError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(RnError::InvalidArg {
            what: format!("{what} must be >= 0 (got {v})"),
        });
    }
    Ok(v)
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
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert!(ensure_non_negative(0.0, "tol").is_ok());
        assert!(matches!(
            ensure_non_negative(-1.0, "tol"),
            Err(RnError::InvalidArg { .. })
        ));
        assert!(matches!(
            ensure_non_negative(Real::INFINITY, "tol"),
            Err(RnError::NonFinite { .. })
        ));
    }
}
