//! Missing values at the JSON boundary.
//!
//! `serde_json` writes a NaN double as `null`; these helpers read `null`
//! back as [`MISSING_DOUBLE`].

use serde::{Deserialize, Deserializer};

use crate::MISSING_DOUBLE;
use crate::ensemble::Ensemble;

/// An event value that has a missing representation.
pub trait MissingValue: Sized {
    /// The value read from a JSON `null`.
    fn missing() -> Self;
}

impl MissingValue for f64 {
    fn missing() -> Self {
        MISSING_DOUBLE
    }
}

/// A `null` ensemble has no members.
impl MissingValue for Ensemble {
    fn missing() -> Self {
        Ensemble::from_pairs(Vec::<(String, f64)>::new())
    }
}

pub(crate) fn or_missing<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + MissingValue,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_else(T::missing))
}

pub(crate) fn members_or_missing<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let members = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(members
        .into_iter()
        .map(|m| m.unwrap_or(MISSING_DOUBLE))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ensemble_is_empty() {
        assert!(Ensemble::missing().is_empty());
    }

    #[test]
    fn missing_double_is_nan() {
        assert!(f64::missing().is_nan());
    }
}
