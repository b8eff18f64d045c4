//! Named threshold presets.
//!
//! Presets do not change the algorithm; they only pick `derive_until` and
//! `apply_from`.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BELOW_DIRECT_DEPTH, UNBOUNDED_DEPTH};
use crate::core::DepmgrError;

/// Construction-time thresholds of a management lineage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ManagementPreset {
    /// Inherit everywhere, apply everywhere including direct dependencies.
    #[default]
    Default,
    /// Inherit everywhere, apply only below the direct dependencies.
    Transitive,
    /// Inherit from the first two levels only, apply below the direct dependencies.
    Classic,
    /// Explicit thresholds.
    Custom {
        /// Depth from which derivation stops admitting new entries.
        derive_until: usize,
        /// Depth from which overrides are applied.
        apply_from: usize,
    },
}

impl ManagementPreset {
    /// `(derive_until, apply_from)` for this preset.
    pub const fn thresholds(self) -> (usize, usize) {
        match self {
            Self::Default => (UNBOUNDED_DEPTH, 0),
            Self::Transitive => (UNBOUNDED_DEPTH, BELOW_DIRECT_DEPTH),
            Self::Classic => (BELOW_DIRECT_DEPTH, BELOW_DIRECT_DEPTH),
            Self::Custom {
                derive_until,
                apply_from,
            } => (derive_until, apply_from),
        }
    }

    /// Same thresholds as `self`, with either one overridden.
    #[must_use]
    pub const fn with_overrides(self, derive_until: Option<usize>, apply_from: Option<usize>) -> Self {
        if derive_until.is_none() && apply_from.is_none() {
            return self;
        }
        let (base_derive, base_apply) = self.thresholds();
        Self::Custom {
            derive_until: match derive_until {
                Some(depth) => depth,
                None => base_derive,
            },
            apply_from: match apply_from {
                Some(depth) => depth,
                None => base_apply,
            },
        }
    }
}

impl fmt::Display for ManagementPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Transitive => write!(f, "transitive"),
            Self::Classic => write!(f, "classic"),
            Self::Custom {
                derive_until,
                apply_from,
            } => write!(f, "custom(derive_until={derive_until}, apply_from={apply_from})"),
        }
    }
}

impl FromStr for ManagementPreset {
    type Err = DepmgrError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "transitive" => Ok(Self::Transitive),
            "classic" => Ok(Self::Classic),
            _ => Err(DepmgrError::InvalidPreset {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_thresholds() {
        assert_eq!(ManagementPreset::Default.thresholds(), (usize::MAX, 0));
        assert_eq!(ManagementPreset::Transitive.thresholds(), (usize::MAX, 2));
        assert_eq!(ManagementPreset::Classic.thresholds(), (2, 2));
    }

    #[test]
    fn test_parse_preset_names() {
        assert_eq!("default".parse::<ManagementPreset>().unwrap(), ManagementPreset::Default);
        assert_eq!("Classic".parse::<ManagementPreset>().unwrap(), ManagementPreset::Classic);
        assert!(matches!(
            "nearest".parse::<ManagementPreset>(),
            Err(DepmgrError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn test_overrides_produce_custom() {
        assert_eq!(ManagementPreset::Transitive.with_overrides(None, None), ManagementPreset::Transitive);
        assert_eq!(
            ManagementPreset::Transitive.with_overrides(Some(4), None),
            ManagementPreset::Custom {
                derive_until: 4,
                apply_from: 2,
            }
        );
    }
}
