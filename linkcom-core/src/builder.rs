//! Builder utilities for configuring link clustering.
//!
//! Exposes the clustering mode and weighting selection surface and the
//! validation performed before constructing [`LinkClustering`] instances.

use crate::{Result, error::LinkcomError, link_clustering::LinkClustering};

/// What a run produces.
///
/// # Examples
/// ```
/// use linkcom_core::ClusteringMode;
///
/// assert_eq!(ClusteringMode::Threshold(0.25).threshold(), Some(0.25));
/// assert_eq!(ClusteringMode::BestCut.threshold(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ClusteringMode {
    /// Merge while candidate similarity is at least the threshold and report
    /// the partition reached there.
    Threshold(f64),
    /// Merge to exhaustion and report the partition of maximum density.
    BestCut,
    /// As [`Self::BestCut`], additionally keeping every merge event.
    Dendrogram,
}

impl ClusteringMode {
    /// Returns the similarity threshold of [`Self::Threshold`].
    #[must_use]
    pub const fn threshold(self) -> Option<f64> {
        match self {
            Self::Threshold(threshold) => Some(threshold),
            Self::BestCut | Self::Dendrogram => None,
        }
    }
}

/// Which similarity measure scores incident edge pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Weighting {
    /// Jaccard similarity of closed neighbourhoods.
    Unweighted,
    /// Tanimoto coefficient over edge weights; every edge must be weighted.
    Weighted,
}

/// Configures and constructs [`LinkClustering`] instances.
///
/// # Examples
/// ```
/// use linkcom_core::{ClusteringMode, LinkClusteringBuilder, Weighting};
///
/// let clustering = LinkClusteringBuilder::new()
///     .with_threshold(0.5)
///     .with_weighting(Weighting::Weighted)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clustering.mode(), ClusteringMode::Threshold(0.5));
/// assert_eq!(clustering.weighting(), Weighting::Weighted);
/// ```
#[derive(Debug, Clone)]
pub struct LinkClusteringBuilder {
    mode: ClusteringMode,
    weighting: Weighting,
}

impl Default for LinkClusteringBuilder {
    fn default() -> Self {
        Self {
            mode: ClusteringMode::BestCut,
            weighting: Weighting::Unweighted,
        }
    }
}

impl LinkClusteringBuilder {
    /// Creates a builder for unweighted best-cut clustering.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{ClusteringMode, LinkClusteringBuilder, Weighting};
    ///
    /// let builder = LinkClusteringBuilder::new();
    /// assert_eq!(builder.mode(), ClusteringMode::BestCut);
    /// assert_eq!(builder.weighting(), Weighting::Unweighted);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clustering mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ClusteringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `with_mode(ClusteringMode::Threshold(threshold))`.
    #[must_use]
    pub fn with_threshold(self, threshold: f64) -> Self {
        self.with_mode(ClusteringMode::Threshold(threshold))
    }

    /// Returns the configured clustering mode.
    #[must_use]
    pub fn mode(&self) -> ClusteringMode {
        self.mode
    }

    /// Selects the similarity measure.
    #[must_use]
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Returns the configured weighting.
    #[must_use]
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Validates the configuration and constructs a [`LinkClustering`].
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidThreshold`] when a threshold is NaN or
    /// lies outside `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{LinkClusteringBuilder, LinkcomErrorCode};
    ///
    /// let err = LinkClusteringBuilder::new()
    ///     .with_threshold(1.5)
    ///     .build()
    ///     .expect_err("threshold above one is rejected");
    /// assert_eq!(err.code(), LinkcomErrorCode::InvalidThreshold);
    /// ```
    pub fn build(self) -> Result<LinkClustering> {
        validate_mode(self.mode)?;
        Ok(LinkClustering::new(self.mode, self.weighting))
    }
}

pub(crate) fn validate_mode(mode: ClusteringMode) -> Result<()> {
    match mode.threshold() {
        Some(threshold) if !(0.0..=1.0).contains(&threshold) => {
            Err(LinkcomError::InvalidThreshold { threshold })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::LinkcomErrorCode;

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn accepts_thresholds_in_unit_interval(#[case] threshold: f64) {
        let clustering = LinkClusteringBuilder::new()
            .with_threshold(threshold)
            .build()
            .expect("threshold is valid");
        assert_eq!(clustering.mode().threshold(), Some(threshold));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.000_1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_thresholds_outside_unit_interval(#[case] threshold: f64) {
        let err = LinkClusteringBuilder::new()
            .with_threshold(threshold)
            .build()
            .expect_err("threshold must be rejected");
        assert_eq!(err.code(), LinkcomErrorCode::InvalidThreshold);
    }

    #[test]
    fn later_mode_overrides_threshold() {
        let builder = LinkClusteringBuilder::new()
            .with_threshold(0.3)
            .with_mode(ClusteringMode::Dendrogram);
        assert_eq!(builder.mode(), ClusteringMode::Dendrogram);
        assert!(builder.build().is_ok());
    }
}
