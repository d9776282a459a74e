//! Error types for the linkcom core library.
//!
//! Defines the error enum exposed by the public API, the shape violations
//! reported by the graph adapter and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Reasons a graph is rejected as not simple and undirected.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphShapeViolation {
    /// An edge joined a node to itself.
    #[error("self-loop on node {node}")]
    SelfLoop {
        /// Debug rendering of the offending node.
        node: Arc<str>,
    },
    /// The same undirected edge was supplied more than once.
    #[error("parallel edge between {left} and {right}")]
    ParallelEdge {
        /// Smaller endpoint of the repeated edge.
        left: Arc<str>,
        /// Larger endpoint of the repeated edge.
        right: Arc<str>,
    },
    /// An edge was not stored with its endpoints in canonical order.
    #[error("edge ({left}, {right}) is not in canonical order")]
    NonCanonicalEdge {
        /// First endpoint as supplied.
        left: Arc<str>,
        /// Second endpoint as supplied.
        right: Arc<str>,
    },
    /// The adjacency map listed a neighbour without the reverse entry.
    #[error("adjacency is not symmetric: {node} lists {neighbour} but not vice versa")]
    AsymmetricAdjacency {
        /// Node whose neighbour set contained `neighbour`.
        node: Arc<str>,
        /// Neighbour missing the reverse entry.
        neighbour: Arc<str>,
    },
    /// The edge set and the adjacency map disagree.
    #[error("edge ({left}, {right}) is not reflected in the adjacency map")]
    AdjacencyMismatch {
        /// Smaller endpoint of the mismatched edge.
        left: Arc<str>,
        /// Larger endpoint of the mismatched edge.
        right: Arc<str>,
    },
}

/// Error type produced when building graphs or running link clustering.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinkcomError {
    /// The supplied graph is not simple and undirected.
    #[error("invalid graph shape: {violation}")]
    InvalidGraphShape {
        /// What made the graph invalid.
        #[source]
        violation: GraphShapeViolation,
    },
    /// Weighted clustering was requested but an edge carries no weight.
    #[error("edge {edge} has no weight but weighted clustering was requested")]
    InconsistentWeights {
        /// Debug rendering of the unweighted edge.
        edge: Arc<str>,
    },
    /// An edge weight was non-finite or not strictly positive.
    #[error("edge {edge} has invalid weight {weight}; weights must be finite and positive")]
    InvalidWeight {
        /// Debug rendering of the offending edge.
        edge: Arc<str>,
        /// Weight supplied for the edge.
        weight: f64,
    },
    /// A similarity threshold fell outside `[0, 1]`.
    #[error("similarity threshold must lie in [0, 1] (got {threshold})")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`LinkcomError`] variants.
    enum LinkcomErrorCode for LinkcomError {
        /// The supplied graph is not simple and undirected.
        InvalidGraphShape => InvalidGraphShape { .. } => "LINKCOM_INVALID_GRAPH_SHAPE",
        /// Weighted clustering was requested but an edge carries no weight.
        InconsistentWeights => InconsistentWeights { .. } => "LINKCOM_INCONSISTENT_WEIGHTS",
        /// An edge weight was non-finite or not strictly positive.
        InvalidWeight => InvalidWeight { .. } => "LINKCOM_INVALID_WEIGHT",
        /// A similarity threshold fell outside `[0, 1]`.
        InvalidThreshold => InvalidThreshold { .. } => "LINKCOM_INVALID_THRESHOLD",
    }
}

impl LinkcomError {
    /// Retrieve the [`GraphShapeViolation`] when the error stems from the graph adapter.
    #[must_use]
    pub const fn shape_violation(&self) -> Option<&GraphShapeViolation> {
        match self {
            Self::InvalidGraphShape { violation } => Some(violation),
            _ => None,
        }
    }

    pub(crate) fn shape(violation: GraphShapeViolation) -> Self {
        Self::InvalidGraphShape { violation }
    }
}

/// Renders a node or edge for inclusion in an error message.
pub(crate) fn describe<T: fmt::Debug>(value: &T) -> Arc<str> {
    Arc::from(format!("{value:?}"))
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, LinkcomError>;
