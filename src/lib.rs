//! Automatic placement of labels on a 2-D map: per-feature candidate cost
//! finalisation, then a combinatorial solver (greedy FALP seed followed by
//! an ejection chain local search) picking at most one candidate per
//! feature under pairwise conflict constraints.

// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// geometric helpers for candidate rectangles and obstacle geometry
pub mod geometry;

/// features, obstacles and their settings
pub mod feature;

/// candidate placements (the arena elements)
pub mod label_position;

/// solve context: conflict oracle, cancellation, engine settings
pub mod engine;

/// spatial index over candidate bounding boxes
pub mod rtree;

/// bounded min-heap keyed by overlap counts
pub mod queue;

/// obstacle penalties and candidate cost finalisation
pub mod cost;

/// the label placement optimisation problem and its solver
pub mod problem;

/// crate error types
pub mod error;

/// read/write label placement instances & solutions (JSON)
pub mod instance;

/// helper and utility methods for executables
pub mod util;
