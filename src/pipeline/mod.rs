//! Response resolution stages: JSON extraction with repair heuristics,
//! field normalization with fallback links, and marker-based splitting as
//! the degradation path for non-JSON output.

pub mod json_extract;
pub mod marker_split;
pub mod normalize;
