// HIT TESTING
/// Pointer distance within which a figure counts as hit.
pub const FIGURE_RANGE: f64 = 5.;

// GEOMETRY
pub const F64PRECISION: f64 = f64::EPSILON * 1000.; // for f64 comparisons
/// Flattening/nearest-point accuracy for bezier queries.
pub const CURVE_ACCURACY: f64 = 1e-4;

// RENDERING
pub const DEFAULT_FONT_SIZE: f64 = 14.;
