use linen::color::Color;

// SELECT TOOL
/// Hit tolerance around a figure, shared with the document model's range.
pub const SELECTION_TOLERANCE: f64 = linen::consts::FIGURE_RANGE;
pub const DRAG_THRESHOLD: f64 = 1.;

// TRANSFORM CAGE
pub const RESIZE_HANDLE_SIZE: f64 = 6.;
pub const HANDLE_HIT_RADIUS: f64 = 5.;
/// How far outside a scale handle its rotate hit zone sits.
pub const ROTATE_HANDLE_OFFSET: f64 = 12.;
pub const ROTATE_HANDLE_HIT_RADIUS: f64 = 7.;
/// Below this original extent an axis no longer produces a scale factor.
pub const BOUNDS_EPSILON: f64 = 1e-6;

// PEN TOOL
/// Pointer distance to the first anchor that closes the path.
pub const CLOSE_PATH_THRESHOLD: f64 = 8.;

// PATH TOOL
pub const VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE: f64 = 6.;
pub const MANIPULATOR_SELECT_THRESHOLD: f64 = 6.;

// OVERLAYS
pub const COLOR_ACCENT: Color = Color::ACCENT;
pub const LAYER_OUTLINE_STROKE_WIDTH: f32 = 1.;

// TOOLS
pub const DEFAULT_STROKE_WIDTH: f32 = 2.;
