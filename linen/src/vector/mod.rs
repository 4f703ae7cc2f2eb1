pub mod anchor;
pub mod manipulator;
pub mod vector_path;

pub use anchor::{Anchor, AnchorKind, ControlPoint, HandleMirroring};
pub use manipulator::ManipulatorType;
pub use vector_path::VectorPath;
