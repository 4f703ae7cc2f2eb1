use bitflags::bitflags;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A position in editor space: already corrected for scroll offset and zoom
/// by whatever hosts the canvas. Origin is the top left.
pub type ViewportPosition = DVec2;

bitflags! {
	#[derive(Default, Serialize, Deserialize)]
	#[repr(transparent)]
	pub struct MouseKeys: u8 {
		const LEFT   = 0b0000_0001;
		const RIGHT  = 0b0000_0010;
		const MIDDLE = 0b0000_0100;
	}
}

bitflags! {
	#[derive(Default, Serialize, Deserialize)]
	#[repr(transparent)]
	pub struct ModifierKeys: u8 {
		const SHIFT           = 0b0000_0001;
		const ALT             = 0b0000_0010;
		const CONTROL         = 0b0000_0100;
		const META_OR_COMMAND = 0b0000_1000;
	}
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseState {
	pub position: ViewportPosition,
	pub mouse_keys: MouseKeys,
}

impl MouseState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_position(x: f64, y: f64) -> Self {
		Self {
			position: DVec2::new(x, y),
			mouse_keys: MouseKeys::default(),
		}
	}
}
