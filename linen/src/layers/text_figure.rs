use super::rectangle_figure::{corner_handle, move_corner_handle};
use super::style::PathStyle;
use super::FigureData;
use crate::consts::DEFAULT_FONT_SIZE;
use crate::vector::VectorPath;
use crate::DocumentError;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use std::fmt::Write;

/// A text box figure. Layout and word wrapping belong to an external text
/// engine; this renders the raw string into the box and hit-tests against
/// the box outline only.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextFigure {
	pub origin: DVec2,
	pub size: DVec2,
	pub text: String,
	pub font_size: f64,
}

impl TextFigure {
	pub fn new(origin: DVec2, size: DVec2, text: impl Into<String>) -> Self {
		Self {
			origin,
			size,
			text: text.into(),
			font_size: DEFAULT_FONT_SIZE,
		}
	}

	pub fn normalize(&mut self) {
		let corner = self.origin + self.size;
		let origin = self.origin;
		self.origin = origin.min(corner);
		self.size = (corner - origin).abs();
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

impl FigureData for TextFigure {
	fn render(&self, svg: &mut String, transform: DAffine2, style: &PathStyle) {
		let [a, b, c, d, e, f] = transform.to_cols_array();
		let baseline = self.origin + DVec2::new(0., self.font_size);
		let _ = write!(
			svg,
			r#"<text transform="matrix({a},{b},{c},{d},{e},{f})" x="{}" y="{}" font-size="{}"{}>{}</text>"#,
			baseline.x,
			baseline.y,
			self.font_size,
			style.render(),
			escape_text(&self.text)
		);
	}

	fn outline_path(&self) -> Result<VectorPath, DocumentError> {
		Ok(VectorPath::new_rect(self.origin, self.origin + self.size))
	}

	/// Glyph geometry lives outside this model, so the matrix is always
	/// tracked rather than folded into the box.
	fn transform(&mut self, _transform: DAffine2) -> bool {
		false
	}

	fn handle_position(&self, index: usize) -> Option<DVec2> {
		corner_handle(self.origin, self.size, index)
	}

	fn set_handle_position(&mut self, index: usize, position: DVec2) {
		let (origin, size) = move_corner_handle(self.origin, self.size, index, position);
		self.origin = origin;
		self.size = size;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn markup_is_escaped() {
		let text = TextFigure::new(DVec2::ZERO, DVec2::splat(50.), "a < b & c");
		let mut svg = String::new();
		text.render(&mut svg, DAffine2::IDENTITY, &PathStyle::default());
		assert!(svg.contains("a &lt; b &amp; c"));
	}

	#[test]
	fn transform_is_always_tracked() {
		let mut text = TextFigure::new(DVec2::ZERO, DVec2::splat(50.), "x");
		assert!(!text.transform(DAffine2::from_translation(DVec2::X)));
	}
}
