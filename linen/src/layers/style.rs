use crate::color::Color;

use serde::{Deserialize, Serialize};

const OPACITY_PRECISION: usize = 3;

fn format_opacity(name: &str, opacity: f32) -> String {
	if (opacity - 1.).abs() > 10_f32.powi(-(OPACITY_PRECISION as i32)) {
		format!(r#" {}-opacity="{:.precision$}""#, name, opacity, precision = OPACITY_PRECISION)
	} else {
		String::new()
	}
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fill {
	color: Option<Color>,
}

impl Fill {
	pub fn new(color: Color) -> Self {
		Self { color: Some(color) }
	}

	pub fn color(&self) -> Option<Color> {
		self.color
	}

	pub const fn none() -> Self {
		Self { color: None }
	}

	pub fn render(&self) -> String {
		match self.color {
			Some(color) => format!(r##" fill="#{}"{}"##, color.rgb_hex(), format_opacity("fill", color.a())),
			None => r#" fill="none""#.to_string(),
		}
	}
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stroke {
	color: Color,
	width: f32,
}

impl Stroke {
	pub const fn new(color: Color, width: f32) -> Self {
		Self { color, width }
	}

	pub fn color(&self) -> Color {
		self.color
	}

	pub fn width(&self) -> f32 {
		self.width
	}

	pub fn render(&self) -> String {
		format!(r##" stroke="#{}"{} stroke-width="{}""##, self.color.rgb_hex(), format_opacity("stroke", self.color.a()), self.width)
	}
}

/// The sparse visual attributes of a figure. An absent stroke or fill means
/// "none", not a default value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathStyle {
	stroke: Option<Stroke>,
	fill: Option<Fill>,
}

impl PathStyle {
	pub fn new(stroke: Option<Stroke>, fill: Option<Fill>) -> Self {
		Self { stroke, fill }
	}

	pub fn fill(&self) -> Option<Fill> {
		self.fill
	}

	pub fn stroke(&self) -> Option<Stroke> {
		self.stroke
	}

	pub fn set_fill(&mut self, fill: Fill) {
		self.fill = Some(fill);
	}

	pub fn set_stroke(&mut self, stroke: Stroke) {
		self.stroke = Some(stroke);
	}

	pub fn clear_fill(&mut self) {
		self.fill = None;
	}

	pub fn clear_stroke(&mut self) {
		self.stroke = None;
	}

	/// Whether hit testing should treat the interior as solid.
	pub fn is_filled(&self) -> bool {
		self.fill.map(|fill| fill.color().is_some()).unwrap_or_default()
	}

	pub fn render(&self) -> String {
		let fill_attribute = match self.fill {
			Some(fill) => fill.render(),
			None => Fill::none().render(),
		};
		let stroke_attribute = match self.stroke {
			Some(stroke) => stroke.render(),
			None => String::new(),
		};
		format!("{}{}", fill_attribute, stroke_attribute)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn render_omits_absent_attributes() {
		let style = PathStyle::new(None, Some(Fill::new(Color::from_rgb8(255, 0, 0))));
		let rendered = style.render();
		assert!(rendered.contains(r##"fill="#ff0000""##));
		assert!(!rendered.contains("stroke"));
	}

	#[test]
	fn fill_opacity_is_only_written_when_translucent() {
		let opaque = Fill::new(Color::from_rgba8(0, 0, 0, 255)).render();
		assert!(!opaque.contains("fill-opacity"));
		let translucent = Fill::new(Color::from_rgba8(0, 0, 0, 127)).render();
		assert!(translucent.contains("fill-opacity"));
	}
}
