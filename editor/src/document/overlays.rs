use crate::consts::{COLOR_ACCENT, LAYER_OUTLINE_STROKE_WIDTH};

use glam::{DAffine2, DVec2};
use linen::color::Color;
use linen::layers::style::{Fill, PathStyle, Stroke};
use linen::layers::{EllipseFigure, FigureDataType, PathFigure, RectangleFigure};
use linen::vector::VectorPath;
use linen::{Document, FigureId, LayerId};

const OVERLAY_LAYER: LayerId = 0;

/// The transient SVG layer tools draw their outline and decoration into.
///
/// Unlike the content document this is mutated synchronously: a tool needs
/// the id of an overlay it creates in the same call, and nothing else
/// observes overlay changes. Overlay shapes are unit geometry placed by an
/// absolute transform, so moving one is a transform update, not a rebuild.
#[derive(Debug, Default)]
pub struct OverlayDocument {
	document: Document,
}

impl OverlayDocument {
	/// Style for outline previews of figure geometry.
	pub fn outline_style() -> PathStyle {
		PathStyle::new(Some(Stroke::new(COLOR_ACCENT, LAYER_OUTLINE_STROKE_WIDTH)), Some(Fill::none()))
	}

	/// Style for decoration chrome such as handles and the marquee.
	pub fn decoration_style() -> PathStyle {
		PathStyle::new(Some(Stroke::new(COLOR_ACCENT, 2.)), Some(Fill::new(Color::WHITE)))
	}

	/// A unit rectangle from (0, 0) to (1, 1), placed via `set_transform`.
	pub fn add_rect(&mut self, style: PathStyle) -> FigureId {
		self.add(FigureDataType::Rectangle(RectangleFigure::new(DVec2::ZERO, DVec2::ONE)), style)
	}

	/// A unit ellipse inscribed in the unit square.
	pub fn add_ellipse(&mut self, style: PathStyle) -> FigureId {
		self.add(FigureDataType::Ellipse(EllipseFigure::new(DVec2::splat(0.5), DVec2::splat(0.5))), style)
	}

	/// A unit line from (0, 0) to (1, 0).
	pub fn add_line(&mut self, style: PathStyle) -> FigureId {
		self.add(FigureDataType::Path(PathFigure::new(VectorPath::new_line(DVec2::ZERO, DVec2::X))), style)
	}

	/// A free-form path overlay holding absolute coordinates.
	pub fn add_path(&mut self, path: VectorPath, style: PathStyle) -> FigureId {
		self.add(FigureDataType::Path(PathFigure::new(path)), style)
	}

	fn add(&mut self, data: FigureDataType, style: PathStyle) -> FigureId {
		self.layer_mut().add_figure(data, style)
	}

	/// Place an overlay with an absolute transform, replacing any previous
	/// placement rather than composing with it.
	pub fn set_transform(&mut self, figure_id: FigureId, transform: DAffine2) {
		if let Ok(figure) = self.layer_mut().figure_mut(figure_id) {
			figure.transform = Some(transform);
		} else {
			log::warn!("Overlay figure {figure_id} is missing for set_transform");
		}
	}

	pub fn set_path(&mut self, figure_id: FigureId, path: VectorPath) {
		match self.layer_mut().figure_mut(figure_id) {
			Ok(figure) => match &mut figure.data {
				FigureDataType::Path(path_figure) => path_figure.path = path,
				_ => log::warn!("Overlay figure {figure_id} is not a path"),
			},
			Err(_) => log::warn!("Overlay figure {figure_id} is missing for set_path"),
		}
	}

	pub fn set_visibility(&mut self, figure_id: FigureId, visible: bool) {
		if let Ok(figure) = self.layer_mut().figure_mut(figure_id) {
			figure.visible = visible;
		}
	}

	pub fn delete(&mut self, figure_id: FigureId) {
		if self.layer_mut().remove_figure(figure_id).is_err() {
			log::warn!("Overlay figure {figure_id} was already deleted");
		}
	}

	pub fn delete_all(&mut self, figure_ids: impl IntoIterator<Item = FigureId>) {
		for figure_id in figure_ids {
			self.delete(figure_id);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.layer().is_empty()
	}

	pub fn render(&self) -> String {
		self.document.render_root()
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	fn layer(&self) -> &linen::layers::Layer {
		self.document.layer(OVERLAY_LAYER).expect("The overlay document always has its layer")
	}

	fn layer_mut(&mut self) -> &mut linen::layers::Layer {
		self.document.layer_mut(OVERLAY_LAYER).expect("The overlay document always has its layer")
	}
}

/// Convert a box into the transform that maps the unit square onto it.
pub fn transform_from_box(pos1: DVec2, pos2: DVec2) -> DAffine2 {
	DAffine2::from_scale_angle_translation(pos2 - pos1, 0., pos1)
}

/// Place a small square marker centered on `position`.
pub fn marker_transform(position: DVec2, marker_size: f64) -> DAffine2 {
	DAffine2::from_scale_angle_translation(DVec2::splat(marker_size), 0., position - DVec2::splat(marker_size / 2.))
}

/// Place the unit line between two points.
pub fn line_transform(start: DVec2, end: DVec2) -> DAffine2 {
	let delta = end - start;
	DAffine2::from_scale_angle_translation(DVec2::splat(delta.length()), delta.y.atan2(delta.x), start)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn overlays_are_created_and_deleted_synchronously() {
		let mut overlays = OverlayDocument::default();
		let id = overlays.add_rect(OverlayDocument::decoration_style());
		overlays.set_transform(id, transform_from_box(DVec2::ZERO, DVec2::splat(10.)));
		assert!(!overlays.is_empty());
		overlays.delete(id);
		assert!(overlays.is_empty());
	}

	#[test]
	fn unit_box_transform_covers_the_target() {
		let transform = transform_from_box(DVec2::new(2., 3.), DVec2::new(6., 5.));
		assert_eq!(transform.transform_point2(DVec2::ZERO), DVec2::new(2., 3.));
		assert_eq!(transform.transform_point2(DVec2::ONE), DVec2::new(6., 5.));
	}
}
