use crate::consts::DEFAULT_STROKE_WIDTH;
use crate::document::overlays::OverlayDocument;
use crate::input::mouse::ViewportPosition;
use crate::message_prelude::*;
use crate::tool::{Fsm, ToolActionHandler, ToolActionHandlerData};

use linen::layers::style::{Fill, PathStyle, Stroke};
use linen::layers::{EllipseFigure, FigureData, FigureDataType, RectangleFigure};
use linen::{FigureId, Operation};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct ShapeTool {
	fsm_state: ShapeToolFsmState,
	data: ShapeToolData,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum ShapeType {
	#[default]
	Rectangle,
	Ellipse,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum ShapeToolMessage {
	DragStart,
	PointerMove,
	DragStop,
	Abort,
	SetShape(ShapeType),
}

impl From<ShapeToolMessage> for ToolMessage {
	fn from(message: ShapeToolMessage) -> Self {
		ToolMessage::Shape(message)
	}
}

impl From<ShapeToolMessage> for Message {
	fn from(message: ShapeToolMessage) -> Self {
		ToolMessage::Shape(message).into()
	}
}

impl ToolActionHandler for ShapeTool {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		self.fsm_state = self.fsm_state.transition(message, &mut self.data, data, responses);
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ShapeToolFsmState {
	#[default]
	Ready,
	Drawing,
}

#[derive(Default)]
struct ShapeToolData {
	shape_type: ShapeType,
	drag_start: ViewportPosition,
	/// The figure being sized, not yet part of the document.
	figure: Option<FigureDataType>,
	outline: Option<FigureId>,
}

impl ShapeToolData {
	fn new_figure(&self) -> FigureDataType {
		match self.shape_type {
			ShapeType::Rectangle => FigureDataType::Rectangle(RectangleFigure::new(self.drag_start, glam::DVec2::ZERO)),
			ShapeType::Ellipse => FigureDataType::Ellipse(EllipseFigure::new(self.drag_start, glam::DVec2::ZERO)),
		}
	}

	fn update_outline(&mut self, overlays: &mut OverlayDocument) {
		let Some(figure) = &self.figure else { return };
		let Ok(path) = figure.inner().outline_path() else { return };
		match self.outline {
			Some(outline) => overlays.set_path(outline, path),
			None => self.outline = Some(overlays.add_path(path, OverlayDocument::outline_style())),
		}
	}

	fn cleanup(&mut self, overlays: &mut OverlayDocument) {
		if let Some(outline) = self.outline.take() {
			overlays.delete(outline);
		}
		self.figure = None;
	}
}

impl Fsm for ShapeToolFsmState {
	type ToolData = ShapeToolData;

	fn transition(self, message: ToolMessage, data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self {
		use ShapeToolFsmState::*;
		use ShapeToolMessage::*;

		let ToolMessage::Shape(message) = message else {
			return self;
		};
		match (self, message) {
			(_, SetShape(shape_type)) => {
				data.shape_type = shape_type;
				self
			}
			(Ready, DragStart) => {
				data.drag_start = transition_data.input.mouse.position;
				data.figure = Some(data.new_figure());
				data.update_outline(transition_data.overlays);
				Drawing
			}
			(Drawing, PointerMove) => {
				// Live resizing drags the corner opposite the press; a size
				// that has gone negative is only normalized at commit
				if let Some(figure) = &mut data.figure {
					figure.inner_mut().set_handle_position(2, transition_data.input.mouse.position);
				}
				data.update_outline(transition_data.overlays);
				Drawing
			}
			(Drawing, DragStop) => {
				let figure = data.figure.take();
				data.cleanup(transition_data.overlays);
				if let Some(mut figure) = figure {
					let degenerate = match &mut figure {
						FigureDataType::Rectangle(rectangle) => {
							rectangle.normalize();
							rectangle.size == glam::DVec2::ZERO
						}
						FigureDataType::Ellipse(ellipse) => {
							ellipse.normalize();
							ellipse.radii == glam::DVec2::ZERO
						}
						_ => true,
					};
					if !degenerate {
						let style = PathStyle::new(
							Some(Stroke::new(transition_data.global_tool_data.primary_color, DEFAULT_STROKE_WIDTH)),
							Some(Fill::new(transition_data.global_tool_data.secondary_color)),
						);
						responses.push_back(
							Operation::AddFigure {
								layer_id: transition_data.document.active_layer,
								data: figure,
								style,
							}
							.into(),
						);
					}
				}
				Ready
			}
			(_, Abort) => {
				data.cleanup(transition_data.overlays);
				Ready
			}
			_ => self,
		}
	}
}

#[cfg(test)]
mod test {
	use super::ShapeType;
	use crate::message_prelude::*;
	use crate::test_utils::EditorTestUtils;

	use glam::DVec2;
	use linen::layers::FigureDataType;

	#[test]
	fn dragging_backwards_normalizes_the_origin() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Shape);

		test.drag(DVec2::new(10., 10.), DVec2::new(4., 2.));

		let layer = test.editor.document().layer(0).unwrap();
		let figure = layer.figures().next().expect("the drag should have committed a rectangle");
		let FigureDataType::Rectangle(rectangle) = &figure.data else {
			panic!("expected a rectangle figure");
		};
		assert_eq!(rectangle.origin, DVec2::new(4., 2.));
		assert_eq!(rectangle.size, DVec2::new(6., 8.));
	}

	#[test]
	fn ellipse_mode_commits_an_ellipse() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Shape);
		test.editor.handle_message(ShapeToolMessage::SetShape(ShapeType::Ellipse));

		test.drag(DVec2::new(0., 0.), DVec2::new(20., 10.));

		let layer = test.editor.document().layer(0).unwrap();
		let figure = layer.figures().next().expect("the drag should have committed an ellipse");
		let FigureDataType::Ellipse(ellipse) = &figure.data else {
			panic!("expected an ellipse figure");
		};
		assert_eq!(ellipse.center, DVec2::new(10., 5.));
		assert_eq!(ellipse.radii, DVec2::new(10., 5.));
	}

	#[test]
	fn a_click_without_a_drag_creates_nothing() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Shape);

		test.click(10., 10.);

		assert!(test.editor.document().layer(0).unwrap().is_empty());
		assert!(test.overlay_bounds().is_none());
	}

	#[test]
	fn the_model_only_changes_on_release() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Shape);

		test.pointer_down(10., 10.);
		test.pointer_move(40., 30.);
		assert!(test.editor.document().layer(0).unwrap().is_empty());
		assert!(test.overlay_bounds().is_some());

		test.pointer_up(40., 30.);
		assert_eq!(test.editor.document().layer(0).unwrap().figure_ids().len(), 1);
		assert!(test.overlay_bounds().is_none());
	}
}
