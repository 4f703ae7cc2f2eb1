use crate::consts::{MANIPULATOR_SELECT_THRESHOLD, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE};
use crate::document::overlays::{line_transform, marker_transform, OverlayDocument};
use crate::message_prelude::*;
use crate::tool::{Fsm, ToolActionHandler, ToolActionHandlerData};

use glam::{DAffine2, DVec2};
use linen::layers::FigureDataType;
use linen::vector::{ManipulatorType, VectorPath};
use linen::{FigureId, Operation};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct PathTool {
	fsm_state: PathToolFsmState,
	data: PathToolData,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PathToolMessage {
	DragStart,
	PointerMove,
	DragStop,
	Abort,
	SelectionChanged,
	DocumentIsDirty,
}

impl From<PathToolMessage> for ToolMessage {
	fn from(message: PathToolMessage) -> Self {
		ToolMessage::Path(message)
	}
}

impl From<PathToolMessage> for Message {
	fn from(message: PathToolMessage) -> Self {
		ToolMessage::Path(message).into()
	}
}

impl ToolActionHandler for PathTool {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		self.fsm_state = self.fsm_state.transition(message, &mut self.data, data, responses);
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PathToolFsmState {
	#[default]
	Ready,
	Dragging,
}

/// One selected path figure under edit: the committed figure stays in the
/// document while `outline` is the clone every drag mutates. Only a commit
/// writes the outline back.
struct EditedShape {
	figure_id: FigureId,
	/// Maps the figure's intrinsic space into the viewport.
	transform: DAffine2,
	outline: VectorPath,
	outline_overlay: FigureId,
	anchor_markers: Vec<(FigureId, usize)>,
	handle_markers: Vec<(FigureId, usize, ManipulatorType)>,
	handle_lines: Vec<(FigureId, usize, ManipulatorType)>,
}

#[derive(Default)]
struct PathToolData {
	shapes: Vec<EditedShape>,
	/// The grabbed point: shape index, anchor index and which manipulator.
	dragging: Option<(usize, usize, ManipulatorType)>,
}

impl PathToolData {
	fn cleanup(&mut self, overlays: &mut OverlayDocument) {
		for shape in self.shapes.drain(..) {
			overlays.delete(shape.outline_overlay);
			overlays.delete_all(shape.anchor_markers.into_iter().map(|(overlay, _)| overlay));
			overlays.delete_all(shape.handle_markers.into_iter().map(|(overlay, ..)| overlay));
			overlays.delete_all(shape.handle_lines.into_iter().map(|(overlay, ..)| overlay));
		}
		self.dragging = None;
	}

	/// Rebuild the anchor and handle markers from the current selection.
	fn refresh_overlays(&mut self, transition_data: &mut ToolActionHandlerData) {
		self.cleanup(transition_data.overlays);

		for &figure_id in transition_data.document.selected_figures() {
			let Ok(figure) = transition_data.document.document.figure(transition_data.document.active_layer, figure_id) else {
				continue;
			};
			let FigureDataType::Path(path_figure) = &figure.data else {
				continue;
			};

			let transform = figure.local_transform();
			let outline = path_figure.path.clone();
			let overlays = &mut *transition_data.overlays;
			let outline_overlay = overlays.add_path(outline.transformed(transform), OverlayDocument::outline_style());

			let mut shape = EditedShape {
				figure_id,
				transform,
				outline,
				outline_overlay,
				anchor_markers: Vec::new(),
				handle_markers: Vec::new(),
				handle_lines: Vec::new(),
			};

			for (anchor_index, anchor) in shape.outline.anchors.iter().enumerate() {
				let anchor_position = transform.transform_point2(anchor.anchor_position());
				for manipulator_type in [ManipulatorType::InHandle, ManipulatorType::OutHandle] {
					let Some(handle) = anchor.position(manipulator_type) else { continue };
					let handle_position = transform.transform_point2(handle);

					let line = overlays.add_line(OverlayDocument::outline_style());
					overlays.set_transform(line, line_transform(anchor_position, handle_position));
					shape.handle_lines.push((line, anchor_index, manipulator_type));

					let marker = overlays.add_ellipse(OverlayDocument::decoration_style());
					overlays.set_transform(marker, marker_transform(handle_position, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE));
					shape.handle_markers.push((marker, anchor_index, manipulator_type));
				}
				let marker = overlays.add_rect(OverlayDocument::decoration_style());
				overlays.set_transform(marker, marker_transform(anchor_position, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE));
				shape.anchor_markers.push((marker, anchor_index));
			}

			self.shapes.push(shape);
		}
	}

	/// The closest grabbable point within the select threshold. Anchors win
	/// ties against handles at the same distance.
	fn closest_point(&self, cursor: DVec2) -> Option<(usize, usize, ManipulatorType)> {
		let mut closest: Option<(f64, (usize, usize, ManipulatorType))> = None;
		let mut consider = |distance: f64, candidate: (usize, usize, ManipulatorType)| {
			if distance <= MANIPULATOR_SELECT_THRESHOLD && closest.map(|(best, _)| distance < best).unwrap_or(true) {
				closest = Some((distance, candidate));
			}
		};

		for (shape_index, shape) in self.shapes.iter().enumerate() {
			for (anchor_index, anchor) in shape.outline.anchors.iter().enumerate() {
				let anchor_position = shape.transform.transform_point2(anchor.anchor_position());
				consider(anchor_position.distance(cursor), (shape_index, anchor_index, ManipulatorType::Anchor));
				for manipulator_type in [ManipulatorType::InHandle, ManipulatorType::OutHandle] {
					if let Some(handle) = anchor.position(manipulator_type) {
						let handle_position = shape.transform.transform_point2(handle);
						consider(handle_position.distance(cursor), (shape_index, anchor_index, manipulator_type));
					}
				}
			}
		}
		closest.map(|(_, candidate)| candidate)
	}

	/// Move the grabbed point in intrinsic space and re-place the affected
	/// shape's overlays.
	fn drag_to(&mut self, cursor: DVec2, overlays: &mut OverlayDocument) {
		let Some((shape_index, anchor_index, manipulator_type)) = self.dragging else {
			return;
		};
		let Some(shape) = self.shapes.get_mut(shape_index) else {
			return;
		};
		if shape.transform.matrix2.determinant() == 0. {
			log::warn!("Singular figure transform while editing anchors");
			return;
		}
		let local = shape.transform.inverse().transform_point2(cursor);
		if let Some(anchor) = shape.outline.anchor_mut(anchor_index) {
			anchor.move_point(manipulator_type, local);
		}

		overlays.set_path(shape.outline_overlay, shape.outline.transformed(shape.transform));
		for (overlay, anchor_index) in &shape.anchor_markers {
			if let Some(anchor) = shape.outline.anchor(*anchor_index) {
				let position = shape.transform.transform_point2(anchor.anchor_position());
				overlays.set_transform(*overlay, marker_transform(position, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE));
			}
		}
		for (overlay, anchor_index, manipulator_type) in &shape.handle_markers {
			if let Some(handle) = shape.outline.anchor(*anchor_index).and_then(|anchor| anchor.position(*manipulator_type)) {
				let position = shape.transform.transform_point2(handle);
				overlays.set_transform(*overlay, marker_transform(position, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE));
			}
		}
		for (overlay, anchor_index, manipulator_type) in &shape.handle_lines {
			if let Some(anchor) = shape.outline.anchor(*anchor_index) {
				if let Some(handle) = anchor.position(*manipulator_type) {
					let anchor_position = shape.transform.transform_point2(anchor.anchor_position());
					let handle_position = shape.transform.transform_point2(handle);
					overlays.set_transform(*overlay, line_transform(anchor_position, handle_position));
				}
			}
		}
	}
}

impl Fsm for PathToolFsmState {
	type ToolData = PathToolData;

	fn transition(self, message: ToolMessage, data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self {
		use PathToolFsmState::*;
		use PathToolMessage::*;

		let ToolMessage::Path(message) = message else {
			return self;
		};
		match (self, message) {
			(Ready, SelectionChanged | DocumentIsDirty) => {
				data.refresh_overlays(transition_data);
				Ready
			}
			(Ready, DragStart) => match data.closest_point(transition_data.input.mouse.position) {
				Some(grabbed) => {
					data.dragging = Some(grabbed);
					Dragging
				}
				None => Ready,
			},
			(Dragging, PointerMove) => {
				data.drag_to(transition_data.input.mouse.position, transition_data.overlays);
				Dragging
			}
			(Dragging, DragStop) => {
				if let Some((shape_index, ..)) = data.dragging.take() {
					if let Some(shape) = data.shapes.get(shape_index) {
						responses.push_back(
							Operation::SetPathGeometry {
								layer_id: transition_data.document.active_layer,
								figure_id: shape.figure_id,
								path: shape.outline.clone(),
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
	use crate::message_prelude::*;
	use crate::test_utils::EditorTestUtils;

	use glam::DVec2;
	use linen::layers::style::PathStyle;
	use linen::layers::{FigureDataType, PathFigure};
	use linen::vector::{Anchor, ManipulatorType, VectorPath};
	use linen::Operation;

	fn add_path_figure(test: &mut EditorTestUtils) -> linen::FigureId {
		let mut path = VectorPath::new();
		path.push_anchor(Anchor::new_symmetric(DVec2::new(50., 50.), DVec2::new(60., 50.)));
		path.push_anchor(Anchor::new(DVec2::new(100., 50.)));
		test.editor.handle_message(Operation::AddFigure {
			layer_id: 0,
			data: FigureDataType::Path(PathFigure::new(path)),
			style: PathStyle::default(),
		});
		*test.editor.document().layer(0).unwrap().figure_ids().last().unwrap()
	}

	fn figure_path(test: &EditorTestUtils, figure_id: linen::FigureId) -> VectorPath {
		match &test.editor.document().figure(0, figure_id).unwrap().data {
			FigureDataType::Path(path) => path.path.clone(),
			other => panic!("expected a path figure, got {other:?}"),
		}
	}

	#[test]
	fn dragging_a_handle_mirrors_its_partner_preview_and_commit() {
		let mut test = EditorTestUtils::new();
		let figure_id = add_path_figure(&mut test);
		test.activate_tool(ToolType::Path);
		test.select(vec![figure_id]);

		// Grab the out handle and pull it down
		test.pointer_down(60., 50.);
		test.pointer_move(60., 60.);

		// Outline only: the committed figure still has the original handles
		let unchanged = figure_path(&test, figure_id);
		assert_eq!(unchanged.anchors[0].position(ManipulatorType::InHandle), Some(DVec2::new(40., 50.)));

		test.pointer_up(60., 60.);

		let committed = figure_path(&test, figure_id);
		assert_eq!(committed.anchors[0].position(ManipulatorType::OutHandle), Some(DVec2::new(60., 60.)));
		// in = anchor - (out - anchor)
		assert_eq!(committed.anchors[0].position(ManipulatorType::InHandle), Some(DVec2::new(40., 40.)));
	}

	#[test]
	fn dragging_an_anchor_carries_its_handles_rigidly() {
		let mut test = EditorTestUtils::new();
		let figure_id = add_path_figure(&mut test);
		test.activate_tool(ToolType::Path);
		test.select(vec![figure_id]);

		test.drag(DVec2::new(50., 50.), DVec2::new(55., 45.));

		let committed = figure_path(&test, figure_id);
		assert_eq!(committed.anchors[0].anchor_position(), DVec2::new(55., 45.));
		assert_eq!(committed.anchors[0].position(ManipulatorType::OutHandle), Some(DVec2::new(65., 45.)));
		assert_eq!(committed.anchors[0].position(ManipulatorType::InHandle), Some(DVec2::new(45., 45.)));
	}

	#[test]
	fn pressing_on_empty_canvas_grabs_nothing() {
		let mut test = EditorTestUtils::new();
		let figure_id = add_path_figure(&mut test);
		test.activate_tool(ToolType::Path);
		test.select(vec![figure_id]);

		let before = figure_path(&test, figure_id);
		test.drag(DVec2::new(200., 200.), DVec2::new(210., 210.));
		assert_eq!(figure_path(&test, figure_id), before);
	}
}
