use crate::consts::SELECTION_TOLERANCE;
use crate::document::overlays::{transform_from_box, OverlayDocument};
use crate::input::keyboard::Key;
use crate::input::mouse::ViewportPosition;
use crate::message_prelude::*;
use crate::tool::transformation_cage::{BoundingBoxOverlays, SelectedEdges};
use crate::tool::{Fsm, ToolActionHandler, ToolActionHandlerData};

use glam::{DAffine2, DVec2};
use linen::FigureId;
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct SelectTool {
	fsm_state: SelectToolFsmState,
	data: SelectToolData,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum SelectToolMessage {
	DragStart,
	PointerMove,
	DragStop,
	Abort,
	SelectionChanged,
	DocumentIsDirty,
}

impl From<SelectToolMessage> for ToolMessage {
	fn from(message: SelectToolMessage) -> Self {
		ToolMessage::Select(message)
	}
}

impl From<SelectToolMessage> for Message {
	fn from(message: SelectToolMessage) -> Self {
		ToolMessage::Select(message).into()
	}
}

impl ToolActionHandler for SelectTool {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		self.fsm_state = self.fsm_state.transition(message, &mut self.data, data, responses);
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum SelectToolFsmState {
	#[default]
	Ready,
	Dragging,
	DrawingBox,
	ResizingBounds,
	RotatingBounds,
}

#[derive(Default)]
struct SelectToolData {
	drag_start: ViewportPosition,
	drag_current: ViewportPosition,
	bounding_box_overlays: Option<BoundingBoxOverlays>,
	/// The marquee rectangle overlay while box-selecting.
	drag_box: Option<FigureId>,
	/// Outline previews of the figures the marquee currently contains.
	marquee_preview: Vec<FigureId>,
	/// Outline silhouettes of the dragged figures during a transform.
	outline_pool: Vec<FigureId>,
	rotation_center: DVec2,
	initial_mouse_angle: f64,
}

impl SelectToolData {
	fn selection_box(&self) -> [DVec2; 2] {
		[self.drag_start.min(self.drag_current), self.drag_start.max(self.drag_current)]
	}

	/// Create outline overlays for the figures a drag is about to move.
	/// `pending` is a figure whose selection message is still queued, so it
	/// must be included (or, without shift, stand alone) already.
	fn spawn_outlines(&mut self, transition_data: &mut ToolActionHandlerData, pending: Option<FigureId>, additive: bool) {
		let mut outlines = if pending.is_some() && !additive {
			Vec::new()
		} else {
			transition_data.document.selected_figure_outlines()
		};
		if let Some(figure_id) = pending {
			if !outlines.iter().any(|(id, _)| *id == figure_id) {
				if let Ok(figure) = transition_data.document.document.figure(transition_data.document.active_layer, figure_id) {
					if let Ok(outline) = figure.viewport_outline_path() {
						outlines.push((figure_id, outline));
					}
				}
			}
		}
		for (_, outline) in outlines {
			self.outline_pool.push(transition_data.overlays.add_path(outline, OverlayDocument::outline_style()));
		}
	}

	fn preview_transform(&mut self, overlays: &mut OverlayDocument, transform: DAffine2) {
		for overlay in &self.outline_pool {
			overlays.set_transform(*overlay, transform);
		}
		if let Some(cage) = &mut self.bounding_box_overlays {
			cage.update_overlays(overlays, Some(transform));
		}
	}

	fn clear_gesture_overlays(&mut self, overlays: &mut OverlayDocument) {
		overlays.delete_all(self.outline_pool.drain(..));
		overlays.delete_all(self.marquee_preview.drain(..));
		if let Some(drag_box) = self.drag_box.take() {
			overlays.delete(drag_box);
		}
	}

	fn refresh_bounding_box(&mut self, transition_data: &mut ToolActionHandlerData) {
		match transition_data.document.selection_boundary() {
			Some((bounds, transform)) => {
				let cage = self.bounding_box_overlays.get_or_insert_with(BoundingBoxOverlays::default);
				cage.bounds = bounds;
				cage.transform = transform;
				cage.update_overlays(transition_data.overlays, None);
			}
			None => {
				if let Some(mut cage) = self.bounding_box_overlays.take() {
					cage.delete(transition_data.overlays);
				}
			}
		}
	}

	fn resize_transform(&self, edges: &SelectedEdges, cage_transform: DAffine2, mouse: DVec2) -> DAffine2 {
		if cage_transform.matrix2.determinant() == 0. {
			log::warn!("Singular boundary transform while resizing");
			return DAffine2::IDENTITY;
		}
		// Scale in the boundary's local frame, then map back to the viewport
		let local_mouse = cage_transform.inverse().transform_point2(mouse);
		cage_transform * edges.scale_transform(local_mouse) * cage_transform.inverse()
	}

	fn rotate_transform(&self, mouse: DVec2) -> DAffine2 {
		let angle = angle_of(mouse - self.rotation_center) - self.initial_mouse_angle;
		DAffine2::from_translation(self.rotation_center) * DAffine2::from_angle(angle) * DAffine2::from_translation(-self.rotation_center)
	}
}

fn angle_of(vector: DVec2) -> f64 {
	vector.y.atan2(vector.x)
}

impl Fsm for SelectToolFsmState {
	type ToolData = SelectToolData;

	fn transition(self, message: ToolMessage, data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self {
		use SelectToolFsmState::*;
		use SelectToolMessage::*;

		let ToolMessage::Select(message) = message else {
			return self;
		};
		match (self, message) {
			(Ready, DragStart) => {
				let mouse = transition_data.input.mouse.position;
				data.drag_start = mouse;
				data.drag_current = mouse;

				// Handles take priority over figures under the cursor
				if let Some(handle) = data.bounding_box_overlays.as_ref().and_then(|cage| cage.check_handle(mouse)) {
					data.spawn_outlines(transition_data, None, true);
					let cage = data.bounding_box_overlays.as_mut().expect("A handle was hit without a bounding box");
					if handle < 8 {
						cage.selected_edges = SelectedEdges::from_handle_index(handle, cage.bounds);
						return ResizingBounds;
					}
					data.rotation_center = cage.center_viewport();
					data.initial_mouse_angle = angle_of(mouse - data.rotation_center);
					return RotatingBounds;
				}

				let additive = transition_data.input.keyboard.get(Key::KeyShift as usize);
				match transition_data.document.figure_at(mouse, SELECTION_TOLERANCE) {
					Some(figure_id) => {
						if !transition_data.document.is_selected(figure_id) {
							let message = if additive {
								DocumentMessage::AddSelectedFigures(vec![figure_id])
							} else {
								DocumentMessage::SetSelectedFigures(vec![figure_id])
							};
							responses.push_back(message.into());
							data.spawn_outlines(transition_data, Some(figure_id), additive);
							// The old cage no longer matches the selection;
							// it returns at commit via the refresh
							if let Some(mut cage) = data.bounding_box_overlays.take() {
								cage.delete(transition_data.overlays);
							}
						} else {
							data.spawn_outlines(transition_data, None, true);
						}
						Dragging
					}
					None => {
						if !additive {
							responses.push_back(DocumentMessage::DeselectAllFigures.into());
						}
						let drag_box = transition_data.overlays.add_rect(OverlayDocument::outline_style());
						transition_data.overlays.set_transform(drag_box, transform_from_box(mouse, mouse));
						data.drag_box = Some(drag_box);
						DrawingBox
					}
				}
			}
			(Dragging, PointerMove) => {
				data.drag_current = transition_data.input.mouse.position;
				let translation = DAffine2::from_translation(data.drag_current - data.drag_start);
				data.preview_transform(transition_data.overlays, translation);
				Dragging
			}
			(Dragging, DragStop) => {
				let delta = transition_data.input.mouse.position - data.drag_start;
				data.clear_gesture_overlays(transition_data.overlays);
				if delta != DVec2::ZERO {
					responses.push_back(
						DocumentMessage::TransformSelection {
							transform: DAffine2::from_translation(delta).to_cols_array(),
						}
						.into(),
					);
				} else {
					// A plain click: the selection settled during DragStart,
					// so the cage can be placed right away
					data.refresh_bounding_box(transition_data);
				}
				Ready
			}
			(DrawingBox, PointerMove) => {
				data.drag_current = transition_data.input.mouse.position;
				let [min, max] = data.selection_box();
				if let Some(drag_box) = data.drag_box {
					transition_data.overlays.set_transform(drag_box, transform_from_box(min, max));
				}

				// Preview which figures the marquee fully contains; they are
				// not part of the selection until release
				transition_data.overlays.delete_all(data.marquee_preview.drain(..));
				let contained = transition_data.document.figures_contained_in([min, max]);
				for figure_id in contained {
					if transition_data.document.is_selected(figure_id) {
						continue;
					}
					let Ok(figure) = transition_data.document.document.figure(transition_data.document.active_layer, figure_id) else {
						continue;
					};
					if let Ok(outline) = figure.viewport_outline_path() {
						data.marquee_preview.push(transition_data.overlays.add_path(outline, OverlayDocument::outline_style()));
					}
				}
				DrawingBox
			}
			(DrawingBox, DragStop) => {
				data.drag_current = transition_data.input.mouse.position;
				let contained = transition_data.document.figures_contained_in(data.selection_box());
				data.clear_gesture_overlays(transition_data.overlays);
				if !contained.is_empty() {
					responses.push_back(DocumentMessage::AddSelectedFigures(contained).into());
				}
				Ready
			}
			(ResizingBounds, PointerMove) => {
				data.drag_current = transition_data.input.mouse.position;
				let dragged_edges = data
					.bounding_box_overlays
					.as_ref()
					.and_then(|cage| cage.selected_edges.clone().map(|edges| (edges, cage.transform)));
				if let Some((edges, cage_transform)) = dragged_edges {
					let preview = data.resize_transform(&edges, cage_transform, data.drag_current);
					data.preview_transform(transition_data.overlays, preview);
				}
				ResizingBounds
			}
			(ResizingBounds, DragStop) => {
				let mouse = transition_data.input.mouse.position;
				let transform = data
					.bounding_box_overlays
					.as_ref()
					.and_then(|cage| cage.selected_edges.clone().map(|edges| data.resize_transform(&edges, cage.transform, mouse)));
				data.clear_gesture_overlays(transition_data.overlays);
				if let Some(cage) = &mut data.bounding_box_overlays {
					cage.selected_edges = None;
				}
				if let Some(transform) = transform {
					responses.push_back(DocumentMessage::TransformSelection { transform: transform.to_cols_array() }.into());
				}
				Ready
			}
			(RotatingBounds, PointerMove) => {
				data.drag_current = transition_data.input.mouse.position;
				let preview = data.rotate_transform(data.drag_current);
				data.preview_transform(transition_data.overlays, preview);
				RotatingBounds
			}
			(RotatingBounds, DragStop) => {
				let transform = data.rotate_transform(transition_data.input.mouse.position);
				data.clear_gesture_overlays(transition_data.overlays);
				responses.push_back(DocumentMessage::TransformSelection { transform: transform.to_cols_array() }.into());
				Ready
			}
			(_, Abort) => {
				data.clear_gesture_overlays(transition_data.overlays);
				if let Some(mut cage) = data.bounding_box_overlays.take() {
					cage.delete(transition_data.overlays);
				}
				Ready
			}
			(state, SelectionChanged | DocumentIsDirty) => {
				// Mid-gesture the cage is previewed by the gesture itself
				if state == Ready {
					data.refresh_bounding_box(transition_data);
				}
				state
			}
			_ => self,
		}
	}
}

#[cfg(test)]
mod test {
	use crate::consts::ROTATE_HANDLE_OFFSET;
	use crate::input::keyboard::Key;
	use crate::input::mouse::ModifierKeys;
	use crate::test_utils::EditorTestUtils;

	use glam::{DAffine2, DVec2};

	fn rotate_about(point: DVec2, center: DVec2, angle: f64) -> DVec2 {
		center + DAffine2::from_angle(angle).transform_vector2(point - center)
	}

	#[test]
	fn dragging_previews_in_the_outline_and_commits_on_release() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(10., 10., 30., 30.);

		test.pointer_down(20., 20.);
		test.pointer_move(40., 25.);

		// The document model is untouched while the pointer is down
		assert_eq!(test.figure_bounds(rect), [DVec2::new(10., 10.), DVec2::new(30., 30.)]);
		// The outline overlay reflects the drag delta of (20, 5)
		let overlay = test.overlay_bounds().expect("a drag must show an outline");
		assert!((overlay[0] - DVec2::new(30., 15.)).length() < 1e-9);
		assert!((overlay[1] - DVec2::new(50., 35.)).length() < 1e-9);

		test.pointer_up(40., 25.);
		assert_eq!(test.figure_bounds(rect), [DVec2::new(30., 15.), DVec2::new(50., 35.)]);
	}

	#[test]
	fn clicking_selects_and_empty_click_deselects() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(10., 10., 30., 30.);

		test.click(20., 20.);
		assert_eq!(test.editor.selected_figures(), vec![rect]);

		test.click(200., 200.);
		assert!(test.editor.selected_figures().is_empty());
	}

	#[test]
	fn shift_click_is_additive() {
		let mut test = EditorTestUtils::new();
		let first = test.add_rect(10., 10., 30., 30.);
		let second = test.add_rect(50., 10., 70., 30.);

		test.click(20., 20.);
		test.pointer_down_modifiers(60., 20., ModifierKeys::SHIFT);
		test.pointer_up(60., 20.);

		assert_eq!(test.editor.selected_figures(), vec![first, second]);
	}

	#[test]
	fn nw_scale_handle_resizes_against_the_fixed_corner() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(50., 50., 70., 80.);
		test.select(vec![rect]);

		// Grab the top-left scale handle and drag it to (40, 65)
		test.drag(DVec2::new(50., 50.), DVec2::new(40., 65.));

		let bounds = test.figure_bounds(rect);
		assert!((bounds[0] - DVec2::new(40., 65.)).length() < 1e-9);
		assert!((bounds[1] - DVec2::new(70., 80.)).length() < 1e-9);
	}

	#[test]
	fn two_eighth_turns_compose_to_a_quarter_turn() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(0., 0., 20., 20.);
		test.select(vec![rect]);

		let center = DVec2::new(10., 10.);
		let eighth = std::f64::consts::FRAC_PI_8;

		for gesture in 0..2 {
			// The rotate zone sits outside the intrinsic top-left corner,
			// pushed along the boundary transform of the previous rotation
			let corner = rotate_about(DVec2::ZERO, center, gesture as f64 * eighth);
			let grab = corner + (corner - center).normalize() * ROTATE_HANDLE_OFFSET;
			test.drag(grab, rotate_about(grab, center, eighth));
		}

		let expected = DAffine2::from_translation(center) * DAffine2::from_angle(std::f64::consts::FRAC_PI_4) * DAffine2::from_translation(-center);
		let figure = test.editor.document().figure(0, rect).unwrap();
		let actual = figure.transform.expect("rotation must be tracked in the figure matrix");
		assert!((actual.translation - expected.translation).length() < 1e-6);
		assert!((actual.matrix2.x_axis - expected.matrix2.x_axis).length() < 1e-6);
		assert!((actual.matrix2.y_axis - expected.matrix2.y_axis).length() < 1e-6);
	}

	#[test]
	fn marquee_requires_exact_containment() {
		let mut test = EditorTestUtils::new();
		// A cross: two figures entirely inside the marquee-to-be, four arms
		// that only partially overlap it
		let center_top = test.add_rect(38., 38., 62., 48.);
		let center_bottom = test.add_rect(38., 52., 62., 62.);
		let _left = test.add_rect(20., 40., 45., 60.);
		let _right = test.add_rect(55., 40., 80., 60.);
		let _top = test.add_rect(40., 20., 60., 45.);
		let _bottom = test.add_rect(40., 55., 60., 80.);

		test.drag(DVec2::new(33., 33.), DVec2::new(67., 67.));

		let mut selected = test.editor.selected_figures();
		selected.sort_unstable();
		assert_eq!(selected, vec![center_top, center_bottom]);
	}

	#[test]
	fn marquee_preview_outlines_are_not_a_selection() {
		let mut test = EditorTestUtils::new();
		test.add_rect(10., 10., 20., 20.);

		test.pointer_down(50., 50.);
		test.pointer_move(5., 5.);
		// Contained figure is previewed but not selected yet
		assert!(test.editor.selected_figures().is_empty());
		assert!(test.overlay_bounds().is_some());

		test.pointer_up(5., 5.);
		assert_eq!(test.editor.selected_figures().len(), 1);
	}

	#[test]
	fn delete_removes_figures_and_clears_the_selection() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(10., 10., 30., 30.);
		test.select(vec![rect]);

		test.key_down(Key::KeyDelete);

		assert!(test.editor.document().layer(0).unwrap().is_empty());
		assert!(test.editor.selected_figures().is_empty());
	}

	#[test]
	fn escape_aborts_without_touching_the_model() {
		let mut test = EditorTestUtils::new();
		let rect = test.add_rect(10., 10., 30., 30.);

		test.pointer_down(20., 20.);
		test.pointer_move(90., 90.);
		test.key_down(Key::KeyEscape);

		assert_eq!(test.figure_bounds(rect), [DVec2::new(10., 10.), DVec2::new(30., 30.)]);
		// Releasing afterwards must not commit either
		test.pointer_up(90., 90.);
		assert_eq!(test.figure_bounds(rect), [DVec2::new(10., 10.), DVec2::new(30., 30.)]);
	}
}
