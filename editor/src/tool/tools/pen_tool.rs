use crate::consts::{CLOSE_PATH_THRESHOLD, DEFAULT_STROKE_WIDTH, DRAG_THRESHOLD, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE};
use crate::document::overlays::{marker_transform, OverlayDocument};
use crate::input::keyboard::Key;
use crate::message_prelude::*;
use crate::tool::{Fsm, ToolActionHandler, ToolActionHandlerData};

use glam::DVec2;
use linen::layers::style::{Fill, PathStyle, Stroke};
use linen::layers::{FigureDataType, PathFigure};
use linen::vector::{Anchor, ManipulatorType, VectorPath};
use linen::{FigureId, Operation};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct PenTool {
	fsm_state: PenToolFsmState,
	data: PenToolData,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum PenToolMessage {
	DragStart,
	PointerMove,
	DragStop,
	Confirm,
	Abort,
}

impl From<PenToolMessage> for ToolMessage {
	fn from(message: PenToolMessage) -> Self {
		ToolMessage::Pen(message)
	}
}

impl From<PenToolMessage> for Message {
	fn from(message: PenToolMessage) -> Self {
		ToolMessage::Pen(message).into()
	}
}

impl ToolActionHandler for PenTool {
	fn process_message(&mut self, message: ToolMessage, data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		self.fsm_state = self.fsm_state.transition(message, &mut self.data, data, responses);
	}
}

/// The pen's interaction states. The `Down*` states hold while the pointer
/// button is down; which one is entered depends on whether the press lands
/// on empty canvas or back on the first anchor, and dragging promotes the
/// `Add` variants to their `Drag` counterparts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PenToolFsmState {
	#[default]
	Ready,
	DownAddFirstAnchor,
	DownDragFirstAnchor,
	Active,
	DownAddAnchor,
	DownDragAnchor,
	DownDragEdge,
	DownCloseEdge,
	DragCloseEdge,
	DownCloseCurve,
	DragCloseCurve,
}

#[derive(Default)]
struct PenToolData {
	/// The committed path: mutated only when the pointer is released.
	path: VectorPath,
	/// Where the in-flight press started; the position of the anchor being
	/// placed.
	drag_begin: DVec2,
	/// The in handle frozen at the moment symmetry was broken with Alt.
	frozen_in_handle: Option<DVec2>,
	outline: Option<FigureId>,
	first_anchor_marker: Option<FigureId>,
}

impl PenToolData {
	/// The anchor the in-flight press would commit, per state.
	fn pending_anchor(&self, state: PenToolFsmState, pointer: DVec2) -> Option<Anchor> {
		match state {
			PenToolFsmState::DownAddFirstAnchor | PenToolFsmState::DownAddAnchor => Some(Anchor::new(self.drag_begin)),
			PenToolFsmState::DownDragFirstAnchor | PenToolFsmState::DownDragAnchor => Some(Anchor::new_symmetric(self.drag_begin, pointer)),
			PenToolFsmState::DownDragEdge => {
				let in_handle = self.frozen_in_handle.unwrap_or(self.drag_begin);
				Some(Anchor::new_with_handles(self.drag_begin, in_handle, pointer))
			}
			_ => None,
		}
	}

	/// The full preview: committed anchors, the in-flight anchor and the
	/// rubber segment to the pointer.
	fn build_preview(&self, state: PenToolFsmState, pointer: DVec2) -> VectorPath {
		let mut preview = self.path.clone();
		match state {
			PenToolFsmState::Active => {
				if !preview.is_empty() {
					preview.push_anchor(Anchor::new(pointer));
				}
			}
			PenToolFsmState::DownCloseEdge | PenToolFsmState::DownCloseCurve => {
				preview.closed = true;
			}
			PenToolFsmState::DragCloseEdge | PenToolFsmState::DragCloseCurve => {
				preview.closed = true;
				shape_closing_anchor(&mut preview, pointer);
			}
			state => {
				if let Some(anchor) = self.pending_anchor(state, pointer) {
					preview.push_anchor(anchor);
				}
			}
		}
		preview
	}

	fn update_overlays(&mut self, state: PenToolFsmState, pointer: DVec2, overlays: &mut OverlayDocument) {
		let preview = self.build_preview(state, pointer);
		match self.outline {
			Some(outline) => overlays.set_path(outline, preview),
			None => self.outline = Some(overlays.add_path(preview, OverlayDocument::outline_style())),
		}

		if let Some(first) = self.path.first_anchor_position() {
			let marker = *self
				.first_anchor_marker
				.get_or_insert_with(|| overlays.add_rect(OverlayDocument::decoration_style()));
			overlays.set_transform(marker, marker_transform(first, VECTOR_MANIPULATOR_ANCHOR_MARKER_SIZE));
		}
	}

	fn cleanup(&mut self, overlays: &mut OverlayDocument) {
		if let Some(outline) = self.outline.take() {
			overlays.delete(outline);
		}
		if let Some(marker) = self.first_anchor_marker.take() {
			overlays.delete(marker);
		}
		self.path = VectorPath::new();
		self.frozen_in_handle = None;
	}

	fn near_first_anchor(&self, pointer: DVec2) -> bool {
		self.path
			.first_anchor_position()
			.map(|first| first.distance(pointer) <= CLOSE_PATH_THRESHOLD)
			.unwrap_or(false)
	}

	fn commit_figure(&mut self, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) {
		let path = std::mem::take(&mut self.path);
		let style = PathStyle::new(
			Some(Stroke::new(transition_data.global_tool_data.primary_color, DEFAULT_STROKE_WIDTH)),
			Some(Fill::none()),
		);
		responses.push_back(
			Operation::AddFigure {
				layer_id: transition_data.document.active_layer,
				data: FigureDataType::Path(PathFigure::new(path)),
				style,
			}
			.into(),
		);
		self.cleanup(transition_data.overlays);
	}
}

/// While closing, the drag shapes the incoming closing curve: the first
/// anchor's in handle becomes the point reflection of the pointer, and a
/// mirrored out handle follows it.
fn shape_closing_anchor(path: &mut VectorPath, pointer: DVec2) {
	let Some(first) = path.anchor_mut(0) else { return };
	let anchor = first.anchor_position();
	let reflected = anchor - (pointer - anchor);
	if first.position(ManipulatorType::OutHandle).is_some() {
		first.set_point_position(ManipulatorType::InHandle, reflected);
		first.update_mirrored_partner(ManipulatorType::InHandle);
	} else {
		first.set_point_position(ManipulatorType::InHandle, reflected);
	}
}

impl Fsm for PenToolFsmState {
	type ToolData = PenToolData;

	fn transition(self, message: ToolMessage, data: &mut Self::ToolData, transition_data: &mut ToolActionHandlerData, responses: &mut VecDeque<Message>) -> Self {
		use PenToolFsmState::*;
		use PenToolMessage::*;

		let ToolMessage::Pen(message) = message else {
			return self;
		};
		let pointer = transition_data.input.mouse.position;
		let alt_held = transition_data.input.keyboard.get(Key::KeyAlt as usize);

		let next = match (self, message) {
			(Ready, DragStart) => {
				data.drag_begin = pointer;
				DownAddFirstAnchor
			}
			(DownAddFirstAnchor, PointerMove) => {
				if pointer.distance(data.drag_begin) > DRAG_THRESHOLD {
					DownDragFirstAnchor
				} else {
					DownAddFirstAnchor
				}
			}
			(DownAddFirstAnchor, DragStop) => {
				data.path.push_anchor(Anchor::new(data.drag_begin));
				Active
			}
			(DownDragFirstAnchor, PointerMove) => DownDragFirstAnchor,
			(DownDragFirstAnchor, DragStop) => {
				data.path.push_anchor(Anchor::new_symmetric(data.drag_begin, pointer));
				Active
			}
			(Active, PointerMove) => Active,
			(Active, DragStart) => {
				data.drag_begin = pointer;
				if data.near_first_anchor(pointer) && data.path.len() >= 2 {
					// The closing segment's shape follows the first anchor:
					// an anchor that still carries handles closes with a curve
					let first_is_edge = data.path.anchor(0).map(|anchor| anchor.kind() == linen::vector::AnchorKind::Edge).unwrap_or(true);
					if first_is_edge {
						DownCloseEdge
					} else {
						DownCloseCurve
					}
				} else {
					DownAddAnchor
				}
			}
			(DownAddAnchor, PointerMove) => {
				if pointer.distance(data.drag_begin) > DRAG_THRESHOLD {
					if alt_held {
						data.frozen_in_handle = Some(data.drag_begin);
						DownDragEdge
					} else {
						DownDragAnchor
					}
				} else {
					DownAddAnchor
				}
			}
			(DownAddAnchor, DragStop) => {
				data.path.push_anchor(Anchor::new(data.drag_begin));
				Active
			}
			(DownDragAnchor, PointerMove) => {
				if alt_held {
					// Breaking symmetry freezes the in handle where the
					// mirror last placed it
					data.frozen_in_handle = Some(data.drag_begin - (pointer - data.drag_begin));
					DownDragEdge
				} else {
					DownDragAnchor
				}
			}
			(DownDragAnchor, DragStop) => {
				data.path.push_anchor(Anchor::new_symmetric(data.drag_begin, pointer));
				Active
			}
			(DownDragEdge, PointerMove) => {
				if alt_held {
					DownDragEdge
				} else {
					data.frozen_in_handle = None;
					DownDragAnchor
				}
			}
			(DownDragEdge, DragStop) => {
				let in_handle = data.frozen_in_handle.take().unwrap_or(data.drag_begin);
				data.path.push_anchor(Anchor::new_with_handles(data.drag_begin, in_handle, pointer));
				Active
			}
			(DownCloseEdge, PointerMove) => {
				if pointer.distance(data.drag_begin) > DRAG_THRESHOLD {
					DragCloseEdge
				} else {
					DownCloseEdge
				}
			}
			(DownCloseCurve, PointerMove) => {
				if pointer.distance(data.drag_begin) > DRAG_THRESHOLD {
					DragCloseCurve
				} else {
					DownCloseCurve
				}
			}
			(DragCloseEdge, PointerMove) | (DragCloseCurve, PointerMove) => self,
			(DownCloseEdge, DragStop) | (DownCloseCurve, DragStop) => {
				data.path.closed = true;
				data.commit_figure(transition_data, responses);
				Ready
			}
			(DragCloseEdge, DragStop) | (DragCloseCurve, DragStop) => {
				data.path.closed = true;
				shape_closing_anchor(&mut data.path, pointer);
				data.commit_figure(transition_data, responses);
				Ready
			}
			(Active, Confirm) => {
				if data.path.len() >= 2 {
					data.commit_figure(transition_data, responses);
				} else {
					data.cleanup(transition_data.overlays);
				}
				Ready
			}
			(_, Abort) => {
				data.cleanup(transition_data.overlays);
				Ready
			}
			_ => self,
		};

		if next != Ready {
			data.update_overlays(next, pointer, transition_data.overlays);
		}
		next
	}
}

#[cfg(test)]
mod test {
	use crate::input::keyboard::Key;
	use crate::message_prelude::*;
	use crate::test_utils::EditorTestUtils;

	use glam::DVec2;
	use linen::layers::FigureDataType;
	use linen::vector::{AnchorKind, ManipulatorType};

	fn committed_path(test: &EditorTestUtils) -> linen::vector::VectorPath {
		let layer = test.editor.document().layer(0).unwrap();
		let figure = layer.figures().next().expect("the pen should have committed a figure");
		match &figure.data {
			FigureDataType::Path(path) => path.path.clone(),
			other => panic!("expected a path figure, got {other:?}"),
		}
	}

	#[test]
	fn clicked_anchors_close_into_an_edge_path() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Pen);

		test.click(10., 10.);
		test.click(50., 10.);
		// Still a preview: nothing has reached the document model
		assert!(test.editor.document().layer(0).unwrap().is_empty());

		test.click(50., 50.);
		// Clicking back on the first anchor closes and commits
		test.click(10., 10.);

		let path = committed_path(&test);
		assert!(path.closed);
		assert_eq!(path.len(), 3);
		assert!(path.anchors.iter().all(|anchor| anchor.kind() == AnchorKind::Edge));
	}

	#[test]
	fn dragged_anchors_carry_mirrored_handles() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Pen);

		test.drag(DVec2::new(10., 10.), DVec2::new(30., 20.));
		test.click(60., 10.);
		test.key_down(Key::KeyEnter);

		let path = committed_path(&test);
		assert!(!path.closed);
		assert_eq!(path.len(), 2);

		let first = &path.anchors[0];
		assert_eq!(first.kind(), AnchorKind::Symmetric);
		assert_eq!(first.position(ManipulatorType::OutHandle), Some(DVec2::new(30., 20.)));
		// Point reflection through the anchor
		assert_eq!(first.position(ManipulatorType::InHandle), Some(DVec2::new(-10., 0.)));
		assert_eq!(path.anchors[1].kind(), AnchorKind::Edge);
	}

	#[test]
	fn escape_discards_the_pending_path() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Pen);

		test.click(10., 10.);
		test.click(50., 10.);
		test.key_down(Key::KeyEscape);

		assert!(test.editor.document().layer(0).unwrap().is_empty());
		assert!(test.overlay_bounds().is_none());
	}

	#[test]
	fn confirm_with_a_single_anchor_commits_nothing() {
		let mut test = EditorTestUtils::new();
		test.activate_tool(ToolType::Pen);

		test.click(10., 10.);
		test.key_down(Key::KeyEnter);

		assert!(test.editor.document().layer(0).unwrap().is_empty());
	}
}
