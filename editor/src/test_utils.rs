use crate::input::keyboard::Key;
use crate::input::mouse::{ModifierKeys, MouseKeys, MouseState};
use crate::message_prelude::*;
use crate::Editor;

use glam::DVec2;
use linen::layers::style::{Fill, PathStyle, Stroke};
use linen::layers::FigureDataType;
use linen::layers::RectangleFigure;
use linen::{FigureId, Operation};

/// Drives an editor with synthetic input for tests.
pub struct EditorTestUtils {
	pub editor: Editor,
}

impl EditorTestUtils {
	pub fn new() -> Self {
		Self { editor: Editor::new() }
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pointer_down_modifiers(x, y, ModifierKeys::empty());
	}

	pub fn pointer_down_modifiers(&mut self, x: f64, y: f64, modifier_keys: ModifierKeys) {
		let mut mouse_state = MouseState::from_position(x, y);
		mouse_state.mouse_keys = MouseKeys::LEFT;
		self.editor.handle_message(InputPreprocessorMessage::PointerDown { mouse_state, modifier_keys });
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let mut mouse_state = MouseState::from_position(x, y);
		mouse_state.mouse_keys = MouseKeys::LEFT;
		self.editor.handle_message(InputPreprocessorMessage::PointerMove {
			mouse_state,
			modifier_keys: ModifierKeys::empty(),
		});
	}

	pub fn pointer_up(&mut self, x: f64, y: f64) {
		self.editor.handle_message(InputPreprocessorMessage::PointerUp {
			mouse_state: MouseState::from_position(x, y),
			modifier_keys: ModifierKeys::empty(),
		});
	}

	pub fn key_down(&mut self, key: Key) {
		self.editor.handle_message(InputPreprocessorMessage::KeyDown {
			key,
			modifier_keys: ModifierKeys::empty(),
		});
	}

	pub fn key_up(&mut self, key: Key) {
		self.editor.handle_message(InputPreprocessorMessage::KeyUp {
			key,
			modifier_keys: ModifierKeys::empty(),
		});
	}

	pub fn drag(&mut self, from: DVec2, to: DVec2) {
		self.pointer_down(from.x, from.y);
		self.pointer_move(to.x, to.y);
		self.pointer_up(to.x, to.y);
	}

	pub fn click(&mut self, x: f64, y: f64) {
		self.pointer_down(x, y);
		self.pointer_up(x, y);
	}

	pub fn activate_tool(&mut self, tool_type: ToolType) {
		self.editor.handle_message(ToolMessage::ActivateTool { tool_type });
	}

	/// Add an axis-aligned rectangle figure directly to the document,
	/// returning its id.
	pub fn add_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> FigureId {
		let layer_id = self.editor.active_layer();
		self.editor.handle_message(Operation::AddFigure {
			layer_id,
			data: FigureDataType::Rectangle(RectangleFigure::from_corners(DVec2::new(x0, y0), DVec2::new(x1, y1))),
			style: PathStyle::new(
				Some(Stroke::new(linen::color::Color::BLACK, 1.)),
				Some(Fill::new(linen::color::Color::WHITE)),
			),
		});
		*self
			.editor
			.document()
			.layer(layer_id)
			.unwrap()
			.figure_ids()
			.last()
			.expect("add_rect did not create a figure")
	}

	pub fn select(&mut self, figure_ids: Vec<FigureId>) {
		self.editor.handle_message(DocumentMessage::SetSelectedFigures(figure_ids));
	}

	pub fn figure_bounds(&self, figure_id: FigureId) -> [DVec2; 2] {
		self.editor
			.document()
			.figure(self.editor.active_layer(), figure_id)
			.unwrap()
			.bounding_box()
			.expect("figure has no bounds")
	}

	/// Combined bounds of everything currently in the overlay document.
	pub fn overlay_bounds(&self) -> Option<[DVec2; 2]> {
		let layer = self.editor.overlay_document().layer(0).unwrap();
		layer.combined_bounding_box(layer.figure_ids().iter())
	}
}
