// The interaction core of the Easel vector editor. The embedder feeds raw
// pointer/keyboard events in through [`Editor::handle_message`] and receives
// frontend messages (rendered SVG, selection changes) back; everything in
// between runs synchronously on the caller's thread.

pub mod communication;
pub mod consts;
pub mod document;
pub mod error;
pub mod frontend;
pub mod input;
pub mod tool;

#[cfg(test)]
pub mod test_utils;

pub use communication::Message;
pub use error::EditorError;

use communication::Dispatcher;
use frontend::FrontendMessage;
use tool::ToolType;

pub mod message_prelude {
	pub use crate::communication::message::Message;
	pub use crate::document::document_message_handler::DocumentMessage;
	pub use crate::frontend::FrontendMessage;
	pub use crate::input::input_mapper::InputMapperMessage;
	pub use crate::input::input_preprocessor::InputPreprocessorMessage;
	pub use crate::tool::tools::path_tool::PathToolMessage;
	pub use crate::tool::tools::pen_tool::PenToolMessage;
	pub use crate::tool::tools::select_tool::SelectToolMessage;
	pub use crate::tool::tools::shape_tool::ShapeToolMessage;
	pub use crate::tool::tools::text_tool::TextToolMessage;
	pub use crate::tool::{ToolMessage, ToolType};

	pub use std::collections::VecDeque;
}

pub struct Editor {
	dispatcher: Dispatcher,
}

impl Default for Editor {
	fn default() -> Self {
		Self::new()
	}
}

impl Editor {
	pub fn new() -> Self {
		Self { dispatcher: Dispatcher::new() }
	}

	/// Process a message and every follow-up it generates, returning the
	/// frontend messages produced along the way.
	pub fn handle_message<T: Into<Message>>(&mut self, message: T) -> Vec<FrontendMessage> {
		self.dispatcher.handle_message(message);
		std::mem::take(&mut self.dispatcher.responses)
	}

	pub fn document(&self) -> &linen::Document {
		&self.dispatcher.document_handler.document
	}

	pub fn active_layer(&self) -> linen::LayerId {
		self.dispatcher.document_handler.active_layer
	}

	pub fn selected_figures(&self) -> Vec<linen::FigureId> {
		self.dispatcher.document_handler.selected_figures().to_vec()
	}

	pub fn active_tool(&self) -> ToolType {
		self.dispatcher.tool_state.tool_data.active_tool_type
	}

	/// The transient overlay document holding tool outlines and decoration.
	pub fn overlay_document(&self) -> &linen::Document {
		self.dispatcher.overlays.document()
	}
}
