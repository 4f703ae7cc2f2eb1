use crate::document::{DocumentMessageHandler, OverlayDocument};
use crate::frontend::FrontendMessage;
use crate::input::{input_mapper, InputPreprocessor};
use crate::message_prelude::*;
use crate::tool::{message_to_tool_type, standard_tool_message, StandardToolMessageType, ToolActionHandlerData, ToolFsmState};

/// Routes messages to their handlers until the queue is drained. Messages a
/// handler generates are processed depth first: they run before anything
/// that was already queued behind the message that produced them.
pub struct Dispatcher {
	message_queue: VecDeque<Message>,
	pub responses: Vec<FrontendMessage>,
	pub input_preprocessor: InputPreprocessor,
	pub document_handler: DocumentMessageHandler,
	pub overlays: OverlayDocument,
	pub tool_state: ToolFsmState,
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::new()
	}
}

impl Dispatcher {
	pub fn new() -> Self {
		Self {
			message_queue: VecDeque::new(),
			responses: Vec::new(),
			input_preprocessor: InputPreprocessor::default(),
			document_handler: DocumentMessageHandler::default(),
			overlays: OverlayDocument::default(),
			tool_state: ToolFsmState::new(),
		}
	}

	pub fn handle_message<T: Into<Message>>(&mut self, message: T) {
		self.message_queue.push_back(message.into());

		while let Some(message) = self.message_queue.pop_front() {
			self.process_message(message);
		}
	}

	fn process_message(&mut self, message: Message) {
		let mut queue = VecDeque::new();

		match message {
			Message::NoOp => {}
			Message::InputPreprocessor(message) => self.input_preprocessor.process_message(message, &mut queue),
			Message::InputMapper(message) => {
				queue.extend(input_mapper::map(message, self.tool_state.tool_data.active_tool_type));
			}
			Message::Tool(message) => self.process_tool_message(message, &mut queue),
			Message::Document(message) => self.document_handler.process_message(message, &self.overlays, &mut queue),
			Message::Frontend(message) => self.responses.push(message),
		}

		for message in queue.into_iter().rev() {
			self.message_queue.push_front(message);
		}
	}

	fn process_tool_message(&mut self, message: ToolMessage, queue: &mut VecDeque<Message>) {
		match message {
			ToolMessage::ActivateTool { tool_type } => {
				let old_tool = self.tool_state.tool_data.active_tool_type;
				if old_tool == tool_type {
					return;
				}
				// Always deactivate before activating: the old tool's abort
				// releases its outline and decoration overlays
				if let Some(abort) = standard_tool_message(old_tool, StandardToolMessageType::Abort) {
					self.run_tool(old_tool, abort, queue);
				}
				self.tool_state.tool_data.active_tool_type = tool_type;
				queue.push_back(FrontendMessage::UpdateActiveTool { tool_type }.into());
				if let Some(selection_changed) = standard_tool_message(tool_type, StandardToolMessageType::SelectionChanged) {
					self.run_tool(tool_type, selection_changed, queue);
				}
				queue.push_back(DocumentMessage::RenderDocument.into());
			}
			ToolMessage::SelectionChanged => {
				let active = self.tool_state.tool_data.active_tool_type;
				if let Some(message) = standard_tool_message(active, StandardToolMessageType::SelectionChanged) {
					self.run_tool(active, message, queue);
				}
			}
			ToolMessage::DocumentIsDirty => {
				let active = self.tool_state.tool_data.active_tool_type;
				if let Some(message) = standard_tool_message(active, StandardToolMessageType::DocumentIsDirty) {
					self.run_tool(active, message, queue);
				}
			}
			message => match message_to_tool_type(&message) {
				Some(tool_type) => self.run_tool(tool_type, message, queue),
				None => log::warn!("Tool message {message:?} has no owning tool"),
			},
		}
	}

	fn run_tool(&mut self, tool_type: crate::tool::ToolType, message: ToolMessage, queue: &mut VecDeque<Message>) {
		let ToolFsmState { document_tool_data, tool_data } = &mut self.tool_state;
		let Some(tool) = tool_data.tool_mut(tool_type) else {
			log::warn!("The tool {tool_type} is not initialized");
			return;
		};
		let mut data = ToolActionHandlerData {
			document: &self.document_handler,
			overlays: &mut self.overlays,
			global_tool_data: document_tool_data,
			input: &self.input_preprocessor,
		};
		tool.process_message(message, &mut data, queue);
	}
}
