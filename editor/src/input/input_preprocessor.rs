use super::keyboard::{Key, KeyStates};
use super::mouse::{ModifierKeys, MouseState};
use crate::message_prelude::*;

use serde::{Deserialize, Serialize};

/// Raw events from the host canvas. Positions are editor-space coordinates,
/// already corrected for scroll offset and zoom.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum InputPreprocessorMessage {
	PointerDown { mouse_state: MouseState, modifier_keys: ModifierKeys },
	PointerMove { mouse_state: MouseState, modifier_keys: ModifierKeys },
	PointerUp { mouse_state: MouseState, modifier_keys: ModifierKeys },
	KeyDown { key: Key, modifier_keys: ModifierKeys },
	KeyUp { key: Key, modifier_keys: ModifierKeys },
	/// Window blur or pointer capture loss: any gesture in flight must abort.
	Blur,
}

impl From<InputPreprocessorMessage> for Message {
	fn from(message: InputPreprocessorMessage) -> Self {
		Message::InputPreprocessor(message)
	}
}

/// Tracks the live pointer and keyboard state and turns raw events into
/// mapper events. The single-gesture ordering contract (down, zero or more
/// moves, up) is enforced here: an `up` without a preceding `down` is
/// dropped, so tools can assume the ordering holds whatever the event source.
#[derive(Debug, Default)]
pub struct InputPreprocessor {
	pub mouse: MouseState,
	pub keyboard: KeyStates,
	pointer_gesture_active: bool,
}

impl InputPreprocessor {
	pub fn process_message(&mut self, message: InputPreprocessorMessage, responses: &mut VecDeque<Message>) {
		match message {
			InputPreprocessorMessage::PointerDown { mouse_state, modifier_keys } => {
				self.handle_modifier_keys(modifier_keys);
				self.mouse = mouse_state;
				if self.pointer_gesture_active {
					log::warn!("Pointer down received while a gesture is already in flight");
				}
				self.pointer_gesture_active = true;
				responses.push_back(InputMapperMessage::PointerDown.into());
			}
			InputPreprocessorMessage::PointerMove { mouse_state, modifier_keys } => {
				self.handle_modifier_keys(modifier_keys);
				self.mouse = mouse_state;
				responses.push_back(InputMapperMessage::PointerMove.into());
			}
			InputPreprocessorMessage::PointerUp { mouse_state, modifier_keys } => {
				self.handle_modifier_keys(modifier_keys);
				self.mouse = mouse_state;
				if !self.pointer_gesture_active {
					log::warn!("Dropping pointer up that has no matching pointer down");
					return;
				}
				self.pointer_gesture_active = false;
				responses.push_back(InputMapperMessage::PointerUp.into());
			}
			InputPreprocessorMessage::KeyDown { key, modifier_keys } => {
				self.handle_modifier_keys(modifier_keys);
				self.keyboard.set(key as usize);
				responses.push_back(InputMapperMessage::KeyDown(key).into());
			}
			InputPreprocessorMessage::KeyUp { key, modifier_keys } => {
				self.handle_modifier_keys(modifier_keys);
				self.keyboard.unset(key as usize);
				responses.push_back(InputMapperMessage::KeyUp(key).into());
			}
			InputPreprocessorMessage::Blur => {
				self.pointer_gesture_active = false;
				self.keyboard = KeyStates::new();
				responses.push_back(InputMapperMessage::Blur.into());
			}
		}
	}

	/// Keep the modifier bits of the key state in sync with the modifier
	/// flags every event carries, so a modifier pressed outside the window
	/// is still observed.
	fn handle_modifier_keys(&mut self, modifier_keys: ModifierKeys) {
		self.sync_modifier(modifier_keys.contains(ModifierKeys::SHIFT), Key::KeyShift);
		self.sync_modifier(modifier_keys.contains(ModifierKeys::ALT), Key::KeyAlt);
		self.sync_modifier(modifier_keys.contains(ModifierKeys::CONTROL), Key::KeyControl);
	}

	fn sync_modifier(&mut self, pressed: bool, key: Key) {
		if pressed {
			self.keyboard.set(key as usize);
		} else {
			self.keyboard.unset(key as usize);
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::input::mouse::MouseState;

	#[test]
	fn pointer_move_updates_modifier_keys() {
		let mut input_preprocessor = InputPreprocessor::default();
		let mut responses = VecDeque::new();

		let message = InputPreprocessorMessage::PointerMove {
			mouse_state: MouseState::from_position(4., 809.),
			modifier_keys: ModifierKeys::ALT,
		};
		input_preprocessor.process_message(message, &mut responses);

		assert!(input_preprocessor.keyboard.get(Key::KeyAlt as usize));
		assert_eq!(responses.pop_front(), Some(InputMapperMessage::PointerMove.into()));
	}

	#[test]
	fn unmatched_pointer_up_is_dropped() {
		let mut input_preprocessor = InputPreprocessor::default();
		let mut responses = VecDeque::new();

		let message = InputPreprocessorMessage::PointerUp {
			mouse_state: MouseState::new(),
			modifier_keys: ModifierKeys::empty(),
		};
		input_preprocessor.process_message(message, &mut responses);

		assert!(responses.is_empty());
	}

	#[test]
	fn releasing_a_modifier_clears_its_key_state() {
		let mut input_preprocessor = InputPreprocessor::default();
		let mut responses = VecDeque::new();

		input_preprocessor.process_message(
			InputPreprocessorMessage::KeyDown {
				key: Key::KeyShift,
				modifier_keys: ModifierKeys::SHIFT,
			},
			&mut responses,
		);
		assert!(input_preprocessor.keyboard.get(Key::KeyShift as usize));

		input_preprocessor.process_message(
			InputPreprocessorMessage::PointerMove {
				mouse_state: MouseState::new(),
				modifier_keys: ModifierKeys::empty(),
			},
			&mut responses,
		);
		assert!(!input_preprocessor.keyboard.get(Key::KeyShift as usize));
	}
}
