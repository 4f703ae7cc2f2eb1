pub mod input_mapper;
pub mod input_preprocessor;
pub mod keyboard;
pub mod mouse;

#[doc(inline)]
pub use input_preprocessor::{InputPreprocessor, InputPreprocessorMessage};

#[doc(inline)]
pub use input_mapper::InputMapperMessage;
