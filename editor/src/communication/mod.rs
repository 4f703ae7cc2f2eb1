pub mod dispatcher;
pub mod message;

#[doc(inline)]
pub use dispatcher::Dispatcher;
#[doc(inline)]
pub use message::Message;
