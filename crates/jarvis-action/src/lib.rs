//! Intent classification and command dispatch.
//!
//! Classifies free text into a coarse intent category by ordered keyword
//! matching, then routes the result to the handler that produces the reply.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod intent;

pub use dispatcher::CommandDispatcher;
pub use error::DispatchError;
pub use intent::classifier::IntentClassifier;
