pub mod message;

pub use message::{Message, MessageFilter, MessagePatch, MessageRow, MessageSort, MessageStatus};
