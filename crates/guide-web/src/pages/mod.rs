//! Page Components

mod chat;
mod map;

pub use chat::ChatInterface;
pub use map::MapPage;
