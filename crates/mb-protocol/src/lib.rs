pub mod chat;
pub mod farm;
pub mod query;
pub mod risk;

pub use chat::*;
pub use farm::*;
pub use query::*;
pub use risk::*;
