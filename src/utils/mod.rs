pub mod helper;

mod arena;
pub use arena::{Arena, NIL};
