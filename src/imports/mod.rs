pub mod parser;
pub mod rewrite;

pub use parser::{ImportRecord, Record, parse};
pub use rewrite::{LineEdit, rewrite};
