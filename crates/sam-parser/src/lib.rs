pub mod parser;

pub use parser::{parse, Parser, MAX_DEPTH};
