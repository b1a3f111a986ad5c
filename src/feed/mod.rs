pub mod record;
pub mod parser;

pub use record::*;
pub use parser::*;
