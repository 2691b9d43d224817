pub mod analysis;
pub mod ast;
pub mod parser;
pub mod token;
pub mod util;
