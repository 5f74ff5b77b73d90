pub mod assembler;
pub mod parser;
pub mod walker;

pub use assembler::{assemble, MultiBlockAssembler};
pub use parser::Parser;
pub use walker::{FileWalker, DEFAULT_EXTENSIONS};
