//! C and C++ declaration parser implementation

mod declarator;
pub mod parser;

pub use parser::{ANONYMOUS, CppParser};
