pub mod errors;
pub mod normalize;
pub mod python;
pub mod reduce;
pub mod sql;

pub use errors::{Result, SpliceError, SyntaxError};
pub use python::{js_ast, PythonExpression};
pub use sql::SqlStatement;
