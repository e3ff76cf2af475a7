//! Core type-name model and dialect policies for javagen

pub mod dialect;
pub mod error;
pub mod type_name;

pub use dialect::{Dialect, DialectPolicy};
pub use error::CoreError;
pub use type_name::{GenericArg, Generics, TypeName};
