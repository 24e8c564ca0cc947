mod resolver;

pub use resolver::{resolve_inputs, InputSet};
