pub mod bounds;
pub mod resolver;
