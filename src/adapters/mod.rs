pub mod factory;
pub mod registry;
