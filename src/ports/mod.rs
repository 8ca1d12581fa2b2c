pub mod card_factory;
pub mod registry;
