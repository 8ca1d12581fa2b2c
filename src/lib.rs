//! Merchant loyalty-card registry.
//!
//! Owners register with the registry, earn points from money purchases and spend them on points
//! purchases. The registry also answers aggregate queries over every registered card.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod ports;
