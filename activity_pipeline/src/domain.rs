//! The loader and the interfaces it needs from the outside world

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
