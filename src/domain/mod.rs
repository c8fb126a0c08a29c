//! Domain layer
//!
//! Entities, value objects, pure services and the ports the application
//! layer drives.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
