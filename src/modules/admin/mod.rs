//! Admin credential check guarding every write path.

pub mod model;
pub mod repository;
pub mod service;
