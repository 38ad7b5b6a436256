// Service module exports

pub mod appearance;
pub mod control;
pub mod database;
pub mod preferences;
pub mod settings;
pub mod timer;
