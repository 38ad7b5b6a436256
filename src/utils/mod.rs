// Utility modules

pub mod monitors;
