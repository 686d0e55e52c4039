pub mod config;
pub mod feedback;
pub mod pose;
pub mod protocol;
pub mod reference;
