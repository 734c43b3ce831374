pub mod absence;
pub mod schedule;
pub mod session;
pub mod settings;
