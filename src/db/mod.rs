pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod schedules;
pub mod sessions;
pub mod settings;
