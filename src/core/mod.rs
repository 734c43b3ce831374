pub mod calculator;
pub mod clock;
pub mod context;
pub mod log;
pub mod report;
pub mod schedule;
pub mod session;
pub mod settings;
