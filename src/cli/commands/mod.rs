pub mod analyze;
pub mod ask;
pub mod config;
pub mod serve;
pub mod watch;
