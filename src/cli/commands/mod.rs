pub mod attend;
pub mod checkin;
pub mod config;
pub mod db;
pub mod device;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod project;
pub mod sessions;
pub mod worker;
