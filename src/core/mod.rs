pub mod admin;
pub mod authorize;
pub mod checkin;
pub mod classifier;
pub mod log;
pub mod manual;
pub mod qr;
pub mod recorder;
pub mod response;
pub mod session;
