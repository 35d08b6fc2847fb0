pub mod attendance;
pub mod device;
pub mod lateness;
pub mod project;
pub mod session;
pub mod worker;
