pub mod account;
pub mod chemicals;
pub mod dashboard;
pub mod init;
pub mod misc;
pub mod watch;
