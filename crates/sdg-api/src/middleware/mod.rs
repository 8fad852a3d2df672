pub mod actor;
pub mod extract;
pub mod request_log;
