//! HTTP middleware

pub mod request_log;
