pub mod activity;
pub mod config;
pub mod dispatch;
pub mod shared;
pub mod tools;
pub mod transport;
pub mod validation;
