#[macro_use]
mod macros;

pub mod accounts;
pub mod config;
pub mod otp;
