// src/backend/utils/mod.rs

pub mod crypto;
pub mod guards;
pub mod sanitize;
pub mod time;

pub use time::{Clock, ManualClock, SystemClock};
