pub mod duration;
pub mod upload;

pub use duration::{format_duration, parse_duration};
