pub mod constants;
pub mod string_utils;

pub use constants::*;
pub use string_utils::{atx_heading_level, is_atx_heading, nearest, token_length};
