pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{char_len, safe_truncate_chars, truncate_with_marker};
pub use url_utils::{file_timestamp, is_valid_url, name_from_url, sanitize_name};
