pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{has_web_scheme, is_valid_url, normalize_url};
