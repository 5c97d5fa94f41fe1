pub mod symbol;
pub mod time_parser;
pub mod url_validator;

pub use symbol::{SymbolError, validate_symbol};
pub use time_parser::TimeParser;
pub use url_validator::{UrlValidationError, validate_destination};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    iter::repeat_with(|| ALPHANUMERIC[rand::random_range(0..ALPHANUMERIC.len())] as char)
        .take(length)
        .collect()
}

/// URL-safe random token of exactly `length` characters
pub fn generate_token(length: usize) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    // 每 3 字节编码为 4 个字符，多取一些再截断
    let bytes: Vec<u8> = (0..length.div_ceil(4) * 3 + 3)
        .map(|_| rand::random::<u8>())
        .collect();

    let mut encoded = URL_SAFE_NO_PAD.encode(bytes);
    encoded.truncate(length);
    encoded
}
