//! Short symbol validation

/// Path segments that would shadow the management API
pub const RESERVED_SYMBOLS: &[&str] = &["links", "invites"];

pub const MAX_SYMBOL_LENGTH: usize = 128;

#[derive(Debug, PartialEq, Eq)]
pub enum SymbolError {
    Empty,
    TooLong(usize),
    InvalidCharacter(char),
    Reserved(String),
}

impl std::fmt::Display for SymbolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "symbol cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "symbol is {} characters long, at most {} allowed",
                len, MAX_SYMBOL_LENGTH
            ),
            Self::InvalidCharacter(c) => write!(
                f,
                "symbol contains '{}'; only letters, digits, '-' and '_' are allowed",
                c
            ),
            Self::Reserved(s) => write!(f, "symbol '{}' is reserved", s),
        }
    }
}

impl std::error::Error for SymbolError {}

/// `[A-Za-z0-9_-]{1,128}`, case-sensitive, not reserved
pub fn validate_symbol(symbol: &str) -> Result<(), SymbolError> {
    if symbol.is_empty() {
        return Err(SymbolError::Empty);
    }

    let len = symbol.chars().count();
    if len > MAX_SYMBOL_LENGTH {
        return Err(SymbolError::TooLong(len));
    }

    if let Some(c) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(SymbolError::InvalidCharacter(c));
    }

    if RESERVED_SYMBOLS.contains(&symbol) {
        return Err(SymbolError::Reserved(symbol.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_symbols() {
        assert!(validate_symbol("abc").is_ok());
        assert!(validate_symbol("ABC-123_x").is_ok());
        assert!(validate_symbol(&"a".repeat(MAX_SYMBOL_LENGTH)).is_ok());
        // 大小写敏感，Links 不是保留字
        assert!(validate_symbol("Links").is_ok());
    }

    #[test]
    fn test_invalid_symbols() {
        assert_eq!(validate_symbol(""), Err(SymbolError::Empty));
        assert_eq!(
            validate_symbol(&"a".repeat(MAX_SYMBOL_LENGTH + 1)),
            Err(SymbolError::TooLong(MAX_SYMBOL_LENGTH + 1))
        );
        assert_eq!(
            validate_symbol("a/b"),
            Err(SymbolError::InvalidCharacter('/'))
        );
        assert_eq!(
            validate_symbol("héllo"),
            Err(SymbolError::InvalidCharacter('é'))
        );
        assert_eq!(
            validate_symbol("links"),
            Err(SymbolError::Reserved("links".to_string()))
        );
        assert_eq!(
            validate_symbol("invites"),
            Err(SymbolError::Reserved("invites".to_string()))
        );
        // 兑换路径有两段，单段的 invite 仍可用
        assert!(validate_symbol("invite").is_ok());
    }
}
