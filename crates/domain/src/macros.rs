//! Macro for implementing Display and FromStr for keyword enums
//!
//! Sort columns, sort directions and provider environments all travel as
//! short lowercase keywords in query strings and configuration files. This
//! macro provides both conversions from a single mapping table.
//!
//! # Example
//!
//! ```rust
//! use spendview_domain::impl_domain_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Direction {
//!     Asc,
//!     Desc,
//! }
//!
//! impl_domain_keyword_conversions!(Direction {
//!     Asc => "asc",
//!     Desc => "desc",
//! });
//! ```

/// Implements Display and FromStr traits for keyword enums
///
/// - Display writes the keyword
/// - FromStr parses case-insensitively (keywords must be lowercase)
#[macro_export]
macro_rules! impl_domain_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Environment {
        Sandbox,
        Production,
    }

    impl_domain_keyword_conversions!(Environment {
        Sandbox => "sandbox",
        Production => "production",
    });

    #[test]
    fn display_writes_keyword() {
        assert_eq!(Environment::Sandbox.to_string(), "sandbox");
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn fromstr_is_case_insensitive_and_trims() {
        assert_eq!(Environment::from_str("SANDBOX").unwrap(), Environment::Sandbox);
        assert_eq!(Environment::from_str(" Production ").unwrap(), Environment::Production);
    }

    #[test]
    fn fromstr_rejects_unknown_keyword() {
        let result = Environment::from_str("staging");
        assert!(result.unwrap_err().contains("Invalid Environment: staging"));
    }
}
