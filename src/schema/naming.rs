use serde::{Deserialize, Serialize};

/// Strategy for deriving column names from field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingStrategy {
    /// Field name used verbatim.
    AsIs,
    /// `firstName` -> `first_name`.
    #[default]
    SnakeCase,
    /// `firstName` -> `firstname`.
    LowerCase,
}

impl NamingStrategy {
    /// Apply the strategy to a source field name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::AsIs => name.to_string(),
            Self::LowerCase => name.to_lowercase(),
            Self::SnakeCase => {
                let mut out = String::with_capacity(name.len() + 4);
                for (i, ch) in name.chars().enumerate() {
                    if ch.is_uppercase() {
                        if i > 0 && !out.ends_with('_') {
                            out.push('_');
                        }
                        for low in ch.to_lowercase() {
                            out.push(low);
                        }
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(NamingStrategy::SnakeCase.apply("firstName"), "first_name");
        assert_eq!(NamingStrategy::SnakeCase.apply("id"), "id");
        assert_eq!(NamingStrategy::SnakeCase.apply("HTTPCode"), "h_t_t_p_code");
    }

    #[test]
    fn test_as_is_and_lower() {
        assert_eq!(NamingStrategy::AsIs.apply("firstName"), "firstName");
        assert_eq!(NamingStrategy::LowerCase.apply("firstName"), "firstname");
    }
}
