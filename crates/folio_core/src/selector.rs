//! Target selectors
//!
//! Animation targets are addressed by a stable identifier: either an element id
//! (`#hero`) or a class shared by a group of elements (`.puzzle-piece`).

use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// A stable identifier resolving to zero or more scene elements
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `#name` - matches the element whose id is `name`
    Id(String),
    /// `.name` - matches every element carrying class `name`
    Class(String),
}

impl Selector {
    pub fn id(name: impl Into<String>) -> Self {
        Selector::Id(name.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Selector::Class(name.into())
    }

    /// Check an element's id and classes against this selector
    pub fn matches<S: AsRef<str>>(&self, id: Option<&str>, classes: &[S]) -> bool {
        match self {
            Selector::Id(name) => id == Some(name.as_str()),
            Selector::Class(name) => classes.iter().any(|c| c.as_ref() == name),
        }
    }
}

impl FromStr for Selector {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (is_id, name) = if let Some(name) = s.strip_prefix('#') {
            (true, name)
        } else if let Some(name) = s.strip_prefix('.') {
            (false, name)
        } else {
            return Err(FolioError::invalid(format!(
                "selector `{s}` must start with `#` or `.`"
            )));
        };

        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FolioError::invalid(format!("invalid selector `{s}`")));
        }

        if is_id {
            Ok(Selector::id(name))
        } else {
            Ok(Selector::class(name))
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(name) => write!(f, "#{name}"),
            Selector::Class(name) => write!(f, ".{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selectors() {
        assert_eq!(
            ".hero-trigger".parse::<Selector>().unwrap(),
            Selector::class("hero-trigger")
        );
        assert_eq!("#pane".parse::<Selector>().unwrap(), Selector::id("pane"));
        assert!("pane".parse::<Selector>().is_err());
        assert!(".".parse::<Selector>().is_err());
        assert!(".a b".parse::<Selector>().is_err());
    }

    #[test]
    fn test_matches() {
        let class = Selector::class("piece");
        assert!(class.matches(None, &["tile", "piece"]));
        assert!(!class.matches(Some("piece"), &["tile"]));

        let id = Selector::id("pane");
        assert!(id.matches(Some("pane"), &[] as &[&str]));
        assert!(!id.matches(None, &["pane"]));
    }

    #[test]
    fn test_display_round_trips_prefix() {
        assert_eq!(Selector::class("gallery").to_string(), ".gallery");
        assert_eq!(Selector::id("hero").to_string(), "#hero");
    }
}
