//! Two-state reveal toggle for try-on results on the public product page.
//!
//! Every result starts hidden; the shopper reveals it explicitly and may hide
//! it again. There are no other states.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

impl RevealState {
    /// The state after one click.
    pub fn toggle(self) -> Self {
        match self {
            Self::Hidden => Self::Revealed,
            Self::Revealed => Self::Hidden,
        }
    }

    pub fn is_revealed(self) -> bool {
        self == Self::Revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        assert_eq!(RevealState::default(), RevealState::Hidden);
        assert!(!RevealState::default().is_revealed());
    }

    #[test]
    fn toggle_alternates() {
        let once = RevealState::Hidden.toggle();
        assert_eq!(once, RevealState::Revealed);
        assert_eq!(once.toggle(), RevealState::Hidden);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&RevealState::Revealed).unwrap();
        assert_eq!(json, "\"revealed\"");
    }
}
