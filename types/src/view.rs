//! View states for the application flow.

use serde::{Deserialize, Serialize};

/// Which screen is presented. Exactly one is active at a time.
///
/// The forward path is `Hero -> Input -> Reasoning -> Chat`; `Hero` is the
/// initial state and the reset point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewState {
    #[default]
    Hero,
    Input,
    /// Transient loading screen while an analysis is in flight. Not
    /// separately navigable: back from here skips straight to `Input`.
    Reasoning,
    Chat,
}

impl ViewState {
    /// Whether landing on this state via back-navigation discards the
    /// analysis session. You cannot go back into a finished analysis from
    /// before `Input`.
    #[must_use]
    pub fn clears_session_data(self) -> bool {
        matches!(self, ViewState::Hero | ViewState::Input)
    }
}

/// Sub-view within `Chat`. The explanation pane is reachable and returnable
/// without leaving Chat's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChatPane {
    #[default]
    Transcript,
    Explanation,
}

#[cfg(test)]
mod tests {
    use super::ViewState;

    #[test]
    fn initial_state_is_hero() {
        assert_eq!(ViewState::default(), ViewState::Hero);
    }

    #[test]
    fn pre_analysis_states_clear_session_data() {
        assert!(ViewState::Hero.clears_session_data());
        assert!(ViewState::Input.clears_session_data());
        assert!(!ViewState::Reasoning.clears_session_data());
        assert!(!ViewState::Chat.clears_session_data());
    }
}
