//! Session-history navigation stack.
//!
//! The controller keeps an explicit append-only stack of navigation entries;
//! push and replace are mirrored to a [`HistorySink`] so a browser-like host
//! can forward them to its native primitive. External back navigation flows
//! the other way: the host observes it and calls
//! [`FlowController::handle_history_pop`](crate::FlowController::handle_history_pop),
//! which pops this stack. The root entry is never popped.

use labelens_types::{ChatPane, ViewState};

/// One history entry: the screen it restores, plus which chat pane was open.
/// `pane` is only meaningful when `view` is [`ViewState::Chat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub view: ViewState,
    pub pane: ChatPane,
}

impl NavEntry {
    #[must_use]
    pub fn screen(view: ViewState) -> Self {
        Self {
            view,
            pane: ChatPane::Transcript,
        }
    }
}

/// Receives push/replace notifications so a host can keep its native history
/// in lockstep. Pops travel in the opposite direction and are not part of
/// this trait.
pub trait HistorySink: Send {
    fn pushed(&mut self, entry: NavEntry);
    fn replaced(&mut self, entry: NavEntry);
}

/// Sink for hosts without native history (tests, plain terminals).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHistorySink;

impl HistorySink for NullHistorySink {
    fn pushed(&mut self, _entry: NavEntry) {}
    fn replaced(&mut self, _entry: NavEntry) {}
}

#[derive(Debug)]
pub struct NavigationStack {
    entries: Vec<NavEntry>,
    sink: Box<dyn HistorySink>,
}

impl NavigationStack {
    /// A stack rooted at `Hero`. The root is not announced to the sink; it
    /// corresponds to the entry the host already has on load.
    #[must_use]
    pub fn new(sink: Box<dyn HistorySink>) -> Self {
        Self {
            entries: vec![NavEntry::screen(ViewState::Hero)],
            sink,
        }
    }

    #[must_use]
    pub fn current(&self) -> NavEntry {
        *self.entries.last().expect("stack is never empty")
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, entry: NavEntry) {
        self.entries.push(entry);
        self.sink.pushed(entry);
    }

    pub fn replace(&mut self, entry: NavEntry) {
        *self.entries.last_mut().expect("stack is never empty") = entry;
        self.sink.replaced(entry);
    }

    /// Drop the current entry and return the restored one. `None` at the
    /// root: there is nowhere further back to go.
    pub fn pop(&mut self) -> Option<NavEntry> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }
}

impl std::fmt::Debug for dyn HistorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HistorySink")
    }
}

#[cfg(test)]
mod tests {
    use super::{HistorySink, NavEntry, NavigationStack, NullHistorySink};
    use labelens_types::{ChatPane, ViewState};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Pushed(ViewState),
        Replaced(ViewState),
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<Op>>>);

    impl HistorySink for RecordingSink {
        fn pushed(&mut self, entry: NavEntry) {
            self.0.lock().expect("sink lock").push(Op::Pushed(entry.view));
        }
        fn replaced(&mut self, entry: NavEntry) {
            self.0
                .lock()
                .expect("sink lock")
                .push(Op::Replaced(entry.view));
        }
    }

    #[test]
    fn starts_rooted_at_hero() {
        let stack = NavigationStack::new(Box::new(NullHistorySink));
        assert_eq!(stack.current().view, ViewState::Hero);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pop_never_removes_the_root() {
        let mut stack = NavigationStack::new(Box::new(NullHistorySink));
        assert_eq!(stack.pop(), None);

        stack.push(NavEntry::screen(ViewState::Input));
        assert_eq!(
            stack.pop().map(|e| e.view),
            Some(ViewState::Hero)
        );
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn replace_rewrites_the_current_entry() {
        let mut stack = NavigationStack::new(Box::new(NullHistorySink));
        stack.push(NavEntry::screen(ViewState::Input));
        stack.push(NavEntry::screen(ViewState::Reasoning));
        stack.replace(NavEntry::screen(ViewState::Chat));

        assert_eq!(stack.current().view, ViewState::Chat);
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.pop().map(|e| e.view), Some(ViewState::Input));
    }

    #[test]
    fn pane_rides_along_with_entries() {
        let mut stack = NavigationStack::new(Box::new(NullHistorySink));
        stack.push(NavEntry::screen(ViewState::Chat));
        stack.push(NavEntry {
            view: ViewState::Chat,
            pane: ChatPane::Explanation,
        });

        assert_eq!(stack.current().pane, ChatPane::Explanation);
        let restored = stack.pop().expect("below root");
        assert_eq!(restored.view, ViewState::Chat);
        assert_eq!(restored.pane, ChatPane::Transcript);
    }

    #[test]
    fn sink_sees_pushes_and_replaces_but_not_the_root() {
        let sink = RecordingSink::default();
        let ops = Arc::clone(&sink.0);
        let mut stack = NavigationStack::new(Box::new(sink));

        stack.push(NavEntry::screen(ViewState::Input));
        stack.replace(NavEntry::screen(ViewState::Chat));
        stack.pop();

        assert_eq!(
            *ops.lock().expect("sink lock"),
            [Op::Pushed(ViewState::Input), Op::Replaced(ViewState::Chat)]
        );
    }
}
