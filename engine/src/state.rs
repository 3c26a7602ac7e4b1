//! In-flight request bookkeeping and clearable session data.

use futures_util::future::AbortHandle;

use labelens_types::{AnalysisResult, CapturedImage, ChatMessage};

/// Monotonic identifier for issued requests. Completion events carry the
/// sequence they were issued under; only the current one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSeq(pub(crate) u64);

#[derive(Debug, Default)]
pub(crate) struct SeqCounter(u64);

impl SeqCounter {
    pub(crate) fn next(&mut self) -> RequestSeq {
        self.0 = self.0.wrapping_add(1);
        RequestSeq(self.0)
    }
}

/// One outstanding request. Dropping the handle does not cancel; cancellation
/// is explicit so superseded tasks are always aborted before replacement.
#[derive(Debug)]
pub(crate) struct InFlight {
    pub(crate) seq: RequestSeq,
    abort: AbortHandle,
}

impl InFlight {
    pub(crate) fn new(seq: RequestSeq, abort: AbortHandle) -> Self {
        Self { seq, abort }
    }

    pub(crate) fn cancel(self) {
        self.abort.abort();
    }
}

/// Everything tied to the current analysis session. Cleared as one unit on
/// reset, home navigation, and back-navigation to a pre-analysis screen.
#[derive(Debug, Default)]
pub(crate) struct SessionData {
    pub(crate) analysis: Option<AnalysisResult>,
    pub(crate) chat_history: Vec<ChatMessage>,
    pub(crate) error: Option<String>,
    pub(crate) captured_image: Option<CapturedImage>,
}

impl SessionData {
    pub(crate) fn clear(&mut self) {
        self.analysis = None;
        self.chat_history.clear();
        self.error = None;
        self.captured_image = None;
    }
}
