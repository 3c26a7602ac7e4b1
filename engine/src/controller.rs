//! The application flow controller.

use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};
use tokio::sync::mpsc;

use labelens_client::{AnalysisPayload, ApiError, ChatRequest, LabelService};
use labelens_types::{AnalysisResult, CapturedImage, ChatMessage, ChatPane, ViewState};

use crate::navigation::{HistorySink, NavEntry, NavigationStack, NullHistorySink};
use crate::state::{InFlight, RequestSeq, SeqCounter, SessionData};

/// Synthetic model turn appended when a chat request fails. Chat errors stay
/// inside the transcript instead of the banner so the conversation reads as
/// continuous.
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I couldn't connect. Please try again.";

/// Completion of a spawned request task, tagged with the sequence it was
/// issued under.
#[derive(Debug)]
pub enum FlowEvent {
    AnalysisCompleted {
        seq: RequestSeq,
        outcome: Result<AnalysisResult, ApiError>,
    },
    ChatCompleted {
        seq: RequestSeq,
        outcome: Result<String, ApiError>,
    },
}

/// Owns all session state and orchestrates view transitions and requests.
///
/// Request tasks never touch state: they resolve to a [`FlowEvent`] on the
/// controller's channel, and the owner applies completions from its own loop
/// via [`poll_events`](Self::poll_events) or [`drive`](Self::drive).
pub struct FlowController {
    service: Arc<dyn LabelService>,
    nav: NavigationStack,
    session: SessionData,
    analysis_flight: Option<InFlight>,
    chat_flight: Option<InFlight>,
    seqs: SeqCounter,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events: mpsc::UnboundedReceiver<FlowEvent>,
}

impl FlowController {
    #[must_use]
    pub fn new(service: Arc<dyn LabelService>) -> Self {
        Self::with_history_sink(service, Box::new(NullHistorySink))
    }

    /// Controller whose history pushes/replaces are mirrored to `sink`.
    #[must_use]
    pub fn with_history_sink(service: Arc<dyn LabelService>, sink: Box<dyn HistorySink>) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            service,
            nav: NavigationStack::new(sink),
            session: SessionData::default(),
            analysis_flight: None,
            chat_flight: None,
            seqs: SeqCounter::default(),
            events_tx,
            events,
        }
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.nav.current().view
    }

    #[must_use]
    pub fn chat_pane(&self) -> ChatPane {
        self.nav.current().pane
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.session.analysis.as_ref()
    }

    #[must_use]
    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.session.chat_history
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.session.error.as_deref()
    }

    #[must_use]
    pub fn captured_image(&self) -> Option<&CapturedImage> {
        self.session.captured_image.as_ref()
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.analysis_flight.is_some()
    }

    #[must_use]
    pub fn is_chatting(&self) -> bool {
        self.chat_flight.is_some()
    }

    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.nav.depth()
    }

    // ------------------------------------------------------------------
    // View transitions
    // ------------------------------------------------------------------

    /// Hero -> Input.
    pub fn start_app(&mut self) {
        if self.view() != ViewState::Hero {
            tracing::debug!(view = ?self.view(), "start_app ignored outside Hero");
            return;
        }
        self.nav.push(NavEntry::screen(ViewState::Input));
    }

    /// Any state -> Input, with the whole session cleared. In-flight work
    /// belongs to the abandoned session and is cancelled.
    pub fn reset_flow(&mut self) {
        self.cancel_analysis();
        self.cancel_chat();
        self.session.clear();
        self.nav.push(NavEntry::screen(ViewState::Input));
    }

    /// Any state -> Hero, with the whole session cleared.
    pub fn go_home(&mut self) {
        self.cancel_analysis();
        self.cancel_chat();
        self.session.clear();
        self.nav.push(NavEntry::screen(ViewState::Hero));
    }

    /// Chat -> Chat self-loop: open the explanation pane as its own history
    /// entry so host back-navigation returns to the transcript with the
    /// session intact.
    pub fn open_explanation(&mut self) {
        let current = self.nav.current();
        if current.view != ViewState::Chat || current.pane != ChatPane::Transcript {
            tracing::debug!(?current, "open_explanation ignored outside chat transcript");
            return;
        }
        self.nav.push(NavEntry {
            view: ViewState::Chat,
            pane: ChatPane::Explanation,
        });
    }

    pub fn dismiss_error(&mut self) {
        self.session.error = None;
    }

    /// Externally triggered back navigation (browser button, swipe). The
    /// host has already moved; this restores the matching view, tears down
    /// in-flight work tied to the abandoned entry, and clears session data
    /// when landing on a pre-analysis screen. Performs no history operation
    /// of its own. Returns false at the root.
    pub fn handle_history_pop(&mut self) -> bool {
        let abandoned = self.nav.current();
        let Some(restored) = self.nav.pop() else {
            return false;
        };

        if abandoned.view == ViewState::Reasoning {
            self.cancel_analysis();
        }
        if abandoned.view == ViewState::Chat && restored.view != ViewState::Chat {
            self.cancel_chat();
        }
        if restored.view.clears_session_data() {
            self.session.clear();
        }
        tracing::debug!(from = ?abandoned.view, to = ?restored.view, "history pop");
        true
    }

    // ------------------------------------------------------------------
    // Analysis lifecycle
    // ------------------------------------------------------------------

    /// Fire-and-forget analysis submission. Cancels any outstanding analysis,
    /// clears the previous session's result/transcript/error, shows the
    /// reasoning screen, and issues the request. The outcome arrives as a
    /// [`FlowEvent`].
    pub fn submit_analysis(&mut self, payload: AnalysisPayload) {
        self.cancel_analysis();

        self.session.analysis = None;
        self.session.chat_history.clear();
        self.session.error = None;
        // Stale context must not attach to a new product; only the image
        // path keeps a picture to display.
        self.session.captured_image = match &payload {
            AnalysisPayload::Image(image) => Some(image.clone()),
            AnalysisPayload::Ingredients(_) | AnalysisPayload::Sample(_) => None,
        };

        // A resubmission while already loading reuses the transient entry;
        // otherwise the loading screen gets the entry its resolution will
        // rewrite to Chat or Input.
        let entry = NavEntry::screen(ViewState::Reasoning);
        if self.view() == ViewState::Reasoning {
            self.nav.replace(entry);
        } else {
            self.nav.push(entry);
        }

        let seq = self.seqs.next();
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.analysis_flight = Some(spawn_flight(seq, async move {
            let outcome = service.analyze(&payload).await;
            let _ = tx.send(FlowEvent::AnalysisCompleted { seq, outcome });
        }));
    }

    fn cancel_analysis(&mut self) {
        if let Some(flight) = self.analysis_flight.take() {
            tracing::debug!(seq = ?flight.seq, "cancelling analysis request");
            flight.cancel();
        }
    }

    // ------------------------------------------------------------------
    // Chat lifecycle
    // ------------------------------------------------------------------

    /// Optimistically appends the user turn, then asks the service with the
    /// prior transcript and the serialized analysis as context. The UI
    /// disables input while a request is chatting, but a concurrent call is
    /// still handled by cancel-and-replace.
    pub fn send_chat_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.cancel_chat();

        let request = ChatRequest {
            message: text.clone(),
            history: self.session.chat_history.clone(),
            context: self.session.analysis.as_ref().map(AnalysisResult::context_json),
        };
        self.session.chat_history.push(ChatMessage::user(text));

        let seq = self.seqs.next();
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.chat_flight = Some(spawn_flight(seq, async move {
            let outcome = service.chat(request).await;
            let _ = tx.send(FlowEvent::ChatCompleted { seq, outcome });
        }));
    }

    /// Abort the in-flight chat request, if any. The optimistic user turn
    /// stays; no model turn will be appended. Idempotent.
    pub fn cancel_chat(&mut self) {
        if let Some(flight) = self.chat_flight.take() {
            tracing::debug!(seq = ?flight.seq, "cancelling chat request");
            flight.cancel();
        }
    }

    // ------------------------------------------------------------------
    // Event application
    // ------------------------------------------------------------------

    /// Drain and apply all queued completions. Returns how many events were
    /// applied, so a frame loop knows whether to redraw.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Apply completions until no request is in flight.
    pub async fn drive(&mut self) {
        while self.is_analyzing() || self.is_chatting() {
            let Some(event) = self.events.recv().await else {
                break;
            };
            self.apply_event(event);
        }
    }

    pub(crate) fn apply_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::AnalysisCompleted { seq, outcome } => {
                if self.analysis_flight.as_ref().map(|f| f.seq) != Some(seq) {
                    tracing::debug!(?seq, "discarding stale analysis completion");
                    return;
                }
                self.analysis_flight = None;
                match outcome {
                    Ok(result) => {
                        self.session.analysis = Some(result);
                        self.nav.replace(NavEntry::screen(ViewState::Chat));
                    }
                    Err(e) => {
                        tracing::warn!("analysis failed: {e}");
                        self.session.error = Some(e.user_message());
                        self.nav.replace(NavEntry::screen(ViewState::Input));
                    }
                }
            }
            FlowEvent::ChatCompleted { seq, outcome } => {
                if self.chat_flight.as_ref().map(|f| f.seq) != Some(seq) {
                    tracing::debug!(?seq, "discarding stale chat completion");
                    return;
                }
                self.chat_flight = None;
                match outcome {
                    Ok(reply) => self.session.chat_history.push(ChatMessage::model(reply)),
                    Err(e) => {
                        tracing::warn!("chat failed: {e}");
                        self.session
                            .chat_history
                            .push(ChatMessage::model(CHAT_FALLBACK_REPLY));
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for FlowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowController")
            .field("view", &self.view())
            .field("is_analyzing", &self.is_analyzing())
            .field("is_chatting", &self.is_chatting())
            .field("history_depth", &self.history_depth())
            .finish_non_exhaustive()
    }
}

/// Spawn `task` under an abort handle. An aborted task sends nothing; its
/// completion event, if already queued, is rejected by the sequence check.
fn spawn_flight(seq: RequestSeq, task: impl Future<Output = ()> + Send + 'static) -> InFlight {
    let (abort, registration) = AbortHandle::new_pair();
    tokio::spawn(async move {
        let _ = Abortable::new(task, registration).await;
    });
    InFlight::new(seq, abort)
}
