//! The chat widget: reads the message input on each send activation, posts
//! it through the transport and appends the rendered reply to the chat log.
//!
//! All four collaborators are injected, so the widget runs the same against
//! a terminal, a test fake or any other front end.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::chat_log::{ChatBlock, ChatLog, NoticeKind};
use crate::client::Transport;
use crate::messages::{OutboundMessage, DEFAULT_SENDER};
use crate::render::MarkdownRenderer;

/// Source of the text to send: the message field.
pub trait MessageInput: Send + Sync {
    fn value(&self) -> String;
}

/// A plain editable text field.
#[derive(Debug, Default)]
pub struct TextField {
    value: Mutex<String>,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(value.into()),
        }
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

impl MessageInput for TextField {
    fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Which notices the widget appends to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notices {
    pub network_failure: bool,
    pub no_reply: bool,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            network_failure: true,
            no_reply: false,
        }
    }
}

/// The send button. Each [`click`](SendTrigger::click) reads the message
/// input at that moment and queues it for [`ChatWidget::bind`].
#[derive(Clone)]
pub struct SendTrigger {
    input: Arc<dyn MessageInput>,
    sender: String,
    clicks: mpsc::UnboundedSender<OutboundMessage>,
}

impl SendTrigger {
    /// Returns false once the bound widget has stopped listening.
    pub fn click(&self) -> bool {
        let msg = OutboundMessage::new(self.sender.clone(), self.input.value());
        self.clicks.send(msg).is_ok()
    }
}

/// How one activation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply carried text; `blocks` bot blocks were appended.
    Replied { blocks: usize },
    /// The reply was empty or had no text.
    NoReply,
    /// The exchange failed; nothing from the server was appended.
    Failed { reason: String },
}

impl SubmitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmitOutcome::Failed { .. })
    }
}

pub struct ChatWidget {
    input: Arc<dyn MessageInput>,
    log: Arc<dyn ChatLog>,
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn MarkdownRenderer>,
    sender: String,
    notices: Notices,
}

impl ChatWidget {
    pub fn new(
        input: Arc<dyn MessageInput>,
        log: Arc<dyn ChatLog>,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn MarkdownRenderer>,
    ) -> Self {
        Self {
            input,
            log,
            transport,
            renderer,
            sender: DEFAULT_SENDER.to_string(),
            notices: Notices::default(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Handle one send activation.
    ///
    /// The input is read now, before this returns; the exchange itself runs
    /// on a spawned task. There is no reentrancy guard, so activating again
    /// before the reply arrives starts a second, independent exchange. Must
    /// be called from within a tokio runtime.
    pub fn activate(self: &Arc<Self>) -> JoinHandle<SubmitOutcome> {
        let msg = self.read_message();
        let widget = Arc::clone(self);
        tokio::spawn(async move { widget.exchange(msg).await })
    }

    /// A send button wired to this widget's input and sender, plus the
    /// stream of its clicks to hand to [`bind`](ChatWidget::bind).
    pub fn send_trigger(&self) -> (SendTrigger, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (clicks, activations) = mpsc::unbounded_channel();
        let trigger = SendTrigger {
            input: Arc::clone(&self.input),
            sender: self.sender.clone(),
            clicks,
        };
        (trigger, activations)
    }

    /// Drive the widget from a stream of send activations, each carrying
    /// the message read when the button was pressed. Returns once every
    /// trigger is dropped and every exchange started has finished, with
    /// outcomes in completion order.
    pub async fn bind(
        self: Arc<Self>,
        mut activations: mpsc::UnboundedReceiver<OutboundMessage>,
    ) -> Vec<SubmitOutcome> {
        let mut in_flight = JoinSet::new();
        while let Some(msg) = activations.recv().await {
            let widget = Arc::clone(&self);
            in_flight.spawn(async move { widget.exchange(msg).await });
        }

        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!(error = %e, "exchange task did not complete"),
            }
        }
        outcomes
    }

    /// Post `msg` and append whatever the reply yields. Never fails: errors
    /// become [`SubmitOutcome::Failed`] and, if enabled, a notice.
    pub async fn exchange(&self, msg: OutboundMessage) -> SubmitOutcome {
        let items = match self.transport.post_message(&msg).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "message exchange failed");
                if self.notices.network_failure {
                    self.log.append(ChatBlock::Notice(NoticeKind::NetworkFailure));
                }
                return SubmitOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let blocks: Vec<ChatBlock> = items
            .iter()
            .filter_map(|item| item.markdown())
            .map(|text| ChatBlock::Bot(self.renderer.render(text)))
            .collect();
        debug!(items = items.len(), blocks = blocks.len(), "rendering reply");

        if blocks.is_empty() {
            if self.notices.no_reply {
                self.log.append(ChatBlock::Notice(NoticeKind::NoReply));
            }
            return SubmitOutcome::NoReply;
        }

        let count = blocks.len();
        self.log.append_all(blocks);
        SubmitOutcome::Replied { blocks: count }
    }

    fn read_message(&self) -> OutboundMessage {
        OutboundMessage::new(self.sender.clone(), self.input.value())
    }
}
