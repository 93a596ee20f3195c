//! The chat log: an append-only sequence of rendered blocks.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locally produced entries that report on an exchange rather than carry
/// a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    NetworkFailure,
    NoReply,
}

impl NoticeKind {
    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::NetworkFailure => "network-failure",
            NoticeKind::NoReply => "no-reply",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoticeKind::NetworkFailure => "Could not reach the assistant.",
            NoticeKind::NoReply => "The assistant did not reply.",
        }
    }
}

/// One chat-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatBlock {
    /// A bot reply, already rendered to HTML.
    Bot(String),
    Notice(NoticeKind),
}

impl ChatBlock {
    pub fn is_bot(&self) -> bool {
        matches!(self, ChatBlock::Bot(_))
    }

    /// The block's markup as inserted into the log.
    pub fn to_html(&self) -> String {
        match self {
            ChatBlock::Bot(html) => {
                format!(r#"<div class="bot-msg">{}</div>"#, html.trim_end())
            }
            ChatBlock::Notice(kind) => format!(
                r#"<div class="bot-msg notice {}">{}</div>"#,
                kind.class(),
                kind.label()
            ),
        }
    }
}

/// Append target for rendered blocks. Appends happen from exchange tasks,
/// so implementations take `&self` and do their own locking.
pub trait ChatLog: Send + Sync {
    fn append(&self, block: ChatBlock);

    /// Append several blocks in order.
    fn append_all(&self, blocks: Vec<ChatBlock>) {
        for block in blocks {
            self.append(block);
        }
    }
}

/// In-memory chat log.
#[derive(Debug, Default)]
pub struct MemoryChatLog {
    blocks: Mutex<Vec<ChatBlock>>,
}

impl MemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic elsewhere must not make the log lose or hide blocks.
    fn locked(&self) -> MutexGuard<'_, Vec<ChatBlock>> {
        self.blocks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the blocks appended so far.
    pub fn blocks(&self) -> Vec<ChatBlock> {
        self.locked().clone()
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole log as markup, one block after another.
    pub fn to_html(&self) -> String {
        self.blocks().iter().map(ChatBlock::to_html).collect()
    }
}

impl ChatLog for MemoryChatLog {
    fn append(&self, block: ChatBlock) {
        self.locked().push(block);
    }

    fn append_all(&self, new_blocks: Vec<ChatBlock>) {
        self.locked().extend(new_blocks);
    }
}

/// Chat log that writes each block's markup as one line to `W`. Newlines
/// inside a block are written as `&#10;`, which keeps `<pre>` content intact.
pub struct WriterChatLog<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterChatLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn locked(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_block(out: &mut W, block: &ChatBlock) {
        let line = block.to_html().replace('\n', "&#10;");
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write chat block");
        }
    }
}

impl<W: Write + Send> ChatLog for WriterChatLog<W> {
    fn append(&self, block: ChatBlock) {
        Self::write_block(&mut self.locked(), &block);
    }

    fn append_all(&self, blocks: Vec<ChatBlock>) {
        let mut out = self.locked();
        for block in &blocks {
            Self::write_block(&mut out, block);
        }
    }
}
