//! Chat client for a Rasa REST webhook (config, message types, transport,
//! Markdown rendering, chat log and the widget that ties them together).
//! Used by the `rasa-chat` binary.

pub mod chat_log;
pub mod client;
pub mod config;
pub mod messages;
pub mod render;
pub mod tracing_setup;
pub mod widget;

pub use chat_log::{ChatBlock, ChatLog, MemoryChatLog, NoticeKind, WriterChatLog};
pub use client::{ClientError, RestClient, Transport, DEFAULT_WEBHOOK_URL};
pub use config::{default_config_path, ChatSection, Config, ConfigError, ServerSection};
pub use messages::{OutboundMessage, ResponseItem};
pub use render::{CmarkRenderer, MarkdownRenderer};
pub use widget::{ChatWidget, MessageInput, Notices, SendTrigger, SubmitOutcome, TextField};
