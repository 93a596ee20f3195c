//! Chat log sinks: line framing and surviving a panicking writer.

use rasa_chat_client::{ChatBlock, ChatLog, NoticeKind, WriterChatLog};
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};

#[test]
fn writer_log_keeps_each_block_on_one_line() {
    let log = WriterChatLog::new(Vec::new());
    log.append_all(vec![
        ChatBlock::Bot("<p>one</p>\n<pre><code>a\nb\n</code></pre>\n".into()),
        ChatBlock::Notice(NoticeKind::NoReply),
    ]);

    let out = String::from_utf8(log.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"<div class="bot-msg"><p>one</p>&#10;<pre><code>a&#10;b&#10;</code></pre></div>"#,
            r#"<div class="bot-msg notice no-reply">The assistant did not reply.</div>"#,
        ]
    );
}

/// Writer whose first write panics while the log holds its lock.
#[derive(Default)]
struct FlakyWriter {
    failed_once: bool,
    buf: Vec<u8>,
}

impl Write for FlakyWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        if !self.failed_once {
            self.failed_once = true;
            panic!("writer blew up");
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn writer_log_keeps_appending_after_a_panicking_write() {
    let log = WriterChatLog::new(FlakyWriter::default());

    let first = catch_unwind(AssertUnwindSafe(|| log.append(ChatBlock::Bot("lost".into()))));
    assert!(first.is_err());

    log.append(ChatBlock::Bot("<p>kept</p>".into()));

    let out = String::from_utf8(log.into_inner().buf).unwrap();
    assert_eq!(out, "<div class=\"bot-msg\"><p>kept</p></div>\n");
}
