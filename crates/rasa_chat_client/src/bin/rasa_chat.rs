//! rasa-chat: terminal front end for a Rasa REST webhook.
//! Sends the MESSAGE argument (or each stdin line) to the webhook and prints
//! every reply block as HTML to stdout.

use clap::Parser;
use rasa_chat_client::config::{self, Config};
use rasa_chat_client::{
    ChatWidget, CmarkRenderer, RestClient, SubmitOutcome, TextField, WriterChatLog,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "rasa-chat", version, about)]
struct Cli {
    /// Config file (default: ~/.rasa-chat/config.yaml)
    #[arg(long, env = "RASA_CHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Webhook URL, overrides `server.url`
    #[arg(long)]
    url: Option<String>,

    /// Sender id, overrides `chat.sender`
    #[arg(long)]
    sender: Option<String>,

    /// Pass raw HTML in replies through instead of escaping it
    #[arg(long)]
    raw_html: bool,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Message to send; without it, every stdin line is sent
    message: Option<String>,
}

fn load_config(cli: &Cli) -> (Option<PathBuf>, Config) {
    // 1. --config flag or RASA_CHAT_CONFIG: must exist.
    if let Some(path) = &cli.config {
        return match config::load(path) {
            Ok(c) => (Some(path.clone()), c),
            Err(e) if cli.init_config && !path.exists() => {
                tracing::debug!(error = %e, "no config yet, starting from defaults");
                (Some(path.clone()), Config::default())
            }
            Err(e) => {
                eprintln!("Error: failed to load config from {}: {}", path.display(), e);
                process::exit(1);
            }
        };
    }
    // 2. Default path (~/.rasa-chat/config.yaml), if present.
    let path = config::default_config_path();
    match &path {
        Some(p) if p.exists() => match config::load(p) {
            Ok(c) => (path, c),
            Err(e) => {
                eprintln!("Error: failed to load config from {}: {}", p.display(), e);
                process::exit(1);
            }
        },
        _ => (path, Config::default()),
    }
}

fn apply_overrides(cli: &Cli, cfg: &mut Config) {
    if let Some(url) = &cli.url {
        cfg.server.url = Some(url.clone());
    }
    if let Some(sender) = &cli.sender {
        cfg.chat.sender = Some(sender.clone());
    }
    if cli.raw_html {
        cfg.chat.sanitize = Some(false);
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = rasa_chat_client::tracing_setup::init_tracing("warn") {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let (config_path, mut cfg) = load_config(&cli);
    apply_overrides(&cli, &mut cfg);

    if cli.init_config {
        let path = config_path.unwrap_or_else(|| {
            eprintln!("Error: unable to determine config path (set --config or RASA_CHAT_CONFIG)");
            process::exit(1);
        });
        if let Err(e) = config::save(&path, &cfg.resolved()) {
            eprintln!("Error: failed to write config to {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("Wrote {}", path.display());
        return;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    let input = Arc::new(TextField::default());
    let widget = Arc::new(
        ChatWidget::new(
            input.clone(),
            Arc::new(WriterChatLog::new(std::io::stdout())),
            Arc::new(RestClient::new(cfg.webhook_url())),
            Arc::new(CmarkRenderer::new(cfg.sanitize())),
        )
        .with_sender(cfg.sender())
        .with_notices(cfg.notices()),
    );

    let code = rt.block_on(async {
        match &cli.message {
            Some(message) => {
                input.set_value(message.as_str());
                match widget.activate().await {
                    Ok(SubmitOutcome::Failed { reason }) => {
                        eprintln!("Error: {}", reason);
                        1
                    }
                    Ok(_) => 0,
                    Err(e) => {
                        eprintln!("Error: exchange aborted: {}", e);
                        1
                    }
                }
            }
            None => {
                // Each line is one press of "send"; replies are not awaited
                // before the next line is sent.
                let (trigger, activations) = widget.send_trigger();
                let session = tokio::spawn(Arc::clone(&widget).bind(activations));
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => {
                            input.set_value(line);
                            trigger.click();
                        }
                        Ok(None) => break,
                        Err(e) => {
                            eprintln!("Error: failed to read stdin: {}", e);
                            break;
                        }
                    }
                }
                drop(trigger);
                if let Err(e) = session.await {
                    eprintln!("Error: chat session aborted: {}", e);
                    return 1;
                }
                0
            }
        }
    });

    process::exit(code);
}
