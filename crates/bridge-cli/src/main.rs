//! # bridge-cli
//!
//! Debug client for the gateway realtime channel — tail events, send a chat
//! message, or pull a status snapshot from a terminal.

#![deny(unsafe_code)]

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use bridge_client::{ClientConfig, GatewayClient};
use bridge_protocol::{InboundEvent, OutboundAction, ThinkingLevel};

/// Gateway realtime channel debug client.
#[derive(Parser, Debug)]
#[command(name = "bridge", about = "Gateway realtime channel debug client", version)]
struct Cli {
    /// Base origin URL of the gateway.
    #[arg(long, default_value = "http://127.0.0.1:4300")]
    url: String,

    /// Auth token attached to the connection.
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream every inbound event, one JSON line each, until ctrl-c.
    Tail,
    /// Send a chat message and stream the assistant's response.
    Chat {
        /// Message text.
        message: String,

        /// Session to continue; omit to let the gateway start one.
        #[arg(long)]
        session_id: Option<String>,

        /// Model override.
        #[arg(long)]
        model: Option<String>,

        /// Thinking level override.
        #[arg(long, value_enum)]
        thinking: Option<ThinkingArg>,
    },
    /// Request a status snapshot and print it.
    Status,
}

/// Thinking level as a CLI flag.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThinkingArg {
    Low,
    Medium,
    High,
}

impl From<ThinkingArg> for ThinkingLevel {
    fn from(arg: ThinkingArg) -> Self {
        match arg {
            ThinkingArg::Low => Self::Low,
            ThinkingArg::Medium => Self::Medium,
            ThinkingArg::High => Self::High,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    bridge_logging::init("info");

    let mut config = ClientConfig {
        base_url: args.url,
        token: args.token,
        ..ClientConfig::default()
    };
    config.apply_env_overrides();

    let client = GatewayClient::connect(config).context("unusable gateway URL")?;

    // Bridge subscriber callbacks into this task so command loops can await
    // events instead of polling.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = client.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    let outcome = match args.command {
        Command::Tail => tail(&mut rx).await,
        Command::Chat {
            message,
            session_id,
            model,
            thinking,
        } => {
            let action = OutboundAction::Chat {
                message,
                session_id,
                model,
                thinking_level: thinking.map(Into::into),
            };
            chat(&client, &mut rx, action).await
        }
        Command::Status => status(&client, &mut rx).await,
    };

    sub.unsubscribe();
    client.shutdown().await;
    outcome
}

/// Block until the connection opens, surfacing teardown as an error.
async fn wait_until_open(rx: &mut mpsc::UnboundedReceiver<InboundEvent>) -> Result<()> {
    loop {
        match rx.recv().await {
            Some(InboundEvent::Connected) => return Ok(()),
            Some(_) => {}
            None => bail!("client torn down before the connection opened"),
        }
    }
}

async fn tail(rx: &mut mpsc::UnboundedReceiver<InboundEvent>) -> Result<()> {
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { return Ok(()) };
                println!("{}", serde_json::to_string(&event)?);
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for ctrl-c")?;
                return Ok(());
            }
        }
    }
}

async fn chat(
    client: &GatewayClient,
    rx: &mut mpsc::UnboundedReceiver<InboundEvent>,
    action: OutboundAction,
) -> Result<()> {
    wait_until_open(rx).await?;
    client.send(action);

    // The gateway streams response chunks between typing transitions; the
    // trailing `typing: false` marks the end of the turn.
    let mut saw_chunk = false;
    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(InboundEvent::Response { content, .. }) => {
                        print!("{content}");
                        let _ = std::io::stdout().flush();
                        saw_chunk = true;
                    }
                    Some(InboundEvent::Typing { status: false }) if saw_chunk => {
                        println!();
                        return Ok(());
                    }
                    Some(InboundEvent::Error { error }) => {
                        bail!("gateway error: {error}");
                    }
                    Some(InboundEvent::Disconnected) => {
                        bail!("connection lost mid-response");
                    }
                    Some(_) => {}
                    None => return Ok(()),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for ctrl-c")?;
                return Ok(());
            }
        }
    }
}

async fn status(
    client: &GatewayClient,
    rx: &mut mpsc::UnboundedReceiver<InboundEvent>,
) -> Result<()> {
    wait_until_open(rx).await?;
    client.send(OutboundAction::Status);

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(InboundEvent::Status { data }) => {
                        println!("{}", serde_json::to_string_pretty(&data)?);
                        return Ok(());
                    }
                    Some(InboundEvent::Error { error }) => {
                        bail!("gateway error: {error}");
                    }
                    Some(_) => {}
                    None => return Ok(()),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for ctrl-c")?;
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_default_url() {
        let cli = Cli::parse_from(["bridge", "tail"]);
        assert_eq!(cli.url, "http://127.0.0.1:4300");
    }

    #[test]
    fn cli_custom_url_and_token() {
        let cli = Cli::parse_from(["bridge", "--url", "https://gw.internal", "--token", "t", "tail"]);
        assert_eq!(cli.url, "https://gw.internal");
        assert_eq!(cli.token.as_deref(), Some("t"));
    }

    #[test]
    fn cli_chat_message() {
        let cli = Cli::parse_from(["bridge", "chat", "hello there"]);
        let Command::Chat { message, session_id, .. } = cli.command else {
            panic!("expected chat command");
        };
        assert_eq!(message, "hello there");
        assert_eq!(session_id, None);
    }

    #[test]
    fn cli_chat_with_overrides() {
        let cli = Cli::parse_from([
            "bridge", "chat", "hi", "--session-id", "s1", "--model", "m", "--thinking", "high",
        ]);
        let Command::Chat { session_id, model, thinking, .. } = cli.command else {
            panic!("expected chat command");
        };
        assert_eq!(session_id.as_deref(), Some("s1"));
        assert_eq!(model.as_deref(), Some("m"));
        assert!(matches!(thinking, Some(ThinkingArg::High)));
    }

    #[test]
    fn cli_status_subcommand() {
        let cli = Cli::parse_from(["bridge", "status"]);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn thinking_arg_maps_to_protocol_level() {
        assert_eq!(ThinkingLevel::from(ThinkingArg::Low), ThinkingLevel::Low);
        assert_eq!(ThinkingLevel::from(ThinkingArg::Medium), ThinkingLevel::Medium);
        assert_eq!(ThinkingLevel::from(ThinkingArg::High), ThinkingLevel::High);
    }
}
