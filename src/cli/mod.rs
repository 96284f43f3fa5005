//! CLI for biochat.
//!
//! - Argument parsing
//! - Version display
//! - The chat, suggest and clear commands
//!
//! # Usage
//!
//! ```ignore
//! use biochat::cli::{parse_args, run};
//!
//! let args = parse_args(std::env::args())?;
//! let code = run(args, config).await?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliArgs, CliCommand, USAGE};
pub use version::{version_string, VERSION};

use std::io::Write;
use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing::info;

use crate::adapters::{FileSessionStore, ReqwestHttpClient, StdoutSink};
use crate::api::ChatApi;
use crate::config::ClientConfig;
use crate::conversation::Conversation;
use crate::session::{StreamController, Termination};
use crate::traits::{HttpClient, RenderSink};

/// Exit code for a session that ended in an error.
pub const EXIT_ERRORED: i32 = 1;

/// Run a parsed command line against the configured backend.
///
/// Returns the process exit code.
pub async fn run(args: CliArgs, config: ClientConfig) -> Result<i32> {
    match &args.command {
        CliCommand::Version => {
            println!("{}", version_string());
            return Ok(0);
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(0);
        }
        _ => {}
    }

    let config = match &args.url {
        Some(url) => config.with_base_url(url.as_str()),
        None => config,
    };
    config.validate()?;

    let client = ReqwestHttpClient::with_connect_timeout(config.connect_timeout())?;
    let store = Arc::new(FileSessionStore::new(config.session_file()?.clone()));
    let controller = StreamController::new(ChatApi::new(client, &config.base_url), store);
    if let Some(session_id) = args.session_id {
        controller.set_session_id(Some(session_id));
    }

    let mut stdout = std::io::stdout();
    match args.command {
        CliCommand::Chat { message } => {
            let sink: Arc<dyn RenderSink> = Arc::new(StdoutSink::new());
            let termination = chat(&controller, &message, args.image_id, sink).await?;
            Ok(exit_code(&termination))
        }
        CliCommand::Suggest { agent } => {
            suggest(&controller, &agent, &mut stdout).await?;
            Ok(0)
        }
        CliCommand::Clear => {
            controller.clear_session().await?;
            writeln!(stdout, "Conversation cleared.")?;
            Ok(0)
        }
        CliCommand::Version | CliCommand::Help => Ok(0),
    }
}

/// Send one message and stream the answer into `sink`.
///
/// Ctrl-C cancels the session.
pub async fn chat<C: HttpClient + 'static>(
    controller: &StreamController<C>,
    message: &str,
    image_id: Option<String>,
    sink: Arc<dyn RenderSink>,
) -> Result<Termination> {
    let request = controller
        .compose_request(message, image_id)
        .ok_or_else(|| eyre!("Message is empty"))?;
    let handle = controller.start(request, Conversation::new(sink))?;

    let mut finished = Box::pin(handle.finished());
    let outcome = tokio::select! {
        outcome = &mut finished => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, cancelling");
            controller.cancel().await;
            finished.await
        }
    };

    outcome
        .map(|outcome| outcome.termination)
        .ok_or_else(|| eyre!("Session task ended unexpectedly"))
}

/// Print the suggested questions for `agent`, one per line.
pub async fn suggest<C: HttpClient + 'static, W: Write>(
    controller: &StreamController<C>,
    agent: &str,
    out: &mut W,
) -> Result<()> {
    let questions = controller
        .api()
        .fetch_suggested(agent)
        .await
        .wrap_err_with(|| format!("Could not fetch suggestions for {}", agent))?;
    for question in questions {
        writeln!(out, "{}", question)?;
    }
    Ok(())
}

pub fn exit_code(termination: &Termination) -> i32 {
    match termination {
        Termination::Errored(_) => EXIT_ERRORED,
        Termination::Completed | Termination::Cancelled => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemorySessionStore, MockHttpClient, MockResponse, RecordingSink};
    use crate::error::StreamError;
    use crate::traits::Response;
    use bytes::Bytes;

    const BASE: &str = "http://test";

    fn controller(client: MockHttpClient) -> StreamController<MockHttpClient> {
        StreamController::new(
            ChatApi::new(client, BASE),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Termination::Completed), 0);
        assert_eq!(exit_code(&Termination::Cancelled), 0);
        assert_eq!(
            exit_code(&Termination::Errored(StreamError::Transport("x".into()))),
            EXIT_ERRORED
        );
    }

    #[tokio::test]
    async fn test_chat_streams_into_sink() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/api/chat",
            MockResponse::Stream(vec![Bytes::from(
                "data: {\"type\":\"agent\",\"agent\":\"CFO\",\"agent_key\":\"cfo\"}\n\
                 data: {\"type\":\"text\",\"content\":\"**Margin** is fine\"}\n\
                 data: {\"type\":\"done\"}\n",
            )]),
        );
        let controller = controller(client.clone());
        let sink = Arc::new(RecordingSink::new());

        let termination = chat(&controller, "@cfo margins?", Some("img-1".into()), sink.clone())
            .await
            .unwrap();

        assert_eq!(termination, Termination::Completed);
        assert_eq!(
            sink.finished_turns(),
            vec!["<strong>Margin</strong> is fine".to_string()]
        );
        let body = client.get_requests()[0].body.clone().unwrap();
        assert!(body.contains("\"image_id\":\"img-1\""));
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let controller = controller(MockHttpClient::new());
        let sink = Arc::new(RecordingSink::new());
        assert!(chat(&controller, "   ", None, sink).await.is_err());
    }

    #[tokio::test]
    async fn test_suggest_prints_questions() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/api/suggested",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"questions":["What to plant?","When to water?"]}"#),
            )),
        );
        let controller = controller(client);
        let mut out = Vec::new();

        suggest(&controller, "farmer", &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "What to plant?\nWhen to water?\n"
        );
    }
}
