//! Command-line argument parsing for the biochat CLI.

use thiserror::Error;

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Forget the current conversation
    Clear,
    /// Print suggested questions for an agent
    Suggest { agent: String },
    /// Send one message and stream the answer
    Chat { message: String },
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub url: Option<String>,
    /// Session id to use instead of the stored one
    pub session_id: Option<String>,
    /// Id of an already uploaded image
    pub image_id: Option<String>,
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("No message given")]
    NoMessage,
}

pub const USAGE: &str = "\
Usage: biochat [OPTIONS] <message...>

Options:
  --url URL        Backend URL (env: BIOCHAT_URL)
  --session ID     Use this session id instead of the stored one
  --image ID       Attach a previously uploaded image
  --suggest AGENT  Print suggested questions for AGENT
  --clear          Forget the current conversation
  -V, --version    Print version
  -h, --help       Print this help";

/// Parse command-line arguments.
///
/// `--version` and `--help` win over everything else. Words that are not
/// options are joined with spaces into the message.
///
/// # Examples
///
/// ```
/// use biochat::cli::args::{parse_args, CliCommand};
///
/// let args = ["biochat", "@cfo", "hello"].map(String::from);
/// let parsed = parse_args(args.into_iter()).unwrap();
/// assert_eq!(parsed.command, CliCommand::Chat { message: "@cfo hello".to_string() });
/// ```
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut url = None;
    let mut session_id = None;
    let mut image_id = None;
    let mut suggest = None;
    let mut clear = false;
    let mut words = Vec::new();

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(bare(CliCommand::Version)),
            "--help" | "-h" => return Ok(bare(CliCommand::Help)),
            "--url" => url = Some(args.next().ok_or(ArgsError::MissingValue("--url"))?),
            "--session" => {
                session_id = Some(args.next().ok_or(ArgsError::MissingValue("--session"))?)
            }
            "--image" => image_id = Some(args.next().ok_or(ArgsError::MissingValue("--image"))?),
            "--suggest" => {
                suggest = Some(args.next().ok_or(ArgsError::MissingValue("--suggest"))?)
            }
            "--clear" => clear = true,
            "--" => {
                words.extend(args.by_ref());
            }
            other if other.starts_with("--") => {
                return Err(ArgsError::UnknownOption(other.to_string()))
            }
            _ => words.push(arg),
        }
    }

    let command = if clear {
        CliCommand::Clear
    } else if let Some(agent) = suggest {
        CliCommand::Suggest { agent }
    } else if words.is_empty() {
        return Err(ArgsError::NoMessage);
    } else {
        CliCommand::Chat {
            message: words.join(" "),
        }
    };

    Ok(CliArgs {
        url,
        session_id,
        image_id,
        command,
    })
}

fn bare(command: CliCommand) -> CliArgs {
    CliArgs {
        url: None,
        session_id: None,
        image_id: None,
        command,
    }
}
