use biochat::cli::{self, parse_args};
use biochat::config::ClientConfig;
use biochat::logging::init_logging;

use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    let config = ClientConfig::from_env()?;
    init_logging(config.log_filter.as_deref());

    let runtime = tokio::runtime::Runtime::new()?;
    let code = runtime.block_on(cli::run(args, config))?;
    std::process::exit(code);
}
