//! tivoctl - control a TiVo over its TCP remote control protocol
//!
//! Usage: tivoctl --host <host> <COMMAND> [KEY...]

use anyhow::Context;
use std::io::Write;
use std::process::ExitCode;
use tivo::cli::{self, CliAction, CliCommand};
use tivo::client::Remote;
use tivo::TivoError;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = match cli::parse_args(pico_args::Arguments::from_env())
        .context("invalid command line, see --help")?
    {
        CliAction::Help => {
            print!("{}", cli::HELP);
            return Ok(ExitCode::SUCCESS);
        }
        CliAction::Version => {
            println!("tivoctl {}", cli::VERSION);
            return Ok(ExitCode::SUCCESS);
        }
        CliAction::Run(args) => args,
    };

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let config = match args.config() {
        Ok(config) => config,
        Err(TivoError::MissingHost) => {
            log::error!("error: --host must be set");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            log::error!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut remote = Remote::new(config);
    let mut stdout = std::io::stdout();

    if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        cli::run_interactive(&mut remote, stdin, &mut stdout).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = args.command.as_deref() else {
        log::error!("error: a command is required, see --help");
        return Ok(ExitCode::FAILURE);
    };

    let result = match CliCommand::parse(command, args.keys.clone()) {
        Ok(command) => cli::execute(&mut remote, &command, &mut stdout).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            log::error!("{}", cli::error_message(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}
