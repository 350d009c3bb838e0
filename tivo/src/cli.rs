//! Command-line front end for `tivoctl`
//!
//! Argument parsing, command dispatch and the interactive prompt. The binary
//! in `main.rs` only wires these to the process environment.

use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;
use tivo_client::{Remote, RemoteConfig};
use tivo_core::{TivoError, TivoResult, Verb};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
tivoctl - TiVo TCP Remote Control

USAGE:
  tivoctl [OPTIONS] <COMMAND> [KEY...]

COMMANDS:
  IRCODE <code...>      Send remote control codes (e.g. CHANNELUP)
  KEYBOARD <key...>     Send keyboard codes
  TELEPORT <screen>     Jump to TIVO, LIVETV, GUIDE or NOWPLAYING
  SETCH <channel>       Tune to a channel
  CHANNEL               Print the channel reported by the device
  SCREEN                Print the last known screen

  Command names are not case sensitive (ircode works as well as IRCODE).

OPTIONS:
  -h, --help            Prints help information
  --version             Prints version information
  --host <host>         TiVo hostname or IP address
  --port <port>         TiVo Remote Protocol port number (default 31339)
  --timeout <seconds>   Socket timeout in seconds (0 = no timeout, default 0.25)
  -v, --verbose         Increase output verbosity (-vv for protocol traffic)
  -q, --quiet           Suppress non-fatal output
  -i, --interactive     Read commands from standard input

e.g. tivoctl --host 192.168.0.10 IRCODE CHANNELUP
";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the command line asks for
#[derive(Debug, PartialEq)]
pub enum CliAction {
    Help,
    Version,
    Run(AppArgs),
}

#[derive(Debug, Default, PartialEq)]
pub struct AppArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Seconds; 0 disables the timeout
    pub timeout: Option<f64>,
    pub verbose: u8,
    pub quiet: bool,
    pub interactive: bool,
    pub command: Option<String>,
    pub keys: Vec<String>,
}

impl AppArgs {
    /// Log level: `-q` errors only, default warnings, `-v` info, `-vv` debug
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                _ => log::LevelFilter::Debug,
            }
        }
    }

    /// Build the remote configuration from the options
    pub fn config(&self) -> TivoResult<RemoteConfig> {
        let mut builder = RemoteConfig::builder();
        if let Some(host) = &self.host {
            builder = builder.host(host.as_str());
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(seconds) = self.timeout {
            let timeout = Duration::try_from_secs_f64(seconds).map_err(|_| {
                TivoError::InvalidConfig(format!("invalid timeout: {}", seconds))
            })?;
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

pub fn parse_args(mut pargs: pico_args::Arguments) -> Result<CliAction, pico_args::Error> {
    if pargs.contains(["-h", "--help"]) {
        return Ok(CliAction::Help);
    }
    if pargs.contains("--version") {
        return Ok(CliAction::Version);
    }

    let mut verbose = 0u8;
    if pargs.contains("-vv") {
        verbose += 2;
    }
    while pargs.contains(["-v", "--verbose"]) {
        verbose = verbose.saturating_add(1);
    }

    let mut args = AppArgs {
        quiet: pargs.contains(["-q", "--quiet"]),
        interactive: pargs.contains(["-i", "--interactive"]),
        host: pargs.opt_value_from_str("--host")?,
        port: pargs.opt_value_from_str("--port")?,
        timeout: pargs.opt_value_from_str("--timeout")?,
        verbose,
        ..Default::default()
    };

    let mut free = pargs
        .finish()
        .into_iter()
        .map(|arg: OsString| arg.into_string().map_err(|_| pico_args::Error::NonUtf8Argument));
    args.command = free.next().transpose()?;
    args.keys = free.collect::<Result<_, _>>()?;

    Ok(CliAction::Run(args))
}

/// A command given on the command line or at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Send(Verb, Vec<String>),
    Channel,
    Screen,
}

impl CliCommand {
    pub fn parse(command: &str, keys: Vec<String>) -> TivoResult<Self> {
        match command.to_ascii_uppercase().as_str() {
            "CHANNEL" => Ok(CliCommand::Channel),
            "SCREEN" => Ok(CliCommand::Screen),
            _ => Ok(CliCommand::Send(command.parse()?, keys)),
        }
    }
}

/// Run one command against `remote`, printing query results to `out`
pub async fn execute<W: Write>(remote: &mut Remote, command: &CliCommand, out: &mut W) -> TivoResult<()> {
    match command {
        CliCommand::Send(_, keys) if keys.is_empty() => {
            log::warn!("Warning: No keys specified.");
        }
        CliCommand::Send(verb @ (Verb::Ircode | Verb::Keyboard), keys) => {
            for key in keys {
                log::info!("{} {}", verb, key);
                match verb {
                    Verb::Ircode => remote.send_ircode(key).await?,
                    _ => remote.send_keyboard(key).await?,
                }
            }
        }
        CliCommand::Send(verb, keys) => {
            if keys.len() > 1 {
                log::warn!("{} takes one argument, ignoring {:?}", verb, &keys[1..]);
            }
            log::info!("{} {}", verb, keys[0]);
            match verb {
                Verb::Teleport => remote.teleport(&keys[0]).await?,
                _ => remote.set_channel(&keys[0]).await?,
            }
        }
        CliCommand::Channel => {
            let channel = remote.channel().await?;
            writeln!(out, "{}", channel.as_deref().unwrap_or("unknown")).map_err(TivoError::from)?;
        }
        CliCommand::Screen => {
            writeln!(out, "{}", remote.screen()).map_err(TivoError::from)?;
        }
    }
    Ok(())
}

/// User-facing message for a failed command
pub fn error_message(error: &TivoError) -> String {
    if error.is_timeout() {
        "Error: Timed out!".to_string()
    } else if let Some(e) = error.io_error() {
        format!("Error: {}", e)
    } else {
        format!("Error: {}", error)
    }
}

/// Read `COMMAND KEY...` lines from `input` until end of input or `quit`
///
/// Failed commands are reported and the prompt continues; the remote keeps
/// its channel and screen state across lines.
pub async fn run_interactive<R, W>(remote: &mut Remote, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "tivo> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        if matches!(command, "quit" | "exit" | "q") {
            break;
        }

        let keys = parts.map(str::to_string).collect();
        let result = match CliCommand::parse(command, keys) {
            Ok(command) => execute(remote, &command, out).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            log::error!("{}", error_message(&e));
        }
    }
    Ok(())
}
