use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hutt_open::core::command::IpcCommand;
use hutt_open::core::config::{self, CliOverrides, HuttConfig};
use hutt_open::dispatch::{Dispatcher, Request};
use hutt_open::ipc::{Resolver, SocketTransport};
use hutt_open::platform::delegate::{applet_source, forward_command_line};
use hutt_open::platform::notify::DesktopNotifier;
use log::{debug, error, info, warn};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

#[derive(Parser)]
#[command(
    name = "hutt-open",
    about = "Open hutt:// links in the running hutt instance"
)]
struct Args {
    /// hutt:// URL to open (empty or missing does nothing)
    url: Option<String>,

    /// Socket to try before the standard locations
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Print the JSON command instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Print the socket that would be used and exit
    #[arg(long)]
    print_socket: bool,

    /// Switch the running instance to FOLDER
    #[arg(long, value_name = "FOLDER", conflicts_with_all = ["url", "quit"])]
    navigate: Option<String>,

    /// Ask the running instance to quit
    #[arg(long, conflicts_with = "url")]
    quit: bool,

    /// Print the AppleScript source of the macOS URL handler applet
    #[arg(long)]
    print_applet: bool,

    /// Don't show a desktop notification when nothing is running
    #[arg(long)]
    no_notify: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn request(&self) -> Request {
        if let Some(folder) = &self.navigate {
            Request::Command(IpcCommand::Navigate {
                folder: folder.clone(),
            })
        } else if self.quit {
            Request::Command(IpcCommand::Quit)
        } else {
            Request::Url(self.url.clone().unwrap_or_default())
        }
    }
}

/// Logs go to `$HUTT_LOG` when set (shared with hutt itself), otherwise stderr.
fn init_logging(verbose: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Some(path) = std::env::var_os("HUTT_LOG")
        && let Ok(log_file) = OpenOptions::new().create(true).append(true).open(path)
    {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
        return;
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn print_applet() -> ExitCode {
    match std::env::current_exe() {
        Ok(exe) => {
            debug!(
                "Applet runs: {}",
                forward_command_line(&exe, "hutt://message/<id>")
            );
            print!("{}", applet_source(&exe));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Cannot locate hutt-open executable: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("hutt-open invoked with {:?}", args.url);

    if args.print_applet {
        return print_applet();
    }

    let request = args.request();

    if args.dry_run {
        let Some(command) = request.into_command() else {
            return ExitCode::SUCCESS;
        };
        return match command.to_wire() {
            Ok(bytes) => {
                println!("{}", String::from_utf8_lossy(&bytes));
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to encode command: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        HuttConfig::default()
    });
    let resolved = config::resolve(
        &config,
        &CliOverrides {
            socket: args.socket.clone(),
            no_notify: args.no_notify,
        },
    );
    let resolver = Resolver::from_env(resolved.socket.clone());

    if args.print_socket {
        return match resolver.resolve() {
            Ok(address) => {
                println!("{}", address.path().display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let dispatcher = Dispatcher::new(
        resolver,
        Box::new(SocketTransport::new(resolved.connect_timeout)),
        Box::new(DesktopNotifier),
        resolved.notify,
    );

    // The dispatcher has already logged and notified on failure.
    match dispatcher.run(request).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
