//! Portmon CLI - Watch TCP connections and kill the processes behind them
//!
//! A command-line tool for scanning the connection table, monitoring it on
//! an interval, and terminating owner processes.

mod commands;
mod sink;
mod table;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "portmon")]
#[command(author, version, about = "Watch the host's TCP connection table and kill owner processes")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot scan of the connection table
    #[command(alias = "ls")]
    List {
        /// Comma-separated ports to restrict the listing to
        #[arg(short, long)]
        ports: Option<String>,

        /// Include non-listening connections
        #[arg(long)]
        all: bool,

        /// Sort by column: protocol, address, port, state, owner, process
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },

    /// Poll the connection table on an interval until interrupted
    #[command(alias = "watch")]
    Monitor {
        /// Seconds between scans
        #[arg(short, long, default_value_t = 10)]
        interval: u64,

        /// Comma-separated ports to restrict the view to
        #[arg(short, long)]
        ports: Option<String>,

        /// Include non-listening connections
        #[arg(long)]
        all: bool,
    },

    /// Terminate the process owning a connection
    Kill {
        /// Owner process id, as shown in the PID column
        pid: String,
    },

    /// Show the persisted filter settings
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List {
            ports,
            all,
            sort,
            desc,
        }) => {
            commands::list::run(ports, all, sort, desc, cli.json).await?;
        }
        Some(Commands::Monitor {
            interval,
            ports,
            all,
        }) => {
            commands::monitor::run(interval, ports, all, cli.json).await?;
        }
        Some(Commands::Kill { pid }) => {
            commands::kill::run(pid, cli.json).await?;
        }
        Some(Commands::Config) => {
            commands::config::show(cli.json).await?;
        }
        None => {
            commands::list::run(None, false, None, false, cli.json).await?;
        }
    }

    Ok(())
}
