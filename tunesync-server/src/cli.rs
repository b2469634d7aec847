use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tunesync",
    about = "TuneSync - WebDAV forwarding proxy and multi-file sync",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[arg(
        long,
        env = "TUNESYNC_DATA_DIR",
        global = true,
        help = "Data directory (default ~/.tunesync)"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Start the forwarding proxy (default if no command specified)")]
    Serve(ServeArgs),

    #[command(subcommand, about = "Synchronize with the configured WebDAV store")]
    Sync(SyncCommands),

    #[command(subcommand, about = "Export or import local data")]
    Data(DataCommands),

    #[command(subcommand, about = "View and modify configuration")]
    Config(ConfigCommands),
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct ServeArgs {
    #[arg(short, long, env = "TUNESYNC_PORT")]
    pub port: Option<u16>,

    #[arg(long, help = "Listen on all interfaces")]
    pub lan: bool,

    #[arg(long, help = "Proxy mount point (e.g. /api/webdav-proxy)")]
    pub mount: Option<String>,

    #[arg(long, help = "Upstream timeout in seconds")]
    pub upstream_timeout: Option<u64>,

    #[arg(long, help = "Run periodic sync when the stored settings enable it")]
    pub auto_sync: bool,
}

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    #[command(about = "Download, resolve conflicts, persist locally and upload")]
    Run {
        #[arg(long, help = "server_wins, client_wins or last_write_wins")]
        strategy: Option<String>,

        #[arg(long, help = "Only report which side would win")]
        dry_run: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Upload local data as entity files")]
    Upload {
        #[arg(long, help = "Write to an in-memory store and show what would be sent")]
        dry_run: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Download remote data")]
    Download {
        #[arg(long, help = "Replace local data with the downloaded snapshot")]
        apply: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Check the WebDAV connection")]
    Test,

    #[command(about = "List files in the remote sync directory")]
    List,

    #[command(about = "Convert the legacy single-file snapshot and delete it")]
    Migrate {
        #[arg(long, help = "Legacy file path (default from settings)")]
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    #[command(about = "Print or write the local snapshot as JSON")]
    Export {
        #[arg(short, long, help = "Write to file instead of stdout")]
        output: Option<PathBuf>,
    },

    #[command(about = "Replace local data with an exported snapshot")]
    Import {
        #[arg(help = "Path to exported JSON")]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    #[command(about = "Show server and sync configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Key (e.g. 'server.port', 'webdav.url')")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },
}
