//! CLI entry point for dirmap

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dirmap::server::DEFAULT_PORT;
use dirmap::{
    ExcludePatterns, MapError, MapOptions, OutputFormat, ServerConfig, create_map, serve,
    visualize,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dirmap")]
#[command(about = "Map a directory structure with respect to .gitignore rules")]
#[command(version)]
struct Args {
    /// Directory to map (default: current working directory)
    #[arg(short = 'd', long = "directory")]
    directory: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Trim the output by excluding common directories like .git, __pycache__, etc.
    #[arg(short = 't', long = "trim")]
    trim: bool,

    /// Substrings to exclude when trimming (use with --trim)
    #[arg(long = "exclude", value_name = "PATTERN", num_args = 1..)]
    exclude: Option<Vec<String>>,

    /// Generate an HTML visualization of the structure (JSON format only)
    #[arg(short = 'v', long = "visualize")]
    visualize: bool,

    /// Open the visualization in a web browser (use with --visualize)
    #[arg(short = 'o', long = "open")]
    open: bool,

    /// Start a web server to visualize the structure
    #[arg(long = "serve")]
    serve: bool,

    /// Port to run the server on
    #[arg(long = "port", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Do not open a browser when serving
    #[arg(long = "no-browser", requires = "serve")]
    no_browser: bool,

    /// Enable verbose output
    #[arg(long = "verbose")]
    verbose: bool,
}

/// Install the stderr logger. The level is fixed here for the whole run.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dirmap={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run_server(config: ServerConfig) -> Result<(), MapError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(MapError::Server)?;
    runtime.block_on(serve(config))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut format = args.format;
    if args.visualize && format != OutputFormat::Json {
        tracing::warn!("Visualization only works with JSON format. Switching to JSON format.");
        format = OutputFormat::Json;
    }

    let directory = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_else(|e| {
            eprintln!("dirmap: cannot determine current directory: {}", e);
            process::exit(1);
        }),
    };

    let mut options = MapOptions::new(directory)
        .with_format(format)
        .with_visualize(args.visualize);
    if args.trim {
        let patterns = args
            .exclude
            .map(ExcludePatterns::new)
            .unwrap_or_else(ExcludePatterns::defaults);
        options = options.with_trim(patterns);
    }

    let outcome = create_map(&options).unwrap_or_else(|e| {
        eprintln!("dirmap: {}", e);
        process::exit(1);
    });

    if args.open && args.visualize {
        if let Some(page) = &outcome.visualization {
            visualize::open_in_browser(&visualize::file_url(page));
        }
    }

    if args.serve {
        if format != OutputFormat::Json {
            tracing::warn!(
                "Server visualization requires JSON format. Please re-run with --format json"
            );
            return;
        }
        let config = ServerConfig {
            structure_path: outcome.structure_path,
            port: args.port,
            open_browser: !args.no_browser,
        };
        if let Err(e) = run_server(config) {
            eprintln!("dirmap: {}", e);
            process::exit(1);
        }
    }
}
