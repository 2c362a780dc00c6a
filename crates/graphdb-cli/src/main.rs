use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod repl;

#[derive(Parser)]
#[command(name = "graphdb", version, about = "Embedded property-graph database with a restricted Cypher dialect")]
struct Cli {
    /// Database directory. Created if it does not yet exist.
    #[arg(default_value = "./graphdb")]
    path: PathBuf,

    /// Emit each row as a JSON object instead of the tabular rendering.
    #[arg(long)]
    json: bool,

    /// Raise the default log level to debug. `RUST_LOG` always takes
    /// precedence when set.
    #[arg(short, long)]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let mut db = match graphdb::Database::open(&cli.path, graphdb::Options::default()) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("failed to open database at {}: {err}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };

    match repl::run(&mut db, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
