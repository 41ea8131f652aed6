use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use evq::{
    cli::{self, CliError, QueryOptions, QueryOutcome, WriteOptions},
    output,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "evq")]
#[command(about = "evq - MAP/REDUCE queries over hour-bucketed JSON event logs")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query
    Query {
        /// The query to run
        query: String,

        /// File of newline-delimited JSON records ('-' for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory of hour files
        #[arg(long, env = "EVQ_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// First hour to scan (unix seconds)
        #[arg(long)]
        start: Option<i64>,

        /// Last hour to scan (unix seconds)
        #[arg(long)]
        end: Option<i64>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,
    },

    /// Append events to the hour files
    Write {
        /// A JSON event object, or an array of them, each with a `_ts`
        data: String,

        /// Directory of hour files
        #[arg(long, env = "EVQ_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'evq docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Query {
            query,
            input,
            data_dir,
            start,
            end,
            pretty,
            syntax_only,
        } => run_query(
            QueryOptions {
                query,
                input: None,
                data_dir,
                start,
                end,
                syntax_only,
            },
            input,
            pretty,
        ),
        Commands::Write { data, data_dir } => {
            cli::execute_write(&WriteOptions { data, data_dir }).map(|count| {
                println!("{}", count);
            })
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "evq=debug" } else { "evq=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin() -> Result<String, CliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn run_query(
    mut options: QueryOptions,
    input: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    options.input = match input {
        Some(path) if path.as_os_str() == "-" => Some(read_stdin()?),
        Some(path) => Some(fs::read_to_string(path)?),
        None if !options.syntax_only && !atty::is(atty::Stream::Stdin) => Some(read_stdin()?),
        None => None,
    };

    match cli::execute_query(&options)? {
        QueryOutcome::SyntaxValid => println!("Syntax is valid"),
        QueryOutcome::Success(result) => {
            if pretty {
                println!("{}", output::to_json_pretty(&result));
            } else {
                println!("{}", output::to_json(&result));
            }
        }
    }
    Ok(())
}
