mod cli;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wordvec::{QueryConfig, Session};

/// wordvec - query a trained word-embedding table
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Embedding table to load at startup (bincode, or JSON with a .json extension)
    #[arg(short, long)]
    model: Option<String>,

    /// Default number of neighbors for `similar`
    #[arg(long, default_value_t = wordvec::similarity::DEFAULT_NEIGHBORS)]
    neighbors: usize,

    /// Default number of answers for `analogy`
    #[arg(long, default_value_t = wordvec::analogy::DEFAULT_ANALOGY_RESULTS)]
    analogy_results: usize,

    /// Minimum similarity ratio for auto-correcting misspelled words
    #[arg(long, default_value_t = wordvec::fuzzy::DEFAULT_CUTOFF)]
    fuzzy_cutoff: f64,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Interactive session (the default)
    Repl,

    /// Run a single query and exit, e.g. `query similar king --k_top 3`
    Query {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },

    /// Serve the JSON query API
    Serve {
        /// Bind address
        #[arg(short, long, default_value = "127.0.0.1:7878")]
        bind: String,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so query output on stdout stays clean
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordvec=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = QueryConfig::default()
        .with_neighbors(args.neighbors)
        .with_analogy_results(args.analogy_results)
        .with_fuzzy_cutoff(args.fuzzy_cutoff);

    let mut session = Session::new(config);
    if let Some(path) = &args.model {
        // A table that fails to load at startup ends the program
        session
            .load(path)
            .with_context(|| format!("cannot start without embedding table '{}'", path))?;
    }

    match args.command.unwrap_or(Mode::Repl) {
        Mode::Repl => cli::run_repl(&mut session)?,

        Mode::Query { args } => {
            // A failed one-shot query exits non-zero
            let command = cli::parse_command(&args)?;
            cli::execute_command(&mut session, command)?;
        }

        Mode::Serve { bind } => {
            if !session.is_loaded() {
                anyhow::bail!("'serve' requires --model <PATH>");
            }
            info!(bind = %bind, "starting query server");

            let session = web::Data::new(session);
            HttpServer::new(move || App::new().app_data(session.clone()).configure(wordvec::server::config))
                .bind(&bind)?
                .run()
                .await?;
        }
    }

    Ok(())
}
