use anyhow::{bail, Context};
use std::io::{self, Write};
use wordvec::{Session, WordVector};
use wordvec::{Projection, QueryResult};

pub enum Command {
    Load { path: String },
    Similar { word: String, k_top: Option<usize> },
    Similarity { word1: String, word2: String },
    Analogy { a: String, b: String, c: String, k_top: Option<usize> },
    OddOneOut { words: Vec<String> },
    Vocab,
    Vector { word: String },
    Plot { words: Vec<String> },
}

const COMMANDS: &str = "load, similar, similarity, analogy, odd, vocab, vector, plot";

/// Parse a command from a whitespace-split argument list
/// This is used both for one-shot queries and REPL input
pub fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let Some(command) = args.first() else {
        bail!("No command provided. Use: {}", COMMANDS);
    };

    match command.to_lowercase().as_str() {
        "load" => parse_load(args),
        "similar" => parse_similar(args),
        "similarity" => parse_similarity(args),
        "analogy" => parse_analogy(args),
        "odd" => parse_words(args, "odd").map(|words| Command::OddOneOut { words }),
        "vocab" => Ok(Command::Vocab),
        "vector" => parse_vector(args),
        "plot" => parse_words(args, "plot").map(|words| Command::Plot { words }),
        _ => bail!("Unknown command: {}. Available: {}", command, COMMANDS),
    }
}

/// Split a trailing `--k_top <number>` off the argument list
fn split_k_top(args: &[String]) -> anyhow::Result<(&[String], Option<usize>)> {
    if args.len() >= 2 && args[args.len() - 2] == "--k_top" {
        let raw = &args[args.len() - 1];
        let k = raw
            .parse::<usize>()
            .with_context(|| format!("Invalid --k_top value: '{}'. Must be a positive integer.", raw))?;
        return Ok((&args[..args.len() - 2], Some(k)));
    }
    Ok((args, None))
}

/// Usage: load <path>
fn parse_load(args: &[String]) -> anyhow::Result<Command> {
    match args.get(1) {
        Some(path) => Ok(Command::Load { path: path.clone() }),
        None => bail!("'load' command requires a file path. Usage: load <path>"),
    }
}

/// Usage: similar <word> [--k_top N]
fn parse_similar(args: &[String]) -> anyhow::Result<Command> {
    let (args, k_top) = split_k_top(args)?;
    match args {
        [_, word] => Ok(Command::Similar { word: word.clone(), k_top }),
        _ => bail!("'similar' command requires one word. Usage: similar <word> [--k_top N]"),
    }
}

/// Usage: similarity <word1> <word2>
fn parse_similarity(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [_, word1, word2] => Ok(Command::Similarity { word1: word1.clone(), word2: word2.clone() }),
        _ => bail!("'similarity' command requires two words. Usage: similarity <word1> <word2>"),
    }
}

/// Usage: analogy <a> <b> <c> [--k_top N]
fn parse_analogy(args: &[String]) -> anyhow::Result<Command> {
    let (args, k_top) = split_k_top(args)?;
    match args {
        [_, a, b, c] => Ok(Command::Analogy { a: a.clone(), b: b.clone(), c: c.clone(), k_top }),
        _ => bail!("'analogy' command requires three words. Usage: analogy <a> <b> <c> [--k_top N]"),
    }
}

/// Usage: vector <word>
fn parse_vector(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [_, word] => Ok(Command::Vector { word: word.clone() }),
        _ => bail!("'vector' command requires one word. Usage: vector <word>"),
    }
}

/// Usage: odd|plot <w1> <w2> ...
fn parse_words(args: &[String], name: &str) -> anyhow::Result<Vec<String>> {
    if args.len() < 3 {
        bail!("'{}' command requires at least two words. Usage: {} <w1> <w2> ...", name, name);
    }
    Ok(args[1..].to_vec())
}

/// REPL mode - interactive session, one table at a time
pub fn run_repl(session: &mut Session) -> anyhow::Result<()> {
    println!("wordvec - Word Embedding Explorer");
    if !session.is_loaded() {
        println!("No table loaded yet. Use 'load <path>' first.");
    }
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("wordvec> ");
        io::stdout().flush()?;

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let args: Vec<String> = input.split_whitespace().map(|s| s.to_string()).collect();
        match parse_command(&args) {
            Ok(command) => {
                // Query errors are reported and the session keeps going
                if let Err(error) = execute_command(session, command) {
                    eprintln!("Error: {}", error);
                }
            }
            Err(error) => eprintln!("Error: {}", error),
        }
    }

    Ok(())
}

/// Runs one command and prints its result. The caller decides what a failure means.
pub fn execute_command(session: &mut Session, command: Command) -> wordvec::Result<()> {
    match command {
        Command::Load { path } => session
            .load(&path)
            .map(|count| println!("Table loaded from '{}' ({} words)", path, count)),

        Command::Similar { word, k_top } => session
            .most_similar(&word, k_top)
            .map(|results| print_matches(&format!("Words similar to '{}'", word), &results)),

        Command::Similarity { word1, word2 } => session.similarity(&word1, &word2).map(|score| {
            println!("Similarity between '{}' and '{}': {:.4}", word1, word2, score)
        }),

        Command::Analogy { a, b, c, k_top } => session
            .analogy(&a, &b, &c, k_top)
            .map(|results| print_matches(&format!("'{}' is to '{}' as '{}' is to ?", a, b, c), &results)),

        Command::OddOneOut { words } => session
            .odd_one_out(&words)
            .map(|odd| println!("Odd one out: {}", odd)),

        Command::Vocab => session
            .vocab_size()
            .map(|size| println!("Vocabulary size: {} words", size)),

        Command::Vector { word } => session.vector_of(&word).map(|vector| print_vector(&vector)),

        Command::Plot { words } => session.project_2d(&words).map(|projection| print_projection(&projection)),
    }
}

fn print_matches(title: &str, results: &QueryResult) {
    if results.is_empty() {
        println!("No results found");
        return;
    }
    println!("{}:", title);
    for (rank, neighbor) in results.iter().enumerate() {
        println!("{}. {}: {:.4}", rank + 1, neighbor.word, neighbor.score);
    }
}

fn print_vector(vector: &WordVector) {
    println!("Vector for '{}':", vector.word);
    println!("{:?}", vector.values);
    println!("Vector length: {} dimensions", vector.dimension);
}

fn print_projection(projection: &Projection) {
    let [first, second] = projection.explained_variance_ratio;
    println!("2D projection (PCA 1: {:.1}%, PCA 2: {:.1}%):", first * 100.0, second * 100.0);
    for point in &projection.points {
        println!("  {:<20} {:>10.4} {:>10.4}", point.word, point.x, point.y);
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  load <path>                      - Load an embedding table");
    println!("  similar <word> [--k_top N]       - Most similar words (default k=10)");
    println!("  similarity <w1> <w2>             - Cosine similarity of two words");
    println!("  analogy <a> <b> <c> [--k_top N]  - a is to b as c is to ? (default k=5)");
    println!("  odd <w1> <w2> ...                - Find the odd one out");
    println!("  vocab                            - Show vocabulary size");
    println!("  vector <word>                    - Show the raw vector of a word");
    println!("  plot <w1> <w2> ...               - 2D PCA coordinates for plotting");
    println!("  help                             - Show this help");
    println!("  exit, quit                       - Exit the program");
}
