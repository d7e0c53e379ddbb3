use clap::{Parser as ClapParser, Subcommand};
use molang_lang::cli::{self, CliError, EvalOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "molang")]
#[command(about = "Molang - an embeddable expression language for small computed values")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a script and print the result as JSON
    Eval {
        /// The script to evaluate
        script: String,

        /// JSON object bound as the context namespace (reads from stdin
        /// if piped)
        #[arg(short, long)]
        context: Option<String>,

        /// Seed for math.random and friends
        #[arg(short, long)]
        seed: Option<u64>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a script and print its canonical form
    Check {
        /// The script to check
        script: String,
    },

    /// Print the token stream of a script, including error tokens
    Tokens {
        /// The script to lex
        script: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            script,
            context,
            seed,
            pretty,
        } => run_eval(script, context, seed, pretty),
        Commands::Check { script } => match cli::execute_check(&script) {
            Ok(canonical) => {
                print!("{}", canonical);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Tokens { script } => {
            for line in cli::execute_tokens(&script) {
                println!("{}", line);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    script: String,
    context: Option<String>,
    seed: Option<u64>,
    pretty: bool,
) -> Result<(), CliError> {
    let context = match context {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            if buffer.trim().is_empty() {
                None
            } else {
                Some(buffer)
            }
        }
        None => None,
    };

    let options = EvalOptions {
        script,
        context,
        seed,
    };

    let output = cli::execute_eval(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(CliError::Json)?;
    println!("{}", json);
    Ok(())
}
