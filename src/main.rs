use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use qlex::{dialect_from_name, tokenize, TokenType};

/// qlex - tokenize SQL-family query languages.
/// Prints one token per line, or a JSON array with --json.
#[derive(Parser, Debug)]
#[command(name = "qlex", version, about)]
struct Cli {
    /// File to tokenize. Use "-" (or omit) to read from stdin.
    file: Option<PathBuf>,

    /// Inline query text; takes precedence over FILE.
    #[arg(short = 'e', long)]
    query: Option<String>,

    /// Dialect: sql, filterql, expression, logical, json.
    #[arg(short, long, default_value = "sql")]
    dialect: String,

    /// Emit the token stream as JSON.
    #[arg(long)]
    json: bool,

    /// Drop comment tokens from the output.
    #[arg(long)]
    strip_comments: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("qlex: {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = read_source(cli)?;
    let dialect = dialect_from_name(&cli.dialect)?;

    let mut tokens = tokenize(&source, dialect)?;
    if cli.strip_comments {
        tokens.retain(|t| !t.token_type.is_comment());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for t in &tokens {
            if t.token_type == TokenType::Eos {
                println!("{:>6}  {:?}", t.position, t.token_type);
            } else {
                println!("{:>6}  {:<20} {}", t.position, kind_name(t.token_type), t.value);
            }
        }
    }
    Ok(())
}

fn read_source(cli: &Cli) -> Result<String> {
    if let Some(query) = &cli.query {
        return Ok(query.clone());
    }
    match &cli.file {
        Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("reading stdin")?;
            Ok(source)
        }
    }
}

fn kind_name(tt: TokenType) -> String {
    format!("{tt:?}")
}
