use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tinysql::Db;
use tracing::Level;

/// Interactive shell over an in-memory tinysql database.
#[derive(Debug, Parser)]
#[command(name = "tinysql", version)]
struct Args {
    /// Run the given SQL and exit instead of starting the shell
    #[arg(short, long)]
    execute: Option<String>,

    /// Log lexer, parser and backend activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut db = Db::in_memory();

    if let Some(sql) = args.execute {
        print!("{}", db.execute(&sql)?);
        return Ok(());
    }

    println!("Welcome to tinysql.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("# ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match db.execute(&line) {
            Ok(output) => print!("{output}"),
            Err(err) => {
                tracing::debug!(error = %err, "statement failed");
                println!("error: {err:#}");
            }
        }
    }

    println!();
    Ok(())
}
