use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::{Builder, Env};
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::runner::{Lox, RunError};
use rox::scanner::{scan_tokens, Scanner};

/// Exit code for lexical, syntax and resolution errors.
const EXIT_STATIC_ERROR: i32 = 65;

/// Exit code for runtime errors.
const EXIT_RUNTIME_ERROR: i32 = 70;

/// Stack for the interpreter thread.  Deep enough that the call-depth limit
/// is always hit first.
const INTERPRETER_STACK_SIZE: usize = 128 * 1024 * 1024;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable debug logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Log file used with --log
    #[arg(long, global = true, default_value = "app.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print tokens as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a file as a program, or starts an interactive prompt without one
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file into a String.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let source = std::str::from_utf8(&buf)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(source.to_owned())
}

fn init_logger(path: &PathBuf) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // Debug by default; RUST_LOG overrides.
    Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn report(errors: &[LoxError]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for item in Scanner::new(&source) {
        match item {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

/// Lex and parse `filename` as one expression, exiting on static errors.
fn parse_expression(filename: &PathBuf) -> Result<rox::ast::Expr> {
    let source = read_file(filename)?;
    let (tokens, errors) = scan_tokens(&source);

    if !errors.is_empty() {
        report(&errors);
        process::exit(EXIT_STATIC_ERROR);
    }

    match Parser::new(tokens).parse_expression() {
        Ok(expr) => Ok(expr),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_STATIC_ERROR);
        }
    }
}

fn run_file(filename: &PathBuf) -> Result<()> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    match lox.run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(())
        }
        Err(RunError::Static(errors)) => {
            report(&errors);
            process::exit(EXIT_STATIC_ERROR);
        }
        Err(RunError::Runtime(errors)) => {
            report(&errors);
            process::exit(EXIT_RUNTIME_ERROR);
        }
    }
}

/// Interactive prompt.  Errors are reported and the session carries on.
fn run_prompt() -> Result<()> {
    info!("Starting interactive prompt");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        if line.trim().is_empty() {
            continue;
        }

        if let Err(e) = lox.run(&line) {
            debug!("Prompt line failed: {:?}", e);
            for error in e.errors() {
                eprintln!("{}", error);
            }
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        // A logger that discards everything keeps the log macros cheap.
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    let interpreter = thread::Builder::new()
        .name("rox".to_string())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || dispatch(&args.commands))
        .context("Failed to start interpreter thread")?;

    interpreter
        .join()
        .map_err(|_| anyhow!("Interpreter thread panicked"))?
}

fn dispatch(commands: &Commands) -> Result<()> {
    match commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json),

        Commands::Parse { filename, json } => {
            let expr = parse_expression(filename)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&expr)?);
            } else {
                println!("{}", AstPrinter.print(&expr));
            }

            Ok(())
        }

        Commands::Evaluate { filename } => {
            let expr = parse_expression(filename)?;
            let mut interpreter = Interpreter::new();

            match interpreter.evaluate(&expr) {
                Ok(value) => {
                    println!("{}", value);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(EXIT_RUNTIME_ERROR);
                }
            }
        }

        Commands::Run {
            filename: Some(filename),
        } => run_file(filename),

        Commands::Run { filename: None } => run_prompt(),
    }
}
