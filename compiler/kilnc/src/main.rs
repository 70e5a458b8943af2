//! Kiln command-line runner.

mod commands;

use commands::{eval_source, lex_file, parse_file, run_file, RunOptions};

const RUN_USAGE: &str = "kiln run <file.kn> [--max-depth=N] [--max-canvas-side=N] [--quiet]";
const EVAL_USAGE: &str = "kiln eval '<source>' [--max-depth=N] [--max-canvas-side=N] [--quiet]";

fn main() {
    kilnc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (options, positional) = match RunOptions::parse(&args[2..]) {
                Ok(parsed) => parsed,
                Err(msg) => usage_error(&msg, RUN_USAGE),
            };
            let Some(path) = positional else {
                usage_error("missing file path", RUN_USAGE);
            };
            run_file(&path, &options);
        }
        "eval" => {
            let (options, positional) = match RunOptions::parse(&args[2..]) {
                Ok(parsed) => parsed,
                Err(msg) => usage_error(&msg, EVAL_USAGE),
            };
            let Some(source) = positional else {
                usage_error("missing source text", EVAL_USAGE);
            };
            eval_source(&source, &options);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln lex <file.kn>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln parse <file.kn>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Kiln {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare path runs the file.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("kn"))
            {
                run_file(command, &RunOptions::default());
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn usage_error(msg: &str, usage: &str) -> ! {
    eprintln!("error: {msg}");
    eprintln!("Usage: {usage}");
    std::process::exit(1);
}

fn print_usage() {
    println!("Kiln, a small expression language");
    println!();
    println!("Usage: kiln <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.kn>        Evaluate a file and print its value");
    println!("  eval '<source>'      Evaluate source given on the command line");
    println!("  lex <file.kn>        Tokenize and display tokens");
    println!("  parse <file.kn>      Parse and display the syntax tree");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --max-depth=<n>          Maximum function call depth (default: 10000)");
    println!("  --max-canvas-side=<n>    Largest side canvas() accepts (default: no limit)");
    println!("  --quiet                  Discard output from print()");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=kiln_eval=debug) to enable tracing.");
}
