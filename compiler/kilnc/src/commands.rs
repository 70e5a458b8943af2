//! CLI commands. Each one reports its own failures and exits non-zero.

use kilnc::{
    reporting, run, silent_handler, stdout_handler, KilnError, RuntimeBuilder, SyntaxError, Value,
};

/// Flags shared by `run` and `eval`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub max_depth: Option<usize>,
    pub max_canvas_side: Option<usize>,
    pub quiet: bool,
}

impl RunOptions {
    /// Split flags from the single positional argument.
    pub fn parse(args: &[String]) -> Result<(Self, Option<String>), String> {
        let mut options = RunOptions::default();
        let mut positional = None;
        for arg in args {
            if let Some(depth) = arg.strip_prefix("--max-depth=") {
                let depth = depth
                    .parse()
                    .map_err(|_| format!("invalid --max-depth value '{depth}'"))?;
                options.max_depth = Some(depth);
            } else if let Some(side) = arg.strip_prefix("--max-canvas-side=") {
                let side = side
                    .parse()
                    .map_err(|_| format!("invalid --max-canvas-side value '{side}'"))?;
                options.max_canvas_side = Some(side);
            } else if arg == "--quiet" || arg == "-q" {
                options.quiet = true;
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else if positional.is_none() {
                positional = Some(arg.clone());
            } else {
                return Err(format!("unexpected argument '{arg}'"));
            }
        }
        Ok((options, positional))
    }

    fn builder(&self) -> RuntimeBuilder {
        let handler = if self.quiet {
            silent_handler()
        } else {
            stdout_handler()
        };
        let mut builder = RuntimeBuilder::new().print_handler(handler);
        if let Some(depth) = self.max_depth {
            builder = builder.max_call_depth(depth);
        }
        if let Some(side) = self.max_canvas_side {
            builder = builder.max_canvas_side(side);
        }
        builder
    }
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

pub fn run_file(path: &str, options: &RunOptions) {
    let source = read_file(path);
    execute(&source, path, options);
}

pub fn eval_source(source: &str, options: &RunOptions) {
    execute(source, "<eval>", options);
}

fn execute(source: &str, path: &str, options: &RunOptions) {
    let env = options.builder().build();
    match run(source, Some(&env)) {
        Ok(Value::Null) => {}
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprint!("{}", reporting::render(&err, source, path));
            std::process::exit(1);
        }
    }
}

pub fn lex_file(path: &str) {
    let source = read_file(path);
    match kiln_lexer::lex(&source) {
        Ok(tokens) => {
            for token in &tokens {
                println!("{token:?}");
            }
        }
        Err(err) => {
            let err = KilnError::from(SyntaxError::from(err));
            eprint!("{}", reporting::render(&err, &source, path));
            std::process::exit(1);
        }
    }
}

pub fn parse_file(path: &str) {
    let source = read_file(path);
    match kilnc::parse(&source) {
        Ok(program) => println!("{program:#?}"),
        Err(err) => {
            eprint!("{}", reporting::render(&KilnError::from(err), &source, path));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_flags_and_path() {
        let (options, path) =
            RunOptions::parse(&args(&["--max-depth=64", "demo.kn", "--quiet"])).unwrap();
        assert_eq!(
            options,
            RunOptions {
                max_depth: Some(64),
                max_canvas_side: None,
                quiet: true,
            }
        );
        assert_eq!(path.as_deref(), Some("demo.kn"));
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(RunOptions::parse(&args(&["--max-depth=lots"])).is_err());
        assert!(RunOptions::parse(&args(&["--max-canvas-side=-1"])).is_err());
        assert!(RunOptions::parse(&args(&["--verbose"])).is_err());
        assert!(RunOptions::parse(&args(&["a.kn", "b.kn"])).is_err());
    }

    #[test]
    fn builder_applies_depth() {
        let options = RunOptions {
            max_depth: Some(3),
            max_canvas_side: Some(64),
            quiet: true,
        };
        let env = options.builder().build();
        assert_eq!(env.runtime().config().max_call_depth, 3);
        assert_eq!(env.runtime().config().max_canvas_side, Some(64));
    }
}
