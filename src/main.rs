use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use luavm::binchunk;
use luavm::diagnostic::ansi::AnsiRenderer;
use luavm::diagnostic::{Diagnostic, Span, json, registry};
use luavm::listing;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Disassembly in `luac -l -l` layout
    Listing,
    /// Prototype tree as JSON; diagnostics as JSON lines on stderr
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "luavm")]
#[command(about = "Load a compiled Lua 5.3 chunk and print its functions")]
struct Cli {
    /// Path to a chunk produced by luac
    #[arg(required_unless_present = "explain")]
    chunk: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "listing")]
    format: Format,

    /// Never color diagnostics
    #[arg(long)]
    no_color: bool,

    /// Explain an error code (e.g. LVM-F008) and exit
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,
}

struct Reporter {
    format: Format,
    use_color: bool,
}

impl Reporter {
    fn emit(&self, d: &Diagnostic) {
        match self.format {
            Format::Json => eprintln!("{}", json::render(d)),
            Format::Listing => eprint!("{}", AnsiRenderer { use_color: self.use_color }.render(d)),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luavm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Some(code) = &cli.explain {
        return explain(code);
    }

    let reporter = Reporter {
        format: cli.format,
        use_color: !cli.no_color && std::io::stderr().is_terminal(),
    };
    let Some(path) = cli.chunk else {
        return ExitCode::FAILURE;
    };

    let data = match std::fs::read(&path) {
        Ok(d) => d,
        Err(e) => {
            reporter.emit(&Diagnostic::error(format!("cannot read {}: {e}", path.display())));
            return ExitCode::FAILURE;
        }
    };
    debug!(path = %path.display(), len = data.len(), "chunk read");

    let (proto, used) = match binchunk::undump_prefix(&data) {
        Ok(loaded) => loaded,
        Err(e) => {
            reporter.emit(&Diagnostic::from(&e).with_source(&data));
            return ExitCode::FAILURE;
        }
    };

    if used < data.len() {
        let trailing = data.len() - used;
        reporter.emit(
            &Diagnostic::warning(format!("{trailing} trailing byte(s) after the main function"))
                .with_span(Span { start: used, end: data.len() }, "ignored")
                .with_source(&data),
        );
    }

    match cli.format {
        Format::Listing => print!("{}", listing::list(&proto)),
        Format::Json => match serde_json::to_string_pretty(&proto) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                reporter.emit(&Diagnostic::error(format!("cannot serialize prototype: {e}")));
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn explain(code: &str) -> ExitCode {
    match registry::lookup(code) {
        Some(entry) => {
            print!("{}", entry.long);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("unknown error code '{code}'; known codes:");
            for entry in registry::REGISTRY {
                eprintln!("  {}  {}", entry.code, entry.short);
            }
            ExitCode::FAILURE
        }
    }
}
