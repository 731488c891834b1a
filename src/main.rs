use clap::Parser;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ell::frontend::lexer::Lexer;
use ell::frontend::token::TokenKind;
use ell::frontend::{self, print, typecheck};
use ell::tac;

#[derive(Parser)]
struct Args {
    /// Source file to compile
    path: PathBuf,
    /// Dump the token stream before parsing
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot open '{}': {e}", args.path.display());
            return ExitCode::FAILURE;
        }
    };

    // An empty file is a successful no-op.
    if source.is_empty() {
        println!("Program is syntactically correct!");
        println!();
        println!("Symbol table:");
        println!("(empty)");
        return ExitCode::SUCCESS;
    }

    if args.tokens {
        dump_tokens(&source);
    }

    let (mut program, symbols) = match frontend::parse(&source) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let analysis = typecheck::check(&mut program, symbols);

    let mut report = match render_front(&program, &analysis.symbols) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: failed to format the report: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !analysis.errors.is_empty() {
        emit_report(&report, &args.path);
        for error in &analysis.errors {
            eprintln!("semantic error: {error}");
        }
        return ExitCode::FAILURE;
    }

    let code = tac::lower(&program);
    let _ = writeln!(report);
    let _ = writeln!(report, "=== Intermediate Code (TAC) ===");
    let _ = tac::write(&mut report, &code);

    emit_report(&report, &args.path);
    ExitCode::SUCCESS
}

fn render_front(
    program: &ell::frontend::ast::Program,
    symbols: &ell::frontend::symbols::SymbolTable,
) -> std::io::Result<Vec<u8>> {
    let mut report = Vec::new();
    writeln!(report, "Program is syntactically correct!")?;
    writeln!(report)?;
    print::write(&mut report, program)?;
    writeln!(report)?;
    writeln!(report, "Symbol table:")?;
    symbols.write(&mut report)?;
    Ok(report)
}

fn dump_tokens(source: &str) {
    let mut lexer = Lexer::new(source);
    loop {
        let token = lexer.next_token();
        println!(
            "{}:{}\t{}\t{:?}",
            token.line,
            token.column,
            token.kind.name(),
            token.lexeme
        );
        if matches!(token.kind, TokenKind::Eof | TokenKind::Error) {
            break;
        }
    }
}

/// Prints the report and tees it to `output/<stem>-result.txt`.
fn emit_report(report: &[u8], source_path: &Path) {
    print!("{}", String::from_utf8_lossy(report));

    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string());
    let out_dir = Path::new("output");
    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("warning: cannot create '{}': {e}", out_dir.display());
        return;
    }
    let out_path = out_dir.join(format!("{stem}-result.txt"));
    if let Err(e) = fs::write(&out_path, report) {
        eprintln!("warning: cannot write '{}': {e}", out_path.display());
    }
}
