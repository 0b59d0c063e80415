// c2cpp: C to C++ source transpiler with a side-by-side terminal viewer

use std::fs;
use std::io::{self, Write};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use c2cpp::cli::Args;
use c2cpp::ui::App;
use c2cpp::Transpiler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(&args);

    if !args.input.exists() {
        eprintln!("Error: File '{}' not found", args.input.display());
        std::process::exit(1);
    }

    if args.tui {
        return run_viewer(&args);
    }

    let bytes = fs::read(&args.input)?;
    let transpiler = Transpiler::new(args.options());
    let output = match transpiler.transpile_bytes(&bytes) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    if args.output_to_stdout() {
        io::stdout().write_all(output.as_bytes())?;
    } else {
        let path = args.output_path();
        fs::write(&path, output)?;
        tracing::info!(input = %args.input.display(), output = %path.display(), "transpiled");
    }

    Ok(())
}

/// Logs go to stderr; the viewer owns the terminal, so it gets none.
fn setup_logging(args: &Args) {
    let filter = if args.tui {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_viewer(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&args.input)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        args.input.clone(),
        args.output_path(),
        source,
        args.options(),
    );
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
