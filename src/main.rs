use anyhow::Context;
use clap::Parser;
use colored::*;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use zipsh::archive::ZipFs;
use zipsh::config::Config;
use zipsh::shell::{Outcome, Session, Shell, ShellCompleter};

/// Unix-like shell over a zip archive
#[derive(Parser, Debug)]
#[command(name = "zipsh", version, about)]
struct Cli {
    /// YAML configuration naming the archive and an optional startup script
    #[arg(default_value = "config.yaml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not load or save ~/.zipsh_history
    #[arg(long)]
    no_history: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)?;

    let fs = ZipFs::open(&config.archive_path).with_context(|| {
        format!("Failed to open archive '{}'", config.archive_path.display())
    })?;
    log::info!(
        "Opened {} ({} entries)",
        fs.path().display(),
        fs.index().map(|i| i.len()).unwrap_or(0)
    );

    let mut shell = Shell::new(Session::new(fs))?;

    if let Some(script) = &config.startup_script
        && run_startup_script(&mut shell, script)
    {
        return Ok(());
    }

    println!("{}", "=".repeat(60).cyan());
    println!("{}", "  zipsh - a shell for zip archives".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    println!();
    println!("Type 'help' for available commands or 'exit' to quit");
    println!();

    repl(&mut shell, !cli.no_history)
}

/// Run the startup script. Returns true if it ended the session.
fn run_startup_script(shell: &mut Shell, script: &Path) -> bool {
    log::info!("Running startup script {}", script.display());
    match shell.run_script(script, show) {
        Ok(exited) => exited,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Startup script {} not found.", script.display());
            false
        }
        Err(e) => {
            log::warn!("Failed to read startup script {}: {}", script.display(), e);
            false
        }
    }
}

fn repl(shell: &mut Shell, use_history: bool) -> anyhow::Result<()> {
    // Create readline editor with tab completion
    let completer = ShellCompleter::new(shell.completion_cache().clone());
    let mut rl = Editor::new()?;
    rl.set_helper(Some(completer));

    let history_file = if use_history {
        dirs::home_dir().map(|mut p| {
            p.push(".zipsh_history");
            p
        })
    } else {
        None
    };

    if let Some(path) = &history_file {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = shell.prompt();

        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                let outcome = shell.execute(&line);
                show(&outcome);
                if outcome == Outcome::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("exit");
                shell.execute("exit");
                break;
            }
            Err(err) => {
                shell.execute("exit");
                return Err(anyhow::anyhow!("Failed to read input: {err}"));
            }
        }
    }

    if let Some(path) = &history_file {
        let _ = rl.save_history(path);
    }

    println!("Goodbye!");
    Ok(())
}

/// Print a command's result
fn show(outcome: &Outcome) {
    match outcome {
        Outcome::Output(text) if !text.is_empty() => println!("{text}"),
        Outcome::Failure(text) => println!("{}", text.red()),
        _ => {}
    }
}
