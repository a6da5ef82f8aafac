use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use todo_core::{TodoApp, TodoClient};
use todo_shell::{Flow, Shell, ShellConfig, UreqTransport};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the list on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = ShellConfig::from_env()?;
    info!(api_url = %config.api_url, policy = ?config.policy, "starting");

    let app = TodoApp::new(TodoClient::new(&config.api_url), config.policy);
    let mut shell = Shell::new(app, UreqTransport::new(), io::stdout());
    shell.start()?;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading stdin")? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if shell.handle_line(line)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
