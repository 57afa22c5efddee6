use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use choices_picker_types::{FormFactor, HostContext, SecurityFlags};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod context_file;
mod host;

/// Host a choices picker in the terminal and print the bound value on exit.
#[derive(Debug, Parser)]
#[command(name = "choices-picker", version, about)]
struct Cli {
    /// JSON host context fixture; a built-in demo context is used when omitted.
    #[arg(long, env = "CHOICES_PICKER_CONTEXT")]
    context: Option<PathBuf>,
    /// Override the fixture's form factor (small renders a dropdown).
    #[arg(long)]
    form_factor: Option<FormFactor>,
    /// Icon mapping configuration, e.g. '{"0":"Mail","1":"Call"}'.
    #[arg(long)]
    configuration: Option<String>,
    /// Render the control read-only.
    #[arg(long)]
    disabled: bool,
    /// Hide the value as if the user lacked read permission.
    #[arg(long)]
    masked: bool,
    /// Render a single frame to stdout instead of running interactively.
    #[arg(long)]
    once: bool,
    /// Width of the `--once` frame.
    #[arg(long, default_value_t = 40)]
    width: u16,
    /// Height of the `--once` frame.
    #[arg(long, default_value_t = 8)]
    height: u16,
    /// Write logs to this file (interactive mode logs nowhere otherwise).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, context: &mut HostContext) {
        if let Some(form_factor) = self.form_factor {
            context.form_factor = form_factor;
        }
        if let Some(configuration) = &self.configuration {
            context.configuration = Some(configuration.clone());
        }
        if self.disabled {
            context.control_disabled = true;
        }
        if self.masked {
            let editable = context.security.is_none_or(|security| security.editable);
            context.security = Some(SecurityFlags {
                editable,
                readable: false,
            });
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.once)?;

    let mut context = match &cli.context {
        Some(path) => context_file::load(path)
            .with_context(|| format!("failed to load host context from {}", path.display()))?,
        None => context_file::demo_context(),
    };
    cli.apply_overrides(&mut context);

    let outputs = if cli.once {
        let (lines, outputs) = host::render_once(context, cli.width, cli.height)?;
        for line in lines {
            println!("{line}");
        }
        outputs
    } else {
        host::run_interactive(context)?
    };
    println!("{}", serde_json::to_string(&outputs)?);
    Ok(())
}

/// Logs go to `log_file` when given; otherwise to stderr in `--once` mode and
/// nowhere while the terminal is in raw mode.
fn init_tracing(log_file: Option<&Path>, once: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None if once => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        None => {}
    }
    Ok(())
}
