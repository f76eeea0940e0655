use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repowiki::cli::CommandContext;
use repowiki::cli::commands::watch::ViewOptions;
use repowiki::view::Section;

#[derive(Parser)]
#[command(name = "repowiki")]
#[command(
    version,
    about = "Browse AI-generated wikis of GitHub repositories from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Analysis backend base URL")]
    backend: Option<String>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a GitHub repository and follow its analysis
    Analyze {
        #[arg(help = "Repository URL, e.g. https://github.com/owner/name")]
        url: String,
        #[arg(long, help = "Print the session id and exit without following")]
        detach: bool,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Follow an existing analysis session
    Watch {
        #[arg(help = "Session id returned by analyze")]
        session_id: String,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Ask questions about an analyzed repository
    Ask {
        #[arg(help = "Session id returned by analyze")]
        session_id: String,
        #[arg(help = "Question; omit for an interactive session")]
        question: Option<String>,
    },

    /// Run the browser-facing proxy
    Serve {
        #[arg(long, help = "Listen address (default from config)")]
        bind: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct ViewArgs {
    #[arg(
        short = 's',
        long = "section",
        help = "Section to render: readme, overview, key-functionality, entry-points, authentication, data-model (repeatable)"
    )]
    sections: Vec<Section>,
    #[arg(long, help = "Reference file to open within the selected section")]
    file: Option<String>,
    #[arg(long, conflicts_with = "file", help = "Key functionality entry to open")]
    functionality: Option<String>,
    #[arg(long = "no-content", help = "Print links without fetching file content")]
    no_content: bool,
    #[arg(long, help = "Print the section navigation first")]
    nav: bool,
    #[arg(
        short = 'f',
        long,
        default_value = "text",
        help = "Output format: text, json"
    )]
    format: String,
}

impl From<ViewArgs> for ViewOptions {
    fn from(args: ViewArgs) -> Self {
        Self {
            sections: args.sections,
            file: args.file,
            functionality: args.functionality,
            no_content: args.no_content,
            format: args.format,
            nav: args.nav,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mrepowiki encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let backend = cli.backend.as_deref();

    match cli.command {
        Commands::Analyze { url, detach, view } => {
            let ctx = CommandContext::load(backend)?;
            repowiki::cli::commands::analyze::run(&ctx, &url, detach, &view.into())?;
        }
        Commands::Watch { session_id, view } => {
            let ctx = CommandContext::load(backend)?;
            repowiki::cli::commands::watch::run(&ctx, &session_id, &view.into())?;
        }
        Commands::Ask {
            session_id,
            question,
        } => {
            let ctx = CommandContext::load(backend)?;
            repowiki::cli::commands::ask::run(&ctx, &session_id, question.as_deref())?;
        }
        Commands::Serve { bind } => {
            let ctx = CommandContext::load(backend)?;
            repowiki::cli::commands::serve::run(&ctx, bind.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let ctx = CommandContext::load(backend)?;
                repowiki::cli::commands::config::show(&ctx.config, &format)?;
            }
            ConfigAction::Path => {
                repowiki::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    repowiki::cli::commands::config::init_global(force)?;
                } else {
                    repowiki::cli::commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
