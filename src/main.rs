//! Model Roster - model catalog, entitlements and picker
//!
//! Lists the models a user class may use, lets the user pick one for a
//! session, or serves the listing over HTTP.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use model_roster::config::{DEFAULT_BIND, DEFAULT_SESSION};
use model_roster::{cli, server, Database, Roster, RosterConfig, UserClass};

/// Model Roster - which models can I use?
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
struct Args {
    /// User class to resolve entitlements for (guest, regular)
    #[arg(short, long, env = "ROSTER_USER_CLASS", default_value = "guest")]
    user_class: UserClass,

    /// Session whose model selection is shown and changed
    #[arg(short, long, default_value = DEFAULT_SESSION)]
    session: String,

    /// Database path (defaults to the user data directory)
    #[arg(long)]
    db: Option<std::path::PathBuf>,

    /// Only list models from this provider
    #[arg(short, long)]
    provider: Option<String>,

    /// Pick a model interactively
    #[arg(long, group = "action")]
    pick: bool,

    /// Forget the session's selected model
    #[arg(long, group = "action")]
    clear_selection: bool,

    /// Print stored settings
    #[arg(long, group = "action")]
    show_settings: bool,

    /// Show where each provider's API key comes from
    #[arg(long, group = "action")]
    api_keys: bool,

    /// Store a provider API key (e.g. OPENAI_API_KEY), read from a prompt or stdin
    #[arg(long, value_name = "NAME", group = "action")]
    set_api_key: Option<String>,

    /// Delete a stored provider API key
    #[arg(long, value_name = "NAME", group = "action")]
    delete_api_key: Option<String>,

    /// Serve the HTTP API instead of printing
    #[arg(long, group = "action")]
    serve: bool,

    /// Address to bind when serving
    #[arg(long, env = "ROSTER_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Fail startup when entitlements name models missing from the catalog
    #[arg(long)]
    strict_entitlements: bool,

    /// Bind role aliases to mock models
    #[arg(long, env = "ROSTER_TEST_MODE")]
    test_mode: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> RosterConfig {
        RosterConfig {
            user_class: self.user_class,
            session: self.session.clone(),
            db_path: self.db.clone(),
            bind: self.bind.clone(),
            strict_entitlements: self.strict_entitlements,
            test_mode: self.test_mode,
        }
    }
}

fn init_tracing(args: &Args) {
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn" // Quiet by default for normal use
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if args.debug || args.verbose {
        tracing::info!("Debug logging enabled");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = args.config();
    let roster = Roster::builtin(&config)?;

    let db = match &config.db_path {
        Some(path) => Database::open_at(path.clone())?,
        None => Database::open()?,
    };
    db.migrate()?;

    if args.serve {
        let runtime = tokio::runtime::Runtime::new()?;
        let state = Arc::new(server::AppState::new(roster, db));
        return runtime.block_on(server::serve_until_ctrl_c(state, &config.bind));
    }

    if args.pick {
        cli::pick_model(&db, &roster, config.user_class, &config.session)?;
        return Ok(());
    }

    if args.clear_selection {
        cli::clear_selection(&db, &roster, &config.session)?;
        return Ok(());
    }

    if args.show_settings {
        cli::show_settings(&db)?;
        return Ok(());
    }

    if args.api_keys {
        print!("{}", cli::render_api_keys(&db));
        return Ok(());
    }

    if let Some(name) = &args.set_api_key {
        return cli::set_api_key(&db, name);
    }

    if let Some(name) = &args.delete_api_key {
        cli::remove_api_key(&db, name)?;
        println!("Deleted {}", name);
        return Ok(());
    }

    cli::show_models(
        &db,
        &roster,
        config.user_class,
        &config.session,
        args.provider.as_deref(),
    );
    Ok(())
}
