//! Command-line front end.
//!
//! A thin shim over the library: every subcommand loads [`Config`], restores
//! the persisted session, runs one intent through the [`Dispatcher`] and prints
//! the resulting view.
//!
//! ```text
//! chefdesk login gordon --password s3cret   # or CHEFDESK_PASSWORD
//! chefdesk list --search salt
//! chefdesk create "Sea Salt" g
//! chefdesk update 2 "Sea Salt" g
//! chefdesk delete 2
//! chefdesk options --filter "sa g"
//! chefdesk flow show
//! ```

#![allow(clippy::multiple_crate_versions)]

use chefdesk::app::{Dispatcher, FlowState};
use chefdesk::domain::{Edge, Node, NodeKind, NodePatch, Position};
use chefdesk::gateway::HttpGateway;
use chefdesk::observability::init_tracing;
use chefdesk::session::{JsonSessionStore, SessionContext};
use chefdesk::ui::{self, ListingView};
use chefdesk::{ChefdeskError, Config, IngredientForm, IngredientId, ListQuery, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage the kitchen's ingredient catalogue", long_about = None)]
struct Cli {
    /// TOML config file (default: ~/.config/chefdesk/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `base_url`
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session
    Login {
        username: String,
        #[arg(long, env = "CHEFDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show the logged-in chef
    Whoami,
    /// List one page of ingredients
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Create an ingredient
    Create { name: String, unit: String },
    /// Replace name and unit of an ingredient
    Update {
        id: IngredientId,
        name: String,
        unit: String,
    },
    /// Delete an ingredient
    Delete { id: IngredientId },
    /// Print dropdown options for a page of ingredients
    Options {
        #[arg(long)]
        filter: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Edit the flow diagram kept in the data directory
    Flow {
        #[command(subcommand)]
        action: FlowCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FlowCommand {
    /// Print nodes and edges
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add a node
    AddNode {
        id: String,
        label: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long, value_enum, default_value_t = KindArg::Default)]
        kind: KindArg,
    },
    /// Connect two nodes
    Connect { source: String, target: String },
    /// Change a node's label and/or position
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, requires = "y")]
        x: Option<f64>,
        #[arg(long, requires = "x")]
        y: Option<f64>,
    },
    /// Delete a node and its edges
    DeleteNode { id: String },
    /// Restore the default Start → Processing → End graph
    Reset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Input,
    Default,
    Output,
}

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Input => Self::Input,
            KindArg::Default => Self::Default,
            KindArg::Output => Self::Output,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chefdesk: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    init_tracing(&config);

    match run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chefdesk: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, command: Command) -> Result<()> {
    let store = JsonSessionStore::new(config.session_path())?;
    let session = SessionContext::with_store(Arc::new(store))?;

    match command {
        Command::Login { username, password } => {
            let gateway = HttpGateway::new(config, session)?;
            let identity = gateway.login(&username, &password).await?;
            println!("logged in as {} ({})", identity.name, identity.username);
        }
        Command::Logout => {
            session.clear()?;
            println!("logged out");
        }
        Command::Whoami => match session.current_identity() {
            Some(identity) => println!("{} ({}) id={}", identity.name, identity.username, identity.id),
            None => println!("not logged in"),
        },
        Command::List {
            page,
            page_size,
            search,
        } => {
            let dispatcher = authenticated(config, session)?;
            let mut query = ListQuery::page(page, page_size.unwrap_or(config.page_size));
            query.search = search;
            let result = dispatcher.list(query).await;
            print_listing(&dispatcher);
            result?;
        }
        Command::Create { name, unit } => {
            let dispatcher = authenticated(config, session)?;
            let result = dispatcher
                .refresh_then_create(IngredientForm::new(name, unit))
                .await;
            print_listing(&dispatcher);
            result?;
        }
        Command::Update { id, name, unit } => {
            let dispatcher = authenticated(config, session)?;
            let result = dispatcher.update(id, IngredientForm::new(name, unit)).await;
            print_notices(&dispatcher);
            let ingredient = result?;
            println!("{}", ingredient.label());
        }
        Command::Delete { id } => {
            let dispatcher = authenticated(config, session)?;
            let result = dispatcher.delete(id).await;
            print_notices(&dispatcher);
            result?;
        }
        Command::Options { filter, page } => {
            let dispatcher = authenticated(config, session)?;
            dispatcher.goto_page(page).await?;
            let options = dispatcher
                .with_store(|store| ui::options_from_resources(&store.listing().items));
            let options = ui::filter_options(&options, filter.as_deref().unwrap_or(""));
            print!("{}", ui::render_options(&options));
        }
        Command::Flow { action } => run_flow(&config.session_path(), action)?,
    }
    Ok(())
}

fn authenticated(config: &Config, session: SessionContext) -> Result<Dispatcher<HttpGateway>> {
    if !session.is_authenticated() {
        return Err(ChefdeskError::Session(
            "not logged in, run `chefdesk login <username>` first".into(),
        ));
    }
    Dispatcher::from_config(config, session)
}

fn print_notices(dispatcher: &Dispatcher<HttpGateway>) {
    for notice in dispatcher.drain_notices() {
        eprintln!("{}", ui::render_notice(&notice));
    }
}

fn print_listing(dispatcher: &Dispatcher<HttpGateway>) {
    print_notices(dispatcher);
    let view = dispatcher.with_store(ListingView::from_store);
    print!("{}", ui::render_listing(&view));
}

/// The flow file sits next to the session file.
fn flow_path(session_path: &Path) -> PathBuf {
    session_path.with_file_name("flow.json")
}

fn load_flow(path: &Path) -> Result<FlowState> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|e| ChefdeskError::Storage(format!("corrupt flow file {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FlowState::default()),
        Err(e) => Err(e.into()),
    }
}

fn save_flow(path: &Path, flow: &FlowState) -> Result<()> {
    let json = serde_json::to_string_pretty(flow)
        .map_err(|e| ChefdeskError::Storage(format!("cannot encode flow: {e}")))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn run_flow(session_path: &Path, action: FlowCommand) -> Result<()> {
    let path = flow_path(session_path);
    let mut flow = load_flow(&path)?;

    match action {
        FlowCommand::Show { json } => {
            if json {
                let out = serde_json::to_string_pretty(&flow)
                    .map_err(|e| ChefdeskError::Storage(e.to_string()))?;
                println!("{out}");
            } else {
                print!("{}", ui::render_flow(&flow));
            }
            return Ok(());
        }
        FlowCommand::AddNode {
            id,
            label,
            x,
            y,
            kind,
        } => flow.add_node(Node::new(id, label, Position::new(x, y)).with_kind(kind.into())),
        FlowCommand::Connect { source, target } => flow.add_edge(Edge::connect(source, target)),
        FlowCommand::Edit { id, label, x, y } => {
            let mut patch = NodePatch::new(id.clone());
            if let Some(label) = label {
                patch = patch.label(label);
            }
            if let (Some(x), Some(y)) = (x, y) {
                patch = patch.position(Position::new(x, y));
            }
            if !flow.update_node(patch) {
                eprintln!("no node with id {id}");
            }
        }
        FlowCommand::DeleteNode { id } => {
            if !flow.delete_node(&id) {
                eprintln!("no node with id {id}");
            }
        }
        FlowCommand::Reset => flow = FlowState::default(),
    }

    save_flow(&path, &flow)?;
    print!("{}", ui::render_flow(&flow));
    Ok(())
}
