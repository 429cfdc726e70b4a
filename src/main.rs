use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use lostfound::config::{ClientConfig, normalize_base_url};
use lostfound::error::ClientError;
use lostfound::guard::{self, Guarded, Route};
use lostfound::net::HttpClient;
use lostfound::net::types::{Category, ItemDraft};
use lostfound::session::SessionStore;
use lostfound::storage::FileStorage;
use lostfound::views::{
    ContactView, DashboardView, ItemFormView, LoginView, ProfileView, RegisterView, ViewOutcome, ViewStatus,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("not logged in; run `lostfound login` first")]
    NotLoggedIn,
    #[error("{0}")]
    View(String),
    #[error("item {0} not found")]
    ItemNotFound(i64),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lostfound", about = "Lost & Found API client")]
struct Cli {
    /// Overrides `LOSTFOUND_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `LOSTFOUND_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "LOSTFOUND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "LOSTFOUND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print the session snapshot (never the tokens).
    Whoami,
    /// Run the route guard for a path.
    Open {
        path: String,
    },
    Items(ItemsCommand),
    Profile,
    /// Email the reporter of a listed item.
    Contact {
        item_id: i64,
        /// Reporter address; defaults to the item's contact email.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        message: String,
    },
}

#[derive(Args, Debug)]
struct ItemsCommand {
    #[command(subcommand)]
    command: ItemsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemsSubcommand {
    List,
    Search {
        term: String,
    },
    Create(ItemFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ItemFields,
        /// Replace the item (PUT) instead of patching it.
        #[arg(long, default_value_t = false)]
        put: bool,
        /// Required whenever the edited item ends up `found` (PATCH or PUT).
        #[arg(long, default_value_t = false)]
        confirm_found: bool,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ItemFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    #[arg(long, help = "Image file to upload")]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lostfound=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = normalize_base_url(&base_url);
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let storage = FileStorage::open(&config.session_file).map_err(ClientError::from)?;
    let session_file = storage.path().display().to_string();
    let session = SessionStore::open(Arc::new(storage));
    let client = HttpClient::from_config(&config, session)?;
    tracing::debug!(base_url = %config.base_url, %session_file, "client ready");

    match cli.command {
        Command::Login { username, password } => run_login(&client, username, password).await,
        Command::Register { username, email, password } => run_register(&client, username, email, password).await,
        Command::Logout => {
            let outcome = lostfound::views::logout(&client).await;
            print_json(&json!({ "logged_out": true, "next": outcome_path(outcome) }))
        }
        Command::Whoami => {
            let snapshot = client.session().get();
            print_json(&json!({
                "authenticated": snapshot.is_authenticated(),
                "has_refresh_token": snapshot.refresh_token.is_some(),
                "user_email": client.session().user_email(),
                "session_file": session_file,
            }))
        }
        Command::Open { path } => match guard::resolve_path(&path, &client.session().get()) {
            Guarded::Render(route) => print_json(&json!({ "path": path, "render": route.path() })),
            Guarded::Redirect(route) => print_json(&json!({ "path": path, "redirect": route.path() })),
        },
        Command::Items(items) => run_items(&client, items).await,
        Command::Profile => run_profile(&client).await,
        Command::Contact { item_id, to, message } => run_contact(&client, item_id, to, message).await,
    }
}

async fn run_login(client: &HttpClient, username: String, password: String) -> Result<(), CliError> {
    let mut view = LoginView::new(username, password);
    let outcome = view.submit(client).await;
    check(view.status())?;
    print_json(&json!({
        "logged_in": true,
        "user_email": client.session().user_email(),
        "next": outcome_path(outcome),
    }))
}

async fn run_register(client: &HttpClient, username: String, email: String, password: String) -> Result<(), CliError> {
    let mut view = RegisterView::new(username, email, password);
    let outcome = view.submit(client).await;
    check(view.status())?;
    print_json(&json!({
        "registered": true,
        "logged_in": client.session().is_authenticated(),
        "message": view.status().message(),
        "next": outcome_path(outcome),
    }))
}

async fn run_items(client: &HttpClient, items: ItemsCommand) -> Result<(), CliError> {
    match items.command {
        ItemsSubcommand::List => {
            require_route(client, Route::Dashboard)?;
            let mut view = DashboardView::new();
            view.load(client).await;
            check(view.status())?;
            print_json(&serde_json::to_value(view.items())?)
        }
        ItemsSubcommand::Search { term } => {
            require_route(client, Route::Dashboard)?;
            let mut view = DashboardView::new();
            view.search(client, &term).await;
            check(view.status())?;
            print_json(&serde_json::to_value(view.items())?)
        }
        ItemsSubcommand::Create(fields) => {
            require_route(client, Route::ItemForm)?;
            let mut view = ItemFormView::report();
            fields.apply(&mut view).await?;
            view.submit(client).await;
            check(view.status())?;
            print_json(&json!({ "message": view.status().message() }))
        }
        ItemsSubcommand::Update { id, fields, put, confirm_found } => {
            require_route(client, Route::ItemForm)?;
            let mut profile = ProfileView::new();
            profile.load(client).await;
            check(profile.status())?;
            let item = profile.posted_items().iter().find(|item| item.id == id).ok_or(CliError::ItemNotFound(id))?;
            let mut form = ItemFormView::edit(item);
            fields.apply(&mut form).await?;
            if form.needs_found_confirmation() && !confirm_found {
                return Err(CliError::View("marking an item as found notifies every user; pass --confirm-found".to_owned()));
            }

            if put {
                let draft = form.draft.clone();
                profile.update_item(client, id, &draft, confirm_found).await;
                check(profile.status())?;
                print_json(&json!({ "message": profile.status().message() }))
            } else {
                form.submit(client).await;
                check(form.status())?;
                print_json(&json!({ "message": form.status().message() }))
            }
        }
        ItemsSubcommand::Delete { id } => {
            require_route(client, Route::Profile)?;
            let mut view = ProfileView::new();
            view.delete_item(client, id).await;
            check(view.status())?;
            print_json(&json!({ "message": view.status().message() }))
        }
    }
}

async fn run_profile(client: &HttpClient) -> Result<(), CliError> {
    require_route(client, Route::Profile)?;
    let mut view = ProfileView::new();
    view.load(client).await;
    check(view.status())?;
    print_json(&json!({ "user": view.user(), "posted_items": view.posted_items() }))
}

async fn run_contact(client: &HttpClient, item_id: i64, to: Option<String>, message: String) -> Result<(), CliError> {
    require_route(client, Route::Dashboard)?;
    let mut dashboard = DashboardView::new();
    dashboard.load(client).await;
    check(dashboard.status())?;
    let mut view: ContactView =
        dashboard.select_for_contact(item_id, client).ok_or(CliError::ItemNotFound(item_id))?;
    if let Some(to) = to {
        view.reporter_email = Some(to);
    }
    view.message = message;
    view.send(client).await;
    check(view.status())?;
    print_json(&json!({ "item_id": item_id, "sent_to": view.reporter_email, "from": view.sender_email }))
}

impl ItemFields {
    async fn apply(self, view: &mut ItemFormView) -> Result<(), CliError> {
        let draft: &mut ItemDraft = &mut view.draft;
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(contact_email) = self.contact_email {
            draft.contact_email = Some(contact_email);
        }
        if let Some(path) = self.image {
            let bytes = tokio::fs::read(&path).await.map_err(|source| CliError::Read { path: path.clone(), source })?;
            let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
            view.attach_image(file_name, content_type_for(&path), bytes)?;
        }
        Ok(())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path.extension().map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn require_route(client: &HttpClient, route: Route) -> Result<(), CliError> {
    match guard::guard(route, &client.session().get()) {
        Guarded::Render(_) => Ok(()),
        Guarded::Redirect(_) => Err(CliError::NotLoggedIn),
    }
}

fn check(status: &ViewStatus) -> Result<(), CliError> {
    match status {
        ViewStatus::Error(message) => Err(CliError::View(message.clone())),
        _ => Ok(()),
    }
}

fn outcome_path(outcome: ViewOutcome) -> Option<&'static str> {
    match outcome {
        ViewOutcome::Stay => None,
        ViewOutcome::Navigate(route) => Some(route.path()),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
