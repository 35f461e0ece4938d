use anyhow::Context;
use clap::{Parser, Subcommand};

use brew_console::authz::RoleRegistry;
use brew_console::config::ConsoleConfig;
use brew_console::gate::Affordance;
use brew_console::guard::{Navigation, RedirectReason};
use brew_console::models::rbac::Permission;
use brew_console::screens::products::{ProductListScreen, RowActions};
use brew_console::screens::roles::role_cards;
use brew_console::{create_console, AppError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Coffee shop admin console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        username: String,
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List roles and what each may do
    Roles,
    /// Check whether the current session holds a permission
    Can { permission: String },
    /// Run the route guard for a path
    Visit { path: String },
    /// Show the navigation menu for the current session
    Menu,
    /// List products with the actions offered to the current session
    Products,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?;
    let console = create_console(config)?;

    match cli.command {
        Commands::Login { username, password } => match console.sessions.sign_in(&username, &password).await {
            Ok(session) => println!("Signed in as {} ({})", session.username, session.role),
            Err(err @ AppError::Authentication(_)) => anyhow::bail!(err.user_message()),
            Err(err) => return Err(err).context("sign-in failed"),
        },
        Commands::Logout => {
            console.sessions.sign_out();
            println!("Signed out");
        }
        Commands::Whoami => match console.sessions.current_session() {
            Some(session) => {
                println!("{} ({})", session.username, session.role);
                if let Some(at) = session.expires_at {
                    println!("session expires {}", at.to_rfc3339());
                }
            }
            None => println!("not signed in"),
        },
        Commands::Roles => {
            for card in role_cards(RoleRegistry::standard()) {
                println!("{} - {}", card.description.label, card.description.description);
                let perms: Vec<&str> = card.permissions.iter().map(|p| p.as_str()).collect();
                println!("  permissions: {}", perms.join(", "));
                for capability in card.description.capabilities {
                    println!("  - {capability}");
                }
            }
        }
        Commands::Can { permission } => {
            let permission: Permission = permission.parse()?;
            let allowed = console.gate().is_visible(permission);
            println!("{permission}: {}", if allowed { "allowed" } else { "denied" });
        }
        Commands::Visit { path } => match console.guard.navigate(&path) {
            Navigation::Admit(admission) => println!("admitted: {} ({})", admission.path, admission.route.title),
            Navigation::Redirect { to, reason } => println!("redirect to {to} ({})", describe_redirect(reason)),
        },
        Commands::Menu => {
            for entry in console.gate().nav_entries() {
                println!("{:<22} {}", entry.title, entry.path);
            }
        }
        Commands::Products => {
            let mut navigator = console.navigator();
            let visit = navigator.push("/products");
            let Some(admission) = visit.admission.filter(|a| a.path == "/products") else {
                anyhow::bail!("please log in first");
            };

            let gate = console.gate();
            let mut screen = ProductListScreen::new();
            screen.load(&console.api, &admission).await?;
            if let Some(error) = &screen.error {
                anyhow::bail!(error.clone());
            }

            let actions = RowActions::for_gate(&gate);
            println!("{:<6} {:<28} {:>8} {:<12} {}", "ID", "Name", "Price", "Available", "Actions");
            for product in &screen.products {
                let mut offered = Vec::new();
                if actions.toggle_availability {
                    offered.push("toggle");
                }
                if actions.edit {
                    offered.push("edit");
                }
                if actions.delete {
                    offered.push("delete");
                }
                println!(
                    "{:<6} {:<28} {:>8.2} {:<12} {}",
                    product.id,
                    product.name,
                    product.price,
                    if product.availability { "yes" } else { "no" },
                    offered.join(",")
                );
            }
            if gate.shows(Affordance::AddProduct) {
                println!("(you can add products: /add-product)");
            }
        }
    }

    Ok(())
}

fn describe_redirect(reason: RedirectReason) -> &'static str {
    match reason {
        RedirectReason::NotAuthenticated => "not signed in",
        RedirectReason::NotPermitted => "not permitted",
        RedirectReason::NotFound => "no such page",
        RedirectReason::Alias => "alias",
    }
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
