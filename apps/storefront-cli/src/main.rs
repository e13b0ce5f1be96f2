//! # Storefront Session Shell
//!
//! Drives the session store from the command line.
//!
//! ## Usage
//! ```bash
//! # Start a fresh session
//! cargo run -p storefront-cli -- new
//!
//! # List a category from an inventory file
//! cargo run -p storefront-cli -- list ./inventory.json "Hats & Caps"
//!
//! # Add a product from an inventory file
//! cargo run -p storefront-cli -- add ./inventory.json TEE-001 2 Size=M Color=Blue
//!
//! # Push expiry out five minutes and wait for the expiry warning
//! cargo run -p storefront-cli -- refresh --wait
//!
//! # Use a specific config file
//! cargo run -p storefront-cli -- --config ./session.toml show
//! ```
//!
//! The shell uses the file backend unless `--memory` is given, since an
//! in-memory session would not outlive a single command.

use std::env;
use std::path::PathBuf;

use storefront_core::identifier::generate_identifier;
use storefront_core::money::{current_price, format_money_with};
use storefront_core::navigation::{filter_by_view, ALL_PRODUCTS_VIEW};
use storefront_core::text::{snake_case, title_case};
use storefront_core::{Catalog, CoreError, Currency, ProductDetail, Session};
use storefront_session::{
    CartTotals, Clock, NewSession, SessionConfig, SessionDispatcher, SessionStore, StorageBackend,
    SystemClock,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const USAGE: &str = "\
Storefront Session Shell

Usage: storefront [OPTIONS] <COMMAND> [ARGS]

Commands:
  new                                          Create a new session (replaces any existing one)
  show                                         Print the current session and cart totals
  list <inventory.json> [view]                 List products in a category view (default: all)
  add <inventory.json> <sku> [qty] [Name=Opt]  Add a product line to the cart
  refresh [--wait]                             Extend expiry; --wait blocks until the expiry warning
  delete                                       Remove the session
  uid                                          Print a freshly generated identifier

Options:
  -c, --config <PATH>  Config file (default: platform config dir/session.toml)
      --memory         Use in-process storage instead of files
  -h, --help           Show this help message";

#[tokio::main]
async fn main() -> CliResult<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut memory = false;
    let mut rest: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--memory" => memory = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    let Some((command, command_args)) = rest.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut config = SessionConfig::load_or_default(config_path);
    config.storage.backend = if memory {
        StorageBackend::Memory
    } else {
        StorageBackend::File
    };
    debug!(backend = %config.storage.backend, dir = ?config.storage_dir(), "Session storage selected");

    let currency = config.currency();
    let mut store = SessionStore::from_config(&config)?;

    match command.as_str() {
        "new" => {
            let session = store.create(NewSession::default())?;
            print_session(&session, currency)?;
        }
        "show" => match store.read() {
            Some(session) => print_session(&session, currency)?,
            None => println!("No session"),
        },
        "list" => list(command_args, currency)?,
        "add" => {
            let session = add(&store, command_args)?;
            print_session(&session, currency)?;
        }
        "refresh" => refresh(&mut store, command_args, currency).await?,
        "delete" => {
            store.delete()?;
            println!("Session deleted");
        }
        "uid" => println!("{}", generate_identifier()),
        other => {
            return Err(format!("Unknown command '{}'. Run with --help for usage.", other).into());
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=storefront_session=trace` - Trace the session crate only
/// - Default: `info,storefront=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `list <inventory.json> [view]`
fn list(args: &[String], currency: Currency) -> CliResult<()> {
    let [inventory, view @ ..] = args else {
        return Err("usage: list <inventory.json> [view]".into());
    };
    let view = view
        .first()
        .map(|v| snake_case(v))
        .unwrap_or_else(|| ALL_PRODUCTS_VIEW.to_string());

    let catalog = Catalog::from_json(&std::fs::read_to_string(inventory)?)?;
    let products = filter_by_view(&catalog.products, &view);

    println!("{} ({})", title_case(&view), products.len());
    for product in products {
        let price = current_price(product.unit_price.as_ref())
            .map(|p| format_money_with(p, currency.symbol()))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<12} {:<32} {}", product.sku, product.product_name, price);
    }
    Ok(())
}

/// `add <inventory.json> <sku> [qty] [Variant=Option ...]`
fn add(store: &SessionStore, args: &[String]) -> CliResult<Session> {
    let [inventory, sku, extra @ ..] = args else {
        return Err("usage: add <inventory.json> <sku> [qty] [Variant=Option ...]".into());
    };

    let catalog = Catalog::from_json(&std::fs::read_to_string(inventory)?)?;
    let product = catalog
        .find(sku)
        .ok_or_else(|| CoreError::ProductNotFound(sku.clone()))?;

    let mut page = ProductDetail::new(product);
    let breadcrumbs: Vec<String> = page.breadcrumbs().into_iter().map(|b| b.label).collect();
    info!(trail = %breadcrumbs.join(" > "), "Product page opened");

    for arg in extra {
        match arg.split_once('=') {
            Some((variant, option)) => page.on_variant_change(variant, option),
            None => page.on_quantity_change(
                arg.parse()
                    .map_err(|_| format!("expected a quantity or Variant=Option, got '{}'", arg))?,
            ),
        }
    }

    let mut dispatcher = SessionDispatcher::new(store);
    page.on_cart_add(&mut dispatcher);
    let session = dispatcher
        .take_cart_result()
        .ok_or("cart update was not dispatched")??;
    Ok(session)
}

/// `refresh [--wait]`
async fn refresh(store: &mut SessionStore, args: &[String], currency: Currency) -> CliResult<()> {
    let wait = args.iter().any(|a| a == "--wait");
    let mut warnings = store.subscribe_expiry_warnings();

    let Some(session) = store.refresh()? else {
        println!("No session");
        return Ok(());
    };
    print_session(&session, currency)?;

    if wait {
        println!("Waiting for the expiry warning...");
        let warning = warnings.recv().await?;
        println!("Session {} expires at {}", warning.uid, warning.expires);
    }

    Ok(())
}

fn print_session(session: &Session, currency: Currency) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(session)?);

    let now = SystemClock.now_millis();
    let remaining_secs = (session.expires - now).max(0) / 1000;
    if session.is_expired(now) {
        println!("Expired");
    } else {
        println!("Expires in {}s", remaining_secs);
    }

    let totals = CartTotals::from(session);
    println!(
        "{} line(s), {} item(s), subtotal {}",
        totals.item_count,
        totals.total_quantity,
        totals.subtotal().format(currency)
    );
    Ok(())
}
