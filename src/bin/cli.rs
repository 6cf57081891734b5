//! Lotfront inventory CLI
//!
//! Searches live inventory and manages the local favorites and compare lists.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use lotfront::{
    error::{AppError, Result},
    format,
    lists::{ListKind, ListStore},
    models::{Bounds, Config, FilterParams, InventoryPage, InventoryUnit, SortKey},
    query,
    services::InventoryService,
    storage::{KeyValueStore, LocalStorage},
};

/// Lotfront - Dealership Inventory
#[derive(Parser, Debug)]
#[command(
    name = "inventory",
    version,
    about = "Search RV inventory and manage saved units"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search inventory with filters
    Search(FilterArgs),

    /// Show one unit by id
    Unit { id: u64 },

    /// List featured units (falls back to regular inventory)
    Featured,

    /// List makes in current inventory
    Makes,

    /// List unit types in current inventory
    Types,

    /// Show every filter choice available in current inventory
    Options,

    /// Print the API query for a set of filters without sending it
    Query(FilterArgs),

    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Manage the compare list (up to 4 units)
    Compare {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Fetch favorites and compare units together
    Saved,

    /// Validate configuration
    Validate,
}

#[derive(Subcommand, Debug)]
enum ListAction {
    /// Print saved ids
    List,
    /// Fetch and display the saved units
    Show,
    /// Add a unit
    Add { id: u64 },
    /// Remove a unit
    Remove { id: u64 },
    /// Add the unit if absent, remove it if present
    Toggle { id: u64 },
    /// Remove every unit
    Clear,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Page URL query string, e.g. "type=Fifth%20Wheel&minPrice=20000".
    /// Individual flags below are applied on top.
    #[arg(long)]
    query: Option<String>,

    /// Unit type (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,

    /// Make (repeatable)
    #[arg(long = "make")]
    makes: Vec<String>,

    /// Model (repeatable)
    #[arg(long = "model")]
    models: Vec<String>,

    /// Condition, e.g. New or Used (repeatable)
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Slideout count (repeatable)
    #[arg(long = "slideouts")]
    slideouts: Vec<u32>,

    #[arg(long)]
    min_price: Option<u64>,
    #[arg(long)]
    max_price: Option<u64>,
    #[arg(long)]
    min_year: Option<u64>,
    #[arg(long)]
    max_year: Option<u64>,
    #[arg(long)]
    min_sleeps: Option<u64>,
    #[arg(long)]
    max_sleeps: Option<u64>,
    #[arg(long)]
    min_weight: Option<u64>,
    #[arg(long)]
    max_weight: Option<u64>,

    /// Free-text search across make, model and stock number
    #[arg(short, long)]
    search: Option<String>,

    /// Sort order: price-asc, price-desc, year-desc, year-asc, length-asc, length-desc
    #[arg(long)]
    sort: Option<SortKey>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    page_size: Option<u32>,
}

impl FilterArgs {
    fn into_params(self, default_page_size: u32) -> FilterParams {
        let mut params = match &self.query {
            Some(raw) => FilterParams::from_query_string_with(raw, default_page_size),
            None => FilterParams {
                page_size: default_page_size,
                ..FilterParams::default()
            },
        };

        fn extend<T>(target: &mut Vec<T>, values: Vec<T>) {
            if !values.is_empty() {
                *target = values;
            }
        }
        fn merge(target: &mut Bounds, min: Option<u64>, max: Option<u64>) {
            target.min = min.or(target.min);
            target.max = max.or(target.max);
        }

        extend(&mut params.types, self.types);
        extend(&mut params.makes, self.makes);
        extend(&mut params.models, self.models);
        extend(&mut params.conditions, self.conditions);
        extend(&mut params.slideouts, self.slideouts);
        merge(&mut params.price, self.min_price, self.max_price);
        merge(&mut params.year, self.min_year, self.max_year);
        merge(&mut params.sleeps, self.min_sleeps, self.max_sleeps);
        merge(&mut params.weight, self.min_weight, self.max_weight);

        if self.search.is_some() {
            params.search = self.search;
        }
        if self.sort.is_some() {
            params.sort = self.sort;
        }
        if let Some(page) = self.page {
            params.page = page.max(1);
        }
        if let Some(size) = self.page_size {
            params.page_size = size.max(1);
        }
        params
    }
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_unit(unit: &InventoryUnit) {
    println!(
        "#{:<8} {:<45} {:>15}  {}",
        unit.id,
        format::truncate_text(&format::unit_title(unit), 45),
        format::format_price(unit.price_current),
        format::condition_name(unit.condition.as_ref()),
    );
}

fn print_page(page: &InventoryPage) {
    for unit in &page.data {
        print_unit(unit);
    }
    let p = &page.pagination;
    println!(
        "Page {} of {} ({} units)",
        p.current_page,
        p.last_page.max(1),
        p.total
    );
}

fn print_details(unit: &InventoryUnit) {
    println!("{}", format::unit_title(unit));
    println!("  Slug:      {}", format::unit_slug(unit));
    if let Some(stock) = &unit.stock_number {
        println!("  Stock #:   {}", stock);
    }
    println!("  Price:     {}", format::format_price(unit.price_current));
    println!("  MSRP:      {}", format::format_price(unit.price_msrp));

    let savings = format::calculate_savings(unit.price_msrp, unit.price_current);
    if savings > 0.0 {
        println!("  You save:  {}", format::format_price(Some(savings)));
    }

    println!(
        "  Condition: {}",
        format::condition_name(unit.condition.as_ref())
    );
    println!(
        "  Type:      {}",
        unit.classification_name().unwrap_or(format::NOT_AVAILABLE)
    );
    println!("  Image:     {}", format::image_url(unit.primary_image()));

    for description in &unit.inventory_unit_descriptions {
        if let Some(text) = &description.description {
            let heading = description.heading.as_deref().unwrap_or("Description");
            println!("\n  {}: {}", heading, format::truncate_text(text.trim(), 200));
        }
    }
}

fn print_comparison(units: &[InventoryUnit]) {
    print!("{:<12}", "");
    for unit in units {
        print!(" {:<24}", format::truncate_text(&format::unit_title(unit), 24));
    }
    println!();

    for row in format::comparison_rows(units) {
        print!("{:<12}", row.label);
        for value in &row.values {
            print!(" {:<24}", value);
        }
        println!();
    }
}

async fn run_list(
    mut store: ListStore,
    action: ListAction,
    service: &InventoryService,
) -> Result<()> {
    let kind = store.kind();

    match action {
        ListAction::List => {
            if store.is_empty() {
                log::info!("No units in {}", kind);
            }
            for id in store.ids() {
                println!("{}", id);
            }
        }

        ListAction::Show => match kind {
            ListKind::Favorites => {
                let units = service.fetch_units_by_ids(&store.recent_first()).await?;
                units.iter().for_each(print_unit);
            }
            ListKind::Compare => {
                let units = service.fetch_units_by_ids(store.ids()).await?;
                if units.is_empty() {
                    log::info!("Compare list is empty");
                } else {
                    print_comparison(&units);
                }
            }
        },

        ListAction::Add { id } => {
            if store.add(id) {
                log::info!("Added {} to {} ({} saved)", id, kind, store.len());
            } else {
                return Err(AppError::validation(format!(
                    "{} is full ({} units). Remove one first.",
                    kind,
                    store.capacity().unwrap_or_default()
                )));
            }
        }

        ListAction::Remove { id } => {
            if store.contains(id) {
                store.remove(id);
                log::info!("Removed {} from {}", id, kind);
            } else {
                log::warn!("{} is not in {}", id, kind);
            }
        }

        ListAction::Toggle { id } => {
            let was_present = store.contains(id);
            if !store.toggle(id) {
                return Err(AppError::validation(format!("{} is full", kind)));
            }
            let verb = if was_present { "Removed" } else { "Added" };
            log::info!("{} {} ({} saved)", verb, id, store.len());
        }

        ListAction::Clear => {
            store.clear();
            log::info!("Cleared {}", kind);
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(cli.verbose, &config.logging.level);

    match &loaded {
        Ok(_) => log::debug!("Loaded configuration from {}", cli.config.display()),
        Err(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
    }
    config.apply_env();

    let page_size = config.api.default_page_size;
    let storage: Arc<dyn KeyValueStore> = Arc::new(LocalStorage::new(&config.storage.dir));
    let prefix = config.storage.key_prefix.clone();

    match cli.command {
        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", config.api.base_url);
        }

        Command::Query(args) => {
            let params = args.into_params(page_size);
            let sort = params.sort.map_or("Featured", |key| key.label());
            log::info!("Sort: {}, page {} ({} per page)", sort, params.page, params.page_size);
            println!("{}", query::inventory_query(&params, config.api.company_id));
        }

        Command::Search(args) => {
            let params = args.into_params(page_size);
            let service = InventoryService::from_config(&config.api)?;

            if params.has_active_filters() {
                log::info!("Searching with {} active filters", params.active_filter_count());
            }
            let page = service.fetch_inventory(&params).await?;
            if page.is_empty() {
                log::info!("No units match these filters");
            }
            print_page(&page);
        }

        Command::Unit { id } => {
            let service = InventoryService::from_config(&config.api)?;
            match service.fetch_unit(id).await? {
                Some(unit) => print_details(&unit),
                None => log::warn!("Unit {} not found", id),
            }
        }

        Command::Featured => {
            let service = InventoryService::from_config(&config.api)?;
            service.fetch_featured().await?.iter().for_each(print_unit);
        }

        Command::Makes => {
            let service = InventoryService::from_config(&config.api)?;
            for make in service.fetch_makes().await? {
                println!("{}", make);
            }
        }

        Command::Types => {
            let service = InventoryService::from_config(&config.api)?;
            for kind in service.fetch_types().await? {
                println!("{}", kind);
            }
        }

        Command::Options => {
            let service = InventoryService::from_config(&config.api)?;
            let options = service.fetch_filter_options().await?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }

        Command::Favorites { action } => {
            let service = InventoryService::from_config(&config.api)?;
            run_list(ListStore::favorites(storage, &prefix), action, &service).await?;
        }

        Command::Compare { action } => {
            let service = InventoryService::from_config(&config.api)?;
            run_list(ListStore::compare(storage, &prefix), action, &service).await?;
        }

        Command::Saved => {
            let service = InventoryService::from_config(&config.api)?;
            let favorites = ListStore::favorites(storage.clone(), &prefix);
            let compare = ListStore::compare(storage, &prefix);
            let favorite_ids = favorites.recent_first();

            let (favorite_units, compare_units) = futures::try_join!(
                service.fetch_units_by_ids(&favorite_ids),
                service.fetch_units_by_ids(compare.ids()),
            )?;

            println!("Favorites ({}):", favorite_units.len());
            favorite_units.iter().for_each(print_unit);
            println!("\nCompare ({}/{}):", compare_units.len(), compare.capacity().unwrap_or_default());
            compare_units.iter().for_each(print_unit);
        }
    }

    Ok(())
}
