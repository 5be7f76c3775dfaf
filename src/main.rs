use anyhow::{Context, Result};
use clap::Parser;
use rental_scout::cli::{
    AdminCommand, CharacteristicArgs, CharacteristicsCommand, Cli, Command, FavoritesCommand,
    LocationArgs,
};
use rental_scout::client::{AirtableClient, Catalog, MemoryRecordStore, RentalApi};
use rental_scout::favorites::{Favorites, FavoritesStore, FileStorage};
use rental_scout::forms::{CharacteristicForm, LocationForm};
use rental_scout::logging::init_logging;
use rental_scout::models::Location;
use rental_scout::views::{self, Notice};
use rental_scout::Config;
use tracing::{debug, error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let mut config =
        Config::extract_from(cli.config.clone()).context("Failed to load configuration")?;
    if cli.offline {
        config.backend.offline = true;
    }
    config.validate().context("Invalid configuration")?;

    let api = if config.backend.offline {
        RentalApi::new(MemoryRecordStore::with_sample_data())
    } else {
        RentalApi::new(AirtableClient::new(&config.backend).context("Failed to create HTTP client")?)
    };
    info!("🏠 Using {} backend", api.backend_name());

    let data_dir = config.data_dir();
    let mut favorites = FavoritesStore::load(FileStorage::new(&data_dir))
        .with_context(|| format!("Failed to load favorites from {}", data_dir.display()))?;
    favorites.subscribe(Box::new(|current: &[Location]| {
        debug!("Favorites changed, {} saved", current.len());
    }));

    match cli.command {
        Command::List => handle_list(&api, &favorites).await,
        Command::Show { id } => handle_show(&api, &favorites, &id).await,
        Command::Favorites(cmd) => handle_favorites(&api, &mut favorites, cmd).await,
        Command::Admin(cmd) => handle_admin(&api, cmd).await,
        Command::Characteristics(cmd) => handle_characteristics(&api, cmd).await,
    }

    Ok(())
}

async fn handle_list(api: &RentalApi, favorites: &dyn Favorites) {
    let locations = views::or_notify(api.locations().await, "Failed to load locations");
    print!("{}", views::render_listing(&locations, favorites));
}

async fn handle_show(api: &RentalApi, favorites: &dyn Favorites, id: &str) {
    let (location, characteristics) = tokio::join!(api.location(id), api.characteristics());

    let location = match location {
        Ok(location) => location,
        Err(e) if e.is_not_found() => {
            Notice::error("Location not found", id).emit();
            return;
        }
        Err(e) => {
            error!("Failed to load location {}: {}", id, e);
            Notice::error("Failed to load location", e).emit();
            return;
        }
    };

    let catalog = Catalog {
        locations: Vec::new(),
        characteristics: views::or_notify(characteristics, "Failed to load characteristics"),
    };
    let linked = catalog.characteristics_of(&location);
    print!("{}", views::render_detail(&location, &linked, favorites));
}

async fn handle_favorites(api: &RentalApi, favorites: &mut dyn Favorites, cmd: FavoritesCommand) {
    match cmd {
        FavoritesCommand::List => print!("{}", views::render_favorites(favorites)),
        FavoritesCommand::Add { id } => {
            let Some(location) = fetch_for_favorite(api, &id).await else {
                return;
            };
            match favorites.add_favorite(location) {
                Ok(true) => Notice::success("Added to favorites").emit(),
                Ok(false) => Notice::info("Already in favorites").emit(),
                Err(e) => Notice::error("Failed to save favorites", e).emit(),
            }
        }
        FavoritesCommand::Remove { id } => match favorites.remove_favorite(&id) {
            Ok(true) => Notice::success("Removed from favorites").emit(),
            Ok(false) => Notice::info("Not in favorites").emit(),
            Err(e) => Notice::error("Failed to save favorites", e).emit(),
        },
        FavoritesCommand::Toggle { id } => {
            let result = if favorites.is_favorite(&id) {
                favorites.remove_favorite(&id).map(|_| false)
            } else {
                let Some(location) = fetch_for_favorite(api, &id).await else {
                    return;
                };
                favorites.toggle_favorite(location)
            };
            match result {
                Ok(true) => Notice::success("Added to favorites").emit(),
                Ok(false) => Notice::success("Removed from favorites").emit(),
                Err(e) => Notice::error("Failed to save favorites", e).emit(),
            }
        }
    }
}

/// The snapshot stored as favorite is whatever the backend returns right now
async fn fetch_for_favorite(api: &RentalApi, id: &str) -> Option<Location> {
    match api.location(id).await {
        Ok(location) => Some(location),
        Err(e) => {
            error!("Cannot favorite {}: {}", id, e);
            Notice::error("Failed to load location", e).emit();
            None
        }
    }
}

async fn handle_admin(api: &RentalApi, cmd: AdminCommand) {
    match cmd {
        AdminCommand::List => {
            let catalog = views::or_notify(api.catalog().await, "Failed to load admin data");
            print!("{}", views::render_admin_table(&catalog));
        }
        AdminCommand::Create(args) => save_location(api, None, args).await,
        AdminCommand::Update { id, fields } => save_location(api, Some(&id), fields).await,
        AdminCommand::Delete { id } => match api.delete_location(&id).await {
            Ok(()) => Notice::success("Location deleted").emit(),
            Err(e) => {
                error!("Failed to delete location {}: {}", id, e);
                Notice::error("Failed to delete location", e).emit();
            }
        },
    }
}

async fn save_location(api: &RentalApi, id: Option<&str>, args: LocationArgs) {
    let mut form = LocationForm::default();
    if let Some(id) = id {
        match api.location(id).await {
            Ok(existing) => form = LocationForm::from_fields(&existing.fields),
            Err(e) => {
                Notice::error("Failed to load location", e).emit();
                return;
            }
        }
    }
    args.apply(&mut form);

    let fields = match form.submit() {
        Ok(fields) => fields,
        Err(e) => {
            Notice::error("Please fix the form", e).emit();
            return;
        }
    };

    let saved = match id {
        Some(id) => api.update_location(id, &fields).await,
        None => api.create_location(&fields).await,
    };
    match saved {
        Ok(location) if id.is_some() => {
            Notice::success(format!("Location {} updated", location.id)).emit()
        }
        Ok(location) => Notice::success(format!("Location {} created", location.id)).emit(),
        Err(e) => {
            error!("Failed to save location: {}", e);
            Notice::error("Failed to save location", e).emit();
        }
    }
}

async fn handle_characteristics(api: &RentalApi, cmd: CharacteristicsCommand) {
    match cmd {
        CharacteristicsCommand::List => {
            let characteristics =
                views::or_notify(api.characteristics().await, "Failed to load characteristics");
            print!("{}", views::render_characteristics(&characteristics));
        }
        CharacteristicsCommand::Create(args) => save_characteristic(api, None, args).await,
        CharacteristicsCommand::Update { id, fields } => {
            save_characteristic(api, Some(&id), fields).await
        }
        CharacteristicsCommand::Delete { id } => match api.delete_characteristic(&id).await {
            Ok(()) => Notice::success("Characteristic deleted").emit(),
            Err(e) => {
                error!("Failed to delete characteristic {}: {}", id, e);
                Notice::error("Failed to delete characteristic", e).emit();
            }
        },
    }
}

async fn save_characteristic(api: &RentalApi, id: Option<&str>, args: CharacteristicArgs) {
    let mut form = CharacteristicForm::default();
    if let Some(id) = id {
        match api.characteristic(id).await {
            Ok(existing) => form = CharacteristicForm::from_fields(&existing.fields),
            Err(e) => {
                Notice::error("Failed to load characteristic", e).emit();
                return;
            }
        }
    }
    args.apply(&mut form);

    let fields = match form.submit() {
        Ok(fields) => fields,
        Err(e) => {
            Notice::error("Please fix the form", e).emit();
            return;
        }
    };

    let saved = match id {
        Some(id) => api.update_characteristic(id, &fields).await,
        None => api.create_characteristic(&fields).await,
    };
    match saved {
        Ok(characteristic) => {
            Notice::success(format!("Characteristic {} saved", characteristic.id)).emit()
        }
        Err(e) => {
            error!("Failed to save characteristic: {}", e);
            Notice::error("Failed to save characteristic", e).emit();
        }
    }
}
