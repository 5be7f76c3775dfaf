//! Command-line surface. Each subcommand stands in for one screen of the
//! browsing and admin client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::forms::{CharacteristicForm, LocationForm};
use crate::logging::Verbosity;

/// rental-scout - browse and manage rental listings
#[derive(Debug, Parser)]
#[command(name = "rental-scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use the built-in sample catalog instead of the hosted backend
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all locations
    List,

    /// Show one location in detail
    Show {
        /// Location record id
        id: String,
    },

    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Administer locations
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Administer characteristics
    #[command(subcommand)]
    Characteristics(CharacteristicsCommand),
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved favorites
    List,
    /// Save a location as favorite
    Add { id: String },
    /// Remove a location from favorites
    Remove { id: String },
    /// Add if absent, remove if present
    Toggle { id: String },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List locations with their characteristics
    List,
    /// Create a location
    Create(LocationArgs),
    /// Update a location; omitted fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: LocationArgs,
    },
    /// Delete a location
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CharacteristicsCommand {
    /// List characteristics
    List,
    /// Create a characteristic
    Create(CharacteristicArgs),
    /// Update a characteristic; omitted fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: CharacteristicArgs,
    },
    /// Delete a characteristic
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Daily price
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Image URL
    #[arg(long = "image")]
    pub image_url: Option<String>,
    /// Linked characteristic id; repeat to link several. Replaces the current links.
    #[arg(long = "characteristic", value_name = "ID")]
    pub characteristic_ids: Vec<String>,
    /// Unlink every characteristic
    #[arg(long, conflicts_with = "characteristic_ids")]
    pub clear_characteristics: bool,
}

impl LocationArgs {
    /// Overlay the given flags onto a form
    pub fn apply(self, form: &mut LocationForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(image_url) = self.image_url {
            form.image_url = image_url;
        }
        if self.clear_characteristics {
            form.characteristic_ids.clear();
        } else if !self.characteristic_ids.is_empty() {
            form.characteristic_ids = self.characteristic_ids;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CharacteristicArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
}

impl CharacteristicArgs {
    pub fn apply(self, form: &mut CharacteristicForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(icon) = self.icon {
            form.icon = icon;
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
