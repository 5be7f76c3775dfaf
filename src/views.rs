//! Text rendering for the listing, detail, admin and favorites screens, plus
//! the transient notices shown when something goes wrong.

use std::fmt::{self, Write as _};

use tracing::{error, info};

use crate::client::Catalog;
use crate::favorites::Favorites;
use crate::models::{Characteristic, Location};

const FAVORITE_MARK: &str = "♥";
const NOT_FAVORITE_MARK: &str = "♡";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A toast-style message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: None,
        }
    }

    pub fn error(title: impl Into<String>, description: impl fmt::Display) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: Some(description.to_string()),
        }
    }

    /// Print to stderr so stdout stays clean for listings
    pub fn emit(&self) {
        eprintln!("{}", self);
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} {}", icon, self.title)?;
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// Unwrap a call-site result, or log it, tell the user, and fall back to the
/// empty state. Never fatal.
pub fn or_notify<T: Default, E: fmt::Display>(result: Result<T, E>, title: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("{}: {}", title, e);
            Notice::error(title, e).emit();
            T::default()
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("R$ {}/dia", price)
}

fn favorite_mark(favorites: &dyn Favorites, id: &str) -> &'static str {
    if favorites.is_favorite(id) {
        FAVORITE_MARK
    } else {
        NOT_FAVORITE_MARK
    }
}

/// Home screen: one line per location
pub fn render_listing(locations: &[Location], favorites: &dyn Favorites) -> String {
    if locations.is_empty() {
        return "No locations available.\n".to_string();
    }

    let mut out = String::new();
    for (i, location) in locations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {} ({}) {}",
            i + 1,
            favorite_mark(favorites, &location.id),
            location.fields.title,
            location.fields.city,
            format_price(location.fields.price),
        );
        let _ = writeln!(out, "   ID: {}", location.id);
    }
    info!("Rendered {} locations", locations.len());
    out
}

/// Detail screen for one location
pub fn render_detail(
    location: &Location,
    characteristics: &[&Characteristic],
    favorites: &dyn Favorites,
) -> String {
    let fields = &location.fields;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        favorite_mark(favorites, &location.id),
        fields.title
    );
    let _ = writeln!(out, "City: {}", fields.city);
    let _ = writeln!(out, "Price: {}", format_price(fields.price));
    if !fields.image_url.is_empty() {
        let _ = writeln!(out, "Image: {}", fields.image_url);
    }
    if !fields.description.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", fields.description);
    }
    if !characteristics.is_empty() {
        let names: Vec<String> = characteristics.iter().map(|c| labeled(c)).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "Features: {}", names.join(", "));
    }
    out
}

/// Admin table: locations with their linked characteristics
pub fn render_admin_table(catalog: &Catalog) -> String {
    if catalog.locations.is_empty() {
        return "No locations registered.\n".to_string();
    }

    let mut out = String::new();
    for location in &catalog.locations {
        let icons: Vec<String> = catalog
            .characteristics_of(location)
            .into_iter()
            .map(labeled)
            .collect();
        let _ = writeln!(
            out,
            "{}\t{}\t{}\tR$ {}\t{}",
            location.id,
            location.fields.title,
            location.fields.city,
            location.fields.price,
            icons.join(" "),
        );
    }
    out
}

pub fn render_characteristics(characteristics: &[Characteristic]) -> String {
    if characteristics.is_empty() {
        return "No characteristics registered.\n".to_string();
    }

    let mut out = String::new();
    for characteristic in characteristics {
        let _ = write!(out, "{}\t{}", characteristic.id, labeled(characteristic));
        if let Some(description) = &characteristic.fields.description {
            let _ = write!(out, "\t{}", description);
        }
        let _ = writeln!(out);
    }
    out
}

/// Favorites screen, rendered from the stored snapshots
pub fn render_favorites(favorites: &dyn Favorites) -> String {
    let locations = favorites.favorites();
    if locations.is_empty() {
        return "You have no favorites yet.\n".to_string();
    }

    let mut out = String::new();
    for location in locations {
        let _ = writeln!(
            out,
            "{} {} ({}) {}",
            FAVORITE_MARK,
            location.fields.title,
            location.fields.city,
            format_price(location.fields.price),
        );
        let _ = writeln!(out, "   ID: {}", location.id);
    }
    out
}

fn labeled(characteristic: &Characteristic) -> String {
    match &characteristic.fields.icon {
        Some(icon) => format!("{} {}", icon, characteristic.fields.name),
        None => characteristic.fields.name.clone(),
    }
}
