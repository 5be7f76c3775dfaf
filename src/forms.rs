//! Form-level checks for the admin screens.
//!
//! A form holds raw user input as typed. `submit` checks every field, reports
//! all problems at once, and yields the field set to send to the backend.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{CharacteristicFields, LocationFields};

fn image_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://.+\..+").expect("static pattern is valid"))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm {
    pub title: String,
    pub description: String,
    /// Kept as text until submit, like an input box
    pub price: String,
    pub city: String,
    pub image_url: String,
    pub characteristic_ids: Vec<String>,
}

impl LocationForm {
    /// Pre-fill from an existing record, for editing
    pub fn from_fields(fields: &LocationFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            price: fields.price.to_string(),
            city: fields.city.clone(),
            image_url: fields.image_url.clone(),
            characteristic_ids: fields.characteristic_ids.clone(),
        }
    }

    /// Select or deselect a characteristic, keeping selection order
    pub fn toggle_characteristic(&mut self, id: &str) {
        if let Some(pos) = self.characteristic_ids.iter().position(|c| c == id) {
            self.characteristic_ids.remove(pos);
        } else {
            self.characteristic_ids.push(id.to_string());
        }
    }

    pub fn submit(&self) -> Result<LocationFields> {
        let mut problems = Vec::new();

        if self.title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description is required".to_string());
        }

        let price = match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => price,
            _ => {
                problems.push("price must be a number greater than or equal to 0".to_string());
                0.0
            }
        };

        if self.city.trim().is_empty() {
            problems.push("city is required".to_string());
        }

        let image_url = self.image_url.trim();
        if !image_url_pattern().is_match(image_url) {
            problems.push(
                "image must be a valid URL (e.g. https://example.com/image.jpg)".to_string(),
            );
        }

        if !problems.is_empty() {
            return Err(Error::Validation(problems));
        }

        let mut characteristic_ids: Vec<String> = Vec::with_capacity(self.characteristic_ids.len());
        for id in &self.characteristic_ids {
            if !characteristic_ids.contains(id) {
                characteristic_ids.push(id.clone());
            }
        }

        Ok(LocationFields {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            city: self.city.trim().to_string(),
            image_url: image_url.to_string(),
            characteristic_ids,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacteristicForm {
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl CharacteristicForm {
    pub fn from_fields(fields: &CharacteristicFields) -> Self {
        Self {
            name: fields.name.clone(),
            description: fields.description.clone().unwrap_or_default(),
            icon: fields.icon.clone().unwrap_or_default(),
        }
    }

    /// Blank optional inputs are sent as absent columns
    pub fn submit(&self) -> Result<CharacteristicFields> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(vec!["name is required".to_string()]));
        }

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(CharacteristicFields {
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            icon: optional(&self.icon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LocationForm {
        LocationForm {
            title: " Cabin ".into(),
            description: "Wooden cabin by the lake".into(),
            price: "120".into(),
            city: "X".into(),
            image_url: "https://images.example.com/cabin.jpg".into(),
            characteristic_ids: vec!["recA".into(), "recB".into(), "recA".into()],
        }
    }

    fn problems(form: &LocationForm) -> Vec<String> {
        match form.submit() {
            Err(Error::Validation(problems)) => problems,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form_submits() {
        let fields = valid_form().submit().unwrap();
        assert_eq!(fields.title, "Cabin");
        assert_eq!(fields.price, 120.0);
        assert_eq!(fields.characteristic_ids, vec!["recA", "recB"]);
    }

    #[test]
    fn test_all_problems_reported_together() {
        let form = LocationForm {
            price: "-3".into(),
            image_url: "not-a-url".into(),
            ..Default::default()
        };
        let problems = problems(&form);
        assert_eq!(problems.len(), 5);
        assert!(problems.iter().any(|p| p.starts_with("price")));
        assert!(problems.iter().any(|p| p.starts_with("image")));
    }

    #[test]
    fn test_price_must_be_numeric() {
        let mut form = valid_form();
        form.price = "abc".into();
        assert_eq!(
            problems(&form),
            vec!["price must be a number greater than or equal to 0"]
        );

        form.price = "0".into();
        assert_eq!(form.submit().unwrap().price, 0.0);
    }

    #[test]
    fn test_image_url_pattern() {
        let mut form = valid_form();
        for bad in ["ftp://example.com/a.jpg", "https://localhost", "example.com/a.jpg", ""] {
            form.image_url = bad.into();
            assert!(form.submit().is_err(), "{bad} should be rejected");
        }
        form.image_url = "http://cdn.example.org/img".into();
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_edit_prefill_and_toggle() {
        let fields = valid_form().submit().unwrap();
        let mut form = LocationForm::from_fields(&fields);
        assert_eq!(form.price, "120");

        form.toggle_characteristic("recA");
        form.toggle_characteristic("recC");
        assert_eq!(form.characteristic_ids, vec!["recB", "recC"]);
    }

    #[test]
    fn test_characteristic_form() {
        let form = CharacteristicForm {
            name: "Wifi".into(),
            description: "  ".into(),
            icon: "📶".into(),
        };
        let fields = form.submit().unwrap();
        assert_eq!(fields.description, None);
        assert_eq!(fields.icon.as_deref(), Some("📶"));
        assert_eq!(CharacteristicForm::from_fields(&fields).icon, "📶");

        let empty = CharacteristicForm::default();
        assert!(matches!(empty.submit(), Err(Error::Validation(_))));
    }
}
