use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catch::{NewCatch, NewCatchLine};
use crate::domain::default_price::{DefaultPrice, find_default_price};
use crate::domain::pricing::{parse_cents, parse_grams};
use crate::domain::product::{FishForm, UpdateProduct};
use crate::forms::{optional_multiline, sanitize_inline_text};

const SPECIES_MAX_LEN: usize = 64;
const SPECIES_MAX_LEN_VALIDATOR: u64 = SPECIES_MAX_LEN as u64;

const NOTES_MAX_LEN: usize = 1024;
const NOTES_MAX_LEN_VALIDATOR: u64 = NOTES_MAX_LEN as u64;

const MAX_LINES: usize = 50;
const MAX_LINES_VALIDATOR: u64 = MAX_LINES as u64;

pub type CatchFormResult<T> = Result<T, CatchFormError>;

#[derive(Debug, Error)]
pub enum CatchFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("catch has no lines")]
    NoLines,
    #[error("line {line}: species cannot be empty")]
    EmptySpecies { line: usize },
    #[error("line {line}: unknown form `{value}`")]
    UnknownForm { line: usize, value: String },
    #[error("line {line}: invalid quantity `{value}`")]
    InvalidQuantity { line: usize, value: String },
    #[error("line {line}: invalid price `{value}`")]
    InvalidPrice { line: usize, value: String },
    #[error("line {line}: no price given and no default price for {species} ({form})")]
    MissingPrice {
        line: usize,
        species: String,
        form: FishForm,
    },
    #[error("invalid price `{0}`")]
    InvalidProductPrice(String),
    #[error("invalid quantity `{0}`")]
    InvalidProductQuantity(String),
}

/// One row of the catch entry table.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct CatchLineForm {
    #[validate(length(max = SPECIES_MAX_LEN_VALIDATOR))]
    pub species: String,
    pub form: String,
    pub quantity_kg: String,
    /// Price per kg; blank means "use the default price".
    #[serde(default)]
    pub price: Option<String>,
}

/// Catch entry form. Lines are posted as `lines[0][species]=...` and decoded
/// with `serde_qs`.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct RecordCatchForm {
    pub caught_on: String,
    #[validate(length(max = NOTES_MAX_LEN_VALIDATOR))]
    pub notes: Option<String>,
    #[validate(length(max = MAX_LINES_VALIDATOR), nested)]
    #[serde(default)]
    pub lines: Vec<CatchLineForm>,
}

impl RecordCatchForm {
    /// Build the catch payload, filling missing prices from `defaults`.
    ///
    /// Completely blank rows are skipped so the form can offer spare rows.
    pub fn into_new_catch(
        self,
        hub_id: i32,
        fisherman_id: i32,
        defaults: &[DefaultPrice],
    ) -> CatchFormResult<NewCatch> {
        self.validate()?;

        let caught_on = NaiveDate::parse_from_str(self.caught_on.trim(), "%Y-%m-%d")
            .map_err(|_| CatchFormError::InvalidDate(self.caught_on.clone()))?;

        let mut new_catch = NewCatch::new(hub_id, fisherman_id, caught_on);
        if let Some(notes) = optional_multiline(self.notes.as_deref()) {
            new_catch = new_catch.with_notes(notes);
        }

        for (index, line) in self.lines.into_iter().enumerate() {
            let line_number = index + 1;

            let species = sanitize_inline_text(&line.species);
            let quantity_raw = line.quantity_kg.trim();
            let price_raw = line.price.as_deref().unwrap_or("").trim();

            if species.is_empty() && quantity_raw.is_empty() && price_raw.is_empty() {
                continue;
            }

            if species.is_empty() {
                return Err(CatchFormError::EmptySpecies { line: line_number });
            }

            let form: FishForm =
                line.form
                    .parse()
                    .map_err(|_| CatchFormError::UnknownForm {
                        line: line_number,
                        value: line.form.clone(),
                    })?;

            let quantity_grams = parse_grams(quantity_raw)
                .filter(|grams| *grams > 0)
                .ok_or_else(|| CatchFormError::InvalidQuantity {
                    line: line_number,
                    value: quantity_raw.to_string(),
                })?;

            let price_cents = if price_raw.is_empty() {
                find_default_price(defaults, &species, form)
                    .map(|price| price.price_cents)
                    .ok_or_else(|| CatchFormError::MissingPrice {
                        line: line_number,
                        species: species.clone(),
                        form,
                    })?
            } else {
                parse_cents(price_raw).ok_or_else(|| CatchFormError::InvalidPrice {
                    line: line_number,
                    value: price_raw.to_string(),
                })?
            };

            new_catch = new_catch.with_line(NewCatchLine {
                species,
                form,
                price_cents,
                quantity_grams,
            });
        }

        if new_catch.lines.is_empty() {
            return Err(CatchFormError::NoLines);
        }

        Ok(new_catch)
    }
}

/// Inline edit of a product's price and remaining stock.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EditProductForm {
    pub product_id: i32,
    pub price: Option<String>,
    pub quantity_kg: Option<String>,
}

impl EditProductForm {
    pub fn into_update_product(self) -> CatchFormResult<UpdateProduct> {
        let mut updates = UpdateProduct::new();

        if let Some(price) = self.price.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let cents = parse_cents(price)
                .ok_or_else(|| CatchFormError::InvalidProductPrice(price.to_string()))?;
            updates = updates.price_cents(cents);
        }

        if let Some(quantity) = self
            .quantity_kg
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            let grams = parse_grams(quantity)
                .ok_or_else(|| CatchFormError::InvalidProductQuantity(quantity.to_string()))?;
            updates = updates.available_grams(grams);
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn default_price(species: &str, form: FishForm, price_cents: i32) -> DefaultPrice {
        let ts = NaiveDateTime::parse_from_str("2025-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("timestamp");
        DefaultPrice {
            id: 1,
            hub_id: 1,
            fisherman_id: 2,
            species: species.to_string(),
            form,
            price_cents,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn line(species: &str, form: &str, quantity: &str, price: Option<&str>) -> CatchLineForm {
        CatchLineForm {
            species: species.to_string(),
            form: form.to_string(),
            quantity_kg: quantity.to_string(),
            price: price.map(str::to_string),
        }
    }

    #[test]
    fn decodes_nested_lines_with_serde_qs() {
        let body = "caught_on=2025-05-01&notes=Morning&lines[0][species]=Pike&lines[0][form]=whole\
                    &lines[0][quantity_kg]=3.5&lines[0][price]=12";
        let form: RecordCatchForm = serde_qs::from_str(body).expect("form parses");

        let catch = form.into_new_catch(1, 2, &[]).expect("valid catch");

        assert_eq!(catch.caught_on, NaiveDate::from_ymd_opt(2025, 5, 1).expect("date"));
        assert_eq!(catch.notes.as_deref(), Some("Morning"));
        assert_eq!(catch.lines.len(), 1);
        assert_eq!(catch.lines[0].quantity_grams, 3500);
        assert_eq!(catch.lines[0].price_cents, 1200);
    }

    #[test]
    fn missing_price_uses_default() {
        let form = RecordCatchForm {
            caught_on: "2025-05-01".to_string(),
            notes: None,
            lines: vec![line(" pike ", "fillet", "1", None), line("", "whole", "", Some(""))],
        };

        let catch = form
            .into_new_catch(1, 2, &[default_price("Pike", FishForm::Fillet, 1800)])
            .expect("valid catch");

        assert_eq!(catch.lines.len(), 1);
        assert_eq!(catch.lines[0].species, "pike");
        assert_eq!(catch.lines[0].price_cents, 1800);
    }

    #[test]
    fn missing_price_without_default_is_rejected() {
        let form = RecordCatchForm {
            caught_on: "2025-05-01".to_string(),
            notes: None,
            lines: vec![line("Perch", "whole", "2", None)],
        };

        let result = form.into_new_catch(1, 2, &[default_price("Pike", FishForm::Whole, 900)]);

        assert!(matches!(
            result,
            Err(CatchFormError::MissingPrice { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_bad_rows() {
        let no_lines = RecordCatchForm {
            caught_on: "2025-05-01".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            no_lines.into_new_catch(1, 2, &[]),
            Err(CatchFormError::NoLines)
        ));

        let bad_date = RecordCatchForm {
            caught_on: "01.05.2025".to_string(),
            lines: vec![line("Pike", "whole", "1", Some("10"))],
            ..Default::default()
        };
        assert!(matches!(
            bad_date.into_new_catch(1, 2, &[]),
            Err(CatchFormError::InvalidDate(_))
        ));

        let bad_form = RecordCatchForm {
            caught_on: "2025-05-01".to_string(),
            lines: vec![line("Pike", "canned", "1", Some("10"))],
            ..Default::default()
        };
        assert!(matches!(
            bad_form.into_new_catch(1, 2, &[]),
            Err(CatchFormError::UnknownForm { line: 1, .. })
        ));

        let zero_quantity = RecordCatchForm {
            caught_on: "2025-05-01".to_string(),
            lines: vec![line("Pike", "whole", "0", Some("10"))],
            ..Default::default()
        };
        assert!(matches!(
            zero_quantity.into_new_catch(1, 2, &[]),
            Err(CatchFormError::InvalidQuantity { line: 1, .. })
        ));
    }

    #[test]
    fn edit_form_only_sets_given_fields() {
        let form = EditProductForm {
            product_id: 5,
            price: Some("15,50".to_string()),
            quantity_kg: Some(" ".to_string()),
        };

        let updates = form.into_update_product().expect("valid edit");

        assert_eq!(updates.price_cents, Some(1550));
        assert_eq!(updates.available_grams, None);
    }
}
