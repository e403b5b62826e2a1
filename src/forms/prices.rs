use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::{StringRecord, Trim};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::default_price::UpsertDefaultPrice;
use crate::domain::pricing::parse_cents;
use crate::domain::product::FishForm;
use crate::forms::sanitize_inline_text;

const SPECIES_MAX_LEN: usize = 64;
const SPECIES_MAX_LEN_VALIDATOR: u64 = SPECIES_MAX_LEN as u64;

pub type PriceFormResult<T> = Result<T, PriceFormError>;

#[derive(Debug, Error)]
pub enum PriceFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("species cannot be empty")]
    EmptySpecies,
    #[error("unknown form `{0}`")]
    UnknownForm(String),
    #[error("invalid price `{0}`")]
    InvalidPrice(String),
    #[error("upload is missing the required `species`, `form` or `price` headers")]
    MissingRequiredHeaders,
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
    #[error("upload contains no prices")]
    EmptyUpload,
    #[error("error reading csv file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertDefaultPriceForm {
    #[validate(length(min = 1, max = SPECIES_MAX_LEN_VALIDATOR))]
    pub species: String,
    pub form: String,
    pub price: String,
}

impl UpsertDefaultPriceForm {
    pub fn into_upsert(
        self,
        hub_id: i32,
        fisherman_id: i32,
    ) -> PriceFormResult<UpsertDefaultPrice> {
        self.validate()?;
        parse_price_row(&self.species, &self.form, &self.price)
            .map(|(species, form, cents)| {
                UpsertDefaultPrice::new(hub_id, fisherman_id, species, form, cents)
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteDefaultPriceForm {
    pub price_id: i32,
}

#[derive(MultipartForm)]
/// CSV upload with `species,form,price` columns.
pub struct UploadDefaultPricesForm {
    #[multipart(limit = "1MB")]
    pub csv: TempFile,
}

impl UploadDefaultPricesForm {
    pub fn into_upserts(
        &mut self,
        hub_id: i32,
        fisherman_id: i32,
    ) -> PriceFormResult<Vec<UpsertDefaultPrice>> {
        self.csv.file.rewind()?;
        parse_default_prices(self.csv.file.by_ref(), hub_id, fisherman_id)
    }
}

fn parse_price_row(
    species: &str,
    form: &str,
    price: &str,
) -> PriceFormResult<(String, FishForm, i32)> {
    let species = sanitize_inline_text(species);
    if species.is_empty() {
        return Err(PriceFormError::EmptySpecies);
    }

    let form: FishForm = form
        .parse()
        .map_err(|_| PriceFormError::UnknownForm(form.trim().to_string()))?;

    let cents = parse_cents(price)
        .ok_or_else(|| PriceFormError::InvalidPrice(price.trim().to_string()))?;

    Ok((species, form, cents))
}

fn locate_header(headers: &StringRecord, expected: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(expected))
}

fn parse_default_prices<R: Read>(
    reader: R,
    hub_id: i32,
    fisherman_id: i32,
) -> PriceFormResult<Vec<UpsertDefaultPrice>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let (Some(species_idx), Some(form_idx), Some(price_idx)) = (
        locate_header(&headers, "species"),
        locate_header(&headers, "form"),
        locate_header(&headers, "price"),
    ) else {
        return Err(PriceFormError::MissingRequiredHeaders);
    };

    let mut prices = Vec::new();

    for (index, row) in csv_reader.records().enumerate() {
        let row_number = index + 2; // header row
        let record = row?;

        let species = record.get(species_idx).unwrap_or("");
        let form = record.get(form_idx).unwrap_or("");
        let price = record.get(price_idx).unwrap_or("");

        if species.is_empty() && form.is_empty() && price.is_empty() {
            continue;
        }

        let (species, form, cents) =
            parse_price_row(species, form, price).map_err(|err| PriceFormError::InvalidRow {
                row: row_number,
                reason: err.to_string(),
            })?;

        prices.push(UpsertDefaultPrice::new(hub_id, fisherman_id, species, form, cents));
    }

    if prices.is_empty() {
        return Err(PriceFormError::EmptyUpload);
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    fn build_upload_form(csv: &str) -> UploadDefaultPricesForm {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        UploadDefaultPricesForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("prices.csv".to_string()),
                size: csv.len(),
            },
        }
    }

    #[test]
    fn single_price_form_converts() {
        let form = UpsertDefaultPriceForm {
            species: "  Zander ".to_string(),
            form: "Fillet".to_string(),
            price: "24,90".to_string(),
        };

        let upsert = form.into_upsert(1, 7).expect("valid price");

        assert_eq!(upsert.fisherman_id, 7);
        assert_eq!(upsert.species, "Zander");
        assert_eq!(upsert.form, FishForm::Fillet);
        assert_eq!(upsert.price_cents, 2490);
    }

    #[test]
    fn upload_reads_rows_with_case_insensitive_headers() {
        let mut form =
            build_upload_form("Species,FORM,Price\nPike,whole,9.50\n,,\nPerch,smoked,14\n");

        let prices = form.into_upserts(3, 7).expect("upload parses");

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].species, "Pike");
        assert_eq!(prices[0].price_cents, 950);
        assert_eq!(prices[1].form, FishForm::Smoked);
        assert_eq!(prices[1].hub_id, 3);
    }

    #[test]
    fn upload_reports_row_numbers() {
        let mut form = build_upload_form("species,form,price\nPike,whole,9\nPerch,canned,3\n");

        let result = form.into_upserts(1, 1);

        assert!(matches!(result, Err(PriceFormError::InvalidRow { row: 3, .. })));
    }

    #[test]
    fn upload_requires_headers_and_rows() {
        let mut missing = build_upload_form("name,price\nPike,9\n");
        assert!(matches!(
            missing.into_upserts(1, 1),
            Err(PriceFormError::MissingRequiredHeaders)
        ));

        let mut empty = build_upload_form("species,form,price\n");
        assert!(matches!(
            empty.into_upserts(1, 1),
            Err(PriceFormError::EmptyUpload)
        ));
    }
}
