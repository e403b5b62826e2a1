use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::fisherman_profile::UpsertFishermanProfile;
use crate::domain::pricing::parse_cents;
use crate::domain::user::UpdateUser;
use crate::forms::{optional_inline, optional_multiline, sanitize_inline_text, sanitize_phone};

const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const PHONE_MAX_LEN: usize = 32;
const PHONE_MAX_LEN_VALIDATOR: u64 = PHONE_MAX_LEN as u64;

const URL_MAX_LEN: usize = 512;
const URL_MAX_LEN_VALIDATOR: u64 = URL_MAX_LEN as u64;

const NOTE_MAX_LEN: usize = 2048;
const NOTE_MAX_LEN_VALIDATOR: u64 = NOTE_MAX_LEN as u64;

pub type ProfileFormResult<T> = Result<T, ProfileFormError>;

#[derive(Debug, Error)]
pub enum ProfileFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("name cannot be empty")]
    EmptyName,
    #[error("avatar must be an http(s) URL")]
    InvalidAvatarUrl,
    #[error("invalid delivery fee `{0}`")]
    InvalidFee(String),
}

/// Customer's own profile details.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerProfileForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = PHONE_MAX_LEN_VALIDATOR))]
    pub phone: Option<String>,
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub avatar_url: Option<String>,
}

impl CustomerProfileForm {
    /// Every field is written: blank phone or avatar clears the stored value.
    pub fn into_update_user(self) -> ProfileFormResult<UpdateUser> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProfileFormError::EmptyName);
        }

        let phone = self
            .phone
            .as_deref()
            .map(sanitize_phone)
            .filter(|value| !value.is_empty());

        let avatar_url = optional_inline(self.avatar_url.as_deref());
        if let Some(url) = avatar_url.as_deref()
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            return Err(ProfileFormError::InvalidAvatarUrl);
        }

        Ok(UpdateUser {
            name: Some(name),
            phone: Some(phone),
            avatar_url: Some(avatar_url),
        })
    }
}

/// Fisherman's public shop details.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FishermanProfileForm {
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub pickup_address: Option<String>,
    pub delivery_fee: Option<String>,
    #[validate(length(max = PHONE_MAX_LEN_VALIDATOR))]
    pub public_phone: Option<String>,
    #[validate(length(max = NOTE_MAX_LEN_VALIDATOR))]
    pub homepage_note: Option<String>,
    /// HTML checkboxes are only posted when ticked.
    #[serde(default)]
    pub is_displayed: Option<String>,
}

impl FishermanProfileForm {
    pub fn into_upsert(
        self,
        hub_id: i32,
        user_id: i32,
    ) -> ProfileFormResult<UpsertFishermanProfile> {
        self.validate()?;

        let delivery_fee_cents = match self.delivery_fee.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => {
                parse_cents(raw).ok_or_else(|| ProfileFormError::InvalidFee(raw.to_string()))?
            }
        };

        let mut upsert = UpsertFishermanProfile::new(hub_id, user_id);
        upsert.pickup_address = optional_inline(self.pickup_address.as_deref());
        upsert.delivery_fee_cents = delivery_fee_cents;
        upsert.public_phone = self
            .public_phone
            .as_deref()
            .map(sanitize_phone)
            .filter(|value| !value.is_empty());
        upsert.homepage_note = optional_multiline(self.homepage_note.as_deref());
        upsert.is_displayed = self.is_displayed.is_some();

        Ok(upsert)
    }
}
