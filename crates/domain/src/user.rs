use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ReadError;

#[allow(async_fn_in_trait)]
pub trait ProfileRepository {
    async fn read_profile(&self) -> Result<Profile, ReadError>;
}

#[derive(
    Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    FEMALE,
    MALE,
}

impl TryFrom<&str> for Gender {
    type Error = GenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::FEMALE),
            "male" => Ok(Gender::MALE),
            _ => Err(GenderError::Invalid),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Gender::FEMALE => "female",
                Gender::MALE => "male",
            }
        )
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GenderError {
    #[error("Gender must be \"female\" or \"male\"")]
    Invalid,
}

/// The part of a user's profile which strength classification depends on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Option<Gender>,
    #[serde(rename = "weight_kg")]
    pub body_weight: Option<f32>,
}

impl Profile {
    /// Gender and bodyweight, or `None` if the profile cannot be used for classification.
    #[must_use]
    pub fn classification_input(&self) -> Option<(Gender, f32)> {
        let body_weight = self
            .body_weight
            .filter(|body_weight| body_weight.is_finite() && *body_weight > 0.0)?;
        Some((self.gender?, body_weight))
    }
}
