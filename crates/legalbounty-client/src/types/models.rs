/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Canonical user record and profile enums
[POS]:    Data layer - identity types shared by auth and session
[UPDATE]: When the user schema or role set changes
*/

use serde::{Deserialize, Serialize};

/// Platform role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ngo,
    Donor,
    Lawyer,
    Admin,
}

/// Canonical user record.
///
/// The wire format is camelCase; legacy snake_case field names are accepted
/// on deserialization so older API payloads still map onto this one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(default, alias = "profile_image_url", skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, alias = "is_verified", skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, alias = "wallet_address", skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// Partial update of the mutable profile fields.
///
/// `Some` overwrites the corresponding field, `None` leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, alias = "first_name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, alias = "profile_image_url", skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl UserUpdate {
    /// Merge this partial into an existing user record
    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(profile_image_url) = &self.profile_image_url {
            user.profile_image_url = Some(profile_image_url.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(organization) = &self.organization {
            user.organization = Some(organization.clone());
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.profile_image_url.is_none()
            && self.bio.is_none()
            && self.organization.is_none()
            && self.location.is_none()
    }
}
