use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Membership form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMemberRequest {
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default, alias = "yearsPlaying")]
    pub years_playing: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMemberResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub message: &'static str,
}

/// Choices offered by the form's select boxes.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub experience: Vec<&'static str>,
    pub years_playing: Vec<&'static str>,
}
