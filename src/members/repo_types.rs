use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Member row as stored by the record source.
///
/// `experience` and `years_playing` stay plain text so rows written by
/// other clients with values outside the form's choices still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience: String,
    pub years_playing: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert payload; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience: SkillLevel,
    pub years_playing: Tenure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Advanced,
    Elite,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [SkillLevel::Beginner, SkillLevel::Advanced, SkillLevel::Elite];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Elite => "Elite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lvl| lvl.as_str() == s)
    }
}

/// "Years at club" bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tenure {
    #[default]
    #[serde(rename = "0-1 years")]
    UpToOne,
    #[serde(rename = "2-5 years")]
    TwoToFive,
    #[serde(rename = "6-10 years")]
    SixToTen,
    #[serde(rename = "10+ years")]
    OverTen,
}

impl Tenure {
    pub const ALL: [Tenure; 4] = [
        Tenure::UpToOne,
        Tenure::TwoToFive,
        Tenure::SixToTen,
        Tenure::OverTen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tenure::UpToOne => "0-1 years",
            Tenure::TwoToFive => "2-5 years",
            Tenure::SixToTen => "6-10 years",
            Tenure::OverTen => "10+ years",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}
