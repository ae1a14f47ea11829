use lazy_static::lazy_static;
use regex::Regex;

use crate::members::dto::CreateMemberRequest;
use crate::members::repo_types::{NewMember, SkillLevel, Tenure};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Validates a form submission and shapes it into an insert payload.
/// Missing selects fall back to the form's defaults.
pub fn new_member_from_request(req: CreateMemberRequest) -> Result<NewMember, String> {
    let first = req.first_name.trim();
    let last = req.last_name.trim();
    if first.is_empty() || last.is_empty() {
        return Err("First and last name are required".into());
    }

    let email = req.email.trim();
    if !is_valid_email(email) {
        return Err("Invalid email".into());
    }

    let experience = match req.experience.as_deref() {
        None => SkillLevel::default(),
        Some(s) => SkillLevel::parse(s).ok_or_else(|| format!("Unknown skill level: {s}"))?,
    };
    let years_playing = match req.years_playing.as_deref() {
        None => Tenure::default(),
        Some(s) => Tenure::parse(s).ok_or_else(|| format!("Unknown years at club: {s}"))?,
    };

    let phone = req
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    Ok(NewMember {
        full_name: format!("{} {}", first, last),
        email: email.to_string(),
        phone,
        experience,
        years_playing,
    })
}
