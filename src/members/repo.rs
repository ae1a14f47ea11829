use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::members::repo_types::{Member, NewMember};

/// Store holding member submissions.
#[async_trait]
pub trait MemberSource: Send + Sync {
    /// All members, newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Member>>;
    async fn insert(&self, member: NewMember) -> anyhow::Result<Member>;
}

#[derive(Clone)]
pub struct PgMemberSource {
    db: PgPool,
}

impl PgMemberSource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberSource for PgMemberSource {
    async fn list_all(&self) -> anyhow::Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, full_name, email, phone, experience, years_playing, created_at
            FROM members
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list members")?;
        Ok(rows)
    }

    async fn insert(&self, member: NewMember) -> anyhow::Result<Member> {
        let row = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (full_name, email, phone, experience, years_playing)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, email, phone, experience, years_playing, created_at
            "#,
        )
        .bind(&member.full_name)
        .bind(&member.email)
        .bind(member.phone.as_deref()) // None → NULL
        .bind(member.experience.as_str())
        .bind(member.years_playing.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert member")?;
        Ok(row)
    }
}

/// Record source kept in memory; backs `AppState::fake()`.
#[derive(Default)]
pub struct InMemoryMemberSource {
    rows: Mutex<Vec<Member>>,
    fail_reads: bool,
}

impl InMemoryMemberSource {
    pub fn with_members(rows: Vec<Member>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_reads: false,
        }
    }

    /// A source whose reads always fail, as an unreachable backend would.
    pub fn unreachable() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_reads: true,
        }
    }
}

#[async_trait]
impl MemberSource for InMemoryMemberSource {
    async fn list_all(&self) -> anyhow::Result<Vec<Member>> {
        if self.fail_reads {
            anyhow::bail!("record source unreachable");
        }
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("member store poisoned"))?;
        let mut out = rows.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn insert(&self, member: NewMember) -> anyhow::Result<Member> {
        let row = Member {
            id: Uuid::new_v4(),
            full_name: member.full_name,
            email: member.email,
            phone: member.phone,
            experience: member.experience.as_str().to_string(),
            years_playing: member.years_playing.as_str().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("member store poisoned"))?
            .push(row.clone());
        Ok(row)
    }
}
