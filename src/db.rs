use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{MemberProfile, RawPerformanceRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let members = vec![
        (
            Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?,
            "Priya Shah",
            "priya.shah@example.com",
            "Ahmedabad Elite",
            "Gujarat",
            NaiveDate::from_ymd_opt(2025, 1, 1).context("invalid date")?,
        ),
        (
            Uuid::parse_str("0c22f1f1-9184-4fd4-9b21-28c68a6a89dc")?,
            "Rahul Mehta",
            "rahul.mehta@example.com",
            "Ahmedabad Elite",
            "Gujarat",
            NaiveDate::from_ymd_opt(2025, 5, 14).context("invalid date")?,
        ),
        (
            Uuid::parse_str("d5a0a1a2-2a3c-44c2-8f73-60b7897a9dd2")?,
            "Neha Joshi",
            "neha.joshi@example.com",
            "Surat Titans",
            "Gujarat",
            NaiveDate::from_ymd_opt(2024, 11, 6).context("invalid date")?,
        ),
    ];

    for (id, name, email, chapter, region, join_date) in members {
        sqlx::query(
            r#"
            INSERT INTO member_scoring.members (id, full_name, email, chapter, region, join_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                chapter = EXCLUDED.chapter,
                region = EXCLUDED.region,
                join_date = EXCLUDED.join_date
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(chapter)
        .bind(region)
        .bind(join_date)
        .execute(pool)
        .await?;
    }

    // p, a, l, m, s, rgi, rgo, v, tyfcb, t, targeted_date
    let records = vec![
        (
            "seed-rec-001",
            "priya.shah@example.com",
            ["24", "0", "0", "0", "2", "9", "6", "8", "600000", "1"],
            "2025-07-02",
        ),
        (
            "seed-rec-002",
            "priya.shah@example.com",
            ["3", "1", "0", "0", "0", "4", "1", "2", "250000", "0"],
            "2025-06-04",
        ),
        (
            "seed-rec-003",
            "rahul.mehta@example.com",
            ["6", "2", "1", "0", "0", "3", "0", "1", "1,250,000", "2"],
            "2025-07-02",
        ),
        (
            "seed-rec-004",
            "neha.joshi@example.com",
            ["21", "1", "0", "1", "3", "20", "14", "19", "2450000.00", "3"],
            "2025-07-02",
        ),
    ];

    for (source_key, email, cells, targeted_date) in records {
        let member_id = member_id_for(pool, email).await?;
        let [p, a, l, m, s, rgi, rgo, v, tyfcb, t] = cells;

        sqlx::query(
            r#"
            INSERT INTO member_scoring.performance_records
            (id, member_id, p, a, l, m, s, rgi, rgo, v, tyfcb, t, targeted_date, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(member_id)
        .bind(p)
        .bind(a)
        .bind(l)
        .bind(m)
        .bind(s)
        .bind(rgi)
        .bind(rgo)
        .bind(v)
        .bind(tyfcb)
        .bind(t)
        .bind(targeted_date)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    let events = vec![
        ("seed-evt-001", "priya.shah@example.com", "MSP", "Training", (2025, 2, 12)),
        ("seed-evt-002", "priya.shah@example.com", "Presentation Skills", "Training", (2025, 5, 21)),
        ("seed-evt-003", "priya.shah@example.com", "Chapter Social", "Networking", (2025, 6, 18)),
        ("seed-evt-004", "rahul.mehta@example.com", "MSP", "Training", (2025, 6, 11)),
        ("seed-evt-005", "neha.joshi@example.com", "MSP", "Training", (2024, 12, 4)),
        ("seed-evt-006", "neha.joshi@example.com", "Referral Skills", "training", (2025, 3, 19)),
        ("seed-evt-007", "neha.joshi@example.com", "Leadership", "TRAINING", (2025, 6, 25)),
    ];

    for (source_key, email, name, event_type, (year, month, day)) in events {
        let member_id = member_id_for(pool, email).await?;
        let event_date = NaiveDate::from_ymd_opt(year, month, day).context("invalid date")?;

        sqlx::query(
            r#"
            INSERT INTO member_scoring.events
            (id, member_id, name, event_type, event_date, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(member_id)
        .bind(name)
        .bind(event_type)
        .bind(event_date)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn member_id_for(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    let row = sqlx::query("SELECT id FROM member_scoring.members WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .with_context(|| format!("no member with email {email}"))?;
    Ok(row.get("id"))
}

pub async fn fetch_member_by_email(
    pool: &PgPool,
    email: &str,
) -> anyhow::Result<Option<MemberProfile>> {
    let row = sqlx::query(
        "SELECT id, full_name, email, chapter, region, join_date \
         FROM member_scoring.members WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| MemberProfile {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        chapter: row.get("chapter"),
        region: row.get("region"),
        join_date: row.get("join_date"),
    }))
}

pub async fn fetch_performance_records(
    pool: &PgPool,
    member_id: Uuid,
) -> anyhow::Result<Vec<RawPerformanceRecord>> {
    let rows = sqlx::query(
        "SELECT member_id, p, a, l, m, s, rgi, rgo, rri, rro, v, one_to_one, tyfcb, ceu, t, \
         targeted_date \
         FROM member_scoring.performance_records \
         WHERE member_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    let mut records = Vec::new();

    for row in rows {
        records.push(RawPerformanceRecord {
            member_id: row.get("member_id"),
            present: row.get("p"),
            absent: row.get("a"),
            late: row.get("l"),
            medical: row.get("m"),
            substitute: row.get("s"),
            referrals_given_inside: row.get("rgi"),
            referrals_given_outside: row.get("rgo"),
            referrals_received_inside: row.get("rri"),
            referrals_received_outside: row.get("rro"),
            visitors: row.get("v"),
            one_to_ones: row.get("one_to_one"),
            tyfcb: row.get("tyfcb"),
            ceu: row.get("ceu"),
            testimonials: row.get("t"),
            targeted_date: row.get("targeted_date"),
        });
    }

    Ok(records)
}

/// Training events with `start <= event_date <= end`.
pub async fn count_training_events(
    pool: &PgPool,
    member_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<u32> {
    let count: i64 = sqlx::query(
        "SELECT COUNT(*) AS training_count \
         FROM member_scoring.events \
         WHERE member_id = $1 \
         AND lower(event_type) = 'training' \
         AND event_date BETWEEN $2 AND $3",
    )
    .bind(member_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?
    .get("training_count");

    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
