use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{AccountType, Profile, ProfileRow, Sex};

const PROFILE_COLUMNS: &str = r#"
    id, email, password_hash, name, account_type, sex, age, weight_kg, height_cm,
    goal, budget_per_meal, dietary_restrictions, body, behavior, lifestyle,
    family_history, activity, medications, self_assessment, goal_details,
    license_number, specialization, created_at, updated_at
"#;

/// Find a profile by ID.
pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
    let row = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("select profile by id")?;
    row.map(Profile::try_from).transpose()
}

/// Find a profile by (lowercased) email.
pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
    let row = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(email)
        .fetch_optional(db)
        .await
        .context("select profile by email")?;
    row.map(Profile::try_from).transpose()
}

/// Insert a new profile.
pub async fn insert(db: &PgPool, p: &Profile) -> anyhow::Result<Profile> {
    let sql = format!(
        r#"
        INSERT INTO profiles ({PROFILE_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(p.id)
        .bind(&p.email)
        .bind(&p.password_hash)
        .bind(&p.name)
        .bind(p.account_type.as_str())
        .bind(p.sex.map(Sex::as_str))
        .bind(p.age)
        .bind(p.weight_kg)
        .bind(p.height_cm)
        .bind(&p.goal)
        .bind(p.budget_per_meal)
        .bind(&p.dietary_restrictions)
        .bind(Json(&p.body))
        .bind(Json(&p.behavior))
        .bind(Json(&p.lifestyle))
        .bind(Json(&p.family_history))
        .bind(Json(&p.activity))
        .bind(Json(&p.medications))
        .bind(Json(&p.self_assessment))
        .bind(Json(&p.goal_details))
        .bind(&p.license_number)
        .bind(&p.specialization)
        .bind(p.created_at)
        .bind(p.updated_at)
        .fetch_one(db)
        .await
        .context("insert profile")?;
    Profile::try_from(row)
}

/// Persist every mutable field of an existing profile.
pub async fn update(db: &PgPool, p: &Profile) -> anyhow::Result<Profile> {
    let sql = format!(
        r#"
        UPDATE profiles
           SET name = $2, sex = $3, age = $4, weight_kg = $5, height_cm = $6,
               goal = $7, budget_per_meal = $8, dietary_restrictions = $9,
               body = $10, behavior = $11, lifestyle = $12, family_history = $13,
               activity = $14, medications = $15, self_assessment = $16,
               goal_details = $17, license_number = $18, specialization = $19,
               updated_at = $20
         WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(p.id)
        .bind(&p.name)
        .bind(p.sex.map(Sex::as_str))
        .bind(p.age)
        .bind(p.weight_kg)
        .bind(p.height_cm)
        .bind(&p.goal)
        .bind(p.budget_per_meal)
        .bind(&p.dietary_restrictions)
        .bind(Json(&p.body))
        .bind(Json(&p.behavior))
        .bind(Json(&p.lifestyle))
        .bind(Json(&p.family_history))
        .bind(Json(&p.activity))
        .bind(Json(&p.medications))
        .bind(Json(&p.self_assessment))
        .bind(Json(&p.goal_details))
        .bind(&p.license_number)
        .bind(&p.specialization)
        .bind(p.updated_at)
        .fetch_one(db)
        .await
        .context("update profile")?;
    Profile::try_from(row)
}

pub async fn count_by_type(db: &PgPool, account_type: AccountType) -> anyhow::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE account_type = $1")
        .bind(account_type.as_str())
        .fetch_one(db)
        .await
        .context("count profiles")?;
    Ok(n)
}

/// True when `err` wraps a Postgres unique-constraint violation, e.g. a
/// registration racing another one for the same email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
