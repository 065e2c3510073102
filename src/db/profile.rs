use crate::models::{Role, Stats};
use crate::store::Profile;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Result, params};

impl ToSql for Role {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Role::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown role '{}'", s).into()))
    }
}

pub fn create_profile(conn: &Connection, email: &str, name: &str, role: Role) -> Result<()> {
    let now = super::now();
    conn.execute(
        "INSERT INTO profiles (email, name, role, correct_count, incorrect_count, solved_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, 0, 0, 0, ?4, ?4)",
        params![email, name, role, now],
    )?;
    Ok(())
}

/// Loads a profile together with its account's confirmation flag.
pub fn get_profile(conn: &Connection, email: &str) -> Result<Option<Profile>> {
    conn.query_row(
        "SELECT p.email, p.name, p.role, p.correct_count, p.incorrect_count, p.solved_count,
                COALESCE(a.email_confirmed, 0)
         FROM profiles p LEFT JOIN accounts a ON a.email = p.email
         WHERE p.email = ?1",
        [email],
        |row| {
            Ok(Profile {
                email: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                stats: Stats {
                    correct: row.get(3)?,
                    incorrect: row.get(4)?,
                    solved: row.get(5)?,
                },
                email_confirmed: row.get(6)?,
            })
        },
    )
    .optional()
}

/// Returns false when no profile has this email.
pub fn update_stats(conn: &Connection, email: &str, stats: &Stats) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE profiles
         SET correct_count = ?1, incorrect_count = ?2, solved_count = ?3, updated_at = ?4
         WHERE email = ?5",
        params![stats.correct, stats.incorrect, stats.solved, super::now(), email],
    )?;
    Ok(changed > 0)
}
