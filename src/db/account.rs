use rusqlite::{Connection, OptionalExtension, Result, params};

#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub created_at: i64,
}

pub fn create_account(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    email_confirmed: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts (email, password_hash, email_confirmed, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![email, password_hash, email_confirmed, super::now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_account(conn: &Connection, email: &str) -> Result<Option<AccountRow>> {
    conn.query_row(
        "SELECT id, email, password_hash, email_confirmed, created_at
         FROM accounts WHERE email = ?1",
        [email],
        |row| {
            Ok(AccountRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
                email_confirmed: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}

pub fn account_exists(conn: &Connection, email: &str) -> Result<bool> {
    conn.query_row("SELECT 1 FROM accounts WHERE email = ?1", [email], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

/// Returns false when no account has this email.
pub fn set_confirmed(conn: &Connection, email: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE accounts SET email_confirmed = 1 WHERE email = ?1",
        [email],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get_account() {
        let conn = conn();
        let id = create_account(&conn, "ana@escola.br", "hash", false).unwrap();
        assert_eq!(id, 1);

        let account = get_account(&conn, "ana@escola.br").unwrap().unwrap();
        assert_eq!(account.id, 1);
        assert_eq!(account.password_hash, "hash");
        assert!(!account.email_confirmed);
        assert!(account.created_at > 0);
    }

    #[test]
    fn test_missing_account_is_none() {
        let conn = conn();
        assert!(get_account(&conn, "nobody@escola.br").unwrap().is_none());
        assert!(!account_exists(&conn, "nobody@escola.br").unwrap());
    }

    #[test]
    fn test_email_is_unique() {
        let conn = conn();
        create_account(&conn, "ana@escola.br", "hash", true).unwrap();
        assert!(create_account(&conn, "ana@escola.br", "other", true).is_err());
    }

    #[test]
    fn test_set_confirmed() {
        let conn = conn();
        create_account(&conn, "ana@escola.br", "hash", false).unwrap();
        assert!(set_confirmed(&conn, "ana@escola.br").unwrap());
        assert!(get_account(&conn, "ana@escola.br").unwrap().unwrap().email_confirmed);
        assert!(!set_confirmed(&conn, "bia@escola.br").unwrap());
    }
}
