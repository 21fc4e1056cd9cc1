use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::hashes_equal;
use crate::errors::ServerError;

/// Listing row for the operator's overview. No secrets: hashes never leave
/// the database and raw values were only ever shown at issuance.
#[derive(Debug, Clone)]
pub struct CodeRow {
    pub id: i64,
    pub created_at: i64,
    pub expires_at: i64,
}

pub fn insert_code(
    conn: &Connection,
    token_hash: &[u8],
    key_hash: &[u8],
    now: i64,
    expires_at: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into authorization_codes (token_hash, key_hash, created_at, expires_at)
        values (?1, ?2, ?3, ?4)
        "#,
        params![token_hash, key_hash, now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert authorization code failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Codes still worth showing: not consumed and not expired.
pub fn list_outstanding(conn: &Connection, now: i64) -> Result<Vec<CodeRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select id, created_at, expires_at
            from authorization_codes
            where used_at is null and expires_at > ?1
            order by id desc
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![now], |row| {
            Ok(CodeRow {
                id: row.get(0)?,
                created_at: row.get(1)?,
                expires_at: row.get(2)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// Transactional single-use consume. Returns the code id on success, `None`
/// for anything that must read as "invalid or expired" (unknown token,
/// wrong key, already used, past TTL). A wrong key does NOT burn the code.
pub fn consume_code(
    conn: &mut Connection,
    token_hash: &[u8],
    key_hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let row: Option<(i64, Vec<u8>)> = tx
        .query_row(
            r#"
            select id, key_hash
            from authorization_codes
            where token_hash = ?1 and used_at is null and expires_at > ?2
            "#,
            params![token_hash, now],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("authorization code lookup failed: {e}")))?;

    let Some((id, stored_key_hash)) = row else {
        return Ok(None);
    };

    if !hashes_equal(&stored_key_hash, key_hash) {
        return Ok(None);
    }

    tx.execute(
        "update authorization_codes set used_at = ?1 where id = ?2",
        params![now, id],
    )
    .map_err(|e| ServerError::DbError(format!("consume authorization code failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    Ok(Some(id))
}
