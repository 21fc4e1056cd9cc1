// src/auth/codes.rs
use rusqlite::Connection;

use crate::auth::token::{generate_key_default, generate_token_default, hash_token};
use crate::db::codes as db_codes;
use crate::db::codes::CodeRow;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct AuthCodeConfig {
    /// TTL for issued codes in seconds.
    pub ttl_secs: i64,
    /// Public base the authorization URL is built on.
    /// Example: "http://localhost:3000"
    pub public_base: String,
    /// Relative path of the authorization exchange.
    pub authorize_path: String,
}

impl Default for AuthCodeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24,
            public_base: "http://localhost:3000".to_string(),
            authorize_path: "/authorize".to_string(),
        }
    }
}

/// A freshly issued one-time authorization. The URL token and the key are
/// handed out exactly once, here; only their hashes survive.
#[derive(Debug, Clone)]
pub struct IssuedAuthCode {
    pub id: i64,
    /// Full URL like "http://host/authorize?code=...".
    pub url: String,
    /// Short key ("clave") the person on the other end has to type in.
    pub key: String,
    pub expires_at: i64,
}

/// Issues and redeems the one-time authorization URLs used for restricted
/// actions. A redemption needs both halves: the token carried by the URL
/// and the key communicated out of band, compared uppercase.
#[derive(Clone)]
pub struct AuthCodeService {
    cfg: AuthCodeConfig,
}

impl AuthCodeService {
    pub fn new(cfg: AuthCodeConfig) -> Self {
        Self { cfg }
    }

    fn build_url(&self, token: &str) -> String {
        format!(
            "{}{}?code={}",
            self.cfg.public_base.trim_end_matches('/'),
            self.cfg.authorize_path,
            token
        )
    }

    /// Issue a new code:
    /// - generate URL token + short key
    /// - store hashes only, with TTL
    /// - hand the raw values back for one-time display
    pub fn issue(&self, conn: &Connection, now: i64) -> Result<IssuedAuthCode, ServerError> {
        let token = generate_token_default();
        let key = generate_key_default();
        let expires_at = now + self.cfg.ttl_secs;

        let id = db_codes::insert_code(
            conn,
            &hash_token(&token),
            &hash_token(&key),
            now,
            expires_at,
        )?;

        Ok(IssuedAuthCode {
            id,
            url: self.build_url(&token),
            key,
            expires_at,
        })
    }

    /// Outstanding codes for the operator overview.
    pub fn outstanding(&self, conn: &Connection, now: i64) -> Result<Vec<CodeRow>, ServerError> {
        db_codes::list_outstanding(conn, now)
    }

    /// Redeem a code:
    /// - uppercase the typed key (people type claves however they like)
    /// - consume transactionally, single-use
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        key: &str,
        now: i64,
    ) -> Result<i64, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing code".into()));
        }

        let key = key.trim().to_uppercase();
        if key.is_empty() {
            return Err(ServerError::BadRequest("missing key".into()));
        }

        let Some(id) = db_codes::consume_code(conn, &hash_token(token), &hash_token(&key), now)?
        else {
            return Err(ServerError::Unauthorized("invalid or expired code".into()));
        };

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../../sql/schema.sql");

    fn mem_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    fn svc() -> AuthCodeService {
        AuthCodeService::new(AuthCodeConfig {
            ttl_secs: 60, // keep short for tests
            public_base: "http://backoffice.test".to_string(),
            authorize_path: "/authorize".to_string(),
        })
    }

    fn token_of(issued: &IssuedAuthCode) -> &str {
        issued.url.split("?code=").nth(1).unwrap()
    }

    #[test]
    fn issue_builds_url_and_stores_only_hashes() {
        let conn = mem_conn();
        let issued = svc().issue(&conn, 1000).unwrap();

        assert!(issued.url.starts_with("http://backoffice.test/authorize?code="));
        assert_eq!(issued.expires_at, 1060);

        let (token_hash, key_hash): (Vec<u8>, Vec<u8>) = conn
            .query_row(
                "select token_hash, key_hash from authorization_codes where id = ?",
                [issued.id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();

        assert_eq!(token_hash.as_slice(), hash_token(token_of(&issued)).as_slice());
        assert_eq!(key_hash.as_slice(), hash_token(&issued.key).as_slice());
    }

    #[test]
    fn redeem_succeeds_once_then_fails() {
        let mut conn = mem_conn();
        let service = svc();
        let issued = service.issue(&conn, 1000).unwrap();

        let id = service
            .redeem(&mut conn, token_of(&issued), &issued.key, 1001)
            .unwrap();
        assert_eq!(id, issued.id);

        let second = service.redeem(&mut conn, token_of(&issued), &issued.key, 1002);
        match second {
            Err(ServerError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got: {:?}", other),
        }
    }

    #[test]
    fn redeem_accepts_lowercase_key_entry() {
        let mut conn = mem_conn();
        let service = svc();
        let issued = service.issue(&conn, 1000).unwrap();

        let typed = issued.key.to_lowercase();
        assert!(service.redeem(&mut conn, token_of(&issued), &typed, 1001).is_ok());
    }

    #[test]
    fn wrong_key_rejects_without_burning_the_code() {
        let mut conn = mem_conn();
        let service = svc();
        let issued = service.issue(&conn, 1000).unwrap();

        let wrong = service.redeem(&mut conn, token_of(&issued), "WRONGKEY", 1001);
        match wrong {
            Err(ServerError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got: {:?}", other),
        }

        // Still redeemable with the right key.
        assert!(service
            .redeem(&mut conn, token_of(&issued), &issued.key, 1002)
            .is_ok());
    }

    #[test]
    fn redeem_fails_if_expired() {
        let mut conn = mem_conn();
        let service = AuthCodeService::new(AuthCodeConfig {
            ttl_secs: 1,
            ..AuthCodeConfig::default()
        });

        let issued = service.issue(&conn, 1000).unwrap();

        // expires_at = 1001, consume requires expires_at > now
        let res = service.redeem(&mut conn, token_of(&issued), &issued.key, 1001);
        match res {
            Err(ServerError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got: {:?}", other),
        }
    }

    #[test]
    fn redeem_rejects_missing_pieces() {
        let mut conn = mem_conn();
        let service = svc();

        match service.redeem(&mut conn, "   ", "KEY", 1000) {
            Err(ServerError::BadRequest(_)) => {}
            other => panic!("expected BadRequest, got: {:?}", other),
        }
        match service.redeem(&mut conn, "token", "  ", 1000) {
            Err(ServerError::BadRequest(_)) => {}
            other => panic!("expected BadRequest, got: {:?}", other),
        }
    }

    #[test]
    fn outstanding_hides_used_and_expired() {
        let mut conn = mem_conn();
        let service = svc();

        let a = service.issue(&conn, 1000).unwrap();
        let _b = service.issue(&conn, 1000).unwrap();

        service
            .redeem(&mut conn, token_of(&a), &a.key, 1001)
            .unwrap();

        let rows = service.outstanding(&conn, 1001).unwrap();
        assert_eq!(rows.len(), 1);

        // Everything is expired far enough in the future.
        let rows = service.outstanding(&conn, 2000).unwrap();
        assert!(rows.is_empty());
    }
}
