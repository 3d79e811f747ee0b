//! Named stores and their entries.
//!
//! A [`Store`] is a cheap handle (database + name). Opening a store only
//! registers its name; entries are written in bulk by the precache step
//! and read by the shell strategy.

use super::connection::StoreDb;
use crate::{Error, InterceptedRequest, Response};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Handle to one named store.
#[derive(Clone, Debug)]
pub struct Store {
    db: StoreDb,
    name: String,
}

/// A request/response pair to be written into a store.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    pub request: InterceptedRequest,
    pub response: Response,
}

/// Summary row for a store on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StoreInfo {
    pub name: String,
    pub created_at: String,
    pub entries: u64,
}

impl StoreDb {
    /// Open (or create) the store with the given name.
    ///
    /// Idempotent: opening the same name twice yields handles over the
    /// same logical store and keeps its original creation time.
    pub async fn open_store(&self, name: &str) -> Result<Store, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("store name cannot be empty".into()));
        }

        let owned = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO stores (name, created_at) VALUES (?1, ?2)",
                    params![owned, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(Store { db: self.clone(), name: name.to_string() })
    }

    /// Whether a store with this name exists.
    pub async fn has_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM stores WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// List every store with its entry count, oldest first.
    pub async fn list_stores(&self) -> Result<Vec<StoreInfo>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<StoreInfo>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT s.name, s.created_at, COUNT(e.key_hash)
                     FROM stores s LEFT JOIN entries e ON e.store_name = s.name
                     GROUP BY s.name, s.created_at
                     ORDER BY s.created_at ASC, s.name ASC",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok(StoreInfo { name: row.get(0)?, created_at: row.get(1)?, entries: row.get::<_, i64>(2)? as u64 })
                })?;

                let mut stores = Vec::new();
                for row in rows {
                    stores.push(row?);
                }
                Ok(stores)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a store and all of its entries.
    ///
    /// Returns false if no store had that name.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every store except `keep`.
    ///
    /// Returns the number of stores removed.
    pub async fn delete_stores_except(&self, keep: &str) -> Result<u64, Error> {
        let keep = keep.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name <> ?1", params![keep])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}

impl Store {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the stored response for a request.
    ///
    /// `None` is a normal outcome, not an error.
    pub async fn lookup(&self, request: &InterceptedRequest) -> Result<Option<Response>, Error> {
        let name = self.name.clone();
        let key = request.store_key();
        self.db
            .conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, headers_json, body FROM entries WHERE store_name = ?1 AND key_hash = ?2",
                )?;

                let result = stmt.query_row(params![name, key], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, Vec<u8>>(2)?))
                });

                match result {
                    Ok((status, headers_json, body)) => {
                        let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)?;
                        let status = u16::try_from(status)
                            .map_err(|_| Error::Serialization(format!("stored status out of range: {status}")))?;
                        Ok(Some(Response::new(status, headers, body)))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Write a batch of entries in one transaction.
    ///
    /// Either every entry is committed or none is. Existing entries with
    /// the same request identity are replaced (last writer wins).
    pub async fn put_all(&self, entries: Vec<StoreEntry>) -> Result<usize, Error> {
        let name = self.name.clone();
        let now = chrono::Utc::now().to_rfc3339();

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let headers_json = serde_json::to_string(&entry.response.headers)?;
            rows.push((
                entry.request.store_key(),
                entry.request.method().to_string(),
                entry.request.url().to_string(),
                entry.response.status as i64,
                headers_json,
                entry.response.body.to_vec(),
            ));
        }

        self.db
            .conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO entries (store_name, key_hash, method, url, status, headers_json, body, stored_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                         ON CONFLICT(store_name, key_hash) DO UPDATE SET
                            method = excluded.method,
                            url = excluded.url,
                            status = excluded.status,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            stored_at = excluded.stored_at",
                    )?;
                    for (key, method, url, status, headers_json, body) in &rows {
                        stmt.execute(params![name, key, method, url, status, headers_json, body, now])?;
                    }
                }
                tx.commit()?;
                Ok(rows.len())
            })
            .await
            .map_err(Error::from)
    }

    /// Write a single entry.
    pub async fn put(&self, entry: StoreEntry) -> Result<(), Error> {
        self.put_all(vec![entry]).await.map(|_| ())
    }

    /// Number of entries in this store.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        let name = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE store_name = ?1", params![name], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// URLs of every stored entry, sorted.
    pub async fn urls(&self) -> Result<Vec<String>, Error> {
        let name = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE store_name = ?1 ORDER BY url ASC")?;
                let rows = stmt.query_map(params![name], |row| row.get::<_, String>(0))?;

                let mut urls = Vec::new();
                for row in rows {
                    urls.push(row?);
                }
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }
}
