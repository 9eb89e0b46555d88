//! `DuckDB`-backed tribute store.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use duckdb::{Connection, params};
use memorial_victims_models::{NewVictim, Victim, VictimPatch};

use crate::VictimsError;

const COLUMNS: &str = "id, name, age, neighborhood, date, tribute, submitted_by, image, \
                       is_approved, created_at, updated_at";

/// A row as stored, before parsing dates and timestamps.
struct StoredRow {
    id: String,
    name: String,
    age: i64,
    neighborhood: String,
    date: String,
    tribute: String,
    submitted_by: String,
    image: Option<String>,
    is_approved: bool,
    created_at: String,
    updated_at: String,
}

impl StoredRow {
    fn from_row(row: &duckdb::Row<'_>) -> Result<Self, duckdb::Error> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            neighborhood: row.get(3)?,
            date: row.get(4)?,
            tribute: row.get(5)?,
            submitted_by: row.get(6)?,
            image: row.get(7)?,
            is_approved: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_victim(self) -> Result<Victim, VictimsError> {
        let corrupt = |message: String| VictimsError::Corrupt {
            id: self.id.clone(),
            message,
        };
        let age = u32::try_from(self.age).map_err(|e| corrupt(format!("age: {e}")))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| corrupt(format!("date: {e}")))?;
        let created_at = parse_timestamp(&self.created_at).map_err(&corrupt)?;
        let updated_at = parse_timestamp(&self.updated_at).map_err(&corrupt)?;

        Ok(Victim {
            id: self.id,
            name: self.name,
            age,
            neighborhood: self.neighborhood,
            date,
            tribute: self.tribute,
            submitted_by: self.submitted_by,
            image: self.image,
            is_approved: self.is_approved,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("timestamp {value:?}: {e}"))
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time at the precision the table stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn create_schema(conn: &Connection) -> Result<(), VictimsError> {
    conn.execute_batch(
        "CREATE SEQUENCE IF NOT EXISTS victims_seq START 1;
        CREATE TABLE IF NOT EXISTS victims (
            id TEXT PRIMARY KEY,
            seq BIGINT NOT NULL DEFAULT nextval('victims_seq'),
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            neighborhood TEXT NOT NULL,
            date TEXT NOT NULL,
            tribute TEXT NOT NULL,
            submitted_by TEXT NOT NULL,
            image TEXT,
            is_approved BOOLEAN NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;
    Ok(())
}

fn fetch(conn: &Connection, id: &str) -> Result<Victim, VictimsError> {
    let sql = format!("SELECT {COLUMNS} FROM victims WHERE id = ?");
    match conn.query_row(&sql, params![id], StoredRow::from_row) {
        Ok(row) => row.into_victim(),
        Err(duckdb::Error::QueryReturnedNoRows) => Err(VictimsError::NotFound {
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn insert(conn: &Connection, victim: &Victim) -> Result<(), VictimsError> {
    conn.execute(
        &format!("INSERT INTO victims ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
        params![
            victim.id,
            victim.name,
            i64::from(victim.age),
            victim.neighborhood,
            victim.date.format("%Y-%m-%d").to_string(),
            victim.tribute,
            victim.submitted_by,
            victim.image.as_deref(),
            victim.is_approved,
            format_timestamp(victim.created_at),
            format_timestamp(victim.updated_at),
        ],
    )?;
    Ok(())
}

/// Tribute store over one `DuckDB` connection.
pub struct VictimStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for VictimStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VictimStore").finish_non_exhaustive()
    }
}

impl VictimStore {
    /// Opens (or creates) the database at `path`, creating its parent
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the directory, connection or schema
    /// cannot be created.
    pub fn open(path: &Path) -> Result<Self, VictimsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("Opening victims database at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the connection or schema fails.
    pub fn open_in_memory() -> Result<Self, VictimsError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, VictimsError> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, VictimsError> {
        self.conn.lock().map_err(|_| VictimsError::LockPoisoned)
    }

    fn list_where(&self, filter: &str) -> Result<Vec<Victim>, VictimsError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {COLUMNS} FROM victims {filter} ORDER BY created_at DESC, seq DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], StoredRow::from_row)?;

        let mut victims = Vec::new();
        for row in rows {
            victims.push(row?.into_victim()?);
        }
        Ok(victims)
    }

    /// Approved tributes, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the query fails.
    pub fn list_approved(&self) -> Result<Vec<Victim>, VictimsError> {
        self.list_where("WHERE is_approved")
    }

    /// Every tribute, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the query fails.
    pub fn list_all(&self) -> Result<Vec<Victim>, VictimsError> {
        self.list_where("")
    }

    /// # Errors
    ///
    /// Returns [`VictimsError::NotFound`] if no tribute has this id.
    pub fn get(&self, id: &str) -> Result<Victim, VictimsError> {
        fetch(&*self.lock()?, id)
    }

    /// Stores a validated submission under a fresh UUID.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the insert fails.
    pub fn create(&self, new: &NewVictim, approved: bool) -> Result<Victim, VictimsError> {
        let timestamp = now();
        let victim = Victim {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.clone(),
            age: new.age,
            neighborhood: new.neighborhood.clone(),
            date: new.date,
            tribute: new.tribute.clone(),
            submitted_by: new.submitted_by.clone(),
            image: new.image.clone(),
            is_approved: approved,
            created_at: timestamp,
            updated_at: timestamp,
        };

        insert(&*self.lock()?, &victim)?;
        log::debug!("Stored tribute {} for {}", victim.id, victim.name);
        Ok(victim)
    }

    /// Applies `patch` and bumps `updated_at`. An empty patch returns the
    /// tribute unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError::NotFound`] if no tribute has this id.
    pub fn update(&self, id: &str, patch: &VictimPatch) -> Result<Victim, VictimsError> {
        let conn = self.lock()?;
        let mut victim = fetch(&conn, id)?;
        if patch.is_empty() {
            return Ok(victim);
        }

        patch.apply(&mut victim);
        victim.updated_at = now();

        conn.execute(
            "UPDATE victims SET name = ?, age = ?, neighborhood = ?, date = ?, tribute = ?,
                 submitted_by = ?, image = ?, is_approved = ?, updated_at = ?
             WHERE id = ?",
            params![
                victim.name,
                i64::from(victim.age),
                victim.neighborhood,
                victim.date.format("%Y-%m-%d").to_string(),
                victim.tribute,
                victim.submitted_by,
                victim.image.as_deref(),
                victim.is_approved,
                format_timestamp(victim.updated_at),
                victim.id,
            ],
        )?;
        Ok(victim)
    }

    /// # Errors
    ///
    /// Returns [`VictimsError::NotFound`] if no tribute has this id.
    pub fn delete(&self, id: &str) -> Result<(), VictimsError> {
        let removed = self
            .lock()?
            .execute("DELETE FROM victims WHERE id = ?", params![id])?;
        if removed == 0 {
            return Err(VictimsError::NotFound { id: id.to_string() });
        }
        log::info!("Removed tribute {id}");
        Ok(())
    }

    /// Number of stored tributes, approved or not.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the query fails.
    pub fn count(&self) -> Result<u64, VictimsError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM victims", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Inserts the seed tributes when the table is empty. Returns how many
    /// were inserted.
    ///
    /// # Errors
    ///
    /// Returns [`VictimsError`] if the count or an insert fails.
    pub fn seed_if_empty(&self) -> Result<usize, VictimsError> {
        if self.count()? > 0 {
            log::info!("Victims table already populated; skipping seed");
            return Ok(0);
        }

        let seeds = crate::seed::seed_victims();
        for victim in &seeds {
            self.create(victim, true)?;
        }
        log::info!("Seeded {} tributes", seeds.len());
        Ok(seeds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_victim(name: &str) -> NewVictim {
        NewVictim {
            name: name.to_string(),
            age: 30,
            neighborhood: "Brotas".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            tribute: "Sempre lembrado.".to_string(),
            submitted_by: "Vizinhos".to_string(),
            image: None,
        }
    }

    #[test]
    fn create_then_get() {
        let store = VictimStore::open_in_memory().unwrap();
        let created = store.create(&new_victim("Roberto"), true).unwrap();
        let fetched = store.get(&created.id).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn lists_only_approved_newest_first() {
        let store = VictimStore::open_in_memory().unwrap();
        store.create(&new_victim("first"), true).unwrap();
        store.create(&new_victim("hidden"), false).unwrap();
        store.create(&new_victim("second"), true).unwrap();

        let names: Vec<String> = store
            .list_approved()
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["second".to_string(), "first".to_string()]);
        assert_eq!(store.list_all().unwrap().len(), 3);
    }

    #[test]
    fn update_applies_patch() {
        let store = VictimStore::open_in_memory().unwrap();
        let created = store.create(&new_victim("Lucia"), false).unwrap();

        let patch = VictimPatch {
            tribute: Some("Professora da rede pública.".to_string()),
            is_approved: Some(true),
            ..VictimPatch::default()
        };
        let updated = store.update(&created.id, &patch).unwrap();

        assert_eq!(updated.tribute, "Professora da rede pública.");
        assert!(updated.is_approved);
        assert_eq!(updated.name, "Lucia");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn empty_patch_is_noop() {
        let store = VictimStore::open_in_memory().unwrap();
        let created = store.create(&new_victim("Ana"), true).unwrap();
        let same = store.update(&created.id, &VictimPatch::default()).unwrap();
        assert_eq!(created, same);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = VictimStore::open_in_memory().unwrap();

        assert!(matches!(store.get("nope"), Err(VictimsError::NotFound { .. })));
        assert!(matches!(
            store.update("nope", &VictimPatch::default()),
            Err(VictimsError::NotFound { .. })
        ));
        assert!(matches!(store.delete("nope"), Err(VictimsError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_row() {
        let store = VictimStore::open_in_memory().unwrap();
        let created = store.create(&new_victim("Carlos"), true).unwrap();

        store.delete(&created.id).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert!(matches!(
            store.get(&created.id),
            Err(VictimsError::NotFound { .. })
        ));
    }

    #[test]
    fn seeds_once() {
        let store = VictimStore::open_in_memory().unwrap();
        assert_eq!(store.seed_if_empty().unwrap(), 6);
        assert_eq!(store.seed_if_empty().unwrap(), 0);
        assert_eq!(store.list_approved().unwrap().len(), 6);
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("victims.duckdb");

        let id = {
            let store = VictimStore::open(&path).unwrap();
            store.create(&new_victim("Maria"), true).unwrap().id
        };

        let reopened = VictimStore::open(&path).unwrap();
        assert_eq!(reopened.get(&id).unwrap().name, "Maria");
    }
}
