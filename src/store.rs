// 💾 Seeds Store - persisted result trees, keyed by scenario name
//
// A dump is written once per build and replaced wholesale on rebuild.
// Loading a scenario that was never built is `SeedsError::NotBuilt`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{SeedsConfig, StoreKind};
use crate::error::{Result, SeedsError};
use crate::plan::SeedsPlan;
use crate::result::SeedsResult;

/// A built result tree plus what it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedsDump {
    pub scenario: String,
    pub plan_fingerprint: String,
    pub built_at: DateTime<Utc>,
    pub result: SeedsResult,
}

impl SeedsDump {
    pub fn new(scenario: &str, plan: &SeedsPlan, result: SeedsResult) -> Self {
        SeedsDump {
            scenario: scenario.to_string(),
            plan_fingerprint: plan.fingerprint(),
            built_at: Utc::now(),
            result,
        }
    }

    pub fn built_from(&self, plan: &SeedsPlan) -> bool {
        self.plan_fingerprint == plan.fingerprint()
    }
}

pub trait SeedsStore {
    /// Persist a dump, replacing any previous dump of the same scenario
    fn save(&self, dump: &SeedsDump) -> Result<()>;

    fn load(&self, scenario: &str) -> Result<SeedsDump>;

    fn exists(&self, scenario: &str) -> Result<bool>;

    /// Returns whether a dump was removed
    fn delete(&self, scenario: &str) -> Result<bool>;

    fn scenarios(&self) -> Result<Vec<String>>;
}

impl<S: SeedsStore + ?Sized> SeedsStore for Box<S> {
    fn save(&self, dump: &SeedsDump) -> Result<()> {
        (**self).save(dump)
    }

    fn load(&self, scenario: &str) -> Result<SeedsDump> {
        (**self).load(scenario)
    }

    fn exists(&self, scenario: &str) -> Result<bool> {
        (**self).exists(scenario)
    }

    fn delete(&self, scenario: &str) -> Result<bool> {
        (**self).delete(scenario)
    }

    fn scenarios(&self) -> Result<Vec<String>> {
        (**self).scenarios()
    }
}

impl<S: SeedsStore + ?Sized> SeedsStore for &S {
    fn save(&self, dump: &SeedsDump) -> Result<()> {
        (**self).save(dump)
    }

    fn load(&self, scenario: &str) -> Result<SeedsDump> {
        (**self).load(scenario)
    }

    fn exists(&self, scenario: &str) -> Result<bool> {
        (**self).exists(scenario)
    }

    fn delete(&self, scenario: &str) -> Result<bool> {
        (**self).delete(scenario)
    }

    fn scenarios(&self) -> Result<Vec<String>> {
        (**self).scenarios()
    }
}

/// Open the store selected by configuration
pub fn open_store(config: &SeedsConfig) -> Result<Box<dyn SeedsStore>> {
    match config.store {
        StoreKind::File => Ok(Box::new(FileSeedsStore::new(&config.dumps_dir)?)),
        StoreKind::Sqlite => {
            if let Some(parent) = config.sqlite_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            Ok(Box::new(SqliteSeedsStore::open(&config.sqlite_path)?))
        }
    }
}

/// Scenario names become file names and keys; keep them boring
pub fn validate_scenario_name(scenario: &str) -> Result<()> {
    let valid = !scenario.is_empty()
        && scenario
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SeedsError::Config(format!(
            "invalid scenario name '{}': use letters, digits, '_' or '-'",
            scenario
        )))
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// One `<scenario>.json` per scenario under a dumps directory
pub struct FileSeedsStore {
    dir: PathBuf,
}

impl FileSeedsStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(FileSeedsStore {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn path_for(&self, scenario: &str) -> PathBuf {
        self.dir.join(format!("{}.json", scenario))
    }
}

impl SeedsStore for FileSeedsStore {
    fn save(&self, dump: &SeedsDump) -> Result<()> {
        validate_scenario_name(&dump.scenario)?;
        let path = self.path_for(&dump.scenario);
        let tmp = self.dir.join(format!(".{}.json.tmp", dump.scenario));

        // Write-then-rename: readers never see a half-written dump
        let content = serde_json::to_string_pretty(dump)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;

        info!(scenario = %dump.scenario, path = %path.display(), "seeds dump saved");
        Ok(())
    }

    fn load(&self, scenario: &str) -> Result<SeedsDump> {
        validate_scenario_name(scenario)?;
        let path = self.path_for(scenario);
        if !path.exists() {
            return Err(SeedsError::NotBuilt {
                scenario: scenario.to_string(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let dump: SeedsDump = serde_json::from_str(&content)?;
        debug!(scenario, users = dump.result.users.len(), "seeds dump loaded");
        Ok(dump)
    }

    fn exists(&self, scenario: &str) -> Result<bool> {
        validate_scenario_name(scenario)?;
        Ok(self.path_for(scenario).exists())
    }

    fn delete(&self, scenario: &str) -> Result<bool> {
        validate_scenario_name(scenario)?;
        let path = self.path_for(scenario);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn scenarios(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Dumps as rows of a `seeds_dumps` table (WAL mode)
pub struct SqliteSeedsStore {
    conn: Connection,
}

impl SqliteSeedsStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn with_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteSeedsStore { conn })
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL keeps readers unblocked while a build writes
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS seeds_dumps (
            scenario TEXT PRIMARY KEY,
            plan_fingerprint TEXT NOT NULL,
            built_at TEXT NOT NULL,
            users INTEGER NOT NULL,
            payload TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl SeedsStore for SqliteSeedsStore {
    fn save(&self, dump: &SeedsDump) -> Result<()> {
        validate_scenario_name(&dump.scenario)?;
        let payload = serde_json::to_string(&dump.result)?;

        self.conn.execute(
            "INSERT INTO seeds_dumps (scenario, plan_fingerprint, built_at, users, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(scenario) DO UPDATE SET
                plan_fingerprint = excluded.plan_fingerprint,
                built_at = excluded.built_at,
                users = excluded.users,
                payload = excluded.payload",
            params![
                dump.scenario,
                dump.plan_fingerprint,
                dump.built_at.to_rfc3339(),
                dump.result.users.len() as i64,
                payload,
            ],
        )?;

        info!(scenario = %dump.scenario, "seeds dump saved to sqlite");
        Ok(())
    }

    fn load(&self, scenario: &str) -> Result<SeedsDump> {
        validate_scenario_name(scenario)?;
        let row = self
            .conn
            .query_row(
                "SELECT plan_fingerprint, built_at, payload FROM seeds_dumps WHERE scenario = ?1",
                params![scenario],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let (plan_fingerprint, built_at, payload) = row.ok_or_else(|| SeedsError::NotBuilt {
            scenario: scenario.to_string(),
        })?;

        let built_at = DateTime::parse_from_rfc3339(&built_at)
            .map_err(|e| SeedsError::Config(format!("corrupt built_at for '{}': {}", scenario, e)))?
            .with_timezone(&Utc);

        Ok(SeedsDump {
            scenario: scenario.to_string(),
            plan_fingerprint,
            built_at,
            result: serde_json::from_str(&payload)?,
        })
    }

    fn exists(&self, scenario: &str) -> Result<bool> {
        validate_scenario_name(scenario)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM seeds_dumps WHERE scenario = ?1",
            params![scenario],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn delete(&self, scenario: &str) -> Result<bool> {
        validate_scenario_name(scenario)?;
        let removed = self
            .conn
            .execute("DELETE FROM seeds_dumps WHERE scenario = ?1", params![scenario])?;
        Ok(removed > 0)
    }

    fn scenarios(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT scenario FROM seeds_dumps ORDER BY scenario")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::schema::AccountKind;
    use crate::plan::{SeedAccountsPlan, SeedUsersPlan};
    use crate::result::{SeedAccountResult, SeedUserResult};

    fn sample_dump(scenario: &str, users: usize) -> SeedsDump {
        let plan = SeedsPlan::new(
            SeedUsersPlan::new(users as u32)
                .with_accounts(AccountKind::Deposit, SeedAccountsPlan::new(1)),
        );
        let result = SeedsResult::new(
            (0..users)
                .map(|i| {
                    let mut user = SeedUserResult::new(format!("user-{}", i));
                    user.deposit_accounts
                        .push(SeedAccountResult::new(format!("account-{}", i), vec![]));
                    user
                })
                .collect(),
        );
        SeedsDump::new(scenario, &plan, result)
    }

    fn check_store_contract(store: &dyn SeedsStore) {
        // NOT_BUILT
        assert!(!store.exists("scenario_a").unwrap());
        assert!(matches!(
            store.load("scenario_a"),
            Err(SeedsError::NotBuilt { .. })
        ));

        // BUILT
        let dump = sample_dump("scenario_a", 2);
        store.save(&dump).unwrap();
        assert!(store.exists("scenario_a").unwrap());
        let loaded = store.load("scenario_a").unwrap();
        assert_eq!(loaded.result, dump.result);
        assert_eq!(loaded.plan_fingerprint, dump.plan_fingerprint);

        // Rebuild overwrites
        let rebuilt = sample_dump("scenario_a", 3);
        store.save(&rebuilt).unwrap();
        assert_eq!(store.load("scenario_a").unwrap().result.users.len(), 3);

        store.save(&sample_dump("scenario_b", 1)).unwrap();
        assert_eq!(
            store.scenarios().unwrap(),
            vec!["scenario_a".to_string(), "scenario_b".to_string()]
        );

        assert!(store.delete("scenario_a").unwrap());
        assert!(!store.delete("scenario_a").unwrap());
        assert!(!store.exists("scenario_a").unwrap());

        // Bad names are rejected the same way by every backend
        for bad in ["", "../escape", "a b"] {
            assert!(matches!(store.load(bad), Err(SeedsError::Config(_))));
            assert!(matches!(store.exists(bad), Err(SeedsError::Config(_))));
            assert!(matches!(store.delete(bad), Err(SeedsError::Config(_))));
        }
    }

    #[test]
    fn test_file_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeedsStore::new(dir.path().join("dumps")).unwrap();
        check_store_contract(&store);
    }

    #[test]
    fn test_sqlite_store_contract() {
        let conn = Connection::open_in_memory().unwrap();
        let store = SqliteSeedsStore::with_connection(conn).unwrap();
        check_store_contract(&store);
    }

    #[test]
    fn test_file_store_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeedsStore::new(dir.path()).unwrap();
        store.save(&sample_dump("pretty", 1)).unwrap();

        let content = fs::read_to_string(store.path_for("pretty")).unwrap();
        assert!(content.contains("\"plan_fingerprint\""));
        assert!(content.contains("\n  "));
        assert!(!dir.path().join(".pretty.json.tmp").exists());
    }

    #[test]
    fn test_scenario_names_validated() {
        assert!(validate_scenario_name("existing_user-1").is_ok());
        assert!(validate_scenario_name("").is_err());
        assert!(validate_scenario_name("../etc/passwd").is_err());

        let dir = tempfile::tempdir().unwrap();
        let store = FileSeedsStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.load("../escape"),
            Err(SeedsError::Config(_))
        ));
    }

    #[test]
    fn test_dump_built_from_plan() {
        let dump = sample_dump("fp", 2);
        let same = SeedsPlan::new(
            SeedUsersPlan::new(2).with_accounts(AccountKind::Deposit, SeedAccountsPlan::new(1)),
        );
        let other = SeedsPlan::new(SeedUsersPlan::new(2));
        assert!(dump.built_from(&same));
        assert!(!dump.built_from(&other));
    }
}
