// Admin Roster (admins.yaml)

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
struct AdminEntry {
    phone: String,
}

#[derive(Debug, Deserialize)]
struct AdminConfigFile {
    #[serde(default)]
    admins: Vec<AdminEntry>,
}

#[derive(Default)]
struct CachedRoster {
    phones: HashSet<String>,
    modified: Option<SystemTime>,
}

/// Phone numbers with admin privileges, read from admins.yaml.
///
/// The file is re-read when its mtime changes, so promoting an admin does
/// not require a restart. A missing or unreadable file means no admins.
pub struct AdminRoster {
    path: PathBuf,
    cache: Mutex<Option<CachedRoster>>,
}

impl AdminRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn is_admin(&self, phone: &str) -> bool {
        self.load().contains(phone)
    }

    fn load(&self) -> HashSet<String> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok();

        if modified.is_none() {
            // Missing file: nobody is an admin
            return HashSet::new();
        }

        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(cached) = cache.as_ref() {
            if cached.modified == modified {
                return cached.phones.clone();
            }
        }

        let phones = match self.read_file() {
            Ok(phones) => phones,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error loading admin config");
                return HashSet::new();
            }
        };

        *cache = Some(CachedRoster {
            phones: phones.clone(),
            modified,
        });
        phones
    }

    fn read_file(&self) -> std::result::Result<HashSet<String>, String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        let config: AdminConfigFile = serde_yaml::from_str(&content).map_err(|e| e.to_string())?;
        Ok(config.admins.into_iter().map(|a| a.phone).collect())
    }
}
