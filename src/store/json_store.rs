use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::catalog::seed;
use crate::config::Config;
use crate::store::schema::{
    EXPORT_VERSION, ExportData, FlashcardsData, ProfileData, QuestionsData, ResultsData,
};

const PROFILE_FILE: &str = "profile.json";
const QUESTIONS_FILE: &str = "questions.json";
const RESULTS_FILE: &str = "results.json";
const FLASHCARDS_FILE: &str = "flashcards.json";

/// Learner data files under the platform data dir. Opened once per process;
/// there is only ever one writer.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simulado");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load and deserialize the profile. Returns None if the file exists but
    /// cannot be parsed (schema mismatch / corruption).
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            // No file yet: a fresh default, not a schema mismatch.
            Some(ProfileData::default())
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    pub fn load_questions(&self) -> QuestionsData {
        self.load(QUESTIONS_FILE)
    }

    pub fn save_questions(&self, data: &QuestionsData) -> Result<()> {
        self.save(QUESTIONS_FILE, data)
    }

    pub fn load_results(&self) -> ResultsData {
        self.load(RESULTS_FILE)
    }

    pub fn save_results(&self, data: &ResultsData) -> Result<()> {
        self.save(RESULTS_FILE, data)
    }

    pub fn load_flashcards(&self) -> FlashcardsData {
        self.load(FLASHCARDS_FILE)
    }

    pub fn save_flashcards(&self, data: &FlashcardsData) -> Result<()> {
        self.save(FLASHCARDS_FILE, data)
    }

    /// Seed the question store from the embedded catalog when it holds no
    /// rows. Idempotent: checked by row count, so repeated startups never
    /// duplicate questions. Returns the persisted question count.
    pub fn seed_questions_if_empty(&self) -> Result<usize> {
        let mut data = self.load_questions();
        if data.questions.is_empty() {
            data.questions = seed::load_catalog()?;
            self.save_questions(&data)?;
        }
        Ok(data.questions.len())
    }

    /// Bundle learner data + config for backup. Questions are excluded; they
    /// reseed from the embedded catalog.
    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            simulado_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            profile: self.load_profile().unwrap_or_default(),
            results: self.load_results(),
            flashcards: self.load_flashcards(),
        }
    }

    /// Transactional import: stage every payload as a .tmp file, then commit
    /// by swapping originals out to .bak and renaming .tmp into place. On any
    /// commit failure the already-swapped files are restored (or removed, if
    /// they did not exist before) and the remaining .tmp files are deleted.
    /// Surviving .bak files mark an interrupted import.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.simulado_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.simulado_export_version,
                EXPORT_VERSION
            );
        }

        let payloads: Vec<(&str, String)> = vec![
            (PROFILE_FILE, serde_json::to_string_pretty(&data.profile)?),
            (RESULTS_FILE, serde_json::to_string_pretty(&data.results)?),
            (
                FLASHCARDS_FILE,
                serde_json::to_string_pretty(&data.flashcards)?,
            ),
        ];

        // Stage phase.
        let mut staged: Vec<PathBuf> = Vec::new();
        for (name, json) in &payloads {
            let tmp = self.file_path(name).with_extension("json.tmp");
            let write = fs::File::create(&tmp)
                .and_then(|mut f| f.write_all(json.as_bytes()).and_then(|()| f.sync_all()));
            match write {
                Ok(()) => staged.push(tmp),
                Err(e) => {
                    for tmp in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    bail!("Import failed during staging: {e}");
                }
            }
        }

        // Commit phase. Tracks (final, bak, had_original) for rollback.
        let mut committed: Vec<(PathBuf, PathBuf, bool)> = Vec::new();
        let rollback = |committed: &[(PathBuf, PathBuf, bool)], leftover_tmp: &[PathBuf]| {
            for (final_path, bak_path, had_original) in committed {
                if *had_original {
                    let _ = fs::rename(bak_path, final_path);
                } else {
                    let _ = fs::remove_file(final_path);
                }
            }
            for tmp in leftover_tmp {
                let _ = fs::remove_file(tmp);
            }
        };

        for (i, (name, _)) in payloads.iter().enumerate() {
            let final_path = self.file_path(name);
            let bak_path = self.file_path(name).with_extension("json.bak");
            let had_original = final_path.exists();

            if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
                rollback(&committed, &staged[i..]);
                bail!("Import failed during commit (backup): {e}");
            }
            if let Err(e) = fs::rename(&staged[i], &final_path) {
                if had_original && bak_path.exists() {
                    let _ = fs::rename(&bak_path, &final_path);
                } else {
                    let _ = fs::remove_file(&final_path);
                }
                rollback(&committed, &staged[i..]);
                bail!("Import failed during commit (rename): {e}");
            }
            committed.push((final_path, bak_path, had_original));
        }

        for (_, bak_path, had_original) in &committed {
            if *had_original {
                let _ = fs::remove_file(bak_path);
            }
        }
        Ok(())
    }

    /// Sweep leftover .bak files from an interrupted import. Returns true if
    /// any were found (and removed).
    pub fn check_interrupted_import(&self) -> bool {
        let mut found = false;
        for name in [PROFILE_FILE, RESULTS_FILE, FLASHCARDS_FILE] {
            let bak = self.file_path(name).with_extension("json.bak");
            if bak.exists() {
                found = true;
                let _ = fs::remove_file(&bak);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::store::schema::EXPORT_VERSION;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn make_test_export(config: &Config) -> ExportData {
        ExportData {
            simulado_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            profile: ProfileData::default(),
            results: ResultsData::default(),
            flashcards: FlashcardsData::default(),
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (_dir, store) = make_test_store();
        let first = store.seed_questions_if_empty().unwrap();
        assert!(first > 0);
        let second = store.seed_questions_if_empty().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.load_questions().questions.len(), first);
    }

    #[test]
    fn test_profile_round_trip() {
        let (_dir, store) = make_test_store();
        let mut profile = ProfileData::default();
        profile.total_xp = 120;
        profile.streak_days = 3;
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile().unwrap();
        assert_eq!(loaded.total_xp, 120);
        assert_eq!(loaded.streak_days, 3);
    }

    #[test]
    fn test_corrupt_profile_loads_as_none() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PROFILE_FILE), "not json").unwrap();
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn test_round_trip_export_import() {
        let (_dir, store) = make_test_store();
        let config = Config::default();

        let mut profile = ProfileData::default();
        profile.total_xp = 90;
        profile.total_attempts = 1;
        store.save_profile(&profile).unwrap();

        let export = store.export_all(&config);
        assert_eq!(export.simulado_export_version, EXPORT_VERSION);

        let (_dir2, store2) = make_test_store();
        store2.import_all(&export).unwrap();

        let imported = store2.load_profile().unwrap();
        assert_eq!(imported.total_xp, 90);
        assert_eq!(imported.total_attempts, 1);
    }

    #[test]
    fn test_version_rejection() {
        let (_dir, store) = make_test_store();
        let config = Config::default();
        let mut export = make_test_export(&config);
        export.simulado_export_version = 99;

        let result = store.import_all(&export);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Unsupported export version"));
        assert!(err_msg.contains("99"));
    }

    #[test]
    fn test_import_staging_failure_preserves_originals() {
        let (dir, store) = make_test_store();

        let mut profile = ProfileData::default();
        profile.total_xp = 42;
        store.save_profile(&profile).unwrap();
        let original = fs::read_to_string(store.file_path(PROFILE_FILE)).unwrap();

        // A store whose base dir does not exist: staging writes must fail.
        let bad_dir = dir.path().join("missing_subdir");
        let bad_store = JsonStore {
            base_dir: bad_dir.clone(),
        };
        let export = make_test_export(&Config::default());
        let result = bad_store.import_all(&export);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Import failed during staging")
        );

        let after = fs::read_to_string(store.file_path(PROFILE_FILE)).unwrap();
        assert_eq!(original, after);
        assert!(!bad_dir.exists());

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_import_into_empty_store_creates_files() {
        let (_dir, store) = make_test_store();
        assert!(!store.file_path(PROFILE_FILE).exists());

        let export = make_test_export(&Config::default());
        store.import_all(&export).unwrap();

        assert!(store.file_path(PROFILE_FILE).exists());
        assert!(store.file_path(RESULTS_FILE).exists());
        assert!(store.file_path(FLASHCARDS_FILE).exists());
    }

    #[test]
    fn test_check_interrupted_import_sweeps_bak_files() {
        let (_dir, store) = make_test_store();
        assert!(!store.check_interrupted_import());

        fs::write(store.file_path("profile.json.bak"), "{}").unwrap();
        assert!(store.check_interrupted_import());
        assert!(!store.file_path("profile.json.bak").exists());
    }
}
