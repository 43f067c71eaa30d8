use std::{collections::BTreeMap, sync::Mutex};

use log::{debug, error};

use crate::{
    Gender, HistoryVersion, PersonalRecordService, PrContext, PrResult, ProfileRepository,
    ReadError, Settings, Standards, StandardsCatalog, StrengthService, StrengthSummary,
    TrainingSessionID, TrainingSessionRepository, compute_prs_for_session,
    compute_prs_for_sessions, strength_summary,
};

pub struct Service<R, C = &'static Standards> {
    repository: R,
    catalog: C,
    settings: Settings,
    personal_records: Memo<TrainingSessionID, PrResult>,
    feed: Memo<(), BTreeMap<TrainingSessionID, PrResult>>,
    summaries: Memo<(Option<Gender>, Option<u32>), StrengthSummary>,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self::with_catalog(repository, Standards::builtin(), Settings::default())
    }
}

impl<R, C: StandardsCatalog> Service<R, C> {
    pub fn with_catalog(repository: R, catalog: C, settings: Settings) -> Self {
        Self {
            repository,
            catalog,
            settings,
            personal_records: Memo::new("personal records"),
            feed: Memo::new("personal records of feed"),
            summaries: Memo::new("strength summary"),
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn clear_cache(&self) {
        self.personal_records.clear();
        self.feed.clear();
        self.summaries.clear();
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: TrainingSessionRepository, C: StandardsCatalog> PersonalRecordService for Service<R, C> {
    async fn get_personal_records(&self, id: TrainingSessionID) -> Result<PrResult, ReadError> {
        let training_sessions = log_on_error!(
            self.repository.read_training_sessions(),
            ReadError,
            "get",
            "training sessions"
        )?;
        let version = HistoryVersion::of(&training_sessions);

        Ok(self.personal_records.get_or_insert_with(version, id, || {
            let Some(session) = training_sessions.iter().find(|s| s.id == id) else {
                debug!("training session {} not found", *id);
                return PrResult::default();
            };
            compute_prs_for_session(&PrContext {
                session,
                history: &training_sessions,
                formula: self.settings.formula,
            })
        }))
    }

    async fn get_personal_records_for_feed(
        &self,
    ) -> Result<BTreeMap<TrainingSessionID, PrResult>, ReadError> {
        let training_sessions = log_on_error!(
            self.repository.read_training_sessions(),
            ReadError,
            "get",
            "training sessions"
        )?;
        let version = HistoryVersion::of(&training_sessions);

        Ok(self.feed.get_or_insert_with(version, (), || {
            compute_prs_for_sessions(&training_sessions, self.settings.formula)
        }))
    }
}

impl<R, C> StrengthService for Service<R, C>
where
    R: TrainingSessionRepository + ProfileRepository,
    C: StandardsCatalog,
{
    async fn get_strength_summary(&self) -> Result<StrengthSummary, ReadError> {
        let profile = log_on_error!(self.repository.read_profile(), ReadError, "get", "profile")?;
        let training_sessions = log_on_error!(
            self.repository.read_training_sessions(),
            ReadError,
            "get",
            "training sessions"
        )?;
        let version = HistoryVersion::of(&training_sessions);
        let key = (profile.gender, profile.body_weight.map(f32::to_bits));

        Ok(self.summaries.get_or_insert_with(version, key, || {
            strength_summary(&training_sessions, &profile, &self.catalog, self.settings)
        }))
    }
}

/// Results computed from one version of the training history.
///
/// All entries are dropped as soon as a result for a different version is stored.
struct Memo<K, V> {
    name: &'static str,
    state: Mutex<MemoState<K, V>>,
}

struct MemoState<K, V> {
    version: Option<HistoryVersion>,
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V: Clone> Memo<K, V> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(MemoState {
                version: None,
                entries: BTreeMap::new(),
            }),
        }
    }

    fn get(&self, version: HistoryVersion, key: &K) -> Option<V> {
        let state = self.state.lock().ok()?;
        if state.version != Some(version) {
            return None;
        }
        state.entries.get(key).cloned()
    }

    fn insert(&self, version: HistoryVersion, key: K, value: V) {
        if let Ok(mut state) = self.state.lock() {
            if state.version != Some(version) {
                state.entries.clear();
                state.version = Some(version);
            }
            state.entries.insert(key, value);
        }
    }

    fn get_or_insert_with(&self, version: HistoryVersion, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(version, &key) {
            debug!("using cached {}", self.name);
            return value;
        }
        debug!("computing {}", self.name);
        let value = f();
        self.insert(version, key, value.clone());
        value
    }

    fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.version = None;
            state.entries.clear();
        }
    }
}
