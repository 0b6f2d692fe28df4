//! Settings store: the single owner of the live background configuration
//!
//! The active configuration is an immutable snapshot behind an `Arc`; every
//! edit builds a new snapshot and swaps it in, so readers holding an older
//! snapshot never observe a half-applied change. Observers are notified
//! synchronously after the swap and before the record is written out.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::schema::{self, BackgroundSettings};
use super::storage::Storage;
use crate::constants::storage::SETTINGS_KEY;

type Observer = Box<dyn FnMut(&Arc<BackgroundSettings>)>;

/// Handle returned by [`SettingsStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct SettingsStore<S: Storage> {
    current: Arc<BackgroundSettings>,
    storage: S,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    last_write_ok: bool,
}

impl<S: Storage> SettingsStore<S> {
    /// Build the session configuration from the persisted record.
    ///
    /// A missing, unreadable or unparseable record yields the defaults.
    pub fn load(storage: S) -> Self {
        let current = match storage.read(SETTINGS_KEY) {
            Ok(Some(raw)) => match merge_over_defaults(&raw) {
                Ok(settings) => {
                    info!(key = SETTINGS_KEY, "Loaded background settings");
                    settings
                }
                Err(e) => {
                    warn!(key = SETTINGS_KEY, error = %e, "Failed to parse stored settings, using defaults");
                    schema::defaults()
                }
            },
            Ok(None) => {
                info!(key = SETTINGS_KEY, "No stored settings, using defaults");
                schema::defaults()
            }
            Err(e) => {
                warn!(key = SETTINGS_KEY, error = %e, "Failed to read stored settings, using defaults");
                schema::defaults()
            }
        };

        Self {
            current: Arc::new(current),
            storage,
            observers: Vec::new(),
            next_subscription: 0,
            last_write_ok: true,
        }
    }

    /// Current snapshot; cheap to clone and safe to keep across edits
    pub fn current(&self) -> Arc<BackgroundSettings> {
        Arc::clone(&self.current)
    }

    pub fn settings(&self) -> &BackgroundSettings {
        &self.current
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.current.get(key)
    }

    /// Replace one field, notify observers, then persist.
    ///
    /// Unknown keys and values of the wrong kind are rejected and leave the
    /// configuration untouched. Persistence failures are logged, not returned.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let spec = schema::describe(key).ok_or_else(|| anyhow!("Unknown setting '{key}'"))?;
        if !spec.kind.accepts(&value) {
            bail!("Invalid value {value} for '{key}': expected {}", spec.kind.describe());
        }

        let mut record = serde_json::to_value(self.current.as_ref())
            .context("Failed to serialize current settings")?;
        record[key] = value;
        let next: BackgroundSettings = serde_json::from_value(record)
            .with_context(|| format!("Failed to apply value for '{key}'"))?;

        debug!(key, "Setting updated");
        self.replace(next);
        Ok(())
    }

    /// Restore every field to its schema default, notify observers, persist
    pub fn reset(&mut self) {
        info!("Resetting background settings to defaults");
        self.replace(schema::defaults());
    }

    /// Register an observer called with every new snapshot
    pub fn subscribe(&mut self, observer: impl FnMut(&Arc<BackgroundSettings>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Whether the most recent persistence write succeeded
    pub fn last_write_succeeded(&self) -> bool {
        self.last_write_ok
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// End the session, handing the backing storage back
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn replace(&mut self, next: BackgroundSettings) {
        self.current = Arc::new(next);
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.current);
        }
        self.persist();
    }

    fn persist(&mut self) {
        let result = serde_json::to_string_pretty(self.current.as_ref())
            .context("Failed to serialize settings")
            .and_then(|json| self.storage.write(SETTINGS_KEY, &json));

        self.last_write_ok = match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key = SETTINGS_KEY, error = %e, "Failed to save settings, changes kept for this session only");
                false
            }
        };
    }
}

/// Overlay a persisted JSON record on the defaults.
///
/// Unknown keys are ignored. A known key whose value has the wrong kind is
/// dropped (that field keeps its default). Values are otherwise trusted as
/// stored: numbers outside the slider bounds are kept.
pub fn merge_over_defaults(raw: &str) -> Result<BackgroundSettings> {
    let persisted: Value = serde_json::from_str(raw).context("Stored settings are not valid JSON")?;
    let Value::Object(persisted) = persisted else {
        bail!("Stored settings are not a JSON object");
    };

    let defaults = serde_json::to_value(schema::defaults()).context("Failed to serialize defaults")?;
    let Value::Object(mut merged) = defaults else {
        bail!("Default settings did not serialize to an object");
    };

    overlay_known_fields(&mut merged, persisted);

    serde_json::from_value(Value::Object(merged)).context("Failed to build settings from stored record")
}

fn overlay_known_fields(merged: &mut Map<String, Value>, persisted: Map<String, Value>) {
    for (key, value) in persisted {
        let Some(spec) = schema::describe(&key) else {
            debug!(key = %key, "Ignoring unknown stored setting");
            continue;
        };
        if !spec.kind.accepts(&value) {
            warn!(key = %key, value = %value, expected = %spec.kind.describe(), "Ignoring malformed stored setting");
            continue;
        }
        merged.insert(key, value);
    }
}
