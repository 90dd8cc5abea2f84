use std::collections::VecDeque;

use gloo_storage::Storage as GlooStorage;
use gymlog_web_app::{Settings, SettingsRepository, log};
use serde::{Serialize, de::DeserializeOwned};

use crate::rest::CredentialRepository;

const KEY_TOKEN: &str = "token";
const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

fn read_or_default<T: DeserializeOwned + Default>(key: &str) -> Result<T, String> {
    match gloo_storage::LocalStorage::get(key) {
        Ok(value) => Ok(value),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(T::default()),
        Err(err) => Err(err.to_string()),
    }
}

fn write<T: Serialize>(key: &str, value: T) -> Result<(), String> {
    gloo_storage::LocalStorage::set(key, value).map_err(|err| err.to_string())
}

/// Access token of the current session.
#[derive(Clone, Copy, Default)]
pub struct Token;

impl CredentialRepository for Token {
    fn read_token(&self) -> Option<String> {
        gloo_storage::LocalStorage::get(KEY_TOKEN).ok()
    }

    fn write_token(&self, token: &str) -> Result<(), String> {
        write(KEY_TOKEN, token)
    }

    fn delete_token(&self) {
        gloo_storage::LocalStorage::delete(KEY_TOKEN);
    }
}

pub struct UI;

impl SettingsRepository for UI {
    async fn read_settings(&self) -> Result<Settings, String> {
        read_or_default(KEY_SETTINGS)
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        write(KEY_SETTINGS, settings)
    }
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        read_or_default(KEY_LOG).map_err(log::Error::Unknown)
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        write(KEY_LOG, entries).map_err(log::Error::Unknown)
    }
}
