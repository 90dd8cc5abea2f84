use gymlog_domain::DefaultInterval;
use log::error;
use serde::{Deserialize, Serialize};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    #[serde(with = "DefaultIntervalDef", default)]
    pub chart_interval: DefaultInterval,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "DefaultInterval")]
enum DefaultIntervalDef {
    All,
    _1Y = 365,
    _6M = 182,
    _3M = 91,
    _1M = 30,
}

impl Settings {
    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => {
                let Some(window) = web_sys::window() else {
                    error!("failed to access window to determine preferred color scheme");
                    return Theme::Light;
                };
                match window.match_media("(prefers-color-scheme: dark)") {
                    Ok(Some(media_query_list)) => {
                        if media_query_list.matches() {
                            Theme::Dark
                        } else {
                            Theme::Light
                        }
                    }
                    Ok(None) => {
                        error!("failed to determine preferred color scheme");
                        Theme::Light
                    }
                    Err(_) => {
                        error!("failed to match media to determine preferred color scheme");
                        Theme::Light
                    }
                }
            }
            Theme::Light | Theme::Dark => self.theme,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}
