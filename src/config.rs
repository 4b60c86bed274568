//! 运行配置，来自环境变量（可由 `.env` 提供）

use crate::qr::DEFAULT_RENDER_URL;
use crate::session::UserIdentity;
use crate::submission::PersistenceMode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://ewaste.db?mode=rwc";
pub const DEFAULT_REFRESH_SECS: u64 = 2;
pub const DEFAULT_QR_OUTPUT_DIR: &str = "qr";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} 取值无效: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    /// 未设置 `EWASTE_USER_ID` 时为匿名会话
    pub user: Option<UserIdentity>,
    pub persistence_mode: PersistenceMode,
    pub classification_seed: Option<u64>,
    pub refresh_interval: Duration,
    pub qr_render_url: String,
    pub qr_output_dir: PathBuf,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl AppConfig {
    /// 先加载 `.env`，再读进程环境
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let user = get("EWASTE_USER_ID").map(|user_id| UserIdentity {
            user_id,
            full_name: get("EWASTE_USER_NAME"),
            department: get("EWASTE_DEPARTMENT"),
        });

        let persistence_mode = match get("EWASTE_PERSISTENCE") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "EWASTE_PERSISTENCE",
                value: v.clone(),
            })?,
            None => PersistenceMode::default(),
        };

        let classification_seed = match get("EWASTE_CLASSIFICATION_SEED") {
            Some(v) => Some(v.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "EWASTE_CLASSIFICATION_SEED",
                value: v.clone(),
            })?),
            None => None,
        };

        let refresh_secs = match get("EWASTE_REFRESH_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "EWASTE_REFRESH_SECS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_REFRESH_SECS,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            user,
            persistence_mode,
            classification_seed,
            refresh_interval: Duration::from_secs(refresh_secs),
            qr_render_url: get("QR_RENDER_URL").unwrap_or_else(|| DEFAULT_RENDER_URL.to_string()),
            qr_output_dir: get("QR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QR_OUTPUT_DIR)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert!(cfg.user.is_none());
        assert_eq!(cfg.persistence_mode, PersistenceMode::Transactional);
        assert_eq!(cfg.classification_seed, None);
        assert_eq!(cfg.refresh_interval, Duration::from_secs(2));
        assert_eq!(cfg.qr_render_url, DEFAULT_RENDER_URL);
        assert_eq!(cfg.qr_output_dir, PathBuf::from("qr"));
    }

    #[test]
    fn reads_identity_and_overrides() {
        let cfg = config(&[
            ("EWASTE_USER_ID", "u-42"),
            ("EWASTE_USER_NAME", "Sarah Davis"),
            ("EWASTE_DEPARTMENT", "  "),
            ("EWASTE_PERSISTENCE", "sequential"),
            ("EWASTE_CLASSIFICATION_SEED", "7"),
            ("EWASTE_REFRESH_SECS", "5"),
        ])
        .unwrap();
        let user = cfg.user.unwrap();
        assert_eq!(user.user_id, "u-42");
        assert_eq!(user.full_name.as_deref(), Some("Sarah Davis"));
        assert_eq!(user.department, None);
        assert_eq!(cfg.persistence_mode, PersistenceMode::Sequential);
        assert_eq!(cfg.classification_seed, Some(7));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
    }

    #[test]
    fn blank_user_id_means_anonymous() {
        let cfg = config(&[("EWASTE_USER_ID", ""), ("EWASTE_USER_NAME", "x")]).unwrap();
        assert!(cfg.user.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            config(&[("EWASTE_PERSISTENCE", "eventual")]).unwrap_err(),
            ConfigError::Invalid {
                key: "EWASTE_PERSISTENCE",
                value: "eventual".into()
            }
        );
        assert!(config(&[("EWASTE_CLASSIFICATION_SEED", "-1")]).is_err());
        assert!(config(&[("EWASTE_REFRESH_SECS", "0")]).is_err());
    }
}
