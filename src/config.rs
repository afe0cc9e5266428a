use std::path::{Path, PathBuf};

use crate::error::{Result, WebUiError};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub config_path: PathBuf,
    pub default_config_path: PathBuf,
    pub assets_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("WEB_UI_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| WebUiError::InvalidEnv {
                name: "WEB_UI_PORT",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            config_path: env_path("WEB_UI_CONFIG_PATH", "./config.json5"),
            default_config_path: env_path("WEB_UI_DEFAULT_CONFIG_PATH", "./default.config.json5"),
            assets_dir: env_path("WEB_UI_ASSETS_DIR", "./web-ui"),
        })
    }

    /// 所有文件都放在同一目录下
    pub fn with_root(root: &Path, port: u16) -> Self {
        Self {
            port,
            config_path: root.join("config.json5"),
            default_config_path: root.join("default.config.json5"),
            assets_dir: root.join("web-ui"),
        }
    }
}

fn env_path(name: &str, fallback: &str) -> PathBuf {
    std::env::var_os(name)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_layout() {
        let settings = Settings::with_root(Path::new("/srv/bot"), 8080);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.config_path, PathBuf::from("/srv/bot/config.json5"));
        assert_eq!(
            settings.default_config_path,
            PathBuf::from("/srv/bot/default.config.json5")
        );
        assert_eq!(settings.assets_dir, PathBuf::from("/srv/bot/web-ui"));
    }

    // 只有这一个测试修改进程环境变量
    #[test]
    fn test_from_env_port() {
        std::env::remove_var("WEB_UI_PORT");
        assert_eq!(Settings::from_env().unwrap().port, DEFAULT_PORT);

        std::env::set_var("WEB_UI_PORT", "4567");
        assert_eq!(Settings::from_env().unwrap().port, 4567);

        std::env::set_var("WEB_UI_PORT", "not-a-port");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, WebUiError::InvalidEnv { name: "WEB_UI_PORT", .. }));

        std::env::remove_var("WEB_UI_PORT");
    }
}
