//! 設定ファイル管理モジュール
//!
//! 表示設定をJSON形式で永続化

use crate::mode::{DisplayPrefs, Video7Mode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 設定ファイルのデフォルトファイル名
const CONFIG_FILENAME: &str = "a2vga_config.json";

/// 実行ファイルのディレクトリを取得
pub fn get_exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 相対パスを指定されたベースディレクトリからの絶対パスに解決
///
/// ベースが空の場合は実行ファイルのディレクトリを使う。
pub fn resolve_path_with_base(base: &str, relative: &str) -> PathBuf {
    let path = Path::new(relative);
    if path.is_absolute() {
        path.to_path_buf()
    } else if base.is_empty() {
        get_exe_dir().join(relative)
    } else {
        let base_path = Path::new(base);
        if base_path.is_absolute() {
            base_path.join(relative)
        } else {
            get_exe_dir().join(base).join(relative)
        }
    }
}

/// 設定ファイルのパスを取得
pub fn get_config_path() -> PathBuf {
    get_exe_dir().join(CONFIG_FILENAME)
}

/// レンダラ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 相対パスの基準ディレクトリ（空なら実行ファイルのディレクトリ）
    #[serde(default)]
    pub home: String,
    /// 表示設定
    #[serde(default)]
    pub display: DisplayPrefs,
    /// Video-7 ダブルHi-Resモード
    #[serde(default)]
    pub video7_mode: Video7Mode,
    /// 出力ディレクトリ
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String { "captures".to_string() }

impl Default for Config {
    fn default() -> Self {
        Config {
            home: String::new(),
            display: DisplayPrefs::default(),
            video7_mode: Video7Mode::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// 指定したパスから設定を読み込む
    ///
    /// ファイルがない、または壊れている場合はデフォルト値を使う。
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config {:?}: {}, using defaults", path.as_ref(), e);
                    Config::default()
                }
            },
            Err(_) => {
                log::debug!("No config at {:?}, using defaults", path.as_ref());
                Config::default()
            }
        }
    }

    /// 指定したパスに設定を保存する
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write config: {}", e))?;
        Ok(())
    }

    /// 相対パスをhomeからの絶対パスに解決
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        resolve_path_with_base(&self.home, relative)
    }

    /// 出力ディレクトリの絶対パスを取得
    pub fn output_dir_path(&self) -> PathBuf {
        self.resolve_path(&self.output_dir)
    }

    /// 出力ディレクトリがなければ作成
    pub fn ensure_output_dir(&self) -> Result<PathBuf, String> {
        let dir = self.output_dir_path();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create {:?}: {}", dir, e))?;
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("a2vga_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"video7_mode": "mixed", "display": {"scanline_emulation": true}}"#).unwrap();
        assert_eq!(config.video7_mode, Video7Mode::Mixed);
        assert!(config.display.scanline_emulation);
        assert!(!config.display.monochrome);
        assert_eq!(config.display.mono_fg, 0xFFFFFF);
        assert_eq!(config.output_dir, "captures");
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("config.json");
        let mut config = Config::default();
        config.display.monochrome = true;
        config.display.mono_fg = 0x33FF33;
        config.video7_mode = Video7Mode::Color160;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let loaded = Config::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, Config::default());

        assert_eq!(Config::load_from(temp_path("missing.json")), Config::default());
    }

    #[test]
    fn test_resolve_path() {
        let config = Config { home: "/tmp/a2".to_string(), ..Default::default() };
        assert_eq!(config.output_dir_path(), PathBuf::from("/tmp/a2/captures"));
        assert_eq!(config.resolve_path("/abs/out"), PathBuf::from("/abs/out"));
    }
}
