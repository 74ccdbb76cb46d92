use crate::rtree::rtree::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES};
use crate::rtree::Rectangle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// spatidx 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatidxConfig {
    /// 索引参数
    pub index: IndexConfig,

    /// 输入输出文件
    pub io: IoConfig,

    /// 日志配置
    pub logging: LoggingConfig,

    /// 额外的命名查询区域
    #[serde(default)]
    pub regions: BTreeMap<String, [f64; 4]>,
}

/// 索引参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// 最小条目数m
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,

    /// 最大条目数M
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// 输入输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoConfig {
    /// 输入 CSV 文件
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// 查询结果 CSV 文件
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stderr, stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_min_entries() -> usize {
    DEFAULT_MIN_ENTRIES
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_input() -> PathBuf {
    PathBuf::from("input_data.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for SpatidxConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig {
                min_entries: default_min_entries(),
                max_entries: default_max_entries(),
            },
            io: IoConfig {
                input: default_input(),
                output: default_output(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
            regions: BTreeMap::new(),
        }
    }
}

impl SpatidxConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（SPATIDX__ 前缀，使用双下划线分隔嵌套，如 `SPATIDX__INDEX__MAX_ENTRIES=8`）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use spatidx::config::SpatidxConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = SpatidxConfig::from_file("spatidx.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量
            .add_source(config::Environment::with_prefix("SPATIDX").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use spatidx::config::SpatidxConfig;
    ///
    /// let config = SpatidxConfig::default();
    /// config.save_to_file("spatidx.toml").unwrap();
    /// ```
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查配置的合法性，包括：
    /// - 索引扇出参数
    /// - 日志级别与输出
    /// - 额外区域的名称与边界
    pub fn validate(&self) -> Result<(), String> {
        // 验证扇出参数
        if self.index.min_entries < 2 {
            return Err(format!(
                "index.min_entries must be at least 2, got {}",
                self.index.min_entries
            ));
        }
        let lower = (self.index.min_entries * 2).max(3);
        if self.index.max_entries < lower {
            return Err(format!(
                "index.max_entries must be at least {} for min_entries = {}, got {}",
                lower, self.index.min_entries, self.index.max_entries
            ));
        }

        // 验证日志级别
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        // 验证日志输出
        match self.logging.output.as_str() {
            "stderr" | "stdout" => {}
            "file" => {
                if self.logging.log_file.is_none() {
                    return Err(
                        "Log output is 'file' but log_file path is not specified".to_string()
                    );
                }
            }
            _ => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stderr, stdout, file",
                    self.logging.output
                ))
            }
        }

        // 验证额外区域
        for (name, bounds) in &self.regions {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err("Region names must not be empty".to_string());
            }
            if trimmed.eq_ignore_ascii_case("manual") {
                return Err("'manual' is reserved and cannot be used as a region name".to_string());
            }
            if !Rectangle::from(*bounds).is_valid() || bounds.iter().any(|v| !v.is_finite()) {
                return Err(format!(
                    "Region '{}' has invalid bounds {:?} (expected finite [min_x, min_y, max_x, max_y] with min <= max)",
                    name, bounds
                ));
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 spatidx Configuration:");
        println!(
            "   Fanout:      m = {}, M = {}",
            self.index.min_entries, self.index.max_entries
        );
        println!();
        println!("   Input:       {}", self.io.input.display());
        println!("   Output:      {}", self.io.output.display());
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        if !self.regions.is_empty() {
            println!();
            println!("   Extra Regions:");
            for (name, bounds) in &self.regions {
                println!("     {:<12} {}", name, Rectangle::from(*bounds));
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn toml_file() -> tempfile::NamedTempFile {
        Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SpatidxConfig::default();
        assert_eq!(config.index.min_entries, 2);
        assert_eq!(config.index.max_entries, 4);
        assert_eq!(config.io.input, PathBuf::from("input_data.csv"));
        assert_eq!(config.io.output, PathBuf::from("results.csv"));
        assert_eq!(config.logging.output, "stderr");
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let missing = std::env::temp_dir().join("spatidx-does-not-exist.toml");
        let loaded = SpatidxConfig::from_file(missing.to_str().unwrap()).unwrap();
        assert_eq!(loaded.index, SpatidxConfig::default().index);
        assert_eq!(loaded.io, SpatidxConfig::default().io);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SpatidxConfig::default();

        // 有效配置
        assert!(config.validate().is_ok());

        // 无效扇出
        config.index.min_entries = 1;
        assert!(config.validate().is_err());
        config.index.min_entries = 3;
        config.index.max_entries = 5;
        assert!(config.validate().is_err());
        config.index.max_entries = 6;
        assert!(config.validate().is_ok());

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        // 文件输出缺少路径
        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("spatidx.log"));
        assert!(config.validate().is_ok());

        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_region_validation() {
        let mut config = SpatidxConfig::default();
        config.regions.insert("japan".to_string(), [129.0, 31.0, 146.0, 46.0]);
        assert!(config.validate().is_ok());

        config.regions.insert("inverted".to_string(), [10.0, 0.0, 0.0, 5.0]);
        assert!(config.validate().is_err());
        config.regions.remove("inverted");

        config.regions.insert("Manual".to_string(), [0.0, 0.0, 1.0, 1.0]);
        assert!(config.validate().is_err());
        config.regions.remove("Manual");

        config.regions.insert("unbounded".to_string(), [0.0, 0.0, f64::INFINITY, 1.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let mut config = SpatidxConfig::default();
        config.index.max_entries = 8;
        config.io.input = PathBuf::from("regions.csv");
        config.regions.insert("japan".to_string(), [129.0, 31.0, 146.0, 46.0]);

        let temp_file = toml_file();
        let path = temp_file.path().to_str().unwrap();

        // 保存
        config.save_to_file(path).unwrap();

        // 加载
        let loaded = SpatidxConfig::from_file(path).unwrap();
        assert_eq!(loaded.index.max_entries, 8);
        assert_eq!(loaded.io.input, PathBuf::from("regions.csv"));
        assert_eq!(loaded.regions.get("japan"), Some(&[129.0, 31.0, 146.0, 46.0]));
    }

    #[test]
    fn test_partial_user_file_keeps_defaults() {
        let temp_file = toml_file();
        std::fs::write(temp_file.path(), "[index]\nmax_entries = 16\n").unwrap();

        let loaded = SpatidxConfig::from_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.index.max_entries, 16);
        assert_eq!(loaded.index.min_entries, 2);
        assert_eq!(loaded.io.output, PathBuf::from("results.csv"));
    }
}
