use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - database: 数据库连接配置
/// - links: 短链接创建与根路径行为
/// - sweeper: 过期清理任务
/// - invites: 邀请码
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub sweeper: SweeperConfig,
    #[serde(default)]
    pub invites: InvitesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SK，分隔符：__
    /// 示例：SK__SERVER__PORT=9999
    pub fn load(path: Option<&Path>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SK")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if path.exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path.display());
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

/// Link creation and root-path behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Length of generated symbols when a create request omits one
    #[serde(default = "default_random_symbol_length")]
    pub random_symbol_length: usize,
    /// Generated symbol length for admin callers
    #[serde(default = "default_admin_symbol_length")]
    pub admin_symbol_length: usize,
    /// Where `GET /` redirects; unset serves a plain landing body
    #[serde(default)]
    pub root_redirect: Option<String>,
}

/// Expiry sweeper schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_sweeper_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sweeper_interval_secs")]
    pub interval_secs: u64,
    /// How long an expired or soft-deleted link stays in storage
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

impl SweeperConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn grace_period(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.grace_period_secs).unwrap_or(i64::MAX))
    }
}

/// 邀请码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitesConfig {
    #[serde(default = "default_invites_enabled")]
    pub enabled: bool,
    /// Invites a level-2 token may hand out; level 3 and admin are unlimited
    #[serde(default = "default_invite_quota")]
    pub quota: i32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "shortkey.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_random_symbol_length() -> usize {
    6
}

fn default_admin_symbol_length() -> usize {
    4
}

fn default_sweeper_enabled() -> bool {
    true
}

fn default_sweeper_interval_secs() -> u64 {
    6 * 60 * 60
}

fn default_grace_period_secs() -> u64 {
    5 * 24 * 60 * 60
}

fn default_invites_enabled() -> bool {
    true
}

fn default_invite_quota() -> i32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            random_symbol_length: default_random_symbol_length(),
            admin_symbol_length: default_admin_symbol_length(),
            root_redirect: None,
        }
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweeper_enabled(),
            interval_secs: default_sweeper_interval_secs(),
            grace_period_secs: default_grace_period_secs(),
        }
    }
}

impl Default for InvitesConfig {
    fn default() -> Self {
        Self {
            enabled: default_invites_enabled(),
            quota: default_invite_quota(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
