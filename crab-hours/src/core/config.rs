use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::utils::time;

const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// 营业时间服务配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (支持 `.env` 文件)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/crab/hours | 工作目录 |
/// | SCHEDULE_FILE | {WORK_DIR}/store_hours.json | 营业时间文件 |
/// | STORE_TIMEZONE | Europe/Madrid | 门店时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 (production 下始终开启) |
/// | LOG_DIR | (无) | 文件日志目录 |
/// | WATCH_INTERVAL_SECS | 60 | 状态轮询间隔 (秒) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// STORE_TIMEZONE=Europe/Lisbon SCHEDULE_FILE=./hours.json crab-hours status
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 营业时间 JSON 文件
    pub schedule_file: String,
    /// 门店时区，所有营业时间按此时区的墙钟时间解释
    pub timezone: Tz,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 状态轮询间隔 (秒, 最小 1)
    pub watch_interval_secs: u64,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 被默认值替换的无效配置 (日志初始化之前无法输出)
    fallbacks: Vec<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 先读取 `.env` (若存在)，未设置或无效的值使用默认值
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置 (测试中避免修改进程环境变量)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let work_dir = lookup("WORK_DIR").unwrap_or_else(|| "/var/lib/crab/hours".into());
        let schedule_file = lookup("SCHEDULE_FILE").unwrap_or_else(|| {
            PathBuf::from(&work_dir)
                .join("store_hours.json")
                .to_string_lossy()
                .into_owned()
        });

        let mut fallbacks = Vec::new();

        let timezone = match lookup("STORE_TIMEZONE") {
            Some(name) => time::parse_timezone(&name).unwrap_or_else(|e| {
                fallbacks.push(format!(
                    "Invalid STORE_TIMEZONE '{}': {}, falling back to {}",
                    name, e, DEFAULT_TIMEZONE
                ));
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        let watch_interval_secs = match lookup("WATCH_INTERVAL_SECS") {
            Some(v) => v.parse::<u64>().unwrap_or_else(|_| {
                fallbacks.push(format!(
                    "Invalid WATCH_INTERVAL_SECS '{}', falling back to 60",
                    v
                ));
                60
            }),
            None => 60,
        }
        .max(1);

        Self {
            work_dir,
            schedule_file,
            timezone,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|v| !v.is_empty()),
            watch_interval_secs,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            fallbacks,
        }
    }

    /// 加载时被默认值替换的配置项说明，由调用方在 `init_logging` 之后记录
    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    pub fn schedule_path(&self) -> PathBuf {
        PathBuf::from(&self.schedule_file)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
