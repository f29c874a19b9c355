use serde::Deserialize;
use std::fmt;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub document_ai: DocumentAiConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 数据库连接配置: 优先使用 DATABASE_URL, 否则由 DB_* 拼装
#[derive(Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct DocumentAiConfig {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
    /// 未配置时从 metadata server 获取
    pub access_token: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

/// 环境变量的扁平映射 (config::Environment 会把 key 转为小写)
#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    server_host: Option<String>,
    port: Option<u16>,
    server_port: Option<u16>,
    database_url: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
    project_id: Option<String>,
    location: Option<String>,
    processor_id: Option<String>,
    documentai_access_token: Option<String>,
    documentai_endpoint: Option<String>,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PORT: u16 = 5432;

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        Self::from_config(settings)
    }

    pub fn from_config(settings: config::Config) -> Result<Self, ConfigError> {
        let env: EnvSettings = settings.try_deserialize()?;

        let document_ai = DocumentAiConfig {
            project_id: required(env.project_id, "PROJECT_ID")?,
            location: required(env.location, "LOCATION")?,
            processor_id: required(env.processor_id, "PROCESSOR_ID")?,
            access_token: non_empty(env.documentai_access_token),
            endpoint: non_empty(env.documentai_endpoint),
        };

        Ok(Self {
            server: ServerConfig {
                host: non_empty(env.server_host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: env.port.or(env.server_port).unwrap_or(DEFAULT_PORT),
            },
            database: DatabaseConfig {
                url: non_empty(env.database_url),
                host: non_empty(env.db_host),
                port: env.db_port.unwrap_or(DEFAULT_DB_PORT),
                user: non_empty(env.db_user),
                password: env.db_password,
                name: non_empty(env.db_name),
            },
            document_ai,
        })
    }
}

impl DatabaseConfig {
    /// 远程主机需要 TLS; 本机与 Cloud SQL unix socket 不需要
    pub fn requires_tls(&self) -> bool {
        match self.host.as_deref() {
            Some(host) => {
                host != "localhost" && host != "127.0.0.1" && !host.starts_with("/cloudsql/")
            }
            None => false,
        }
    }
}

impl DocumentAiConfig {
    /// projects/{project}/locations/{location}/processors/{processor}
    pub fn processor_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, self.processor_id
        )
    }

    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-documentai.googleapis.com", self.location),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Debug for DocumentAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAiConfig")
            .field("processor", &self.processor_path())
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::Missing(name))
}
