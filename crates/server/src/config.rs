use std::path::{
  Path,
  PathBuf
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]

pub enum ConfigError {
  #[error("config IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("config parse error: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("config invalid: {0}")]
  Invalid(String)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum SqlDialect {
  MySql,
  Sqlite
}

/// Transport security toward the
/// store. One policy for every
/// dialect that speaks TLS.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum TlsMode {
  Disabled,
  Preferred,
  Required,
  VerifyCa,
  VerifyIdentity
}

#[derive(Debug, Deserialize)]

pub struct ServerConfig {
  pub http:     HttpConfig,
  pub database: DatabaseConfig,
  #[serde(default)]
  pub sqlite:   SqliteConfig,
  #[serde(default)]
  pub logging:  LoggingConfig
}

#[derive(Debug, Deserialize)]

pub struct HttpConfig {
  pub host: String,
  pub port: u16
}

#[derive(Debug, Deserialize)]

pub struct DatabaseConfig {
  pub dialect:         String,
  pub host:            Option<String>,
  pub port:            Option<u16>,
  pub name:            Option<String>,
  pub user:            Option<String>,
  pub password:        Option<String>,
  pub tls:             Option<String>,
  pub max_connections: Option<u32>
}

#[derive(Debug, Default, Deserialize)]

pub struct SqliteConfig {
  pub path: Option<String>
}

#[derive(Debug, Default, Deserialize)]

pub struct LoggingConfig {
  pub level: Option<String>
}

/// Fully resolved MySQL connection
/// settings.
#[derive(Debug, Clone)]

pub struct MySqlSettings {
  pub host:     String,
  pub port:     u16,
  pub name:     String,
  pub user:     String,
  pub password: String,
  pub tls:      TlsMode
}

pub const DEFAULT_MYSQL_PORT: u16 =
  3306;

pub const DEFAULT_MAX_CONNECTIONS: u32 =
  5;

impl ServerConfig {
  pub async fn load(
    path: &Path
  ) -> Result<Self, ConfigError> {
    let base_dir = path
      .parent()
      .ok_or_else(|| {
        ConfigError::Invalid(
          "config path has no parent"
            .into()
        )
      })?;

    let schema_path = base_dir
      .join("schemas")
      .join("server.schema.json");

    let schema =
      load_schema(&schema_path).await?;

    let content =
      tokio::fs::read_to_string(path)
        .await?;

    let mut config = Self::parse(
      &schema,
      &content,
      &path.display().to_string()
    )?;

    config.apply_env_overrides(
      |key| std::env::var(key).ok()
    )?;

    Ok(config)
  }

  pub fn parse(
    schema: &str,
    content: &str,
    name: &str
  ) -> Result<Self, ConfigError> {
    validate_toml(
      schema, content, name
    )?;

    let config: ServerConfig =
      toml::from_str(content)?;

    Ok(config)
  }

  /// Overlays `DB_HOST`, `DB_PORT`,
  /// `DB_USER`, `DB_NAME` and
  /// `DB_PASSWORD` on top of the file
  /// values. Blank variables are
  /// ignored.
  pub fn apply_env_overrides<F>(
    &mut self,
    lookup: F
  ) -> Result<(), ConfigError>
  where
    F: Fn(&str) -> Option<String>
  {
    let get = |key: &str| {
      lookup(key).filter(|v| {
        !v.trim().is_empty()
      })
    };

    let db = &mut self.database;

    if let Some(host) = get("DB_HOST") {
      db.host = Some(host);
    }

    if let Some(user) = get("DB_USER") {
      db.user = Some(user);
    }

    if let Some(name) = get("DB_NAME") {
      db.name = Some(name);
    }

    if let Some(password) =
      get("DB_PASSWORD")
    {
      db.password = Some(password);
    }

    if let Some(port) = get("DB_PORT") {
      let parsed = port
        .trim()
        .parse::<u16>()
        .map_err(|e| {
          ConfigError::Invalid(format!(
            "invalid DB_PORT \
             '{port}': {e}"
          ))
        })?;

      db.port = Some(parsed);
    }

    Ok(())
  }

  pub fn dialect(
    &self
  ) -> Result<SqlDialect, ConfigError>
  {
    match self
      .database
      .dialect
      .trim()
      .to_lowercase()
      .as_str()
    {
      | "mysql" => Ok(SqlDialect::MySql),
      | "sqlite" => {
        Ok(SqlDialect::Sqlite)
      }
      | other => {
        Err(ConfigError::Invalid(
          format!(
            "invalid database.dialect \
             '{other}'"
          )
        ))
      }
    }
  }

  pub fn tls_mode(
    &self
  ) -> Result<TlsMode, ConfigError> {
    match self.database.tls.as_deref() {
      | None => {
        Ok(TlsMode::VerifyIdentity)
      }
      | Some(raw) => TlsMode::parse(raw)
    }
  }

  pub fn max_connections(&self) -> u32 {
    self
      .database
      .max_connections
      .unwrap_or(DEFAULT_MAX_CONNECTIONS)
      .max(1)
  }

  pub fn mysql_settings(
    &self
  ) -> Result<MySqlSettings, ConfigError>
  {
    let db = &self.database;

    Ok(MySqlSettings {
      host:     required(
        db.host.as_deref(),
        "database.host",
        "DB_HOST"
      )?,
      port:     db
        .port
        .unwrap_or(DEFAULT_MYSQL_PORT),
      name:     required(
        db.name.as_deref(),
        "database.name",
        "DB_NAME"
      )?,
      user:     required(
        db.user.as_deref(),
        "database.user",
        "DB_USER"
      )?,
      password: db
        .password
        .clone()
        .unwrap_or_default(),
      tls:      self.tls_mode()?
    })
  }

  pub fn sqlite_path(
    &self,
    base_dir: &Path
  ) -> PathBuf {
    let raw = self
      .sqlite
      .path
      .as_deref()
      .unwrap_or("")
      .trim();

    if raw.is_empty() {
      return base_dir
        .join("server.sqlite");
    }

    base_dir.join(raw)
  }

  pub fn log_level(&self) -> &str {
    self
      .logging
      .level
      .as_deref()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .unwrap_or("info")
  }
}

impl TlsMode {
  pub fn parse(
    raw: &str
  ) -> Result<Self, ConfigError> {
    match raw
      .trim()
      .to_lowercase()
      .as_str()
    {
      | "disabled" => Ok(Self::Disabled),
      | "preferred" => {
        Ok(Self::Preferred)
      }
      | "required" => Ok(Self::Required),
      | "verify_ca" => Ok(Self::VerifyCa),
      | "verify_identity" => {
        Ok(Self::VerifyIdentity)
      }
      | other => {
        Err(ConfigError::Invalid(
          format!(
            "invalid database.tls \
             '{other}'"
          )
        ))
      }
    }
  }
}

fn required(
  value: Option<&str>,
  field: &str,
  env: &str
) -> Result<String, ConfigError> {
  match value.map(str::trim) {
    | Some(v) if !v.is_empty() => {
      Ok(v.to_string())
    }
    | _ => {
      Err(ConfigError::Invalid(format!(
        "{field} missing (set {env})"
      )))
    }
  }
}

async fn load_schema(
  path: &Path
) -> Result<String, ConfigError> {
  tokio::fs::read_to_string(path)
    .await
    .map_err(|e| {
      ConfigError::Invalid(format!(
        "schema not found at {} ({e})",
        path.display()
      ))
    })
}

/// Most schema violations reported
/// per load.
const MAX_SCHEMA_MESSAGES: usize = 5;

fn validate_toml(
  schema: &str,
  toml_input: &str,
  name: &str
) -> Result<(), ConfigError> {
  let invalid = |what: &str, e: &dyn std::fmt::Display| {
    ConfigError::Invalid(format!(
      "{what}: {e}"
    ))
  };

  let schema_json: serde_json::Value =
    serde_json::from_str(schema)
      .map_err(|e| {
        invalid("schema parse error", &e)
      })?;

  let validator =
    jsonschema::validator_for(
      &schema_json
    )
    .map_err(|e| {
      invalid("schema compile error", &e)
    })?;

  let document = toml::from_str::<
    toml::Value
  >(toml_input)
  .map_err(|e| invalid(name, &e))
  .and_then(|doc| {
    serde_json::to_value(doc).map_err(
      |e| invalid(name, &e)
    )
  })?;

  let messages: Vec<String> = validator
    .iter_errors(&document)
    .take(MAX_SCHEMA_MESSAGES)
    .map(|e| e.to_string())
    .collect();

  if messages.is_empty() {
    return Ok(());
  }

  Err(ConfigError::Invalid(format!(
    "schema validation failed for \
     {name}: {}",
    messages.join("; ")
  )))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  const SCHEMA: &str = include_str!(
    "../res/schemas/server.schema.json"
  );

  const SHIPPED: &str =
    include_str!("../res/config.toml");

  fn parse(
    content: &str
  ) -> Result<ServerConfig, ConfigError>
  {
    ServerConfig::parse(
      SCHEMA, content, "test.toml"
    )
  }

  fn env(
    pairs: &[(&str, &str)]
  ) -> impl Fn(&str) -> Option<String>
  {
    let map: HashMap<String, String> =
      pairs
        .iter()
        .map(|(k, v)| {
          (k.to_string(), v.to_string())
        })
        .collect();

    move |key| map.get(key).cloned()
  }

  #[test]
  fn shipped_config_is_valid() {
    let config = parse(SHIPPED)
      .expect("shipped config");

    assert_eq!(
      config.dialect().unwrap(),
      SqlDialect::MySql
    );
    assert_eq!(
      config.tls_mode().unwrap(),
      TlsMode::VerifyIdentity
    );
    assert_eq!(config.log_level(), "info");
  }

  #[test]
  fn unknown_keys_fail_schema_validation()
  {
    let err = parse(
      "[http]\nhost = \"h\"\nport = \
       1\n[database]\ndialect = \
       \"mysql\"\nssl = true\n"
    )
    .unwrap_err();

    assert!(
      err
        .to_string()
        .contains("schema validation")
    );
  }

  #[test]
  fn unsupported_dialect_is_rejected() {
    let err = parse(
      "[http]\nhost = \"h\"\nport = \
       1\n[database]\ndialect = \
       \"oracle\"\n"
    )
    .unwrap_err();

    assert!(matches!(
      err,
      ConfigError::Invalid(_)
    ));
  }

  #[test]
  fn env_overrides_file_values() {
    let mut config = parse(
      "[http]\nhost = \"h\"\nport = \
       1\n[database]\ndialect = \
       \"mysql\"\nhost = \"file-host\"\n\
       user = \"file-user\"\n"
    )
    .unwrap();

    config
      .apply_env_overrides(env(&[
        ("DB_HOST", "db.internal"),
        ("DB_NAME", "groceries"),
        ("DB_PASSWORD", "secret"),
        ("DB_USER", "  ")
      ]))
      .unwrap();

    let settings =
      config.mysql_settings().unwrap();

    assert_eq!(
      settings.host,
      "db.internal"
    );
    assert_eq!(settings.user, "file-user");
    assert_eq!(settings.name, "groceries");
    assert_eq!(settings.password, "secret");
    assert_eq!(
      settings.port,
      DEFAULT_MYSQL_PORT
    );
  }

  #[test]
  fn bad_db_port_is_rejected() {
    let mut config = parse(SHIPPED)
      .unwrap();

    let err = config
      .apply_env_overrides(env(&[(
        "DB_PORT", "not-a-port"
      )]))
      .unwrap_err();

    assert!(
      err.to_string().contains("DB_PORT")
    );
  }

  #[test]
  fn missing_host_names_the_variable() {
    let config = parse(SHIPPED).unwrap();

    let err =
      config.mysql_settings().unwrap_err();

    assert!(
      err.to_string().contains("DB_HOST")
    );
  }

  #[test]
  fn tls_modes_parse() {
    assert_eq!(
      TlsMode::parse("Disabled").unwrap(),
      TlsMode::Disabled
    );
    assert_eq!(
      TlsMode::parse(" verify_ca ")
        .unwrap(),
      TlsMode::VerifyCa
    );
    assert!(
      TlsMode::parse("maybe").is_err()
    );
  }

  #[test]
  fn sqlite_path_is_relative_to_config() {
    let config = parse(
      "[http]\nhost = \"h\"\nport = \
       1\n[database]\ndialect = \
       \"sqlite\"\n"
    )
    .unwrap();

    let base = Path::new("/etc/dino");

    assert_eq!(
      config.sqlite_path(base),
      base.join("server.sqlite")
    );
    assert_eq!(
      config.max_connections(),
      DEFAULT_MAX_CONNECTIONS
    );
  }
}
