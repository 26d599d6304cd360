use std::path::Path;

use sqlx::mysql::{
  MySqlConnectOptions,
  MySqlPoolOptions,
  MySqlSslMode
};
use sqlx::sqlite::{
  SqliteConnectOptions,
  SqlitePoolOptions
};
use sqlx::{
  MySqlPool,
  SqlitePool
};

use crate::config::{
  ConfigError,
  ServerConfig,
  SqlDialect,
  TlsMode
};
use crate::errors::StoreError;
use crate::grocery_query::GroceryQuery;
use crate::rows::{
  self,
  GroceryRow
};

/// The one store handle shared by
/// every request. Cloning shares the
/// underlying pool.
#[derive(Clone, Debug)]

pub enum GroceryStore {
  MySql(MySqlPool),
  Sqlite(SqlitePool)
}

pub async fn connect_store(
  config: &ServerConfig,
  config_path: &Path
) -> Result<GroceryStore, ConfigError> {
  let max_connections =
    config.max_connections();

  match config.dialect()? {
    | SqlDialect::MySql => {
      let settings =
        config.mysql_settings()?;

      tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        tls = ?settings.tls,
        max_connections,
        "connecting to mysql"
      );

      let options =
        MySqlConnectOptions::new()
          .host(&settings.host)
          .port(settings.port)
          .username(&settings.user)
          .password(&settings.password)
          .database(&settings.name)
          .ssl_mode(ssl_mode(
            settings.tls
          ));

      let pool = MySqlPoolOptions::new()
        .max_connections(
          max_connections
        )
        .connect_with(options)
        .await
        .map_err(|e| {
          ConfigError::Invalid(format!(
            "mysql connect failed: {e}"
          ))
        })?;

      Ok(GroceryStore::MySql(pool))
    }
    | SqlDialect::Sqlite => {
      let base_dir = config_path
        .parent()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "config path has no parent"
              .into()
          )
        })?;

      let path =
        config.sqlite_path(base_dir);

      tracing::info!(
        path = %path.display(),
        max_connections,
        "opening sqlite store"
      );

      let options =
        SqliteConnectOptions::new()
          .filename(&path)
          .read_only(true);

      let pool =
        SqlitePoolOptions::new()
          .max_connections(
            max_connections
          )
          .connect_with(options)
          .await
          .map_err(|e| {
            ConfigError::Invalid(
              format!(
                "sqlite connect \
                 failed: {e}"
              )
            )
          })?;

      Ok(GroceryStore::Sqlite(pool))
    }
  }
}

impl GroceryStore {
  pub async fn fetch_groceries(
    &self,
    query: &GroceryQuery
  ) -> Result<
    Vec<GroceryRow>,
    StoreError
  > {
    tracing::debug!(
      shape = query.shape(),
      "grocery query"
    );

    match self {
      | Self::MySql(pool) => {
        let mut stmt =
          sqlx::query(query.sql());

        for value in query.binds() {
          stmt = stmt.bind(value);
        }

        let fetched =
          stmt.fetch_all(pool).await?;

        fetched
          .iter()
          .map(rows::mysql_row)
          .collect()
      }
      | Self::Sqlite(pool) => {
        let mut stmt =
          sqlx::query(query.sql());

        for value in query.binds() {
          stmt = stmt.bind(value);
        }

        let fetched =
          stmt.fetch_all(pool).await?;

        fetched
          .iter()
          .map(rows::sqlite_row)
          .collect()
      }
    }
  }

  pub async fn close(&self) {
    match self {
      | Self::MySql(pool) => {
        pool.close().await
      }
      | Self::Sqlite(pool) => {
        pool.close().await
      }
    }
  }

  pub fn dialect(&self) -> SqlDialect {
    match self {
      | Self::MySql(_) => SqlDialect::MySql,
      | Self::Sqlite(_) => {
        SqlDialect::Sqlite
      }
    }
  }
}

fn ssl_mode(
  tls: TlsMode
) -> MySqlSslMode {
  match tls {
    | TlsMode::Disabled => {
      MySqlSslMode::Disabled
    }
    | TlsMode::Preferred => {
      MySqlSslMode::Preferred
    }
    | TlsMode::Required => {
      MySqlSslMode::Required
    }
    | TlsMode::VerifyCa => {
      MySqlSslMode::VerifyCa
    }
    | TlsMode::VerifyIdentity => {
      MySqlSslMode::VerifyIdentity
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_tls_mode_maps_to_a_distinct_ssl_mode()
  {
    assert!(matches!(
      ssl_mode(TlsMode::Disabled),
      MySqlSslMode::Disabled
    ));
    assert!(matches!(
      ssl_mode(TlsMode::VerifyIdentity),
      MySqlSslMode::VerifyIdentity
    ));
    assert!(matches!(
      ssl_mode(TlsMode::VerifyCa),
      MySqlSslMode::VerifyCa
    ));
  }
}
