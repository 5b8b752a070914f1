use std::sync::Mutex;

use camino::Utf8Path;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::debug;

use crate::domain::{Platform, PlatformId, Sample, SampleId};
use crate::error::MicroarrayError;

const ALL_PLATFORMS_SQL: &str = "SELECT uuid, name FROM platforms ORDER BY name";

const PLATFORM_SQL: &str = "SELECT uuid, name FROM platforms WHERE uuid = ?1";

const PLATFORM_SAMPLES_SQL: &str =
    "SELECT uuid, array, name FROM samples WHERE platform = ?1 ORDER BY name";

const FIND_SAMPLES_SQL: &str = r"SELECT uuid, array, name FROM samples
    WHERE platform = ?1 AND name LIKE ?2 ESCAPE '\'
    ORDER BY array, name";

/// Read-only lookups over the platform and sample catalog.
pub trait Catalog: Send + Sync {
    fn platforms(&self) -> Result<Vec<Platform>, MicroarrayError>;
    fn platform(&self, id: &PlatformId) -> Result<Platform, MicroarrayError>;
    fn list_samples(&self, platform: &PlatformId) -> Result<Vec<Sample>, MicroarrayError>;
    /// Case-insensitive substring match on the sample name, ordered by array then name.
    fn search_samples(
        &self,
        platform: &PlatformId,
        query: &str,
    ) -> Result<Vec<Sample>, MicroarrayError>;
}

/// [`Catalog`] backed by a SQLite `samples.db`.
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    pub fn open(path: &Utf8Path) -> Result<Self, MicroarrayError> {
        if !path.as_std_path().is_file() {
            return Err(MicroarrayError::NotFound {
                path: path.to_owned(),
            });
        }
        let conn = Connection::open_with_flags(
            path.as_std_path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path, "opened sample catalog");
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, MicroarrayError>,
    ) -> Result<T, MicroarrayError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| MicroarrayError::Catalog("catalog connection poisoned".to_string()))?;
        f(&conn)
    }

    fn query_samples(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Sample>, MicroarrayError> {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(uuid, array, name)| {
                Ok(Sample {
                    id: parse_catalog_id::<SampleId>(&uuid)?,
                    array,
                    name,
                })
            })
            .collect()
    }
}

impl Catalog for SqliteCatalog {
    fn platforms(&self) -> Result<Vec<Platform>, MicroarrayError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(ALL_PLATFORMS_SQL)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(uuid, name)| {
                    Ok(Platform {
                        id: parse_catalog_id::<PlatformId>(&uuid)?,
                        name,
                    })
                })
                .collect()
        })
    }

    fn platform(&self, id: &PlatformId) -> Result<Platform, MicroarrayError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(PLATFORM_SQL)?;
            let name = stmt
                .query_row(params![id.as_str()], |row| row.get::<_, String>(1))
                .optional()?;
            match name {
                Some(name) => Ok(Platform {
                    id: id.clone(),
                    name,
                }),
                None => Err(MicroarrayError::PlatformNotFound(id.to_string())),
            }
        })
    }

    fn list_samples(&self, platform: &PlatformId) -> Result<Vec<Sample>, MicroarrayError> {
        let samples = self.with_conn(|conn| {
            Self::query_samples(conn, PLATFORM_SAMPLES_SQL, params![platform.as_str()])
        })?;
        debug!(platform = %platform, count = samples.len(), "listed samples");
        Ok(samples)
    }

    fn search_samples(
        &self,
        platform: &PlatformId,
        query: &str,
    ) -> Result<Vec<Sample>, MicroarrayError> {
        let pattern = format!("%{}%", escape_like(query));
        let samples = self.with_conn(|conn| {
            Self::query_samples(conn, FIND_SAMPLES_SQL, params![platform.as_str(), pattern])
        })?;
        debug!(platform = %platform, query, count = samples.len(), "searched samples");
        Ok(samples)
    }
}

fn parse_catalog_id<T>(raw: &str) -> Result<T, MicroarrayError>
where
    T: std::str::FromStr<Err = MicroarrayError>,
{
    raw.parse()
        .map_err(|err: MicroarrayError| MicroarrayError::Catalog(err.to_string()))
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
