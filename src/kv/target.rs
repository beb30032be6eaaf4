//! Connection target parsing.
//!
//! Targets use the URL shape produced by [`Settings::connection_string`]:
//! `dialect[+driver]://[user[:pass]@]host[:port]/name.db`. Only the SQLite
//! dialect can be opened, where the part after `sqlite://` is a path.
//!
//! [`Settings::connection_string`]: crate::settings::Settings::connection_string

use std::path::PathBuf;

use super::error::KvError;

const SQLITE_DIALECT: &str = "sqlite";
const MEMORY_PATH: &str = ":memory:";

/// A parsed, openable storage target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A database file.
    File(PathBuf),
    /// A private in-memory database, gone when the store is dropped.
    Memory,
}

impl ConnectionTarget {
    /// Parse a connection string.
    ///
    /// - `sqlite:///kv_db.db` opens `kv_db.db` relative to the working directory
    /// - `sqlite:////var/lib/kv.db` opens an absolute path
    /// - `sqlite://` and `sqlite:///:memory:` open an in-memory database
    pub fn parse(target: &str) -> Result<Self, KvError> {
        let (scheme, rest) = target.split_once("://").ok_or_else(|| {
            KvError::connection(format!("malformed connection target '{}'", target))
        })?;

        let dialect = scheme.split_once('+').map_or(scheme, |(d, _)| d);
        if !dialect.eq_ignore_ascii_case(SQLITE_DIALECT) {
            return Err(KvError::connection(format!(
                "unsupported dialect '{}' in '{}'",
                dialect, target
            )));
        }

        if rest.is_empty() {
            return Ok(Self::Memory);
        }

        // SQLite targets have an empty authority, so the path follows a '/'.
        let path = rest.strip_prefix('/').ok_or_else(|| {
            KvError::connection(format!(
                "sqlite target must not name a host: '{}'",
                target
            ))
        })?;

        match path {
            "" | MEMORY_PATH => Ok(Self::Memory),
            p => Ok(Self::File(PathBuf::from(p))),
        }
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}:///{}", SQLITE_DIALECT, path.display()),
            Self::Memory => write!(f, "{}:///{}", SQLITE_DIALECT, MEMORY_PATH),
        }
    }
}

impl std::str::FromStr for ConnectionTarget {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_absolute_paths() {
        assert_eq!(
            ConnectionTarget::parse("sqlite:///kv_db.db").unwrap(),
            ConnectionTarget::File(PathBuf::from("kv_db.db"))
        );
        assert_eq!(
            ConnectionTarget::parse("sqlite:////var/lib/kv.db").unwrap(),
            ConnectionTarget::File(PathBuf::from("/var/lib/kv.db"))
        );
    }

    #[test]
    fn test_memory_targets() {
        assert_eq!(ConnectionTarget::parse("sqlite://").unwrap(), ConnectionTarget::Memory);
        assert_eq!(
            ConnectionTarget::parse("sqlite:///:memory:").unwrap(),
            ConnectionTarget::Memory
        );
    }

    #[test]
    fn test_driver_suffix_is_ignored() {
        assert_eq!(
            ConnectionTarget::parse("sqlite+pysqlite:///a.db").unwrap(),
            ConnectionTarget::File(PathBuf::from("a.db"))
        );
    }

    #[test]
    fn test_rejections() {
        for bad in [
            "kv_db.db",
            "postgresql://user@localhost:5432/kv_db.db",
            "mysql+pymysql://localhost/kv_db.db",
            "sqlite://localhost/kv_db.db",
        ] {
            let err = ConnectionTarget::parse(bad).unwrap_err();
            assert!(matches!(err, KvError::Connection(_)), "{} gave {:?}", bad, err);
        }
    }

    #[test]
    fn test_display_round_trip() {
        let target = ConnectionTarget::parse("sqlite:///data/kv.db").unwrap();
        assert_eq!(target.to_string(), "sqlite:///data/kv.db");
        assert_eq!(target.to_string().parse::<ConnectionTarget>().unwrap(), target);
    }
}
