use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::places::StoredLocation;

/// Conditions that end the process, each with its own exit code.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("no target given")]
    NoTarget,

    #[error("cannot read location database {path}: {source}")]
    PlacesUnreadable { path: PathBuf, source: io::Error },

    #[error("{path}:{line}: unparseable location line: {text}")]
    BadPlacesLine { path: PathBuf, line: usize, text: String },

    #[error("no stored location matches '{0}'")]
    NoMatch(String),

    #[error("'{query}' matches {} stored locations", .candidates.len())]
    MultipleMatches { query: String, candidates: Vec<StoredLocation> },

    #[error("cannot resolve host {host}: {source}")]
    HostUnresolvable { host: String, source: io::Error },

    #[error("cannot create socket: {0}")]
    SocketCreate(io::Error),

    #[error("cannot connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("cannot close connection: {0}")]
    SocketClose(io::Error),

    #[error("position source i/o: {0}")]
    Io(io::Error),

    #[error("bad reply from position source: {0}")]
    Protocol(String),

    #[error("no reply from position source within {0:?}")]
    ReadTimeout(std::time::Duration),
}

impl FatalError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FatalError::NoTarget => 10,
            FatalError::PlacesUnreadable { .. } => 11,
            FatalError::BadPlacesLine { .. } => 12,
            FatalError::NoMatch(_) => 13,
            FatalError::MultipleMatches { .. } => 14,
            FatalError::HostUnresolvable { .. } => 15,
            FatalError::SocketCreate(_) => 16,
            FatalError::Connect { .. } => 17,
            FatalError::SocketClose(_) => 18,
            FatalError::Io(_) => 19,
            FatalError::Protocol(_) => 20,
            FatalError::ReadTimeout(_) => 21,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exit_codes_are_distinct() {
        let e = || io::Error::new(io::ErrorKind::Other, "x");
        let all = [
            FatalError::NoTarget,
            FatalError::PlacesUnreadable { path: "p".into(), source: e() },
            FatalError::BadPlacesLine { path: "p".into(), line: 1, text: "x".into() },
            FatalError::NoMatch("x".into()),
            FatalError::MultipleMatches { query: "x".into(), candidates: vec![] },
            FatalError::HostUnresolvable { host: "h".into(), source: e() },
            FatalError::SocketCreate(e()),
            FatalError::Connect { addr: "a".into(), source: e() },
            FatalError::SocketClose(e()),
            FatalError::Io(e()),
            FatalError::Protocol("x".into()),
            FatalError::ReadTimeout(std::time::Duration::from_secs(1)),
        ];
        let codes: HashSet<u8> = all.iter().map(|e| e.exit_code()).collect();
        assert_eq!(codes.len(), all.len());
        assert!(codes.iter().all(|&c| c >= 10));
    }

    #[test]
    fn test_messages() {
        let e = FatalError::BadPlacesLine { path: "places".into(), line: 3, text: "home".into() };
        assert_eq!(e.to_string(), "places:3: unparseable location line: home");
    }
}
