//! Flat, append-only domain list: one normalized hostname per line.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Lines, Write},
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Reduce user input to a bare hostname.
///
/// `https://www.Example.com/status` becomes `example.com`. Stripping repeats
/// until nothing changes, so nested prefixes (`http://https://`, `www.www.`)
/// collapse and the result is a fixed point.
pub fn normalize_host(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();

    let mut host = lower.as_str();
    loop {
        let next = strip_once(host);
        if next == host {
            return host.to_string();
        }
        host = next;
    }
}

// Prefixes go one at a time; the path is only cut once none is left, so an
// inner `http://` is never mistaken for a path.
fn strip_once(host: &str) -> &str {
    let host = host.trim();
    for prefix in ["https://", "http://", "www."] {
        if let Some(rest) = host.strip_prefix(prefix) {
            return rest;
        }
    }
    let host = host.split_once('/').map_or(host, |(head, _path)| head);
    host.trim_end_matches('.')
}

#[derive(Clone, Debug)]
pub struct DomainList {
    path: PathBuf,
}

impl DomainList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize `raw` and append it as a new line. Returns the stored host.
    ///
    /// Duplicates are appended as-is.
    pub fn append(&self, raw: &str) -> Result<String> {
        let host = normalize_host(raw);
        if host.is_empty() {
            return Err(Error::InvalidHost(raw.to_string()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{host}")?;

        Ok(host)
    }

    /// Lazily read every host in file order, skipping blank lines.
    ///
    /// A missing file is `Error::NotFound`, distinct from other I/O faults.
    pub fn read_all(&self) -> Result<HostLines> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(HostLines {
            lines: BufReader::new(file).lines(),
        })
    }
}

/// Iterator over the normalized hosts of a domain list file.
pub struct HostLines {
    lines: Lines<BufReader<File>>,
}

impl Iterator for HostLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            let host = normalize_host(&line);
            if !host.is_empty() {
                return Some(Ok(host));
            }
        }
    }
}
