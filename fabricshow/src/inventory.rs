//! Fabric inventory file.
//!
//! Assigns switch hosts to fabrics, one per line:
//!
//! ```text
//! # host                  fabric
//! san-a1.example.com  =>  fabric_a
//! san-a2.example.com  =>  fabric_a
//! 10.20.0.5           =>  fabric_b
//! ```
//!
//! Comment lines, lines starting with a space, and lines of four
//! characters or fewer are ignored.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;

use crate::error::{ConfigError, Error, Result};

/// Default inventory file name.
pub const DEFAULT_INVENTORY: &str = "fabricshow.conf";

/// Domains after which a host name is reported by its first label only.
const SHORTENED_DOMAINS: &[&str] = &[".com", ".net", ".org"];

/// Switch hosts grouped by fabric, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    fabrics: IndexMap<String, Vec<String>>,
}

impl Inventory {
    /// Read and parse an inventory file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let inventory: Inventory = text.parse()?;
        debug!(
            "Loaded {} fabric(s) from {}",
            inventory.fabrics.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Hosts of a fabric, in file order.
    pub fn fabric(&self, name: &str) -> Result<&[String]> {
        self.fabrics
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ConfigError::UnknownFabric {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Fabric names, in file order.
    pub fn fabric_names(&self) -> impl Iterator<Item = &str> {
        self.fabrics.keys().map(String::as_str)
    }

    /// Add a host to a fabric.
    pub fn add(&mut self, host: impl Into<String>, fabric: impl Into<String>) {
        self.fabrics.entry(fabric.into()).or_default().push(host.into());
    }
}

impl FromStr for Inventory {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut inventory = Inventory::default();

        for (index, line) in text.lines().enumerate() {
            if line.starts_with('#') || line.starts_with(' ') || line.len() <= 4 {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.len() != 3 || words[1] != "=>" {
                return Err(ConfigError::InvalidLine {
                    line_no: index + 1,
                    line: line.trim().to_string(),
                }
                .into());
            }
            inventory.add(words[0], words[2]);
        }

        Ok(inventory)
    }
}

/// Name a switch is reported under.
///
/// Fully qualified names in common public domains are shortened to their
/// first label; anything else (IP addresses, internal domains) is kept.
pub fn switch_name(host: &str) -> &str {
    if SHORTENED_DOMAINS.iter().any(|d| host.ends_with(d)) {
        host.split('.').next().unwrap_or(host)
    } else {
        host
    }
}
