//! Text reports for a collected fabric.
//!
//! Three files are written per fabric into the output directory:
//!
//! - `zoneshow.<fabric>`: the zone dump, verbatim
//! - `aliases.<fabric>`: one `alias: <name> <members...>` line per alias
//! - `switchshow.<switch>`: the port table of each switch that succeeded

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::alias::AliasRecord;
use crate::collector::FabricReport;
use crate::error::Result;
use crate::switchshow::PortRecord;

/// Column heading of the port table report.
pub const PORT_TABLE_HEADING: &str = "Port Speed State    PortType  [WWN => alias] ...";

/// Width of the rule under the heading.
const RULE_WIDTH: usize = 48;

/// Render port records as the switchshow report.
pub fn render_port_table(records: &[PortRecord]) -> String {
    let mut out = String::new();
    out.push_str(PORT_TABLE_HEADING);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    for record in records {
        let _ = write!(
            out,
            "{:>2}   {}    {:<9}",
            record.port,
            record.speed,
            record.state.as_str()
        );
        if let Some(detail) = &record.detail {
            let _ = write!(out, " {}   {}", detail.port_type, detail.message);
        }
        out.push('\n');
    }
    out
}

/// Render alias records, one per line.
pub fn render_aliases(records: &[AliasRecord]) -> String {
    records.iter().map(|r| format!("{}\n", r)).collect()
}

/// Render the zone dump as it was received.
pub fn render_zone_dump<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|l| format!("{}\n", l.as_ref())).collect()
}

/// Write the report files of `report` into `dir`.
///
/// Returns the paths written. Switches whose collection failed get no file.
pub async fn write_fabric_report(dir: impl AsRef<Path>, report: &FabricReport) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let mut files = vec![
        (
            dir.join(format!("zoneshow.{}", report.fabric)),
            render_zone_dump(&report.zones.raw),
        ),
        (
            dir.join(format!("aliases.{}", report.fabric)),
            render_aliases(&report.zones.records),
        ),
    ];
    for switch in &report.switches {
        if let Ok(table) = &switch.outcome {
            files.push((
                dir.join(format!("switchshow.{}", switch.name)),
                render_port_table(&table.records),
            ));
        }
    }

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        debug!("Writing {} ({} bytes)", path.display(), contents.len());
        tokio::fs::write(&path, contents).await?;
        written.push(path);
    }
    info!("{}: wrote {} report file(s) to {}", report.fabric, written.len(), dir.display());
    Ok(written)
}
