//! Per-fabric collection.
//!
//! Aliases are shared by every switch in a fabric, so the zone dump is read
//! once (from the first reachable switch) before any port table is parsed.
//! Switches are then processed one after another; a failure on one switch
//! is recorded in its report and does not stop the others.

use log::{info, warn};

use crate::alias::{AliasDatabase, AliasExtraction, extract_aliases};
use crate::driver::{CommandRunner, Connector};
use crate::error::{Error, ParseAnomaly, Result};
use crate::inventory::switch_name;
use crate::platform::PlatformDefinition;
use crate::resolver::SwitchResolver;
use crate::switchshow::{PortTable, parse_port_table};

/// Result of processing one switch.
#[derive(Debug)]
pub struct SwitchReport {
    /// Host as listed in the inventory.
    pub host: String,

    /// Name used in reports.
    pub name: String,

    /// The parsed port table, or why it could not be obtained.
    pub outcome: std::result::Result<PortTable, Error>,
}

impl SwitchReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of processing one fabric.
#[derive(Debug)]
pub struct FabricReport {
    pub fabric: String,

    /// Zone dump, alias records and alias-block anomalies.
    pub zones: AliasExtraction,

    /// WWN to alias mapping used for every switch.
    pub aliases: AliasDatabase,

    /// Switches in inventory order.
    pub switches: Vec<SwitchReport>,
}

impl FabricReport {
    /// Every anomaly of the fabric, with the switch it came from.
    pub fn anomalies(&self) -> impl Iterator<Item = (&str, &ParseAnomaly)> {
        let zone = self.zones.anomalies.iter().map(|a| ("zone dump", a));
        let ports = self.switches.iter().flat_map(|s| {
            s.outcome
                .iter()
                .flat_map(|t| t.anomalies.iter())
                .map(move |a| (s.name.as_str(), a))
        });
        zone.chain(ports)
    }
}

/// Read the zone dump through `runner` and extract the fabric's aliases.
pub async fn load_aliases<R: CommandRunner>(
    runner: &mut R,
    platform: &PlatformDefinition,
) -> Result<AliasExtraction> {
    let lines = runner.run_lines(&platform.zone_dump_command).await?;
    Ok(extract_aliases(&lines))
}

/// Read and parse one switch's port table.
pub async fn collect_switch<R: CommandRunner>(
    runner: &mut R,
    aliases: &AliasDatabase,
    platform: &PlatformDefinition,
) -> Result<PortTable> {
    let lines = runner.run_lines(&platform.port_table_command).await?;
    let mut resolver = SwitchResolver::new(runner, aliases, platform);
    parse_port_table(&lines, &mut resolver).await
}

/// Process every switch of a fabric.
pub async fn collect_fabric<C: Connector>(
    connector: &C,
    fabric: &str,
    hosts: &[String],
    platform: &PlatformDefinition,
) -> FabricReport {
    let mut report = FabricReport {
        fabric: fabric.to_string(),
        zones: AliasExtraction::default(),
        aliases: AliasDatabase::new(),
        switches: Vec::with_capacity(hosts.len()),
    };
    let mut have_zones = false;

    for host in hosts {
        let name = switch_name(host).to_string();
        info!("{}: processing switch {}", fabric, name);

        let outcome: Result<PortTable> = async {
            let mut runner = connector.connect(host).await?;
            let result: Result<PortTable> = async {
                if !have_zones {
                    let zones = load_aliases(&mut runner, platform).await?;
                    for anomaly in &zones.anomalies {
                        warn!("{} ({}): {}", fabric, name, anomaly);
                    }
                    report.aliases = zones.database();
                    report.zones = zones;
                    have_zones = true;
                    info!("{}: {} alias entries", fabric, report.aliases.len());
                }
                collect_switch(&mut runner, &report.aliases, platform).await
            }
            .await;
            if let Err(e) = runner.close().await {
                warn!("{}: failed to close session: {}", name, e);
            }
            result
        }
        .await;

        match &outcome {
            Ok(table) => {
                for anomaly in &table.anomalies {
                    warn!("{}: {}", name, anomaly);
                }
                info!("{}: {} port record(s)", name, table.records.len());
            }
            Err(e) => warn!("{}: skipped: {}", name, e),
        }

        report.switches.push(SwitchReport {
            host: host.clone(),
            name,
            outcome,
        });
    }

    if !have_zones {
        warn!("{}: no switch returned a zone dump; aliases unavailable", fabric);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testing::{CannedConnector, CannedRunner};
    use crate::platform::brocade;

    const ZONESHOW: &str = "Defined configuration:
 alias:\thostA_hba0
\t\t50:06:0e:80:03:a2:90:01
 alias:\tlpar1_vfc0\tc0:50:76:00:5d:8a:00:08

Effective configuration:
";

    const SWITCHSHOW_1: &str = "switchName: san-a1
Index Port Address Media Speed State     Proto
==================================================
  0   0   010000   id    N8   Online      FC  F-Port  50:06:0e:80:03:a2:90:01
  1   1   010100   id    N8   Online      FC  F-Port  1 N Port + 1 NPIV public
";

    const PORTSHOW_1: &str = "portName:
portWwn of device(s) connected:
        10:00:00:00:c9:aa:bb:01
        c0:50:76:00:5d:8a:00:08
Distance:  normal
";

    const SWITCHSHOW_2: &str = "Area Port Media Speed State
==============================
  0   0   id    N4   Online   F-Port  c0:50:76:00:5d:8a:00:08
";

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[tokio::test]
    async fn test_collect_fabric() {
        let connector = CannedConnector::default()
            .with_switch(
                "san-a1.example.com",
                CannedRunner::new()
                    .with_output("zoneshow", ZONESHOW)
                    .with_output("switchshow", SWITCHSHOW_1)
                    .with_output("portshow 1", PORTSHOW_1),
            )
            .with_switch(
                "san-a2.example.com",
                CannedRunner::new().with_output("switchshow", SWITCHSHOW_2),
            );

        let report = collect_fabric(
            &connector,
            "fabric_a",
            &hosts(&["san-a1.example.com", "san-a2.example.com"]),
            &brocade::platform(),
        )
        .await;

        assert_eq!(report.aliases.len(), 2);
        assert_eq!(report.zones.records.len(), 2);
        assert_eq!(report.switches.len(), 2);
        assert_eq!(report.switches[0].name, "san-a1");

        let first = report.switches[0].outcome.as_ref().unwrap();
        assert_eq!(
            first.records[0].message(),
            Some("50:06:0e:80:03:a2:90:01 => hostA_hba0")
        );
        assert_eq!(
            first.records[1].message(),
            Some("10:00:00:00:c9:aa:bb:01 => no_alias | c0:50:76:00:5d:8a:00:08 => lpar1_vfc0")
        );

        // Aliases from the first switch's zone dump resolve on the second.
        let second = report.switches[1].outcome.as_ref().unwrap();
        assert_eq!(
            second.records[0].message(),
            Some("c0:50:76:00:5d:8a:00:08 => lpar1_vfc0")
        );
        assert_eq!(report.anomalies().count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_switch_does_not_stop_fabric() {
        let connector = CannedConnector::default().with_switch(
            "san-a2",
            CannedRunner::new()
                .with_output("zoneshow", ZONESHOW)
                .with_output("switchshow", SWITCHSHOW_2),
        );

        let report = collect_fabric(
            &connector,
            "fabric_a",
            &hosts(&["san-a1", "san-a2"]),
            &brocade::platform(),
        )
        .await;

        assert!(!report.switches[0].is_success());
        assert!(report.switches[1].is_success());
        // The zone dump comes from the first switch that answered.
        assert_eq!(report.aliases.len(), 2);
    }

    #[tokio::test]
    async fn test_port_lookup_failure_fails_only_that_switch() {
        let connector = CannedConnector::default()
            .with_switch(
                "san-a1",
                CannedRunner::new()
                    .with_output("zoneshow", ZONESHOW)
                    .with_output("switchshow", SWITCHSHOW_1)
                    .with_failure("portshow 1"),
            )
            .with_switch(
                "san-a2",
                CannedRunner::new().with_output("switchshow", SWITCHSHOW_2),
            );

        let report = collect_fabric(
            &connector,
            "fabric_a",
            &hosts(&["san-a1", "san-a2"]),
            &brocade::platform(),
        )
        .await;

        assert!(matches!(
            report.switches[0].outcome,
            Err(Error::Remote(_))
        ));
        assert!(report.switches[1].is_success());
    }

    #[tokio::test]
    async fn test_collect_switch_sequence() {
        let mut runner = CannedRunner::new()
            .with_output("switchshow", SWITCHSHOW_1)
            .with_output("portshow 1", PORTSHOW_1);
        let aliases = AliasDatabase::new();
        let table = collect_switch(&mut runner, &aliases, &brocade::platform())
            .await
            .unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(runner.history, vec!["switchshow", "portshow 1"]);
    }

    #[tokio::test]
    async fn test_zone_dump_anomalies_reported() {
        let zoneshow = " alias: a1 10:00:00:00:c9:00:00:01\nnot an alias line\n\n";
        let mut runner = CannedRunner::new().with_output("zoneshow", zoneshow);
        let zones = load_aliases(&mut runner, &brocade::platform()).await.unwrap();
        assert_eq!(zones.records.len(), 1);
        assert_eq!(zones.anomalies.len(), 1);
    }
}
