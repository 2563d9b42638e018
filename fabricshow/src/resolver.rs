//! WWN resolution for ports hosting several devices.
//!
//! L-Ports and NPIV F-Ports do not list their attached devices in the port
//! table. The per-port detail dump does:
//!
//! ```text
//! portWwn:        20:0e:00:05:1e:5b:2e:88
//! portWwn of device(s) connected:
//!         c0:50:76:00:5d:8a:00:08
//!         c0:50:76:00:5d:8a:00:0a
//! Distance:  normal
//! ```

use std::future::Future;

use log::debug;

use crate::alias::AliasDatabase;
use crate::driver::CommandRunner;
use crate::error::Result;
use crate::platform::PlatformDefinition;

/// Marks the start of the attached-device list in the port detail dump.
const DEVICE_LIST_HEADER: &str = "portWwn of device";

/// Marks the end of the attached-device list.
const DEVICE_LIST_END: &str = "Distance";

/// Lookups the port classifier needs while classifying a line.
pub trait PortResolver: Send {
    /// WWNs of the devices attached to `port`, in switch output order.
    fn port_devices(&mut self, port: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Alias of `wwn`, if it has one.
    fn alias(&self, wwn: &str) -> Option<&str>;
}

/// Extract the attached-device WWNs from a port detail dump.
///
/// Returns an empty list when the dump has no device section.
pub fn parse_port_devices<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut in_section = false;
    let mut wwns = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if !in_section {
            in_section = line.starts_with(DEVICE_LIST_HEADER);
            continue;
        }
        if line.starts_with(DEVICE_LIST_END) {
            break;
        }
        if let Some(wwn) = line.split_whitespace().next() {
            wwns.push(wwn.to_string());
        }
    }

    if !in_section {
        debug!("port detail output has no '{}' section", DEVICE_LIST_HEADER);
    }
    wwns
}

/// Resolver backed by a live switch session and the fabric's aliases.
pub struct SwitchResolver<'a, R> {
    runner: &'a mut R,
    aliases: &'a AliasDatabase,
    platform: &'a PlatformDefinition,
}

impl<'a, R: CommandRunner> SwitchResolver<'a, R> {
    pub fn new(runner: &'a mut R, aliases: &'a AliasDatabase, platform: &'a PlatformDefinition) -> Self {
        Self {
            runner,
            aliases,
            platform,
        }
    }
}

impl<R: CommandRunner> PortResolver for SwitchResolver<'_, R> {
    async fn port_devices(&mut self, port: &str) -> Result<Vec<String>> {
        let command = self.platform.port_detail(port);
        let lines = self.runner.run_lines(&command).await?;
        let wwns = parse_port_devices(&lines);
        debug!("port {}: {} attached device(s)", port, wwns.len());
        Ok(wwns)
    }

    fn alias(&self, wwn: &str) -> Option<&str> {
        self.aliases.lookup(wwn)
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::driver::testing::CannedRunner;
    use crate::platform::brocade;

    const PORTSHOW: &str = "portIndex:   4
portName: port4
portHealth: HEALTHY

portFlags: 0x24b03       PRESENT ACTIVE F_PORT G_PORT U_PORT NPIV LOGICAL_ONLINE LOGIN NOELP LED ACCEPT FLOGI
portType:  17.0
portWwn:   20:04:00:05:1e:5b:2e:88
portWwn of device(s) connected:
        c0:50:76:00:5d:8a:00:08
        c0:50:76:00:5d:8a:00:0a
        10:00:00:00:c9:aa:bb:01
Distance:  normal
portSpeed: N4Gbps
";

    #[test]
    fn test_devices_in_output_order() {
        let lines: Vec<&str> = PORTSHOW.lines().collect();
        assert_eq!(
            parse_port_devices(&lines),
            vec![
                "c0:50:76:00:5d:8a:00:08",
                "c0:50:76:00:5d:8a:00:0a",
                "10:00:00:00:c9:aa:bb:01",
            ]
        );
    }

    #[test]
    fn test_no_device_section() {
        let lines = ["portIndex: 4", "portName:", "Distance:  normal"];
        assert!(parse_port_devices(&lines).is_empty());
    }

    #[test]
    fn test_blank_lines_in_section_skipped() {
        let lines = [
            "portWwn of device(s) connected:",
            "",
            "\t10:00:00:00:c9:aa:bb:01",
            "Distance:  normal",
            "\t10:00:00:00:c9:aa:bb:02",
        ];
        assert_eq!(parse_port_devices(&lines), vec!["10:00:00:00:c9:aa:bb:01"]);
    }

    #[tokio::test]
    async fn test_switch_resolver_runs_port_detail() {
        let platform = brocade::platform();
        let mut aliases = AliasDatabase::new();
        aliases.insert("c0:50:76:00:5d:8a:00:08;", "lpar1_vfc0");
        let mut runner = CannedRunner::new().with_output("portshow 4", PORTSHOW);

        let mut resolver = SwitchResolver::new(&mut runner, &aliases, &platform);
        let wwns = assert_ok!(resolver.port_devices("4").await);
        assert_eq!(wwns.len(), 3);
        assert_eq!(resolver.alias(&wwns[0]), Some("lpar1_vfc0"));
        assert_eq!(resolver.alias(&wwns[1]), None);
        assert_eq!(runner.history, vec!["portshow 4"]);
    }

    #[tokio::test]
    async fn test_switch_resolver_remote_failure() {
        let platform = brocade::platform();
        let aliases = AliasDatabase::new();
        let mut runner = CannedRunner::new().with_failure("portshow 2/7");

        let mut resolver = SwitchResolver::new(&mut runner, &aliases, &platform);
        assert_err!(resolver.port_devices("2/7").await);
    }
}
