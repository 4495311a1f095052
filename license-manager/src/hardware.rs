//! Identification of the machine, that the license is bound to.

use std::fs;

const MACHINE_ID_FILES: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// A string, that stays the same for this machine across reboots.
///
/// Uses the systemd machine id where available, and the host name otherwise.
pub fn machine_id() -> String {
    for path in MACHINE_ID_FILES {
        if let Ok(id) = fs::read_to_string(path) {
            let id = id.trim();
            if !id.is_empty() {
                return id.to_string();
            }
        }
    }
    let hostname = gethostname::gethostname().to_string_lossy().into_owned();
    if hostname.is_empty() {
        "unknown".to_string()
    } else {
        hostname
    }
}

#[cfg(test)]
mod tests {
    use super::machine_id;

    #[test]
    fn test_machine_id_is_stable() {
        let id = machine_id();
        assert!(!id.is_empty());
        assert_eq!(machine_id(), id);
    }
}
