use crate::error::LicenseError;
use crate::file::LicenseFile;
use crate::hardware;
use crate::record::{ActivationMode, LicenseRecord, LicenseState};
use chrono::{Local, NaiveDate};
use log::debug;
use std::path::Path;

/// Number of hex digits in machine and activation codes.
const CODE_LENGTH: usize = 32;

/// Binds the license file of an application to the machine it runs on.
#[derive(Clone, Debug)]
pub struct LicenseManager {
    organization: String,
    application: String,
    version: String,
    hardware_id: String,
    file: LicenseFile,
}

impl LicenseManager {
    /// Manager for the license file of the organization in the given directory.
    pub fn new(directory: &Path, organization: &str, application: &str, version: &str) -> Self {
        let path = directory.join(Self::license_file_name(organization));
        debug!("License file: {}", path.display());
        LicenseManager {
            organization: organization.to_string(),
            application: application.to_string(),
            version: version.to_string(),
            hardware_id: hardware::machine_id(),
            file: LicenseFile::new(path, application, version),
        }
    }

    pub fn with_hardware_id(mut self, hardware_id: &str) -> Self {
        self.hardware_id = hardware_id.to_string();
        self
    }

    pub fn with_trial_days(mut self, trial_days: i64) -> Self {
        self.file = self.file.with_trial_days(trial_days);
        self
    }

    pub fn file(&self) -> &LicenseFile {
        &self.file
    }

    /// Name of the license file: every character of the organization name is shifted by its
    /// position, anything that is not alphanumeric becomes an underscore.
    pub fn license_file_name(organization: &str) -> String {
        let mut name: String = organization
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let shifted = char::from_u32(c as u32 + i as u32).unwrap_or('_');
                if shifted.is_ascii_alphanumeric() {
                    shifted
                } else {
                    '_'
                }
            })
            .collect();
        name.push_str(".lic");
        name
    }

    /// State of the license today.
    pub fn state(&self) -> Result<LicenseState, LicenseError> {
        self.file.state(today())
    }

    /// Remaining days of the license today: -1 if activated, 0 if invalid.
    pub fn remaining_days(&self) -> Result<i64, LicenseError> {
        self.file.remaining_days(today())
    }

    /// Code, that identifies this machine and application. The user sends it to the vendor to
    /// receive an activation code.
    pub fn machine_code(&self) -> String {
        let identity = hash_code(&format!(
            "{}{}{}",
            self.organization, self.application, self.version
        ));
        hash_code(&format!("{}{}", self.hardware_id, identity))
    }

    /// Computes the activation code for a user and a machine code.
    pub fn activation_code(user: &str, machine_code: &str) -> String {
        let user_code = hash_code(user);
        let mut mixed = String::with_capacity(2 * CODE_LENGTH);
        for (u, m) in user_code.chars().zip(machine_code.trim().chars().rev()) {
            mixed.push(u);
            mixed.push(m.to_ascii_uppercase());
        }
        hash_code(&mixed)
    }

    /// Activates the license, if the code is valid for the user and this machine.
    pub fn activate(
        &self,
        user: &str,
        activation_code: &str,
        mode: ActivationMode,
        today: NaiveDate,
    ) -> Result<LicenseRecord, LicenseError> {
        let expected = Self::activation_code(user, &self.machine_code());
        if !expected.eq_ignore_ascii_case(activation_code.trim()) {
            return Err(LicenseError::InvalidActivationCode);
        }
        self.file.activate(mode, today)
    }

    pub fn deactivate(&self, today: NaiveDate) -> Result<LicenseRecord, LicenseError> {
        self.file.deactivate(today)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Upper case hex digest, shortened to [CODE_LENGTH] digits.
fn hash_code(input: &str) -> String {
    let hex = blake3::hash(input.as_bytes()).to_hex();
    hex.as_str()[..CODE_LENGTH].to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::LicenseManager;
    use crate::error::LicenseError;
    use crate::record::{ActivationMode, LicenseState};
    use chrono::NaiveDate;

    fn manager(dir: &std::path::Path) -> LicenseManager {
        LicenseManager::new(dir, "DCLW", "Workbench", "1.0").with_hardware_id("machine-a")
    }

    #[test]
    fn test_license_file_name() {
        assert_eq!(LicenseManager::license_file_name("DCLW"), "DDNZ.lic");
        assert_eq!(LicenseManager::license_file_name("a b"), "a_d.lic");
    }

    #[test]
    fn test_machine_code_depends_on_machine() {
        let dir = tempfile::tempdir().unwrap();
        let code = manager(dir.path()).machine_code();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(code, manager(dir.path()).machine_code());
        let other = manager(dir.path()).with_hardware_id("machine-b");
        assert_ne!(code, other.machine_code());
    }

    #[test]
    fn test_activate_with_valid_code() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let code = LicenseManager::activation_code("alice", &manager.machine_code());

        let rec = manager
            .activate("alice", &code.to_lowercase(), ActivationMode::OneTime, today)
            .unwrap();
        assert_eq!(rec.state, LicenseState::Activated);
        assert_eq!(manager.file().state(today).unwrap(), LicenseState::Activated);
    }

    #[test]
    fn test_activate_with_wrong_code() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let code = LicenseManager::activation_code("bob", &manager.machine_code());

        let result = manager.activate("alice", &code, ActivationMode::PerYear, today);
        assert!(matches!(result, Err(LicenseError::InvalidActivationCode)));
        assert_eq!(manager.file().state(today).unwrap(), LicenseState::Trial);
    }
}
