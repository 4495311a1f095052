use crate::error::LicenseError;
use crate::record::{self, ActivationMode, LicenseRecord, LicenseState, HEADER_SIZE, PERPETUAL};
use chrono::{Months, NaiveDate};
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

pub const DEFAULT_TRIAL_DAYS: i64 = 15;

/// The license of one application version, stored in a license file.
///
/// The file may be shared with other applications; only the record with the matching name and
/// version is read and written. A missing or corrupt file is replaced by a new file with a fresh
/// trial.
#[derive(Clone, Debug)]
pub struct LicenseFile {
    path: PathBuf,
    application: String,
    version: String,
    trial_days: i64,
}

/// An opened license file, positioned on the record of the application.
struct OpenRecord {
    file: File,
    terms_position: u64,
    record: LicenseRecord,
}

impl LicenseFile {
    pub fn new(path: impl Into<PathBuf>, application: &str, version: &str) -> Self {
        LicenseFile {
            path: path.into(),
            application: application.to_string(),
            version: version.to_string(),
            trial_days: DEFAULT_TRIAL_DAYS,
        }
    }

    pub fn with_trial_days(mut self, trial_days: i64) -> Self {
        self.trial_days = trial_days;
        self
    }

    /// Checks the license at the given date and writes the updated remaining days back.
    pub fn check(&self, today: NaiveDate) -> Result<LicenseRecord, LicenseError> {
        let today = record::day_number(today);
        let mut open = self.open(today)?;
        if open.record.refresh(today) {
            open.write_terms()?;
        }
        Ok(open.record)
    }

    pub fn state(&self, today: NaiveDate) -> Result<LicenseState, LicenseError> {
        Ok(self.check(today)?.state)
    }

    /// Remaining days of the license: -1 if activated, 0 if invalid.
    pub fn remaining_days(&self, today: NaiveDate) -> Result<i64, LicenseError> {
        Ok(self.check(today)?.remaining_days())
    }

    /// Activates the license. The activation code must have been verified before.
    pub fn activate(
        &self,
        mode: ActivationMode,
        today: NaiveDate,
    ) -> Result<LicenseRecord, LicenseError> {
        let today_nr = record::day_number(today);
        let mut open = self.open(today_nr)?;
        let (expiry_day, valid_days) = match mode {
            ActivationMode::PerYear => {
                let expiry = today
                    .checked_add_months(Months::new(12))
                    .map_or(today_nr + 365, record::day_number);
                (expiry, expiry - today_nr)
            }
            ActivationMode::OneTime => (PERPETUAL, PERPETUAL),
        };
        open.record.start_day = today_nr;
        open.record.expiry_day = expiry_day;
        open.record.valid_days = valid_days;
        open.record.state = LicenseState::Activated;
        open.write_terms()?;
        info!("Activated license for {} {} ({:?})", self.application, self.version, mode);
        Ok(open.record)
    }

    pub fn deactivate(&self, today: NaiveDate) -> Result<LicenseRecord, LicenseError> {
        let today = record::day_number(today);
        let mut open = self.open(today)?;
        open.record.expiry_day = today;
        open.record.valid_days = 0;
        open.record.state = LicenseState::Invalid;
        open.write_terms()?;
        info!("Deactivated license for {} {}", self.application, self.version);
        Ok(open.record)
    }

    fn open(&self, today: i64) -> Result<OpenRecord, LicenseError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let records = match record::parse(&data) {
            Ok(records) => records,
            Err(e) => {
                if data.is_empty() {
                    debug!("Creating license file {}", self.path.display());
                } else {
                    warn!(
                        "License file {} is corrupt ({}). Replacing it.",
                        self.path.display(),
                        e
                    );
                }
                return self.recreate(file, today);
            }
        };

        let existing = records.into_iter().find(|(_, r)| {
            r.name == self.application && r.version == self.version
        });
        if let Some((terms_position, record)) = existing {
            return Ok(OpenRecord {
                file,
                terms_position,
                record,
            });
        }

        // first start of this application version
        let record = self.new_trial(today);
        let record_position = data.len() as u64;
        let mut buf = Vec::new();
        record::write_record(&mut buf, &record)?;
        file.seek(SeekFrom::Start(record_position))?;
        file.write_all(&buf)?;
        file.flush()?;
        Ok(OpenRecord {
            file,
            terms_position: record_position + record.terms_offset(),
            record,
        })
    }

    fn recreate(&self, mut file: File, today: i64) -> Result<OpenRecord, LicenseError> {
        let record = self.new_trial(today);
        let mut buf = Vec::new();
        record::write_header(&mut buf)?;
        record::write_record(&mut buf, &record)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&buf)?;
        file.flush()?;
        Ok(OpenRecord {
            file,
            terms_position: HEADER_SIZE + record.terms_offset(),
            record,
        })
    }

    fn new_trial(&self, today: i64) -> LicenseRecord {
        LicenseRecord::trial(&self.application, &self.version, today, self.trial_days)
    }
}

impl OpenRecord {
    /// Overwrites the terms of the record in place.
    fn write_terms(&mut self) -> Result<(), LicenseError> {
        let mut buf = Vec::with_capacity(32);
        record::write_terms(&mut buf, &self.record)?;
        self.file.seek(SeekFrom::Start(self.terms_position))?;
        self.file.write_all(&buf)?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::LicenseFile;
    use crate::record::{self, ActivationMode, LicenseState};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_start_creates_trial() {
        let dir = tempfile::tempdir().unwrap();
        let license = LicenseFile::new(dir.path().join("test.lic"), "viewer", "1.0");
        let today = date(2024, 3, 1);
        let rec = license.check(today).unwrap();
        assert_eq!(rec.state, LicenseState::Trial);
        assert_eq!(rec.valid_days, 15);
        assert_eq!(rec.start_day, record::day_number(today));
        assert_eq!(license.remaining_days(date(2024, 3, 11)).unwrap(), 5);
        assert_eq!(license.state(date(2024, 3, 16)).unwrap(), LicenseState::Invalid);
    }

    #[test]
    fn test_countdown_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lic");
        let license = LicenseFile::new(&path, "viewer", "1.0");
        license.check(date(2024, 3, 1)).unwrap();
        assert_eq!(license.remaining_days(date(2024, 3, 10)).unwrap(), 6);

        // turning the clock back does not restore the days
        let reopened = LicenseFile::new(&path, "viewer", "1.0");
        assert_eq!(reopened.state(date(2024, 3, 2)).unwrap(), LicenseState::Invalid);
        assert_eq!(reopened.remaining_days(date(2024, 3, 10)).unwrap(), 0);
    }

    #[test]
    fn test_records_of_other_applications_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lic");
        let viewer = LicenseFile::new(&path, "viewer", "1.0");
        let other = LicenseFile::new(&path, "viewer", "2.0").with_trial_days(30);
        viewer.check(date(2024, 3, 1)).unwrap();
        other.check(date(2024, 3, 5)).unwrap();

        assert_eq!(viewer.remaining_days(date(2024, 3, 6)).unwrap(), 10);
        assert_eq!(other.remaining_days(date(2024, 3, 6)).unwrap(), 29);
        let data = std::fs::read(&path).unwrap();
        assert_eq!(record::parse(&data).unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lic");
        std::fs::write(&path, b"definitely not a license").unwrap();
        let license = LicenseFile::new(&path, "viewer", "1.0");
        let rec = license.check(date(2024, 3, 1)).unwrap();
        assert_eq!(rec.state, LicenseState::Trial);
        let data = std::fs::read(&path).unwrap();
        assert_eq!(record::parse(&data).unwrap().len(), 1);
    }

    #[test]
    fn test_activation() {
        let dir = tempfile::tempdir().unwrap();
        let license = LicenseFile::new(dir.path().join("test.lic"), "viewer", "1.0");

        let rec = license.activate(ActivationMode::PerYear, date(2024, 3, 1)).unwrap();
        assert_eq!(rec.state, LicenseState::Activated);
        assert_eq!(rec.valid_days, 365);
        assert_eq!(license.state(date(2025, 2, 28)).unwrap(), LicenseState::Activated);
        assert_eq!(license.state(date(2025, 3, 1)).unwrap(), LicenseState::Invalid);

        license.activate(ActivationMode::OneTime, date(2025, 3, 2)).unwrap();
        assert_eq!(license.state(date(2099, 1, 1)).unwrap(), LicenseState::Activated);
        assert_eq!(license.remaining_days(date(2099, 1, 1)).unwrap(), -1);

        license.deactivate(date(2099, 1, 1)).unwrap();
        assert_eq!(license.state(date(2099, 1, 1)).unwrap(), LicenseState::Invalid);
    }
}
