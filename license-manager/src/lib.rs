//! A file based trial license.
//!
//! The license file holds one record per application and version. On first use a trial record
//! is created. Every check counts down the remaining days and writes them back into the file,
//! so that the trial ends after a fixed number of days, even if the clock is turned back.

mod error;
mod file;
pub mod hardware;
mod manager;
mod record;

pub use error::LicenseError;
pub use file::{DEFAULT_TRIAL_DAYS, LicenseFile};
pub use manager::LicenseManager;
pub use record::{ActivationMode, LicenseRecord, LicenseState, date_of_day, day_number};
