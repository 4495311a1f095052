//! The binary layout of the license file.
//!
//! All numbers are big endian. The file starts with a header (magic number and format version,
//! both i64). Then follow the records, each one consisting of the application name and
//! version (u32 length followed by the utf-8 bytes) and the four i64 terms
//! `start_day`, `expiry_day`, `valid_days` and `state`.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{Datelike, NaiveDate};
use std::io::{self, Cursor, Read, Write};

pub const MAGIC_NUMBER: i64 = 0x1991_1211;
pub const FORMAT_VERSION: i64 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: u64 = 16;

/// Value of `expiry_day` and `valid_days` of a license that never expires.
pub const PERPETUAL: i64 = -1;

/// Days from 0001-01-01 (day 1) to 1900-01-01 (day 0 in the license file).
const DAYS_CE_TO_1900: i64 = 693_596;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LicenseState {
    Invalid,
    Trial,
    Activated,
}

/// How long an activation lasts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ActivationMode {
    /// The license expires one year after the activation.
    PerYear,

    /// The license never expires.
    OneTime,
}

/// The license of one application version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LicenseRecord {
    pub name: String,
    pub version: String,
    pub start_day: i64,
    pub expiry_day: i64,
    pub valid_days: i64,
    pub state: LicenseState,
}

/// Converts a date to the day number stored in the license file (days since 1900-01-01).
pub fn day_number(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - DAYS_CE_TO_1900
}

/// Inverse of [day_number].
pub fn date_of_day(day: i64) -> Option<NaiveDate> {
    let days_ce = i32::try_from(day + DAYS_CE_TO_1900).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days_ce)
}

impl LicenseState {
    fn code(&self) -> i64 {
        match self {
            LicenseState::Invalid => 0x0,
            LicenseState::Trial => 0x1111,
            LicenseState::Activated => 0x1111_1111,
        }
    }

    /// Unknown values count as invalid.
    fn from_code(code: i64) -> Self {
        match code {
            0x1111 => LicenseState::Trial,
            0x1111_1111 => LicenseState::Activated,
            _ => LicenseState::Invalid,
        }
    }
}

impl LicenseRecord {
    /// A fresh trial, that starts at `today`.
    pub fn trial(name: &str, version: &str, today: i64, trial_days: i64) -> Self {
        LicenseRecord {
            name: name.to_string(),
            version: version.to_string(),
            start_day: today,
            expiry_day: today + trial_days,
            valid_days: trial_days,
            state: LicenseState::Trial,
        }
    }

    pub fn is_perpetual(&self) -> bool {
        self.state == LicenseState::Activated && self.expiry_day == PERPETUAL
    }

    /// Counts down the remaining days. Returns true, if the terms changed and need to be written
    /// back into the file.
    ///
    /// A record whose remaining days would grow (because the clock was turned back) becomes
    /// invalid.
    pub fn refresh(&mut self, today: i64) -> bool {
        if self.is_perpetual() || self.state == LicenseState::Invalid {
            return false;
        }
        let remaining = self.expiry_day - today;
        let (valid_days, state) = if remaining <= 0 || self.valid_days <= 0 || today < self.start_day
        {
            (0, LicenseState::Invalid)
        } else if remaining <= self.valid_days {
            (remaining, self.state)
        } else {
            (0, LicenseState::Invalid)
        };
        let changed = valid_days != self.valid_days || state != self.state;
        self.valid_days = valid_days;
        self.state = state;
        changed
    }

    /// Remaining days of the license: -1 for an activated license, 0 for an invalid one.
    pub fn remaining_days(&self) -> i64 {
        match self.state {
            LicenseState::Activated => PERPETUAL,
            LicenseState::Trial => self.valid_days,
            LicenseState::Invalid => 0,
        }
    }

    /// Size in bytes of the name and version fields, i.e. the offset of the terms relative to the
    /// start of the record.
    pub fn terms_offset(&self) -> u64 {
        (4 + self.name.len() + 4 + self.version.len()) as u64
    }
}

pub fn write_header<W: Write>(wr: &mut W) -> io::Result<()> {
    wr.write_i64::<BigEndian>(MAGIC_NUMBER)?;
    wr.write_i64::<BigEndian>(FORMAT_VERSION)?;
    Ok(())
}

pub fn write_record<W: Write>(wr: &mut W, record: &LicenseRecord) -> io::Result<()> {
    write_string(wr, &record.name)?;
    write_string(wr, &record.version)?;
    write_terms(wr, record)
}

pub fn write_terms<W: Write>(wr: &mut W, record: &LicenseRecord) -> io::Result<()> {
    wr.write_i64::<BigEndian>(record.start_day)?;
    wr.write_i64::<BigEndian>(record.expiry_day)?;
    wr.write_i64::<BigEndian>(record.valid_days)?;
    wr.write_i64::<BigEndian>(record.state.code())?;
    Ok(())
}

fn write_string<W: Write>(wr: &mut W, value: &str) -> io::Result<()> {
    wr.write_u32::<BigEndian>(value.len() as u32)?;
    wr.write_all(value.as_bytes())
}

/// Parses the whole license file.
///
/// Returns the records together with the absolute position of their terms in the file.
pub fn parse(data: &[u8]) -> io::Result<Vec<(u64, LicenseRecord)>> {
    let mut rd = Cursor::new(data);
    let magic = rd.read_i64::<BigEndian>()?;
    if magic != MAGIC_NUMBER {
        return Err(corrupt("Wrong magic number"));
    }
    let version = rd.read_i64::<BigEndian>()?;
    if version != FORMAT_VERSION {
        return Err(corrupt(format!("Unsupported format version: {version}")));
    }

    let mut records = Vec::new();
    while (rd.position() as usize) < data.len() {
        let name = read_string(&mut rd)?;
        let version = read_string(&mut rd)?;
        let terms_position = rd.position();
        let record = LicenseRecord {
            name,
            version,
            start_day: rd.read_i64::<BigEndian>()?,
            expiry_day: rd.read_i64::<BigEndian>()?,
            valid_days: rd.read_i64::<BigEndian>()?,
            state: LicenseState::from_code(rd.read_i64::<BigEndian>()?),
        };
        records.push((terms_position, record));
    }
    Ok(records)
}

fn read_string(rd: &mut Cursor<&[u8]>) -> io::Result<String> {
    let len = rd.read_u32::<BigEndian>()? as u64;
    let remaining = rd.get_ref().len() as u64 - rd.position();
    if len > remaining {
        return Err(corrupt("String exceeds the end of the file"));
    }
    let mut bytes = vec![0; len as usize];
    rd.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| corrupt(e.to_string()))
}

fn corrupt(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_numbers() {
        assert_eq!(day_number(date(1900, 1, 1)), 0);
        assert_eq!(day_number(date(1900, 1, 2)), 1);
        assert_eq!(day_number(date(2000, 1, 1)), 36524);
        assert_eq!(date_of_day(36524), Some(date(2000, 1, 1)));
    }

    #[test]
    fn test_parse_written_file() {
        let first = LicenseRecord::trial("viewer", "1.0", 100, 15);
        let mut second = LicenseRecord::trial("other", "2.1", 200, 30);
        second.state = LicenseState::Activated;

        let mut data = Vec::new();
        write_header(&mut data).unwrap();
        write_record(&mut data, &first).unwrap();
        write_record(&mut data, &second).unwrap();

        let records = parse(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, HEADER_SIZE + first.terms_offset());
        assert_eq!(records[0].1, first);
        assert_eq!(records[1].1, second);
        assert_eq!(&data[16..20], &[0, 0, 0, 6]);
    }

    #[test]
    fn test_parse_rejects_corrupt_files() {
        assert!(parse(&[]).is_err());
        assert!(parse(&[0; 16]).is_err());

        let mut data = Vec::new();
        write_header(&mut data).unwrap();
        write_record(&mut data, &LicenseRecord::trial("viewer", "1.0", 100, 15)).unwrap();
        data.truncate(data.len() - 3);
        assert!(parse(&data).is_err());
    }

    #[test]
    fn test_refresh_counts_down() {
        let mut record = LicenseRecord::trial("viewer", "1.0", 100, 15);
        assert!(!record.refresh(100));
        assert!(record.refresh(105));
        assert_eq!(record.valid_days, 10);
        assert_eq!(record.state, LicenseState::Trial);
        assert!(record.refresh(115));
        assert_eq!(record.valid_days, 0);
        assert_eq!(record.state, LicenseState::Invalid);
    }

    #[test]
    fn test_refresh_detects_clock_rollback() {
        let mut record = LicenseRecord::trial("viewer", "1.0", 100, 15);
        record.refresh(110);
        assert_eq!(record.valid_days, 5);
        assert!(record.refresh(105));
        assert_eq!(record.state, LicenseState::Invalid);
        assert_eq!(record.remaining_days(), 0);
    }

    #[test]
    fn test_perpetual_license_never_changes() {
        let mut record = LicenseRecord::trial("viewer", "1.0", 100, 15);
        record.state = LicenseState::Activated;
        record.expiry_day = PERPETUAL;
        record.valid_days = PERPETUAL;
        assert!(!record.refresh(100_000));
        assert_eq!(record.remaining_days(), -1);
    }
}
