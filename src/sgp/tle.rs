//! Two-line element set parsing
//!
//! Fixed-column NORAD format. Both lines must be 69 ASCII characters, start
//! with their line number, carry the same catalog number and pass the
//! modulo-10 checksum (digits count their value, `-` counts as one).

use super::TleError;
use crate::time::{to_instant, Instant};
use serde::{Deserialize, Serialize};

const LINE_LENGTH: usize = 69;

/// Parsed two-line element set; angles in degrees
#[derive(Debug, Clone, PartialEq)]
pub struct Tle {
    pub name: String,
    pub catalog_number: u32,
    pub international_designator: String,
    pub epoch: Instant,
    /// First derivative of mean motion divided by two, rev/day²
    pub mean_motion_dot: f64,
    /// Drag term, inverse Earth radii
    ///
    /// Parsed and kept for display. Propagation takes its drag from
    /// `mean_motion_dot` instead.
    pub bstar: f64,
    pub inclination: f64,
    pub raan: f64,
    pub eccentricity: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    /// Revolutions per day
    pub mean_motion: f64,
    pub revolution_number: u32,
}

/// Raw TLE text as stored in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TleLines {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl TleLines {
    pub fn parse(&self) -> Result<Tle, TleError> {
        Tle::parse(&self.name, &self.line1, &self.line2)
    }
}

impl Tle {
    /// Parse a named element set from its two data lines
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        check_line(line1, 1)?;
        check_line(line2, 2)?;

        let catalog_number: u32 = field(line1, 1, 2..7, "catalog number")?;
        let catalog_line2: u32 = field(line2, 2, 2..7, "catalog number")?;
        if catalog_number != catalog_line2 {
            return Err(TleError::CatalogMismatch {
                line1: catalog_number,
                line2: catalog_line2,
            });
        }

        let international_designator = line1[9..17].trim().to_string();

        let epoch_year: i32 = field(line1, 1, 18..20, "epoch year")?;
        let epoch_year = if epoch_year < 57 {
            2000 + epoch_year
        } else {
            1900 + epoch_year
        };
        let epoch_day: f64 = field(line1, 1, 20..32, "epoch day")?;
        if !(1.0..367.0).contains(&epoch_day) {
            return Err(TleError::ParseField {
                line: 1,
                field: "epoch day",
            });
        }
        // Day 1.0 is January 1 at 0h
        let epoch = (to_instant(epoch_year, 1, 1.0)? + (epoch_day - 1.0)).checked()?;

        let mean_motion_dot: f64 = field(line1, 1, 33..43, "mean motion derivative")?;
        let bstar = parse_exponent(&line1[53..61]).ok_or(TleError::ParseField {
            line: 1,
            field: "bstar",
        })?;

        let inclination = field(line2, 2, 8..16, "inclination")?;
        let raan = field(line2, 2, 17..25, "right ascension of node")?;
        let eccentricity: f64 = format!("0.{}", line2[26..33].trim())
            .parse()
            .map_err(|_| TleError::ParseField {
                line: 2,
                field: "eccentricity",
            })?;
        let argument_of_perigee = field(line2, 2, 34..42, "argument of perigee")?;
        let mean_anomaly = field(line2, 2, 43..51, "mean anomaly")?;
        let mean_motion: f64 = field(line2, 2, 52..63, "mean motion")?;
        if mean_motion <= 0.0 {
            return Err(TleError::ParseField {
                line: 2,
                field: "mean motion",
            });
        }
        let revolution_number = field(line2, 2, 63..68, "revolution number")?;

        Ok(Tle {
            name: name.trim().to_string(),
            catalog_number,
            international_designator,
            epoch,
            mean_motion_dot,
            bstar,
            inclination,
            raan,
            eccentricity,
            argument_of_perigee,
            mean_anomaly,
            mean_motion,
            revolution_number,
        })
    }

    /// Parse a block of element sets, with or without name lines.
    /// Blank lines are ignored; a `0 ` prefix on name lines is dropped.
    pub fn parse_set(text: &str) -> Result<Vec<Tle>, TleError> {
        let mut lines = text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty());
        let mut tles = Vec::new();
        let mut pending_name: Option<&str> = None;

        while let Some(line) = lines.next() {
            if line.starts_with("1 ") && line.len() == LINE_LENGTH {
                let line2 = lines.next().ok_or(TleError::MissingLine(2))?;
                let name = pending_name.take().unwrap_or_else(|| line[2..7].trim());
                tles.push(Tle::parse(name, line, line2)?);
            } else if line.starts_with("2 ") && line.len() == LINE_LENGTH {
                return Err(TleError::MissingLine(1));
            } else {
                if pending_name.is_some() {
                    return Err(TleError::MissingLine(1));
                }
                pending_name = Some(line.strip_prefix("0 ").unwrap_or(line));
            }
        }

        if pending_name.is_some() {
            return Err(TleError::MissingLine(1));
        }
        Ok(tles)
    }
}

fn check_line(line: &str, number: u8) -> Result<(), TleError> {
    if !line.is_ascii() || line.len() != LINE_LENGTH {
        return Err(TleError::InvalidLength {
            line: number,
            length: line.chars().count(),
        });
    }
    if line.as_bytes()[0] != b'0' + number {
        return Err(TleError::InvalidLineNumber { line: number });
    }
    let expected = checksum_digit(line.as_bytes()[LINE_LENGTH - 1]).ok_or(TleError::ParseField {
        line: number,
        field: "checksum",
    })?;
    let computed = checksum(line);
    if computed != expected {
        return Err(TleError::ChecksumMismatch {
            line: number,
            expected,
            computed,
        });
    }
    Ok(())
}

/// Modulo-10 checksum over the first 68 columns
pub fn checksum(line: &str) -> u32 {
    line.bytes()
        .take(LINE_LENGTH - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

fn checksum_digit(b: u8) -> Option<u32> {
    b.is_ascii_digit().then(|| (b - b'0') as u32)
}

fn field<T: std::str::FromStr>(
    line: &str,
    number: u8,
    columns: std::ops::Range<usize>,
    name: &'static str,
) -> Result<T, TleError> {
    line[columns].trim().parse().map_err(|_| TleError::ParseField {
        line: number,
        field: name,
    })
}

/// Decode the packed exponent notation: `-11606-4` is -0.11606e-4
fn parse_exponent(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    let (sign, rest) = match raw.as_bytes()[0] {
        b'-' => (-1.0, &raw[1..]),
        b'+' => (1.0, &raw[1..]),
        _ => (1.0, raw),
    };
    let split = rest.rfind(['+', '-'])?;
    if split == 0 {
        return None;
    }
    let mantissa: f64 = format!("0.{}", rest[..split].trim()).parse().ok()?;
    let exponent: i32 = rest[split..].parse().ok()?;
    Some(sign * mantissa * 10f64.powi(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::to_calendar;
    use approx::assert_abs_diff_eq;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_parse_iss() {
        let tle = Tle::parse("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(tle.name, "ISS (ZARYA)");
        assert_eq!(tle.catalog_number, 25544);
        assert_eq!(tle.international_designator, "98067A");
        assert_abs_diff_eq!(tle.inclination, 51.6416);
        assert_abs_diff_eq!(tle.raan, 247.4627);
        assert_abs_diff_eq!(tle.eccentricity, 0.000_670_3, epsilon = 1e-12);
        assert_abs_diff_eq!(tle.argument_of_perigee, 130.5360);
        assert_abs_diff_eq!(tle.mean_anomaly, 325.0288);
        assert_abs_diff_eq!(tle.mean_motion, 15.721_253_91);
        assert_abs_diff_eq!(tle.mean_motion_dot, -0.000_021_82);
        assert_abs_diff_eq!(tle.bstar, -0.116_06e-4, epsilon = 1e-15);
        assert_eq!(tle.revolution_number, 56353);
    }

    #[test]
    fn test_epoch() {
        let tle = Tle::parse("ISS", ISS_LINE1, ISS_LINE2).unwrap();
        // Day 264 of 2008 is 20 September
        let cal = to_calendar(tle.epoch).unwrap();
        assert_eq!(cal.ymd(), (2008, 9, 20));
        assert_abs_diff_eq!(cal.day_fraction, 0.517_825_28, epsilon = 1e-8);
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(ISS_LINE1), 7);
        assert_eq!(checksum(ISS_LINE2), 7);
    }

    #[test]
    fn test_checksum_mismatch() {
        let corrupted = ISS_LINE2.replace("51.6416", "51.6417");
        let err = Tle::parse("ISS", ISS_LINE1, &corrupted).unwrap_err();
        assert_eq!(
            err,
            TleError::ChecksumMismatch {
                line: 2,
                expected: 7,
                computed: 8
            }
        );
    }

    #[test]
    fn test_invalid_length() {
        let err = Tle::parse("ISS", &ISS_LINE1[..60], ISS_LINE2).unwrap_err();
        assert_eq!(err, TleError::InvalidLength { line: 1, length: 60 });
    }

    #[test]
    fn test_wrong_line_number() {
        let swapped = format!("3{}", &ISS_LINE1[1..]);
        let err = Tle::parse("ISS", &swapped, ISS_LINE2).unwrap_err();
        assert_eq!(err, TleError::InvalidLineNumber { line: 1 });
    }

    #[test]
    fn test_catalog_mismatch() {
        // Same digit sum, different catalog number
        let other = ISS_LINE2.replacen("25544", "25454", 1);
        let err = Tle::parse("ISS", ISS_LINE1, &other).unwrap_err();
        assert_eq!(
            err,
            TleError::CatalogMismatch {
                line1: 25544,
                line2: 25454
            }
        );
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        let line1 = format!("{ISS_LINE1}  \r");
        assert!(Tle::parse("ISS", &line1, ISS_LINE2).is_ok());
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_exponent(" 00000-0"), Some(0.0));
        assert_abs_diff_eq!(parse_exponent(" 10270-3").unwrap(), 0.102_70e-3, epsilon = 1e-15);
        assert_abs_diff_eq!(parse_exponent("-11606-4").unwrap(), -0.116_06e-4, epsilon = 1e-15);
        assert_eq!(parse_exponent("abc"), None);
    }

    #[test]
    fn test_parse_set() {
        let text = format!("ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let tles = Tle::parse_set(&text).unwrap();
        assert_eq!(tles.len(), 2);
        assert_eq!(tles[0].name, "ISS (ZARYA)");
        assert_eq!(tles[1].name, "25544");
    }

    #[test]
    fn test_parse_set_missing_line() {
        let text = format!("ISS (ZARYA)\n{ISS_LINE1}\n");
        assert_eq!(Tle::parse_set(&text), Err(TleError::MissingLine(2)));
        let text = format!("ISS (ZARYA)\n{ISS_LINE2}\n");
        assert_eq!(Tle::parse_set(&text), Err(TleError::MissingLine(1)));
    }
}
