use chrono::{FixedOffset, NaiveDate, NaiveTime, Utc};
use clap::Args;
use ephemeris::{EphemerisError, ObservationInstant};

/// Default zone for wall-clock input: China Standard Time.
pub const DEFAULT_UTC_OFFSET: &str = "+08:00";

/// Parse a UTC offset such as "+08:00", "-0530", "+8" or "Z"
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "Invalid UTC offset".to_string());
    }

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(format!("UTC offset must start with + or -: {}", s)),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours
        .parse()
        .map_err(|_| format!("Invalid offset hours: {}", hours))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| format!("Invalid offset minutes: {}", minutes))?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(format!("UTC offset out of range: {}", s));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("UTC offset out of range: {}", s))
}

/// Parse a time of day as "HH:MM" or "HH:MM:SS"
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("Time must be HH:MM or HH:MM:SS: {}", s))
}

/// Observation date and time as wall-clock values plus their UTC offset
#[derive(Args, Debug, Clone)]
pub struct ObservationArgs {
    /// Observation date (YYYY-MM-DD); defaults to today in the given offset
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Local time of observation (HH:MM or HH:MM:SS); defaults to now
    #[arg(long, value_parser = parse_time_of_day)]
    pub time: Option<NaiveTime>,

    /// UTC offset of the date and time (e.g. "+08:00", "-05:00", "Z")
    #[arg(long, default_value = DEFAULT_UTC_OFFSET, value_parser = parse_utc_offset, allow_hyphen_values = true)]
    pub utc_offset: FixedOffset,
}

impl ObservationArgs {
    /// The timezone-aware instant these arguments describe.
    pub fn instant(&self) -> Result<ObservationInstant, EphemerisError> {
        let now = Utc::now().with_timezone(&self.utc_offset).naive_local();
        let naive = self
            .date
            .unwrap_or_else(|| now.date())
            .and_time(self.time.unwrap_or_else(|| now.time()));
        ObservationInstant::from_local(naive, self.utc_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        observation: ObservationArgs,
    }

    #[rstest]
    #[case("+08:00", 8 * 3600)]
    #[case("-05:30", -(5 * 3600 + 30 * 60))]
    #[case("+0545", 5 * 3600 + 45 * 60)]
    #[case("+8", 8 * 3600)]
    #[case("Z", 0)]
    fn test_utc_offset_parsing(#[case] input: &str, #[case] seconds: i32) {
        assert_eq!(parse_utc_offset(input).unwrap().local_minus_utc(), seconds);
    }

    #[rstest]
    #[case("08:00")]
    #[case("+15:00")]
    #[case("+08:75")]
    #[case("+ab")]
    fn test_bad_utc_offsets(#[case] input: &str) {
        assert!(parse_utc_offset(input).is_err());
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!(
            parse_time_of_day("21:30").unwrap(),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("21:30:15").unwrap(),
            NaiveTime::from_hms_opt(21, 30, 15).unwrap()
        );
        assert!(parse_time_of_day("9pm").is_err());
    }

    #[test]
    fn test_args_build_instant() {
        let cli = TestCli::parse_from([
            "test",
            "--date",
            "2024-03-20",
            "--time",
            "21:30",
            "--utc-offset",
            "+08:00",
        ]);
        assert_eq!(
            cli.observation.instant().unwrap(),
            ObservationInstant::parse("2024-03-20T21:30:00+08:00").unwrap()
        );
    }

    #[test]
    fn test_negative_offset_accepted_as_value() {
        let cli = TestCli::parse_from(["test", "--utc-offset", "-05:00"]);
        assert_eq!(cli.observation.utc_offset.local_minus_utc(), -5 * 3600);
        assert!(cli.observation.instant().is_ok());
    }
}
