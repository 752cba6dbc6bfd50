use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::jiff::Timestamp;

pub const UNKNOWN_AGE: &str = "<unknown>";

pub fn human_age_at(timestamp: Option<&Time>, now: Timestamp) -> String {
    let Some(timestamp) = timestamp else {
        return UNKNOWN_AGE.to_string();
    };

    human_duration(now.duration_since(timestamp.0).as_secs())
}

/// Formats elapsed seconds the way kubectl prints the AGE column: precision
/// drops as the duration grows, and up to one second of clock skew into the
/// future still reads as `0s`.
pub fn human_duration(seconds: i64) -> String {
    if seconds < -1 {
        return "<invalid>".to_string();
    }
    if seconds < 0 {
        return "0s".to_string();
    }
    if seconds < 60 * 2 {
        return format!("{seconds}s");
    }

    let minutes = seconds / 60;
    if minutes < 10 {
        let rest = seconds % 60;
        if rest == 0 {
            return format!("{minutes}m");
        }
        return format!("{minutes}m{rest}s");
    }
    if minutes < 60 * 3 {
        return format!("{minutes}m");
    }

    let hours = seconds / 3_600;
    if hours < 8 {
        let rest = minutes % 60;
        if rest == 0 {
            return format!("{hours}h");
        }
        return format!("{hours}h{rest}m");
    }
    if hours < 48 {
        return format!("{hours}h");
    }

    let days = hours / 24;
    if hours < 24 * 8 {
        let rest = hours % 24;
        if rest == 0 {
            return format!("{days}d");
        }
        return format!("{days}d{rest}h");
    }
    if hours < 24 * 365 * 2 {
        return format!("{days}d");
    }

    let years = days / 365;
    if hours < 24 * 365 * 8 {
        let rest = days % 365;
        if rest == 0 {
            return format!("{years}y");
        }
        return format!("{years}y{rest}d");
    }

    format!("{years}y")
}

#[cfg(test)]
mod tests {
    use super::{human_age_at, human_duration};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use k8s_openapi::jiff::Timestamp;
    use rstest::rstest;

    #[rstest]
    #[case(-5, "<invalid>")]
    #[case(-1, "0s")]
    #[case(0, "0s")]
    #[case(119, "119s")]
    #[case(120, "2m")]
    #[case(125, "2m5s")]
    #[case(600, "10m")]
    #[case(179 * 60, "179m")]
    #[case(3 * 3_600, "3h")]
    #[case(3 * 3_600 + 20 * 60, "3h20m")]
    #[case(8 * 3_600, "8h")]
    #[case(47 * 3_600, "47h")]
    #[case(48 * 3_600, "2d")]
    #[case(50 * 3_600, "2d2h")]
    #[case(8 * 86_400, "8d")]
    #[case(400 * 86_400, "400d")]
    #[case(730 * 86_400, "2y")]
    #[case(740 * 86_400, "2y10d")]
    #[case(9 * 365 * 86_400, "9y")]
    fn durations_follow_kubectl_precision(#[case] seconds: i64, #[case] expected: &str) {
        assert_eq!(human_duration(seconds), expected);
    }

    #[test]
    fn missing_timestamp_is_unknown() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        assert_eq!(human_age_at(None, now), "<unknown>");
    }

    #[test]
    fn age_is_measured_from_creation() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let created = Time(Timestamp::from_second(1_700_000_000 - 8 * 60).unwrap());
        assert_eq!(human_age_at(Some(&created), now), "8m");
    }

    #[test]
    fn sub_second_skew_truncates_toward_zero() {
        let now = Timestamp::from_millisecond(1_700_000_000_900).unwrap();
        let created = Time(Timestamp::from_second(1_700_000_002).unwrap());
        assert_eq!(human_age_at(Some(&created), now), "0s");

        let created = Time(Timestamp::from_second(1_700_000_003).unwrap());
        assert_eq!(human_age_at(Some(&created), now), "<invalid>");
    }

    #[test]
    fn partial_seconds_of_elapsed_time_are_dropped() {
        let now = Timestamp::from_millisecond(1_700_000_125_999).unwrap();
        let created = Time(Timestamp::from_second(1_700_000_000).unwrap());
        assert_eq!(human_age_at(Some(&created), now), "2m5s");
    }
}
