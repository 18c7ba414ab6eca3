//! Relative Time Labels
//!
//! Spanish "distance to now" wording used under each chat message, e.g.
//! `hace 5 minutos` or `hace alrededor de 2 horas`. Thresholds work on the
//! distance rounded to whole minutes; past two months the year buckets use
//! whole calendar months between the two instants.

use chrono::{DateTime, Datelike, Utc};

const MINUTES_IN_DAY: u64 = 1_440;
const MINUTES_IN_MONTH: u64 = 43_200;
const MINUTES_IN_TWO_MONTHS: u64 = 86_400;

/// Label for `timestamp` as seen from `now`
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();
    let (earlier, later) = if seconds < 0 {
        (now, timestamp)
    } else {
        (timestamp, now)
    };
    let distance = describe_distance(earlier, later);

    if seconds < 0 {
        format!("en {distance}")
    } else {
        format!("hace {distance}")
    }
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

fn round_div(n: u64, d: u64) -> u64 {
    (n + d / 2) / d
}

/// Whole calendar months from `earlier` to `later`
fn calendar_months(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
    let mut months = (i64::from(later.year()) - i64::from(earlier.year())) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());
    if months > 0 && (later.day(), later.time()) < (earlier.day(), earlier.time()) {
        months -= 1;
    }
    months.max(0).unsigned_abs()
}

fn describe_distance(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let seconds = (later - earlier).num_seconds().unsigned_abs();
    let minutes = round_div(seconds, 60);

    match minutes {
        0 => "menos de un minuto".into(),
        1..45 => plural(minutes, "minuto", "minutos"),
        45..90 => "alrededor de 1 hora".into(),
        90..MINUTES_IN_DAY => {
            format!("alrededor de {}", plural(round_div(minutes, 60), "hora", "horas"))
        }
        MINUTES_IN_DAY..2_520 => "1 día".into(),
        2_520..MINUTES_IN_MONTH => plural(round_div(minutes, MINUTES_IN_DAY), "día", "días"),
        MINUTES_IN_MONTH..MINUTES_IN_TWO_MONTHS => format!(
            "alrededor de {}",
            plural(round_div(minutes, MINUTES_IN_MONTH), "mes", "meses")
        ),
        _ => describe_months(minutes, calendar_months(earlier, later)),
    }
}

fn describe_months(minutes: u64, months: u64) -> String {
    if months < 12 {
        return plural(round_div(minutes, MINUTES_IN_MONTH), "mes", "meses");
    }

    let years = months / 12;
    match months % 12 {
        0..3 => format!("alrededor de {}", plural(years, "año", "años")),
        3..9 => format!("más de {}", plural(years, "año", "años")),
        _ => format!("casi {}", plural(years + 1, "año", "años")),
    }
}
