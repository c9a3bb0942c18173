use std::fmt;

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  NaiveDateTime,
  SecondsFormat,
  TimeZone,
  Utc
};

const NAIVE_ISO_FORMATS: [&str; 2] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S"
];

/// Renders `dt` the way the persisted task list stores it:
/// `2026-02-17T12:00:00.000Z`.
pub fn format_iso(
  dt: DateTime<Utc>
) -> String {
  dt.to_rfc3339_opts(
    SecondsFormat::Millis,
    true
  )
}

/// Parses an ISO-8601 timestamp. Values
/// without an offset are read as UTC.
pub fn parse_iso(
  raw: &str
) -> anyhow::Result<DateTime<Utc>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(anyhow!(
      "empty timestamp"
    ));
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(
      trimmed
    )
  {
    return Ok(dt.with_timezone(&Utc));
  }

  for fmt in NAIVE_ISO_FORMATS {
    if let Ok(ndt) =
      NaiveDateTime::parse_from_str(
        trimmed, fmt
      )
    {
      return Ok(ndt.and_utc());
    }
  }

  DateTime::parse_from_rfc3339(trimmed)
    .map(|dt| dt.with_timezone(&Utc))
    .with_context(|| {
      format!(
        "invalid ISO-8601 timestamp: \
         {trimmed}"
      )
    })
}

/// Short label for a task's creation
/// date: `Today` for the current
/// calendar day in `tz`, otherwise
/// `Jan 5`.
pub fn created_label<Z>(
  created: DateTime<Utc>,
  now: DateTime<Utc>,
  tz: &Z
) -> String
where
  Z: TimeZone,
  Z::Offset: fmt::Display
{
  let created_local =
    created.with_timezone(tz);
  let today =
    now.with_timezone(tz).date_naive();

  if created_local.date_naive() == today
  {
    "Today".to_string()
  } else {
    created_local
      .format("%b %-d")
      .to_string()
  }
}

pub mod iso_date_serde {
  use chrono::{
    DateTime,
    Utc
  };
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  pub fn serialize<S>(
    dt: &DateTime<Utc>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer
      .serialize_str(&super::format_iso(*dt))
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw = String::deserialize(
      deserializer
    )?;
    super::parse_iso(&raw).map_err(
      |err| {
        serde::de::Error::custom(
          format!("{err:#}")
        )
      }
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    FixedOffset,
    TimeZone,
    Utc
  };

  use super::{
    created_label,
    format_iso,
    parse_iso
  };

  #[test]
  fn iso_output_is_millisecond_zulu() {
    let dt = Utc
      .with_ymd_and_hms(
        2026, 2, 17, 12, 0, 5
      )
      .single()
      .expect("valid dt");
    assert_eq!(
      format_iso(dt),
      "2026-02-17T12:00:05.000Z"
    );
  }

  #[test]
  fn parses_offsets_and_naive_values() {
    let expected = Utc
      .with_ymd_and_hms(
        2026, 2, 17, 12, 0, 0
      )
      .single()
      .expect("valid dt");

    assert_eq!(
      parse_iso(
        "2026-02-17T12:00:00.000Z"
      )
      .expect("zulu"),
      expected
    );
    assert_eq!(
      parse_iso(
        "2026-02-17T14:00:00+02:00"
      )
      .expect("offset"),
      expected
    );
    assert_eq!(
      parse_iso("2026-02-17T12:00:00")
        .expect("naive"),
      expected
    );
  }

  #[test]
  fn rejects_garbage() {
    assert!(parse_iso("").is_err());
    assert!(
      parse_iso("yesterday-ish").is_err()
    );
  }

  #[test]
  fn label_uses_display_timezone() {
    let now = Utc
      .with_ymd_and_hms(
        2026, 1, 5, 3, 0, 0
      )
      .single()
      .expect("valid now");
    let created = Utc
      .with_ymd_and_hms(
        2026, 1, 4, 23, 0, 0
      )
      .single()
      .expect("valid created");

    assert_eq!(
      created_label(
        created,
        now,
        &chrono_tz::UTC
      ),
      "Jan 4"
    );
    // both instants fall on Jan 4 in New York
    assert_eq!(
      created_label(
        created,
        now,
        &chrono_tz::America::New_York
      ),
      "Today"
    );
  }

  #[test]
  fn label_follows_a_fixed_local_offset() {
    let now = Utc
      .with_ymd_and_hms(
        2026, 3, 10, 1, 30, 0
      )
      .single()
      .expect("valid now");
    let created = Utc
      .with_ymd_and_hms(
        2026, 3, 9, 20, 0, 0
      )
      .single()
      .expect("valid created");
    let utc_minus_6 =
      FixedOffset::west_opt(6 * 3600)
        .expect("valid offset");
    let utc_plus_5 =
      FixedOffset::east_opt(5 * 3600)
        .expect("valid offset");

    // Mar 9 14:00 and Mar 9 19:30 at -06:00
    assert_eq!(
      created_label(
        created,
        now,
        &utc_minus_6
      ),
      "Today"
    );
    // Mar 10 01:00 and Mar 10 06:30 at +05:00
    assert_eq!(
      created_label(
        created,
        now,
        &utc_plus_5
      ),
      "Today"
    );
    assert_eq!(
      created_label(created, now, &Utc),
      "Mar 9"
    );
  }
}
