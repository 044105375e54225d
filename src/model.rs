use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::{Serialize, Serializer};

/// One row of the `plants` table.
///
/// Postgres folds the unquoted column names of the table to lower case, so
/// rows are decoded by those names. Only `plantID` is guaranteed non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Plant {
    #[serde(rename = "plantID")]
    #[sqlx(rename = "plantid")]
    pub id: i32,
    #[serde(rename = "plantName")]
    #[sqlx(rename = "plantname")]
    pub name: Option<String>,
    #[serde(rename = "plantPlantTime", serialize_with = "date_as_timestamp")]
    #[sqlx(rename = "plantplanttime")]
    pub planted_on: Option<NaiveDate>,
    #[serde(rename = "plantHarvestTime", serialize_with = "date_as_timestamp")]
    #[sqlx(rename = "plantharvesttime")]
    pub harvest_on: Option<NaiveDate>,
    #[serde(rename = "waterFrequency")]
    #[sqlx(rename = "waterfrequency")]
    pub water_interval_days: Option<i32>,
    #[serde(rename = "fertilizeFrequency")]
    #[sqlx(rename = "fertilizefrequency")]
    pub fertilize_interval_days: Option<i32>,
    #[serde(rename = "photo")]
    #[sqlx(rename = "photo")]
    pub photo_path: Option<String>,
}

// DATE columns carry no time of day; clients get midnight UTC in RFC 3339.
fn date_as_timestamp<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(
            &date
                .and_time(NaiveTime::MIN)
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        None => serializer.serialize_none(),
    }
}
