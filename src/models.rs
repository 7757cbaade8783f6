use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Server-assigned gig identifier. The service has handed out both numeric
/// and string ids, so either is accepted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum GigId {
    Number(i64),
    Text(String),
}

impl fmt::Display for GigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GigId::Number(n) => write!(f, "{n}"),
            GigId::Text(s) => f.write_str(s),
        }
    }
}

impl GigId {
    /// Parses user input the way the service would have issued it: digits
    /// become a numeric id, anything else stays text.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => GigId::Number(n),
            Err(_) => GigId::Text(trimmed.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Gig {
    pub id: GigId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub day: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: String,
    #[serde(rename = "type", default, deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub venue: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interested: Option<Vec<Person>>,
}

impl Gig {
    pub fn interested_names(&self) -> Vec<&str> {
        self.interested
            .iter()
            .flatten()
            .map(|person| person.name.as_str())
            .collect()
    }
}

/// Text field that may arrive as `null` or a bare number. Anything without a
/// sensible text form becomes empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Accepts `"Club"`, `["Club", "Gig"]` or `null` for the category field.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(tag)) => vec![tag],
        Some(OneOrMany::Many(tags)) => tags,
        None => Vec::new(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GigType {
    Gig,
    Club,
    OneDayFestival,
    FullOnFestival,
}

impl GigType {
    pub const ALL: [GigType; 4] = [
        GigType::Gig,
        GigType::Club,
        GigType::OneDayFestival,
        GigType::FullOnFestival,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GigType::Gig => "Gig",
            GigType::Club => "Club",
            GigType::OneDayFestival => "One-Day Festival",
            GigType::FullOnFestival => "Full-On Festival",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for GigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `POST /gigs`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewGig {
    pub day: String,
    pub date: String,
    pub artist: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub venue: String,
    pub location: String,
}

impl NewGig {
    pub fn new(
        date: NaiveDate,
        artist: &str,
        types: &[GigType],
        venue: &str,
        location: &str,
    ) -> Self {
        Self {
            day: day_initial(date),
            date: date.format("%Y-%m-%d").to_string(),
            artist: artist.trim().to_string(),
            types: types.iter().map(|kind| kind.label().to_string()).collect(),
            venue: venue.trim().to_string(),
            location: location.trim().to_string(),
        }
    }
}

/// First letter of the English short weekday, e.g. `F` for Friday.
pub fn day_initial(date: NaiveDate) -> String {
    date.weekday().to_string().chars().take(1).collect()
}
