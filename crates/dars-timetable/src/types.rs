use chrono::NaiveDate;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// A class day, labelled the way the portal export labels it (Uzbek, Latin script).
///
/// There is no Sunday: the school week runs Monday to Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Dushanba,
    Seshanba,
    Chorshanba,
    Payshanba,
    Juma,
    Shanba,
}

impl Weekday {
    /// All class days in week order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Dushanba,
        Weekday::Seshanba,
        Weekday::Chorshanba,
        Weekday::Payshanba,
        Weekday::Juma,
        Weekday::Shanba,
    ];

    /// Label as it appears in the export.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Dushanba => "Dushanba",
            Weekday::Seshanba => "Seshanba",
            Weekday::Chorshanba => "Chorshanba",
            Weekday::Payshanba => "Payshanba",
            Weekday::Juma => "Juma",
            Weekday::Shanba => "Shanba",
        }
    }

    /// Exact (case-sensitive) label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }

    /// Map a host day-of-week number (0 = Sunday … 6 = Saturday) to a class day.
    ///
    /// Sunday and anything out of range has no class day.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1..=6 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// Inverse of [`Weekday::from_number`]: Monday = 1 … Saturday = 6.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One cell of the raw tabular export.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// The text of a non-empty text cell, exactly as stored.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// A row of the raw export, columns in sheet order.
pub type Row = Vec<Cell>;

/// Subjects per class day, keyed in order of first appearance in the export.
///
/// Days missing from the export are simply absent; [`WeeklySchedule::subjects`]
/// reports them as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySchedule {
    days: Vec<(Weekday, Vec<String>)>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the block for `day` with an empty subject list.
    ///
    /// A day that already exists keeps its position but loses its subjects.
    pub fn start_day(&mut self, day: Weekday) {
        match self.days.iter_mut().find(|(d, _)| *d == day) {
            Some((_, subjects)) => subjects.clear(),
            None => self.days.push((day, Vec::new())),
        }
    }

    /// Append a subject to `day`, creating the day if needed.
    pub fn push_subject(&mut self, day: Weekday, subject: impl Into<String>) {
        let subject = subject.into();
        match self.days.iter_mut().find(|(d, _)| *d == day) {
            Some((_, subjects)) => subjects.push(subject),
            None => self.days.push((day, vec![subject])),
        }
    }

    /// `None` when the day never appeared in the export.
    pub fn get(&self, day: Weekday) -> Option<&[String]> {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, subjects)| subjects.as_slice())
    }

    /// Subjects for `day`, empty when the day is absent.
    pub fn subjects(&self, day: Weekday) -> Vec<String> {
        self.get(day).map(<[String]>::to_vec).unwrap_or_default()
    }

    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.iter().map(|(d, _)| *d)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, subjects) in &self.days {
            map.serialize_entry(day.label(), subjects)?;
        }
        map.end()
    }
}

/// Subjects of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Serialised as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub subjects: Vec<String>,
}

/// What `/schedule` returns and what the cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub today: DaySchedule,
    pub tomorrow: DaySchedule,
}
