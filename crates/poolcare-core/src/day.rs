//! The weekday on which a client is normally serviced.
//!
//! Stored and displayed with the Spanish labels the operator's spreadsheets
//! use (`Lunes` … `Domingo`).

use std::{fmt, str::FromStr};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "&'static str", try_from = "String")]
pub enum ServiceDay {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl ServiceDay {
  /// All days in calendar order, Monday first.
  pub const ALL: [ServiceDay; 7] = [
    ServiceDay::Monday,
    ServiceDay::Tuesday,
    ServiceDay::Wednesday,
    ServiceDay::Thursday,
    ServiceDay::Friday,
    ServiceDay::Saturday,
    ServiceDay::Sunday,
  ];

  /// The stored label.
  pub fn label(self) -> &'static str {
    match self {
      ServiceDay::Monday => "Lunes",
      ServiceDay::Tuesday => "Martes",
      ServiceDay::Wednesday => "Miércoles",
      ServiceDay::Thursday => "Jueves",
      ServiceDay::Friday => "Viernes",
      ServiceDay::Saturday => "Sábado",
      ServiceDay::Sunday => "Domingo",
    }
  }

  /// 1-based position in the week, as offered in the shell menu.
  pub fn number(self) -> u32 { self.weekday().number_from_monday() }

  /// Inverse of [`ServiceDay::number`].
  pub fn from_number(n: u32) -> Option<Self> {
    Self::ALL.get((n as usize).checked_sub(1)?).copied()
  }

  pub fn weekday(self) -> Weekday {
    match self {
      ServiceDay::Monday => Weekday::Mon,
      ServiceDay::Tuesday => Weekday::Tue,
      ServiceDay::Wednesday => Weekday::Wed,
      ServiceDay::Thursday => Weekday::Thu,
      ServiceDay::Friday => Weekday::Fri,
      ServiceDay::Saturday => Weekday::Sat,
      ServiceDay::Sunday => Weekday::Sun,
    }
  }
}

impl From<Weekday> for ServiceDay {
  fn from(w: Weekday) -> Self {
    match w {
      Weekday::Mon => ServiceDay::Monday,
      Weekday::Tue => ServiceDay::Tuesday,
      Weekday::Wed => ServiceDay::Wednesday,
      Weekday::Thu => ServiceDay::Thursday,
      Weekday::Fri => ServiceDay::Friday,
      Weekday::Sat => ServiceDay::Saturday,
      Weekday::Sun => ServiceDay::Sunday,
    }
  }
}

impl From<ServiceDay> for &'static str {
  fn from(d: ServiceDay) -> Self { d.label() }
}

impl TryFrom<String> for ServiceDay {
  type Error = Error;

  fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl fmt::Display for ServiceDay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Accepts the Spanish labels (with or without accents, any case) and the
/// English weekday names.
impl FromStr for ServiceDay {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let folded: String = s
      .trim()
      .to_lowercase()
      .chars()
      .map(|c| match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' => 'u',
        other => other,
      })
      .collect();

    match folded.as_str() {
      "lunes" | "monday" => Ok(ServiceDay::Monday),
      "martes" | "tuesday" => Ok(ServiceDay::Tuesday),
      "miercoles" | "wednesday" => Ok(ServiceDay::Wednesday),
      "jueves" | "thursday" => Ok(ServiceDay::Thursday),
      "viernes" | "friday" => Ok(ServiceDay::Friday),
      "sabado" | "saturday" => Ok(ServiceDay::Saturday),
      "domingo" | "sunday" => Ok(ServiceDay::Sunday),
      _ => Err(Error::UnknownServiceDay(s.to_owned())),
    }
  }
}
