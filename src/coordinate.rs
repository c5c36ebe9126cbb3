use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Consumption site ("loc de consum").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Site {
    C1,
    C2,
    C3,
}

/// Dietary regimen ("regim alimentar").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Regimen {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
}

/// Meal of the day ("masa din zi").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Meal {
    M1,
    M2,
    M3,
    M4,
    M5,
}

macro_rules! impl_token_enum {
    ($name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(anyhow!(
                        "invalid {} token '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

impl_token_enum!(Site { C1 => "C1", C2 => "C2", C3 => "C3" });
impl_token_enum!(Regimen {
    R1 => "R1",
    R2 => "R2",
    R3 => "R3",
    R4 => "R4",
    R5 => "R5",
    R6 => "R6",
});
impl_token_enum!(Meal {
    M1 => "M1",
    M2 => "M2",
    M3 => "M3",
    M4 => "M4",
    M5 => "M5",
});

/// A calendar date displayed and persisted as `dd.mm.yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanDate(NaiveDate);

const DATE_FORMAT: &str = "%d.%m.%Y";

impl PlanDate {
    pub fn new(date: NaiveDate) -> Self {
        PlanDate(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(PlanDate)
    }

    /// The following calendar day. `None` only at the end of chrono's
    /// representable range.
    pub fn next_day(self) -> Option<Self> {
        self.0.succ_opt().map(PlanDate)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for PlanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for PlanDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(PlanDate)
            .map_err(|e| anyhow!("invalid date '{}' (expected dd.mm.yyyy): {}", s, e))
    }
}

/// One planning slot: where, for whom, which meal, on which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub site: Site,
    pub regimen: Regimen,
    pub meal: Meal,
    pub date: PlanDate,
}

impl Coordinate {
    pub fn new(site: Site, regimen: Regimen, meal: Meal, date: PlanDate) -> Self {
        Coordinate {
            site,
            regimen,
            meal,
            date,
        }
    }

    /// The canonical storage key: `{site}_{regimen}_{meal}_{dd}_{mm}_{yyyy}`.
    pub fn storage_key(&self) -> String {
        use chrono::Datelike;
        let d = self.date.date();
        format!(
            "{}_{}_{}_{:02}_{:02}_{}",
            self.site,
            self.regimen,
            self.meal,
            d.day(),
            d.month(),
            d.year()
        )
    }

    pub fn parse_key(key: &str) -> Result<Self> {
        let parts: Vec<&str> = key.split('_').collect();
        if parts.len() != 6 {
            return Err(anyhow!("invalid coordinate key '{}'", key));
        }
        let site = parts[0].parse()?;
        let regimen = parts[1].parse()?;
        let meal = parts[2].parse()?;
        let date = format!("{}.{}.{}", parts[3], parts[4], parts[5]).parse()?;
        Ok(Coordinate::new(site, regimen, meal, date))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.site, self.regimen, self.meal, self.date
        )
    }
}
