//! Year selection shared by every analysis view.
//!
//! The data only covers a fixed set of years. A view keeps a non-empty subset
//! of them selected; what happens when the user deselects the last year (or
//! collapses "all years") differs per view and is captured by a
//! [`FallbackPolicy`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

pub type Year = i32;

/// Years the backend holds data for, oldest first.
pub const YEAR_DOMAIN: [Year; 3] = [2023, 2024, 2025];

/// Year used for single-year tables and as the collapse target of "all years".
pub const DEFAULT_YEAR: Year = 2025;

/// Wire value meaning "every year in the domain".
pub const ALL_YEARS_PARAM: &str = "all";

pub fn in_domain(year: Year) -> bool {
    YEAR_DOMAIN.contains(&year)
}

/// Non-empty, sorted, de-duplicated subset of [`YEAR_DOMAIN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct YearSet(Vec<Year>);

impl YearSet {
    pub fn full() -> Self {
        Self(YEAR_DOMAIN.to_vec())
    }

    pub fn single(year: Year) -> Self {
        Self(vec![year])
    }

    /// Build a set from arbitrary years. Years outside the domain are
    /// dropped; returns `None` when nothing is left.
    pub fn from_years<I: IntoIterator<Item = Year>>(years: I) -> Option<Self> {
        let mut years: Vec<Year> = years.into_iter().filter(|y| in_domain(*y)).collect();
        years.sort_unstable();
        years.dedup();
        if years.is_empty() {
            None
        } else {
            Some(Self(years))
        }
    }

    pub fn is_full(&self) -> bool {
        self.0.len() == YEAR_DOMAIN.len()
    }

    /// The only selected year, if exactly one is selected.
    pub fn as_single(&self) -> Option<Year> {
        match self.0.as_slice() {
            [year] => Some(*year),
            _ => None,
        }
    }

    pub fn contains(&self, year: Year) -> bool {
        self.0.contains(&year)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = Year> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Year] {
        &self.0
    }

    /// Most recent selected year.
    pub fn latest(&self) -> Year {
        self.0.last().copied().unwrap_or(DEFAULT_YEAR)
    }

    /// Query-string form: `all` for the full domain, otherwise `2023,2025`.
    pub fn to_param(&self) -> String {
        if self.is_full() {
            ALL_YEARS_PARAM.to_string()
        } else {
            self.0
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

impl fmt::Display for YearSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl FromStr for YearSet {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_YEARS_PARAM) {
            return Ok(Self::full());
        }

        let mut years = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let year: Year = part
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid year: {}", part)))?;
            if !in_domain(year) {
                return Err(AppError::Validation(format!(
                    "Year {} is outside the available range",
                    year
                )));
            }
            years.push(year);
        }

        Self::from_years(years)
            .ok_or_else(|| AppError::Validation("At least one year must be selected".into()))
    }
}

/// What a selection becomes when an operation would otherwise empty it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    FullDomain,
    Year(Year),
}

impl Fallback {
    pub fn resolve(self) -> YearSet {
        match self {
            Self::FullDomain => YearSet::full(),
            Self::Year(year) => YearSet::single(year),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Applied when deselecting the last selected year.
    pub on_empty: Fallback,
    /// Applied by `toggle_all` when every year is already selected.
    pub on_collapse: Fallback,
}

/// Home dashboard: deselecting the last year jumps to the current year.
pub const DASHBOARD_YEARS: FallbackPolicy = FallbackPolicy {
    on_empty: Fallback::Year(DEFAULT_YEAR),
    on_collapse: Fallback::Year(DEFAULT_YEAR),
};

/// Item analysis charts: deselecting the last year re-selects everything.
pub const ITEM_CHART_YEARS: FallbackPolicy = FallbackPolicy {
    on_empty: Fallback::FullDomain,
    on_collapse: Fallback::Year(DEFAULT_YEAR),
};

/// Unit analysis: same behaviour as the item charts.
pub const UNIT_YEARS: FallbackPolicy = FallbackPolicy {
    on_empty: Fallback::FullDomain,
    on_collapse: Fallback::Year(DEFAULT_YEAR),
};

/// A requested change to a selection, as sent by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Year(Year),
    All,
}

impl FromStr for Toggle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_YEARS_PARAM) {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Year)
            .map_err(|_| AppError::Validation(format!("Invalid toggle: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelection {
    years: YearSet,
    policy: FallbackPolicy,
}

impl YearSelection {
    /// Every view starts with all years selected.
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            years: YearSet::full(),
            policy,
        }
    }

    pub fn with_years(years: YearSet, policy: FallbackPolicy) -> Self {
        Self { years, policy }
    }

    pub fn years(&self) -> &YearSet {
        &self.years
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn toggle(&mut self, year: Year) {
        if !in_domain(year) {
            tracing::debug!(year, "Ignoring toggle for year outside the domain");
            return;
        }

        if self.years.contains(year) {
            let remaining = self.years.iter().filter(|y| *y != year);
            self.years = YearSet::from_years(remaining)
                .unwrap_or_else(|| self.policy.on_empty.resolve());
        } else {
            let added = self.years.iter().chain(std::iter::once(year));
            if let Some(years) = YearSet::from_years(added) {
                self.years = years;
            }
        }
    }

    pub fn toggle_all(&mut self) {
        self.years = if self.years.is_full() {
            self.policy.on_collapse.resolve()
        } else {
            YearSet::full()
        };
    }

    pub fn apply(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::Year(year) => self.toggle(year),
            Toggle::All => self.toggle_all(),
        }
    }
}
