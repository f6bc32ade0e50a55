//! Data behind a dependent picker's lanes.
//!
//! Lane 0 shows a fixed list. Every later lane's list is a pure function of
//! the indices selected in the lanes before it.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::WheelItem;

/// Supplies the items of each lane of a dependent picker.
pub trait DependencySource: Send {
    /// Number of lanes the data describes (2 or 3).
    fn lane_count(&self) -> usize;

    /// Items of lane 0.
    fn root_items(&self) -> Vec<WheelItem>;

    /// Items of `lane` given the selected indices of lanes `0..lane`.
    ///
    /// `None` means the data has no entry for that selection.
    fn dependent_items(&self, lane: usize, upstream: &[usize]) -> Option<Vec<WheelItem>>;

    /// Value reported for `index` in `lane`.
    ///
    /// Defaults to the index itself.
    fn value(&self, _lane: usize, index: usize) -> i64 {
        index as i64
    }
}

/// Province, city and area names.
///
/// `cities[p]` lists the cities of province `p`; `areas[p][c]` lists the
/// areas of city `c` in province `p`. The area table may be left empty, in
/// which case the third lane never populates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionTable {
    /// Lane 0 names.
    pub provinces: Vec<String>,
    /// Lane 1 names per province.
    pub cities: Vec<Vec<String>>,
    /// Lane 2 names per province and city.
    pub areas: Vec<Vec<Vec<String>>>,
}

impl RegionTable {
    /// Create a table with provinces only.
    pub fn new<I, S>(provinces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provinces: provinces.into_iter().map(Into::into).collect(),
            cities: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// Set the city table using builder pattern.
    pub fn with_cities<S: Into<String>>(mut self, cities: Vec<Vec<S>>) -> Self {
        self.cities = cities
            .into_iter()
            .map(|list| list.into_iter().map(Into::into).collect())
            .collect();
        self
    }

    /// Set the area table using builder pattern.
    pub fn with_areas<S: Into<String>>(mut self, areas: Vec<Vec<Vec<S>>>) -> Self {
        self.areas = areas
            .into_iter()
            .map(|cities| {
                cities
                    .into_iter()
                    .map(|list| list.into_iter().map(Into::into).collect())
                    .collect()
            })
            .collect();
        self
    }

    /// Parse a table from TOML.
    ///
    /// ```
    /// use horizon_wheel::RegionTable;
    ///
    /// let table = RegionTable::from_toml_str(r#"
    /// provinces = ["A", "B"]
    /// cities = [["A1", "A2"], ["B1"]]
    /// "#).unwrap();
    /// assert_eq!(table.cities[1], vec!["B1"]);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Check that the tables line up with each other.
    ///
    /// An empty area table is allowed. A non-empty one must cover every city.
    pub fn validate(&self) -> Result<()> {
        if self.cities.len() != self.provinces.len() {
            return Err(Error::missing_dependency(
                1,
                &[self.cities.len().min(self.provinces.len())],
            ));
        }
        if self.areas.is_empty() {
            return Ok(());
        }
        for (p, cities) in self.cities.iter().enumerate() {
            let Some(areas) = self.areas.get(p) else {
                return Err(Error::missing_dependency(2, &[p, 0]));
            };
            if areas.len() != cities.len() {
                return Err(Error::missing_dependency(
                    2,
                    &[p, areas.len().min(cities.len())],
                ));
            }
        }
        Ok(())
    }
}

impl DependencySource for RegionTable {
    fn lane_count(&self) -> usize {
        3
    }

    fn root_items(&self) -> Vec<WheelItem> {
        WheelItem::indexed(self.provinces.iter().cloned())
    }

    fn dependent_items(&self, lane: usize, upstream: &[usize]) -> Option<Vec<WheelItem>> {
        let names = match (lane, upstream) {
            (1, [p, ..]) => self.cities.get(*p)?,
            (2, [p, c, ..]) => self.areas.get(*p)?.get(*c)?,
            _ => return None,
        };
        Some(WheelItem::indexed(names.iter().cloned()))
    }
}

/// Year, month and day lanes with real month lengths.
///
/// Values are calendar numbers: the year itself, months 1 to 12 and days
/// from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSource {
    years: RangeInclusive<i32>,
}

impl DateSource {
    /// Create a source covering `years`.
    pub fn new(years: RangeInclusive<i32>) -> Self {
        Self { years }
    }

    /// Covered years.
    pub fn years(&self) -> &RangeInclusive<i32> {
        &self.years
    }

    /// Number of days in `month` (1 to 12) of `year`.
    pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        u32::try_from(next.signed_duration_since(first).num_days()).ok()
    }

    /// Lane indices showing `date`, if its year is covered.
    pub fn indices_of(&self, date: NaiveDate) -> Option<[usize; 3]> {
        if !self.years.contains(&date.year()) {
            return None;
        }
        let year = usize::try_from(date.year() - self.years.start()).ok()?;
        Some([year, date.month0() as usize, date.day0() as usize])
    }

    /// Date shown at lane indices `[year, month, day]`.
    pub fn date_at(&self, indices: [usize; 3]) -> Option<NaiveDate> {
        let year = self.years.start().checked_add(i32::try_from(indices[0]).ok()?)?;
        if !self.years.contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(
            year,
            u32::try_from(indices[1]).ok()? + 1,
            u32::try_from(indices[2]).ok()? + 1,
        )
    }
}

impl DependencySource for DateSource {
    fn lane_count(&self) -> usize {
        3
    }

    fn root_items(&self) -> Vec<WheelItem> {
        self.years
            .clone()
            .map(|y| WheelItem::new(y.to_string(), y.to_string()))
            .collect()
    }

    fn dependent_items(&self, lane: usize, upstream: &[usize]) -> Option<Vec<WheelItem>> {
        let year = self.years.start().checked_add(i32::try_from(*upstream.first()?).ok()?)?;
        if !self.years.contains(&year) {
            return None;
        }
        let count = match (lane, upstream) {
            (1, _) => 12,
            (2, [_, m, ..]) => Self::days_in_month(year, u32::try_from(*m).ok()? + 1)?,
            _ => return None,
        };
        Some(
            (1..=count)
                .map(|n| WheelItem::new(n.to_string(), format!("{n:02}")))
                .collect(),
        )
    }

    fn value(&self, lane: usize, index: usize) -> i64 {
        match lane {
            0 => i64::from(*self.years.start()) + index as i64,
            _ => index as i64 + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[WheelItem]) -> Vec<&str> {
        items.iter().map(|i| i.label()).collect()
    }

    fn table() -> RegionTable {
        RegionTable::new(["A", "B"]).with_cities(vec![vec!["A1", "A2"], vec!["B1"]])
    }

    #[test]
    fn test_region_lookup() {
        let t = table().with_areas(vec![vec![vec!["A1a"], vec!["A2a", "A2b"]], vec![vec!["B1a"]]]);
        assert_eq!(labels(&t.root_items()), vec!["A", "B"]);
        assert_eq!(labels(&t.dependent_items(1, &[1]).unwrap()), vec!["B1"]);
        assert_eq!(labels(&t.dependent_items(2, &[0, 1]).unwrap()), vec!["A2a", "A2b"]);
        assert!(t.dependent_items(1, &[5]).is_none());
        assert!(t.dependent_items(3, &[0, 0, 0]).is_none());
        assert_eq!(t.value(2, 4), 4);
    }

    #[test]
    fn test_region_without_areas() {
        let t = table();
        assert!(t.validate().is_ok());
        assert!(t.dependent_items(2, &[1, 0]).is_none());
    }

    #[test]
    fn test_region_validate_mismatch() {
        let t = RegionTable::new(["A", "B"]).with_cities(vec![vec!["A1"]]);
        assert!(matches!(
            t.validate(),
            Err(Error::MissingDependencyData { lane: 1, .. })
        ));

        let t = table().with_areas(vec![vec![vec!["A1a"]], vec![vec!["B1a"]]]);
        assert!(matches!(
            t.validate(),
            Err(Error::MissingDependencyData { lane: 2, .. })
        ));
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(DateSource::days_in_month(2024, 2), Some(29));
        assert_eq!(DateSource::days_in_month(2023, 2), Some(28));
        assert_eq!(DateSource::days_in_month(2023, 12), Some(31));
        assert_eq!(DateSource::days_in_month(2023, 4), Some(30));
        assert_eq!(DateSource::days_in_month(2023, 13), None);
    }

    #[test]
    fn test_date_lanes() {
        let s = DateSource::new(2020..=2030);
        assert_eq!(s.root_items().len(), 11);
        assert_eq!(s.dependent_items(1, &[0]).unwrap().len(), 12);
        // 2020-02 has 29 days.
        let days = s.dependent_items(2, &[0, 1]).unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0].label(), "01");
        assert!(s.dependent_items(1, &[11]).is_none());

        assert_eq!(s.value(0, 3), 2023);
        assert_eq!(s.value(1, 0), 1);
        assert_eq!(s.value(2, 30), 31);
    }

    #[test]
    fn test_date_indices() {
        let s = DateSource::new(2020..=2030);
        let date = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        assert_eq!(s.indices_of(date), Some([1, 2, 14]));
        assert_eq!(s.date_at([1, 2, 14]), Some(date));
        assert_eq!(s.date_at([0, 1, 30]), None);
        assert_eq!(s.indices_of(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()), None);
    }
}
