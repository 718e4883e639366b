//! Historical price records and the in-memory price table

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// One historical market price record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Market date of the record
    pub date: NaiveDate,
    /// Crop (commodity) name
    pub crop: String,
    /// Market location (district) name
    pub location: String,
    /// Recorded price, never negative
    pub price: f64,
}

impl Observation {
    /// Create a new observation, rejecting negative or non-finite prices
    pub fn new(date: NaiveDate, crop: &str, location: &str, price: f64) -> Result<Self> {
        if !price.is_finite() || price < 0.0 {
            return Err(ForecastError::DataError(format!(
                "Price must be a non-negative number, got {} for {} at {} on {}",
                price, crop, location, date
            )));
        }

        Ok(Self {
            date,
            crop: crop.to_string(),
            location: location.to_string(),
            price,
        })
    }
}

/// Observations of one crop at one location, sorted ascending by date.
///
/// Sorting is stable, so records sharing a date keep their input order.
/// Duplicate dates are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    crop: String,
    location: String,
    observations: Vec<Observation>,
}

impl HistoricalSeries {
    /// Create a series from observations in any order
    pub fn new(crop: &str, location: &str, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);

        Self {
            crop: crop.to_string(),
            location: location.to_string(),
            observations,
        }
    }

    /// Create a series from `(date, price)` pairs (for testing)
    pub fn from_prices(crop: &str, location: &str, points: &[(NaiveDate, f64)]) -> Result<Self> {
        let observations = points
            .iter()
            .map(|&(date, price)| Observation::new(date, crop, location, price))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(crop, location, observations))
    }

    /// Get the crop name the series was requested for
    pub fn crop(&self) -> &str {
        &self.crop
    }

    /// Get the location name the series was requested for
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Get the observations in date order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the prices in date order
    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    /// Get the chronologically last observation
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// First and last observed dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

/// Row layout of a price file: `date,crop,location,price`
#[derive(Debug, Deserialize)]
struct PriceRecord {
    date: String,
    crop: String,
    location: String,
    price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    crop: String,
    location: String,
}

impl SeriesKey {
    fn new(crop: &str, location: &str) -> Self {
        Self {
            crop: crop.trim().to_lowercase(),
            location: location.trim().to_lowercase(),
        }
    }
}

/// All loaded price records across crops and locations.
///
/// The table is built once and is read-only afterwards; share it between
/// threads by reference or behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    observations: Vec<Observation>,
    index: HashMap<SeriesKey, Vec<usize>>,
}

impl PriceTable {
    /// Load a price table from a CSV file with a `date,crop,location,price` header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            records = table.len(),
            series = table.index.len(),
            "Loaded price table"
        );

        Ok(table)
    }

    /// Load a price table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        for (i, record) in csv_reader.deserialize::<PriceRecord>().enumerate() {
            let record = record?;
            // Header is line 1
            let line = i + 2;

            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|e| {
                ForecastError::DataError(format!(
                    "Invalid date '{}' at line {}: {}",
                    record.date, line, e
                ))
            })?;

            let observation = Observation::new(date, &record.crop, &record.location, record.price)
                .map_err(|e| match e {
                    ForecastError::DataError(msg) => {
                        ForecastError::DataError(format!("Line {}: {}", line, msg))
                    }
                    other => other,
                })?;
            observations.push(observation);
        }

        Ok(Self::from_observations(observations))
    }

    /// Build a price table from already-parsed observations
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut index: HashMap<SeriesKey, Vec<usize>> = HashMap::new();
        for (i, o) in observations.iter().enumerate() {
            index
                .entry(SeriesKey::new(&o.crop, &o.location))
                .or_default()
                .push(i);
        }

        Self {
            observations,
            index,
        }
    }

    /// Observations of `crop` at `location`, matched case-insensitively.
    ///
    /// Surrounding whitespace is ignored on both sides of the match, the
    /// same way the CSV loader trims every cell, so `" Wheat "` finds
    /// `Wheat`. An unknown pair is reported as [`ForecastError::NoData`].
    pub fn series(&self, crop: &str, location: &str) -> Result<HistoricalSeries> {
        let key = SeriesKey::new(crop, location);
        let rows = match self.index.get(&key) {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Err(ForecastError::no_data(crop, location)),
        };

        let observations = rows.iter().map(|&i| self.observations[i].clone()).collect();
        let series = HistoricalSeries::new(crop, location, observations);

        debug!(crop, location, observations = series.len(), "Selected price series");
        Ok(series)
    }

    /// Distinct crop names, sorted case-insensitively, first-seen spelling
    pub fn crops(&self) -> Vec<String> {
        Self::distinct(self.observations.iter().map(|o| o.crop.as_str()))
    }

    /// Distinct location names, sorted case-insensitively, first-seen spelling
    pub fn locations(&self) -> Vec<String> {
        Self::distinct(self.observations.iter().map(|o| o.location.as_str()))
    }

    fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for name in names {
            seen.entry(name.trim().to_lowercase()).or_insert(name);
        }
        seen.into_values().map(str::to_string).collect()
    }

    /// Get all observations in load order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the number of loaded records
    pub fn len(&self) -> usize {
        self.observations.len()
    }
}
