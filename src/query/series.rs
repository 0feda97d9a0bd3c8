//! Series types and measurement columns

use serde::Serialize;
use std::str::FromStr;

use super::error::{QueryError, QueryResult};

/// A sensor column of the measurements table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// CO2 concentration, ppm, unscaled
    Co2,
    /// BMP pressure, rounded to whole units
    BmpPressure,
    /// BMP temperature, hundredths of a degree
    BmpTemp,
    /// HDC temperature, hundredths of a degree
    HdcTemp,
    /// HDC relative humidity, hundredths of a percent
    HdcHum,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Co2,
        Column::BmpPressure,
        Column::BmpTemp,
        Column::HdcTemp,
        Column::HdcHum,
    ];

    /// Column name in the measurements table
    pub fn name(&self) -> &'static str {
        match self {
            Self::Co2 => "co2",
            Self::BmpPressure => "bmp_pressure",
            Self::BmpTemp => "bmp_temp",
            Self::HdcTemp => "hdc_temp",
            Self::HdcHum => "hdc_hum",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Public series name accepted by the series endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    /// Both temperature sensors, returned side by side
    Temp,
    Humidity,
    Pressure,
    Co2,
}

impl SeriesType {
    /// Resolve a series name
    pub fn parse(name: &str) -> QueryResult<Self> {
        match name {
            "temp" => Ok(Self::Temp),
            "humidity" => Ok(Self::Humidity),
            "pressure" => Ok(Self::Pressure),
            "co2" => Ok(Self::Co2),
            _ => Err(QueryError::UnknownSeriesType(name.to_string())),
        }
    }

    /// Columns selected for this series
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::Temp => &[Column::BmpTemp, Column::HdcTemp],
            Self::Humidity => &[Column::HdcHum],
            Self::Pressure => &[Column::BmpPressure],
            Self::Co2 => &[Column::Co2],
        }
    }
}

impl FromStr for SeriesType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SeriesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temp => write!(f, "temp"),
            Self::Humidity => write!(f, "humidity"),
            Self::Pressure => write!(f, "pressure"),
            Self::Co2 => write!(f, "co2"),
        }
    }
}
