//! Parser for the BoM `stations.txt` site list.
//!
//! The file is fixed width. After five header lines, every station row is cut into fields with
//! [`FIELD_WIDTHS`], where negative widths are skipped columns.

use serde::Serialize;
use tracing::warn;

use crate::error::{WeatherError, WeatherResult};

const HEADER_LINES: usize = 5;

/// Shorter lines are footers or blanks.
const MIN_STATION_LINE_LEN: usize = 129;

const FIELD_WIDTHS: [i32; 12] = [-8, -6, 41, -8, -7, 9, 10, -15, 4, 11, -9, 7];

/// Value the site list uses for unknown fields.
const MISSING: &str = "..";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
    pub altitude: Option<f64>,
    pub wmo: u32,
}

/// Parses every station that has a WMO id. Malformed rows are logged and skipped.
pub fn parse_stations(text: &str) -> Vec<Station> {
    text.lines()
        .enumerate()
        .skip(HEADER_LINES)
        .filter(|(_, line)| line.len() >= MIN_STATION_LINE_LEN)
        .filter_map(|(index, line)| match parse_station_line(index + 1, line) {
            Ok(station) => station,
            Err(err) => {
                warn!(error = %err, "skipping malformed station");
                None
            }
        })
        .collect()
}

/// Parses one row. Returns `None` for stations without a WMO id.
pub fn parse_station_line(line_number: usize, line: &str) -> WeatherResult<Option<Station>> {
    let fields = split_fields(line_number, line)?;
    let [name, latitude, longitude, state, altitude, wmo] = fields.as_slice() else {
        return Err(invalid(line_number, "unexpected field count"));
    };

    if *wmo == MISSING {
        return Ok(None);
    }

    let altitude = match *altitude {
        MISSING => None,
        value => Some(parse_number(line_number, "altitude", value)?),
    };

    Ok(Some(Station {
        name: name.to_string(),
        latitude: parse_number(line_number, "latitude", latitude)?,
        longitude: parse_number(line_number, "longitude", longitude)?,
        state: state.to_string(),
        altitude,
        wmo: wmo
            .parse()
            .map_err(|err| invalid(line_number, format!("wmo `{wmo}`: {err}")))?,
    }))
}

fn split_fields(line_number: usize, line: &str) -> WeatherResult<Vec<&str>> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(6);
    let mut offset = 0;

    for width in FIELD_WIDTHS {
        let end = offset + width.unsigned_abs() as usize;
        if end > bytes.len() {
            return Err(invalid(line_number, format!("line ends before column {end}")));
        }

        if width > 0 {
            let field = std::str::from_utf8(&bytes[offset..end])
                .map_err(|err| invalid(line_number, err.to_string()))?;
            fields.push(field.trim());
        }

        offset = end;
    }

    Ok(fields)
}

fn parse_number(line_number: usize, field: &str, value: &str) -> WeatherResult<f64> {
    value
        .parse()
        .map_err(|err| invalid(line_number, format!("{field} `{value}`: {err}")))
}

fn invalid(line: usize, reason: impl Into<String>) -> WeatherError {
    WeatherError::InvalidStation {
        line,
        reason: reason.into(),
    }
}
