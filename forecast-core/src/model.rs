use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast payload as returned by the upstream API for one query.
///
/// Deserialized verbatim: both temperature units come straight from the
/// service, and every forecast day is kept even though only the first one
/// is displayed. Unit selection happens later, in [`present`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DayAverages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAverages {
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub condition: Condition,
}

/// Temperature unit used for display. Independent of query status: it
/// survives queries and error transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "celsius",
            TempUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
        }
    }
}

impl std::fmt::Display for TempUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit-resolved, presentation-ready view of a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub location_label: String,
    pub current_temp: f64,
    pub current_condition: String,
    pub current_icon: String,
    pub forecast_date: NaiveDate,
    pub forecast_temp: f64,
    pub forecast_condition: String,
    pub forecast_icon: String,
}

/// Project a payload into display values for the given unit.
///
/// Pure: no mutation, no conversion arithmetic (both units are already in
/// the payload). Returns `None` only when `forecast.forecastday` is empty,
/// which the controller never stores.
pub fn present(payload: &ForecastPayload, unit: TempUnit) -> Option<DisplayModel> {
    let day = payload.forecast.forecastday.first()?;

    let (current_temp, forecast_temp) = match unit {
        TempUnit::Celsius => (payload.current.temp_c, day.day.avgtemp_c),
        TempUnit::Fahrenheit => (payload.current.temp_f, day.day.avgtemp_f),
    };

    Some(DisplayModel {
        location_label: format!("{}, {}", payload.location.name, payload.location.country),
        current_temp,
        current_condition: payload.current.condition.text.clone(),
        current_icon: payload.current.condition.icon.clone(),
        forecast_date: day.date,
        forecast_temp,
        forecast_condition: day.day.condition.text.clone(),
        forecast_icon: day.day.condition.icon.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> ForecastPayload {
        serde_json::from_value(json!({
            "location": { "name": "Paris", "country": "France" },
            "current": {
                "temp_c": 15.0,
                "temp_f": 59.0,
                "condition": { "text": "Cloudy", "icon": "x" }
            },
            "forecast": {
                "forecastday": [
                    {
                        "date": "2024-01-01",
                        "day": {
                            "avgtemp_c": 14.0,
                            "avgtemp_f": 57.0,
                            "condition": { "text": "Cloudy", "icon": "x" }
                        }
                    },
                    {
                        "date": "2024-01-02",
                        "day": {
                            "avgtemp_c": 10.0,
                            "avgtemp_f": 50.0,
                            "condition": { "text": "Sunny", "icon": "y" }
                        }
                    }
                ]
            }
        }))
        .expect("sample payload must deserialize")
    }

    #[test]
    fn present_selects_celsius_values() {
        let payload = sample_payload();
        let model = present(&payload, TempUnit::Celsius).expect("payload has forecast days");

        assert_eq!(model.location_label, "Paris, France");
        assert_eq!(model.current_temp, 15.0);
        assert_eq!(model.current_condition, "Cloudy");
        assert_eq!(model.forecast_temp, 14.0);
    }

    #[test]
    fn present_selects_fahrenheit_values() {
        let payload = sample_payload();
        let model = present(&payload, TempUnit::Fahrenheit).expect("payload has forecast days");

        assert_eq!(model.current_temp, 59.0);
        assert_eq!(model.forecast_temp, 57.0);
    }

    #[test]
    fn present_uses_only_the_first_forecast_day() {
        let payload = sample_payload();
        let model = present(&payload, TempUnit::Celsius).unwrap();

        assert_eq!(model.forecast_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(model.forecast_condition, "Cloudy");
    }

    #[test]
    fn present_is_idempotent() {
        let payload = sample_payload();
        let before = payload.clone();

        let first = present(&payload, TempUnit::Celsius);
        let second = present(&payload, TempUnit::Celsius);

        assert_eq!(first, second);
        assert_eq!(payload, before);
    }

    #[test]
    fn toggling_twice_restores_display() {
        let payload = sample_payload();
        let unit = TempUnit::Celsius;

        let round_trip = present(&payload, unit.toggle().toggle());
        assert_eq!(round_trip, present(&payload, unit));
    }

    #[test]
    fn present_returns_none_for_empty_forecast() {
        let mut payload = sample_payload();
        payload.forecast.forecastday.clear();

        assert_eq!(present(&payload, TempUnit::Celsius), None);
    }

    #[test]
    fn payload_retains_all_forecast_days() {
        let payload = sample_payload();
        assert_eq!(payload.forecast.forecastday.len(), 2);

        let value = serde_json::to_value(&payload).expect("payload must serialize");
        assert_eq!(value["forecast"]["forecastday"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "location": { "name": "Kyiv", "country": "Ukraine", "tz_id": "Europe/Kyiv" },
            "current": {
                "temp_c": 1.0,
                "temp_f": 33.8,
                "humidity": 80,
                "condition": { "text": "Snow", "icon": "z", "code": 1066 }
            },
            "forecast": {
                "forecastday": [
                    {
                        "date": "2024-02-01",
                        "day": {
                            "avgtemp_c": -2.0,
                            "avgtemp_f": 28.4,
                            "maxwind_kph": 20.0,
                            "condition": { "text": "Snow", "icon": "z" }
                        }
                    }
                ]
            }
        }))
        .expect("extra fields must not break deserialization");

        assert_eq!(payload.location.name, "Kyiv");
    }
}
