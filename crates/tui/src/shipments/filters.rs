//! Filter form state and its normalization into a [`ShipmentFilter`].
//!
//! The form keeps exactly what the user typed. Only [`FilterState::normalize`]
//! turns it into wire values: empty fields are dropped, numbers and dates are
//! parsed, and the delivery status is matched against `"true"`/`"false"`
//! literally.

use api_types::shipment::{ShipmentFilter, ShipmentType};
use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Keyword,
    ShipmentType,
    StartDate,
    EndDate,
    MinCost,
    MaxCost,
    IsDelivered,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        Self::Keyword,
        Self::ShipmentType,
        Self::IsDelivered,
        Self::StartDate,
        Self::EndDate,
        Self::MinCost,
        Self::MaxCost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Keyword => "Search",
            Self::ShipmentType => "Type",
            Self::StartDate => "From",
            Self::EndDate => "To",
            Self::MinCost => "Min cost",
            Self::MaxCost => "Max cost",
            Self::IsDelivered => "Status",
        }
    }

    /// Selector fields cycle through fixed options instead of taking text.
    pub fn is_selector(self) -> bool {
        matches!(self, Self::ShipmentType | Self::IsDelivered)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field}: \"{value}\" is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field}: \"{value}\" is not a date (YYYY-MM-DD)")]
    NotADate { field: &'static str, value: String },
    #[error("unknown shipment type \"{0}\"")]
    UnknownType(String),
    #[error("unknown delivery status \"{0}\"")]
    UnknownStatus(String),
}

/// Raw filter values as entered. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub keyword: String,
    pub shipment_type: String,
    pub start_date: String,
    pub end_date: String,
    pub min_cost: String,
    pub max_cost: String,
    /// `""`, `"true"` (Delivered) or `"false"` (In Transit).
    pub is_delivered: String,
}

impl FilterState {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Keyword => &self.keyword,
            FilterField::ShipmentType => &self.shipment_type,
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::MinCost => &self.min_cost,
            FilterField::MaxCost => &self.max_cost,
            FilterField::IsDelivered => &self.is_delivered,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Keyword => &mut self.keyword,
            FilterField::ShipmentType => &mut self.shipment_type,
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::MinCost => &mut self.min_cost,
            FilterField::MaxCost => &mut self.max_cost,
            FilterField::IsDelivered => &mut self.is_delivered,
        };
        *slot = value.into();
    }

    /// Next value of a selector field: "" → AIR → SEA → ROAD → "" and
    /// "" → "true" → "false" → "".
    pub fn cycle(&mut self, field: FilterField) {
        let next = match field {
            FilterField::ShipmentType => match self.shipment_type.parse::<ShipmentType>() {
                Err(_) => ShipmentType::Air.as_str(),
                Ok(ShipmentType::Road) => "",
                Ok(kind) => kind.next().as_str(),
            },
            FilterField::IsDelivered => match self.is_delivered.as_str() {
                "" => "true",
                "true" => "false",
                _ => "",
            },
            _ => return,
        };
        self.set(field, next);
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Returns `None` when no field carries a constraint.
    pub fn normalize(&self) -> Result<Option<ShipmentFilter>, FilterError> {
        let filter = ShipmentFilter {
            keyword: non_empty(&self.keyword).map(str::to_string),
            shipment_type: non_empty(&self.shipment_type)
                .map(|raw| {
                    raw.parse::<ShipmentType>()
                        .map_err(|_| FilterError::UnknownType(raw.to_string()))
                })
                .transpose()?,
            start_date: parse_date("start date", &self.start_date)?,
            end_date: parse_date("end date", &self.end_date)?,
            min_cost: parse_cost("min cost", &self.min_cost)?,
            max_cost: parse_cost("max cost", &self.max_cost)?,
            is_delivered: parse_status(&self.is_delivered)?,
        };

        if filter.is_empty() {
            return Ok(None);
        }
        Ok(Some(filter))
    }
}

/// Human label for the delivery selector.
pub fn status_label(raw: &str) -> &'static str {
    match raw {
        "true" => "Delivered",
        "false" => "In Transit",
        _ => "All",
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_date(field: &'static str, raw: &str) -> Result<Option<NaiveDate>, FilterError> {
    non_empty(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| FilterError::NotADate {
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}

fn parse_cost(field: &'static str, raw: &str) -> Result<Option<f64>, FilterError> {
    non_empty(raw)
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|cost| cost.is_finite())
                .ok_or_else(|| FilterError::NotANumber {
                    field,
                    value: value.to_string(),
                })
        })
        .transpose()
}

fn parse_status(raw: &str) -> Result<Option<bool>, FilterError> {
    match raw.trim() {
        "" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(FilterError::UnknownStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_empty_fields_normalize_to_none() {
        let state = FilterState {
            keyword: "   ".to_string(),
            ..FilterState::default()
        };
        assert!(state.is_empty());
        assert_eq!(state.normalize().unwrap(), None);
    }

    #[test]
    fn in_transit_is_sent_as_boolean_false() {
        let mut state = FilterState::default();
        state.set(FilterField::IsDelivered, "false");

        let filter = state.normalize().unwrap().unwrap();
        assert_eq!(filter.is_delivered, Some(false));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            serde_json::json!({ "isDelivered": false })
        );
    }

    #[test]
    fn delivered_is_sent_as_boolean_true() {
        let mut state = FilterState::default();
        state.set(FilterField::IsDelivered, "true");
        assert_eq!(state.normalize().unwrap().unwrap().is_delivered, Some(true));
    }

    #[test]
    fn unknown_status_is_rejected_not_guessed() {
        let mut state = FilterState::default();
        state.set(FilterField::IsDelivered, "yes");
        assert_eq!(
            state.normalize(),
            Err(FilterError::UnknownStatus("yes".to_string()))
        );
    }

    #[test]
    fn numbers_and_dates_are_parsed() {
        let state = FilterState {
            keyword: " pallet ".to_string(),
            shipment_type: "ROAD".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-02-01".to_string(),
            min_cost: "10".to_string(),
            max_cost: "99.5".to_string(),
            is_delivered: String::new(),
        };

        let filter = state.normalize().unwrap().unwrap();
        assert_eq!(filter.keyword.as_deref(), Some("pallet"));
        assert_eq!(filter.shipment_type, Some(ShipmentType::Road));
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(filter.min_cost, Some(10.0));
        assert_eq!(filter.max_cost, Some(99.5));
        assert_eq!(filter.is_delivered, None);
    }

    #[test]
    fn malformed_cost_is_reported() {
        let mut state = FilterState::default();
        state.set(FilterField::MinCost, "ten");
        assert!(matches!(
            state.normalize(),
            Err(FilterError::NotANumber { field: "min cost", .. })
        ));
    }

    #[test]
    fn malformed_date_is_reported() {
        let mut state = FilterState::default();
        state.set(FilterField::EndDate, "10/01/2025");
        assert!(matches!(
            state.normalize(),
            Err(FilterError::NotADate { field: "end date", .. })
        ));
    }

    #[test]
    fn selectors_cycle_back_to_empty() {
        let mut state = FilterState::default();
        let seen: Vec<String> = (0..4)
            .map(|_| {
                state.cycle(FilterField::ShipmentType);
                state.shipment_type.clone()
            })
            .collect();
        assert_eq!(seen, ["AIR", "SEA", "ROAD", ""]);

        state.cycle(FilterField::IsDelivered);
        assert_eq!(status_label(&state.is_delivered), "Delivered");
        state.cycle(FilterField::IsDelivered);
        assert_eq!(status_label(&state.is_delivered), "In Transit");
        state.cycle(FilterField::IsDelivered);
        assert_eq!(state.is_delivered, "");
    }
}
