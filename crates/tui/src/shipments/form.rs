//! Create/edit dialog state.
//!
//! Fields are kept as typed; [`ShipmentForm::submit`] validates them and
//! builds the wire payload. The phase guards against submitting twice while
//! a request is in flight.

use api_types::shipment::{Shipment, ShipmentRequest, ShipmentType};
use chrono::NaiveDate;

use super::filters::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    ShipmentType,
    Cost,
    Date,
    Delivered,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::Title,
        Self::Description,
        Self::ShipmentType,
        Self::Cost,
        Self::Date,
        Self::Delivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::ShipmentType => "Type",
            Self::Cost => "Cost",
            Self::Date => "Date",
            Self::Delivered => "Delivered",
        }
    }

    pub fn is_selector(self) -> bool {
        matches!(self, Self::ShipmentType | Self::Delivered)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub cost: Option<String>,
    pub date: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.cost.is_none() && self.date.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Title => self.title.as_deref(),
            FormField::Cost => self.cost.as_deref(),
            FormField::Date => self.date.as_deref(),
            _ => None,
        }
    }

    fn clear(&mut self, field: FormField) {
        match field {
            FormField::Title => self.title = None,
            FormField::Cost => self.cost = None,
            FormField::Date => self.date = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShipmentForm {
    /// `Some` when editing an existing shipment.
    pub editing_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub shipment_type: ShipmentType,
    pub cost: String,
    pub date: String,
    pub is_delivered: bool,
    pub focus: FormField,
    pub errors: FieldErrors,
    /// Last rejection from the server, shown under the fields.
    pub server_error: Option<String>,
    phase: FormPhase,
}

impl ShipmentForm {
    /// Blank form for a new shipment, dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            title: String::new(),
            description: String::new(),
            shipment_type: ShipmentType::Air,
            cost: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            is_delivered: false,
            focus: FormField::Title,
            errors: FieldErrors::default(),
            server_error: None,
            phase: FormPhase::Editing,
        }
    }

    /// Form prefilled from an existing record.
    pub fn edit(shipment: &Shipment) -> Self {
        Self {
            editing_id: Some(shipment.id),
            title: shipment.shipment_title.clone(),
            description: shipment.shipment_description.clone().unwrap_or_default(),
            shipment_type: shipment.shipment_type,
            cost: shipment.cost.to_string(),
            date: shipment.shipment_date.format(DATE_FORMAT).to_string(),
            is_delivered: shipment.is_delivered,
            focus: FormField::Title,
            errors: FieldErrors::default(),
            server_error: None,
            phase: FormPhase::Editing,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn title_text(&self) -> &'static str {
        if self.is_edit() {
            "Edit Shipment"
        } else {
            "Add New Shipment"
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Description => self.description.clone(),
            FormField::ShipmentType => self.shipment_type.to_string(),
            FormField::Cost => self.cost.clone(),
            FormField::Date => self.date.clone(),
            FormField::Delivered => yes_no(self.is_delivered).to_string(),
        }
    }

    pub fn next_field(&mut self) {
        let idx = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[idx];
    }

    pub fn prev_field(&mut self) {
        let len = FormField::ALL.len();
        let idx = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[idx];
    }

    fn text_slot(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Cost => Some(&mut self.cost),
            FormField::Date => Some(&mut self.date),
            FormField::ShipmentType | FormField::Delivered => None,
        }
    }

    /// Types into the focused field. On selectors a space toggles instead.
    pub fn input(&mut self, ch: char) {
        if self.phase != FormPhase::Editing {
            return;
        }
        if self.focus.is_selector() {
            if ch == ' ' {
                self.toggle();
            }
            return;
        }
        let field = self.focus;
        if let Some(slot) = self.text_slot() {
            slot.push(ch);
        }
        self.errors.clear(field);
    }

    pub fn backspace(&mut self) {
        if self.phase != FormPhase::Editing {
            return;
        }
        let field = self.focus;
        if let Some(slot) = self.text_slot() {
            slot.pop();
        }
        self.errors.clear(field);
    }

    /// Advances the focused selector.
    pub fn toggle(&mut self) {
        match self.focus {
            FormField::ShipmentType => self.shipment_type = self.shipment_type.next(),
            FormField::Delivered => self.is_delivered = !self.is_delivered,
            _ => {}
        }
    }

    /// Checks the fields and builds the payload, recording per-field errors.
    pub fn validate(&mut self) -> Option<ShipmentRequest> {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.title = Some("Title is required".to_string());
        }

        let cost_raw = self.cost.trim();
        let cost = if cost_raw.is_empty() {
            errors.cost = Some("Cost is required".to_string());
            None
        } else {
            match cost_raw.parse::<f64>() {
                Ok(cost) if cost.is_finite() && cost > 0.0 => Some(cost),
                Ok(_) => {
                    errors.cost = Some("Cost must be greater than 0".to_string());
                    None
                }
                Err(_) => {
                    errors.cost = Some("Cost must be a number".to_string());
                    None
                }
            }
        };

        let date_raw = self.date.trim();
        let date = if date_raw.is_empty() {
            errors.date = Some("Date is required".to_string());
            None
        } else {
            let parsed = NaiveDate::parse_from_str(date_raw, DATE_FORMAT).ok();
            if parsed.is_none() {
                errors.date = Some("Date must be YYYY-MM-DD".to_string());
            }
            parsed
        };

        let payload = match (errors.is_empty(), cost, date) {
            (true, Some(cost), Some(shipment_date)) => Some(ShipmentRequest {
                shipment_title: title.to_string(),
                shipment_description: self.description.trim().to_string(),
                shipment_type: self.shipment_type,
                is_delivered: self.is_delivered,
                cost,
                shipment_date,
            }),
            _ => None,
        };
        self.errors = errors;
        payload
    }

    /// Validated payload, or `None` if invalid or already submitting.
    pub fn submit(&mut self) -> Option<ShipmentRequest> {
        if self.phase != FormPhase::Editing {
            return None;
        }
        let payload = self.validate()?;
        self.server_error = None;
        self.phase = FormPhase::Submitting;
        Some(payload)
    }

    pub fn submit_failed(&mut self, message: String) {
        self.server_error = Some(message);
        self.phase = FormPhase::Editing;
    }

    pub fn submit_succeeded(&mut self) {
        self.phase = FormPhase::Closed;
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_shipment;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn type_into(form: &mut ShipmentForm, field: FormField, text: &str) {
        form.focus = field;
        for ch in text.chars() {
            form.input(ch);
        }
    }

    #[test]
    fn new_form_defaults() {
        let form = ShipmentForm::new(today());
        assert_eq!(form.date, "2025-03-14");
        assert_eq!(form.shipment_type, ShipmentType::Air);
        assert!(!form.is_delivered);
        assert!(!form.is_edit());
        assert_eq!(form.title_text(), "Add New Shipment");
    }

    #[test]
    fn cost_text_is_sent_as_number() {
        let mut form = ShipmentForm::new(today());
        type_into(&mut form, FormField::Title, "Pallet A");
        type_into(&mut form, FormField::Cost, "150.50");

        let payload = form.submit().unwrap();
        assert_eq!(payload.cost, 150.5);
        assert_eq!(payload.shipment_description, "");
        assert_eq!(payload.shipment_date, today());
        assert_eq!(form.phase(), FormPhase::Submitting);
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let mut form = ShipmentForm::new(today());
        form.date.clear();

        assert!(form.submit().is_none());
        assert_eq!(form.errors.title.as_deref(), Some("Title is required"));
        assert_eq!(form.errors.cost.as_deref(), Some("Cost is required"));
        assert_eq!(form.errors.date.as_deref(), Some("Date is required"));
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn non_positive_and_garbage_costs_are_rejected() {
        let mut form = ShipmentForm::new(today());
        form.title = "x".to_string();

        form.cost = "0".to_string();
        assert!(form.validate().is_none());
        assert_eq!(form.errors.cost.as_deref(), Some("Cost must be greater than 0"));

        form.cost = "12,5".to_string();
        assert!(form.validate().is_none());
        assert_eq!(form.errors.cost.as_deref(), Some("Cost must be a number"));
    }

    #[test]
    fn typing_clears_that_fields_error() {
        let mut form = ShipmentForm::new(today());
        assert!(form.submit().is_none());
        assert!(form.errors.title.is_some());

        type_into(&mut form, FormField::Title, "a");
        assert!(form.errors.title.is_none());
        assert!(form.errors.cost.is_some());
    }

    #[test]
    fn second_submit_is_ignored_while_in_flight() {
        let mut form = ShipmentForm::new(today());
        form.title = "Pallet".to_string();
        form.cost = "5".to_string();

        assert!(form.submit().is_some());
        assert!(form.submit().is_none());

        form.submit_failed("Shipment could not be created. Try later".to_string());
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.server_error.is_some());
        assert!(form.submit().is_some());
        assert!(form.server_error.is_none());
    }

    #[test]
    fn edit_prefills_from_record() {
        let shipment = sample_shipment(4);
        let mut form = ShipmentForm::edit(&shipment);

        assert_eq!(form.editing_id, Some(4));
        assert_eq!(form.title_text(), "Edit Shipment");
        assert_eq!(form.cost, "40");
        assert_eq!(form.date, "2025-01-05");
        assert!(form.is_delivered);

        let payload = form.submit().unwrap();
        assert_eq!(payload.shipment_title, shipment.shipment_title);
        assert_eq!(payload.shipment_description, "crate #4");
        assert_eq!(payload.cost, 40.0);
    }

    #[test]
    fn selectors_toggle_on_space_and_ignore_text() {
        let mut form = ShipmentForm::new(today());
        form.focus = FormField::ShipmentType;
        form.input('x');
        assert_eq!(form.shipment_type, ShipmentType::Air);
        form.input(' ');
        assert_eq!(form.shipment_type, ShipmentType::Sea);

        form.focus = FormField::Delivered;
        form.input(' ');
        assert!(form.is_delivered);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = ShipmentForm::new(today());
        form.prev_field();
        assert_eq!(form.focus, FormField::Delivered);
        form.next_field();
        assert_eq!(form.focus, FormField::Title);
    }
}
