use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GastosError, Result};
use crate::options::{OptionSet, CATEGORY_OPTIONS, PAYMENT_OPTIONS, RESPONSIBLE_OPTIONS};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One expense entry as the endpoint receives it.
///
/// Numeric fields hold the text exactly as typed so the wire payload never
/// coerces `"12.50"` into `12.5`. Empty installment fields go out as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "egreso")]
    pub payment_method: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "detalle")]
    pub detail: String,
    #[serde(rename = "responsable")]
    pub responsible: String,
    #[serde(rename = "monto")]
    pub amount: String,
    #[serde(rename = "diferido", default)]
    pub installment_index: String,
    #[serde(rename = "diferidoTotal", default)]
    pub installment_total: String,
    #[serde(rename = "recurrente", default)]
    pub is_recurring: bool,
}

impl ExpenseRecord {
    /// A fresh record: first option of every selector, today's date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            payment_method: PAYMENT_OPTIONS.default_value().to_string(),
            date: today.format(DATE_FORMAT).to_string(),
            category: CATEGORY_OPTIONS.default_value().to_string(),
            detail: String::new(),
            responsible: RESPONSIBLE_OPTIONS.default_value().to_string(),
            amount: String::new(),
            installment_index: String::new(),
            installment_total: String::new(),
            is_recurring: false,
        }
    }

    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Replace exactly one field. Selector fields only accept members of their set.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::Recurring, FieldValue::Flag(flag)) => {
                self.is_recurring = flag;
                Ok(())
            }
            (Field::Recurring, FieldValue::Text(_)) | (_, FieldValue::Flag(_)) => {
                Err(GastosError::FieldKind(field.wire_name()))
            }
            (field, FieldValue::Text(text)) => {
                if let Some(set) = field.option_set() {
                    if !set.contains(&text) {
                        return Err(GastosError::InvalidOption {
                            field: set.label,
                            value: text,
                        });
                    }
                }
                if let Some(slot) = self.text_mut(field) {
                    *slot = text;
                }
                Ok(())
            }
        }
    }

    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::Recurring => FieldValue::Flag(self.is_recurring),
            Field::PaymentMethod => FieldValue::Text(self.payment_method.clone()),
            Field::Date => FieldValue::Text(self.date.clone()),
            Field::Category => FieldValue::Text(self.category.clone()),
            Field::Detail => FieldValue::Text(self.detail.clone()),
            Field::Responsible => FieldValue::Text(self.responsible.clone()),
            Field::Amount => FieldValue::Text(self.amount.clone()),
            Field::InstallmentIndex => FieldValue::Text(self.installment_index.clone()),
            Field::InstallmentTotal => FieldValue::Text(self.installment_total.clone()),
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PaymentMethod => Some(&mut self.payment_method),
            Field::Date => Some(&mut self.date),
            Field::Category => Some(&mut self.category),
            Field::Detail => Some(&mut self.detail),
            Field::Responsible => Some(&mut self.responsible),
            Field::Amount => Some(&mut self.amount),
            Field::InstallmentIndex => Some(&mut self.installment_index),
            Field::InstallmentTotal => Some(&mut self.installment_total),
            Field::Recurring => None,
        }
    }

    /// Clear the per-entry fields after a successful submit. Selectors, date
    /// and the recurring flag stay so the next entry is quicker to type.
    pub fn reset_after_success(&mut self) {
        self.amount.clear();
        self.detail.clear();
        self.installment_index.clear();
        self.installment_total.clear();
    }

    /// The checks a browser's `required` / `type=number` hints would make
    /// before letting the form submit. Returns every problem found.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.date.trim().is_empty() {
            errors.push(FieldError::new(Field::Date, "Date is required"));
        } else if NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).is_err() {
            errors.push(FieldError::new(Field::Date, "Date must be YYYY-MM-DD"));
        }

        if self.amount.trim().is_empty() {
            errors.push(FieldError::new(Field::Amount, "Amount is required"));
        } else if parse_amount(&self.amount).is_none() {
            errors.push(FieldError::new(
                Field::Amount,
                "Amount must be a non-negative number with at most 2 decimals",
            ));
        }

        if self.detail.trim().is_empty() {
            errors.push(FieldError::new(Field::Detail, "Detail is required"));
        }

        for field in [Field::InstallmentIndex, Field::InstallmentTotal] {
            let FieldValue::Text(raw) = self.get(field) else {
                continue;
            };
            if !raw.trim().is_empty() && raw.trim().parse::<i64>().is_err() {
                errors.push(FieldError::new(
                    field,
                    format!("{} must be a whole number", field.label()),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Parse a non-negative decimal with at most two fractional digits.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if frac_part.len() > 2 {
        return None;
    }
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    s.parse().ok().filter(|v: &f64| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PaymentMethod,
    Date,
    Category,
    Detail,
    Responsible,
    Amount,
    InstallmentIndex,
    InstallmentTotal,
    Recurring,
}

impl Field {
    /// JSON key shared with the endpoint. Renaming one breaks the collaborator.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::PaymentMethod => "egreso",
            Field::Date => "fecha",
            Field::Category => "categoria",
            Field::Detail => "detalle",
            Field::Responsible => "responsable",
            Field::Amount => "monto",
            Field::InstallmentIndex => "diferido",
            Field::InstallmentTotal => "diferidoTotal",
            Field::Recurring => "recurrente",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::PaymentMethod => "Payment",
            Field::Date => "Date",
            Field::Category => "Category",
            Field::Detail => "Detail",
            Field::Responsible => "Responsible",
            Field::Amount => "Amount",
            Field::InstallmentIndex => "Installment",
            Field::InstallmentTotal => "Of total",
            Field::Recurring => "Recurring",
        }
    }

    pub fn option_set(self) -> Option<OptionSet> {
        match self {
            Field::PaymentMethod => Some(PAYMENT_OPTIONS),
            Field::Category => Some(CATEGORY_OPTIONS),
            Field::Responsible => Some(RESPONSIBLE_OPTIONS),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A raw value from the form: text for inputs and selectors, a flag for the checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Envelope returned by the endpoint. Any JSON shape is accepted: a missing
/// or non-string `status` is simply not a success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl ScriptResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Read `status` and `message` off whatever the script sent back.
    /// Non-string values are kept as their JSON text; `null` counts as absent.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| match value.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self {
            status: text("status"),
            message: text("message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn filled() -> ExpenseRecord {
        let mut r = ExpenseRecord::new(day());
        r.detail = "Groceries".into();
        r.amount = "42.10".into();
        r
    }

    #[test]
    fn test_new_record_uses_first_options_and_given_date() {
        let r = ExpenseRecord::new(day());
        assert_eq!(r.payment_method, "Deuda Juanis");
        assert_eq!(r.category, "Ahorro");
        assert_eq!(r.responsible, "Alejo");
        assert_eq!(r.date, "2026-03-14");
        assert!(!r.is_recurring);
        assert!(r.amount.is_empty() && r.detail.is_empty());
    }

    #[test]
    fn test_serializes_with_wire_keys() {
        let json = serde_json::to_value(filled()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "categoria",
                "detalle",
                "diferido",
                "diferidoTotal",
                "egreso",
                "fecha",
                "monto",
                "recurrente",
                "responsable"
            ]
        );
        assert_eq!(obj["monto"], "42.10");
        assert_eq!(obj["diferido"], "");
        assert_eq!(obj["recurrente"], false);
    }

    #[test]
    fn test_wire_roundtrip_keeps_numeric_text() {
        let mut r = filled();
        r.amount = "12.50".into();
        r.installment_index = "03".into();
        r.installment_total = "12".into();
        r.is_recurring = true;
        let json = serde_json::to_string(&r).unwrap();
        let back: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.amount, "12.50");
        assert_eq!(back.installment_index, "03");
    }

    #[test]
    fn test_set_rejects_out_of_set_option() {
        let mut r = filled();
        let before = r.clone();
        let err = r.set(Field::Category, "Casino".into()).unwrap_err();
        assert!(matches!(err, GastosError::InvalidOption { .. }));
        assert_eq!(r, before);
    }

    #[test]
    fn test_set_rejects_kind_mismatch() {
        let mut r = filled();
        let before = r.clone();
        assert!(r.set(Field::Recurring, "yes".into()).is_err());
        assert!(r.set(Field::Amount, true.into()).is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn test_validate_accepts_filled_record() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_required_fields() {
        let mut r = ExpenseRecord::new(day());
        r.date.clear();
        let errors = r.validate().unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Date, Field::Amount, Field::Detail]);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut r = filled();
        r.installment_index = "1.5".into();
        r.installment_total = "twelve".into();
        let errors = r.validate().unwrap_err();
        assert_eq!(errors.len(), 2);

        let mut r = filled();
        r.date = "14/03/2026".into();
        assert_eq!(r.validate().unwrap_err()[0].field, Field::Date);
    }

    #[test]
    fn test_parse_amount_rules() {
        assert_eq!(parse_amount("12"), Some(12.0));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("0.99"), Some(0.99));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("1.234"), None);
        assert_eq!(parse_amount("1e3"), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_script_response_from_object() {
        let v = serde_json::json!({"status": "success", "message": "OK", "row": 7});
        let r = ScriptResponse::from_value(&v);
        assert!(r.is_success());
        assert_eq!(r.message.as_deref(), Some("OK"));

        let r = ScriptResponse::from_value(&serde_json::json!({}));
        assert!(!r.is_success());
        assert!(r.message.is_none());
    }

    #[test]
    fn test_script_response_odd_shapes_are_not_success() {
        let r = ScriptResponse::from_value(&serde_json::json!({"status": 404, "message": 12}));
        assert!(!r.is_success());
        assert_eq!(r.status.as_deref(), Some("404"));
        assert_eq!(r.message.as_deref(), Some("12"));

        let r = ScriptResponse::from_value(&serde_json::json!({"status": "success", "message": null}));
        assert!(r.is_success());
        assert!(r.message.is_none());

        let r = ScriptResponse::from_value(&serde_json::json!("ok"));
        assert_eq!(r, ScriptResponse::default());
    }

    #[test]
    fn test_parse_amount_rejects_overflow() {
        let huge = "9".repeat(400);
        assert_eq!(parse_amount(&huge), None);
        let mut r = filled();
        r.amount = huge;
        assert_eq!(r.validate().unwrap_err()[0].field, Field::Amount);
    }
}
