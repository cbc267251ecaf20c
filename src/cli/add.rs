use colored::Colorize;

use crate::controller::{FormController, SubmissionStatus, SubmitError};
use crate::endpoint::HttpEndpoint;
use crate::error::{GastosError, Result};
use crate::fmt::{amount_preview, installments};
use crate::models::{ExpenseRecord, Field};
use crate::options::OptionSet;
use crate::settings::resolve_endpoint;

/// Raw values from the `add` command line.
pub struct AddArgs {
    pub payment: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub detail: String,
    pub responsible: Option<String>,
    pub amount: String,
    pub installment: Option<String>,
    pub installments: Option<String>,
    pub recurring: bool,
}

pub fn run(args: AddArgs, endpoint_override: Option<&str>, dry_run: bool) -> Result<()> {
    let mut controller = FormController::new(build_record(args)?);

    if dry_run {
        controller
            .record()
            .validate()
            .map_err(SubmitError::Invalid)?;
        println!("{}", serde_json::to_string_pretty(controller.record())?);
        return Ok(());
    }

    let summary = summarize(controller.record());
    let endpoint = HttpEndpoint::new(resolve_endpoint(endpoint_override));
    match controller.submit(&endpoint)? {
        SubmissionStatus::Success => {
            println!("{} {summary}", "Saved".green().bold());
            if !controller.message().is_empty() {
                println!("{}", controller.message());
            }
            Ok(())
        }
        _ => Err(GastosError::Other(controller.message().to_string())),
    }
}

/// Apply CLI values on top of a fresh record through the same field updates the form uses.
pub fn build_record(args: AddArgs) -> Result<ExpenseRecord> {
    let mut controller = FormController::default();

    for (field, input) in [
        (Field::PaymentMethod, args.payment),
        (Field::Category, args.category),
        (Field::Responsible, args.responsible),
    ] {
        if let Some(input) = input {
            let set = field.option_set().ok_or(GastosError::FieldKind(field.wire_name()))?;
            controller.update(field, resolve_option(set, &input)?)?;
        }
    }

    if let Some(date) = args.date {
        controller.update(Field::Date, date)?;
    }
    controller.update(Field::Detail, args.detail)?;
    controller.update(Field::Amount, args.amount)?;
    if let Some(i) = args.installment {
        controller.update(Field::InstallmentIndex, i)?;
    }
    if let Some(t) = args.installments {
        controller.update(Field::InstallmentTotal, t)?;
    }
    controller.update(Field::Recurring, args.recurring)?;

    Ok(controller.record().clone())
}

fn resolve_option(set: OptionSet, input: &str) -> Result<&'static str> {
    set.resolve(input).ok_or_else(|| {
        GastosError::Other(format!(
            "'{input}' is not a valid {}. Choose one of: {}",
            set.label,
            set.values.join(", ")
        ))
    })
}

fn summarize(record: &ExpenseRecord) -> String {
    let amount = amount_preview(&record.amount).unwrap_or_else(|| record.amount.clone());
    let mut parts = vec![
        record.date.clone(),
        amount,
        record.category.clone(),
        format!("\"{}\"", record.detail),
        record.payment_method.clone(),
        record.responsible.clone(),
    ];
    let inst = installments(&record.installment_index, &record.installment_total);
    if !inst.is_empty() {
        parts.push(inst);
    }
    if record.is_recurring {
        parts.push("recurring".to_string());
    }
    parts.join(" · ")
}
