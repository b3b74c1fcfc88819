//! Prompt-and-submit loop shared by `storefront complain` and `storefront buy`.

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use serde_json::Value;
use storefront_common::{Validate, ValidationErrors};

use storefront::client::{Form, FormKind, IntakeClient, SubmitOutcome};
use storefront::errors::FormError;
use storefront::ui::SubmitSpinner;
use storefront::ui::icons::WARN;

/// A free-text form field and its prompt label.
pub struct TextField {
    pub name: &'static str,
    pub label: &'static str,
}

/// What the command loop should do after one submit attempt.
pub enum Step<R> {
    Done(R),
    Retry,
}

/// Prompts only happen when a person is at the terminal. Scripted runs take
/// their values from flags and fail fast.
pub fn is_interactive() -> bool {
    console::user_attended()
}

/// Copy flag values into the form.
pub fn prefill<K: FormKind>(form: &mut Form<K>, values: Vec<(&str, Option<String>)>) {
    for (field, value) in values {
        if let Some(value) = value {
            form.set(field, value);
        }
    }
}

/// Prompt for every text field that is missing, locally invalid, or marked
/// with an error from the last attempt.
pub fn prompt_text_fields<K: FormKind>(form: &mut Form<K>, fields: &[TextField]) -> Result<()> {
    let schema = K::Insert::schema();

    for field in fields {
        let current = form.value(field.name).cloned().unwrap_or(Value::Null);
        let needs_input = form.field_error(field.name).is_some()
            || schema.validate_field(field.name, &current).is_err();
        if !needs_input {
            continue;
        }

        if let Some(message) = form.field_error(field.name) {
            eprintln!("  {}{}", WARN, style(message).yellow());
        }

        let initial = current.as_str().unwrap_or_default().to_string();
        let name = field.name;
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(field.label)
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                schema
                    .validate_field(name, &Value::String(input.clone()))
                    .map_err(str::to_string)
            })
            .interact_text()
            .with_context(|| format!("Failed to read {}", field.label))?;

        form.set(field.name, input);
    }

    Ok(())
}

/// Run one submission with a spinner and report the outcome.
pub async fn submit_once<K: FormKind>(
    form: &mut Form<K>,
    client: &IntakeClient,
    interactive: bool,
    pending: &str,
) -> Result<Step<K::Record>> {
    let spinner = SubmitSpinner::start(pending);
    let outcome = form.submit(client).await;
    spinner.finish();

    match outcome {
        Err(FormError::Invalid(errors)) => {
            if !interactive {
                bail!("{}", describe(&errors));
            }
            eprintln!("{}", style(describe(&errors)).yellow());
            Ok(Step::Retry)
        }
        Err(e) => Err(e.into()),
        Ok(SubmitOutcome::Submitted {
            record,
            notification,
        }) => {
            println!("{}", notification.render());
            Ok(Step::Done(record))
        }
        Ok(SubmitOutcome::Failed {
            error,
            notification,
        }) => {
            eprintln!("{}", notification.render());
            if let Some(errors) = error.validation_errors() {
                eprintln!("{}", style(describe(errors)).yellow());
            }

            if interactive
                && Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()
                    .context("Failed to read confirmation")?
            {
                return Ok(Step::Retry);
            }

            Err(anyhow::Error::new(error).context(notification.title))
        }
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut out = String::from("Please fix the following fields:");
    for error in errors.errors() {
        out.push_str(&format!("\n  {}: {}", error.field, error.message));
    }
    out
}
