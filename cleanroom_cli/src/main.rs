//! # Cleanroom Calculator CLI
//!
//! Terminal front end for the cleanroom particle calculator. Field values are
//! given as `--set name=value` pairs or entered interactively; validation
//! and the formula live in `cleanroom_core`.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cleanroom_core::descriptors::{cleanroom_fields, DescriptorSet, FieldDescriptor};
use cleanroom_core::file_io::{load_descriptor_set, save_descriptor_set};
use cleanroom_core::validation::{RawInput, ValidationErrors};
use cleanroom_core::{CalcError, CalcResult, FormState, RawValue, Submission};

#[derive(Parser)]
#[command(name = "cleanroom")]
#[command(
    about = "Cleanroom particle calculator - ISO 14644-1 particle concentration",
    long_about = None
)]
struct Cli {
    /// Descriptor set JSON file to use instead of the built-in form
    #[arg(long, global = true)]
    fields: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the form's fields in order
    Fields,
    /// Validate field values without calculating
    Validate {
        /// Field assignment, e.g. --set iso_class=6 (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate and compute the particle count
    Calculate {
        /// Field assignment, e.g. --set particle_size=0.5 (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Fill in the form field by field
    Interactive,
    /// Write the active descriptor set to a JSON file
    ExportFields {
        /// Output path
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let loaded;
    let descriptors = match &cli.fields {
        Some(path) => match load_descriptor_set(path) {
            Ok(set) => {
                loaded = set;
                &loaded
            }
            Err(e) => return report(&e),
        },
        None => cleanroom_fields(),
    };
    tracing::debug!(fields = descriptors.len(), "descriptor set ready");

    let outcome = match cli.command {
        Commands::Fields => {
            cmd_fields(descriptors);
            Ok(true)
        }
        Commands::Validate { set, json } => cmd_validate(descriptors, &set, json),
        Commands::Calculate { set, json } => cmd_calculate(descriptors, &set, json),
        Commands::Interactive => cmd_interactive(descriptors),
        Commands::ExportFields { path } => cmd_export(descriptors, &path).map(|_| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => report(&e),
    }
}

fn report(error: &CalcError) -> ExitCode {
    eprintln!("Error: {}", error);
    ExitCode::FAILURE
}

/// Apply `--set` assignments to a fresh form. Change-event errors are kept on
/// the form; they show up again on validate/submit.
fn form_with<'a>(
    descriptors: &'a DescriptorSet,
    assignments: &[String],
) -> CalcResult<FormState<'a>> {
    let mut form = FormState::new(descriptors);
    for assignment in assignments {
        let (name, value) = RawInput::parse_assignment(assignment)?;
        form.set_value(&name, value)?;
    }
    Ok(form)
}

fn cmd_fields(descriptors: &DescriptorSet) {
    println!("{:<30} {:<38} {:>10} {:>10} {:>10}", "NAME", "LABEL", "DEFAULT", "MIN", "MAX");
    for field in descriptors {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        let mut flags = Vec::new();
        if field.disabled {
            flags.push("computed");
        }
        if field.optional {
            flags.push("optional");
        }
        println!(
            "{:<30} {:<38} {:>10} {:>10} {:>10} {}",
            field.name,
            field.label,
            fmt_opt(field.default_value),
            fmt_opt(field.min.as_ref().map(|b| b.value)),
            fmt_opt(field.max.as_ref().map(|b| b.value)),
            flags.join(", ")
        );
    }
}

fn cmd_validate(
    descriptors: &DescriptorSet,
    assignments: &[String],
    json: bool,
) -> CalcResult<bool> {
    let form = form_with(descriptors, assignments)?;
    match form.rule().validate(&form.raw_input()) {
        Ok(values) => {
            if json {
                print_json(&values)?;
            } else {
                println!("All {} fields are valid.", values.len());
            }
            Ok(true)
        }
        Err(errors) => {
            if json {
                print_json(&errors.messages())?;
            } else {
                print_errors(&errors);
            }
            Ok(false)
        }
    }
}

fn cmd_calculate(
    descriptors: &DescriptorSet,
    assignments: &[String],
    json: bool,
) -> CalcResult<bool> {
    let mut form = form_with(descriptors, assignments)?;
    match form.submit() {
        Ok(submission) => {
            if json {
                print_json(&submission)?;
            } else {
                print_submission(&submission);
            }
            Ok(true)
        }
        Err(CalcError::ValidationFailed { errors }) => {
            if json {
                print_json(&errors.messages())?;
            } else {
                print_errors(&errors);
            }
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn cmd_interactive(descriptors: &DescriptorSet) -> CalcResult<bool> {
    println!("Cleanroom Particle Calculator");
    println!("=============================");
    println!("Press Enter to keep the value in brackets.");
    println!();

    let mut form = FormState::new(descriptors);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for field in descriptors.iter().filter(|f| !f.disabled) {
        loop {
            let current = form.value(&field.name).cloned().unwrap_or_default();
            let Some(answer) = prompt(field, &current, &mut lines)? else {
                // End of input: submit whatever is there
                return finish_interactive(&mut form);
            };
            let raw = if answer.trim().is_empty() { current } else { RawValue::from(answer) };
            match form.set_value(&field.name, raw)? {
                None => break,
                Some(error) => println!("  {}", error),
            }
        }
    }

    finish_interactive(&mut form)
}

fn finish_interactive(form: &mut FormState<'_>) -> CalcResult<bool> {
    println!();
    match form.submit() {
        Ok(submission) => {
            print_submission(&submission);
            Ok(true)
        }
        Err(CalcError::ValidationFailed { errors }) => {
            print_errors(&errors);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn prompt<B: BufRead>(
    field: &FieldDescriptor,
    current: &RawValue,
    lines: &mut io::Lines<B>,
) -> CalcResult<Option<String>> {
    print!("{} [{}]: ", field.label, current);
    io::stdout()
        .flush()
        .map_err(|e| CalcError::file_error("flush", "stdout", e.to_string()))?;

    match lines.next() {
        Some(Ok(line)) => Ok(Some(line)),
        Some(Err(e)) => Err(CalcError::file_error("read", "stdin", e.to_string())),
        None => Ok(None),
    }
}

fn cmd_export(descriptors: &DescriptorSet, path: &Path) -> CalcResult<()> {
    save_descriptor_set(descriptors, path)?;
    println!("Wrote {} fields to {}", descriptors.len(), path.display());
    Ok(())
}

fn print_submission(submission: &Submission) {
    let input = &submission.result.input;
    println!("═══════════════════════════════════════");
    println!("  ISO CLEANROOM PARTICLE COUNT");
    println!("═══════════════════════════════════════");
    println!("  ISO Class:      {}", input.iso_class);
    println!("  Particle Size:  {} µm", input.particle_size_um);
    println!();
    println!("  Cn = 10^N × (0.1 / D)^2.08");
    println!("     = {:.1} particles/m³", submission.result.particles_per_m3);
    println!("═══════════════════════════════════════");
}

fn print_errors(errors: &ValidationErrors) {
    eprintln!("{} field(s) failed validation:", errors.len());
    for (name, error) in errors.iter() {
        eprintln!("  {:<30} {} [{}]", name, error, error.error_code());
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}
