use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sncap_core::export::{write_annotated_csv, write_summary_csv};
use sncap_core::{validate_batch, FileReport};

use crate::app::{resolve_config, ExitError};
use crate::cli::{Cli, ValidateArgs};
use crate::constants::{exit_codes, ANNOTATED_SUFFIX, SUMMARY_SUFFIX};
use crate::output::{batch_json, print_batch_footer, print_outcome, FileOutcome, WrittenOutputs};
use crate::ui::{header, print, ProgressCounter, UiContext, UiFlags};

pub fn handle_validate(cli: &Cli, args: &ValidateArgs) -> anyhow::Result<()> {
    let ctx = UiContext::from_env(UiFlags {
        json: args.json,
        format: args.format.as_deref(),
        no_color: args.no_color,
        ascii: args.ascii,
        quiet: cli.quiet,
    })
    .map_err(|err| ExitError::new(exit_codes::INVALID_INPUT, err.to_string()))?;

    let resolved = resolve_config(cli)?;

    let missing: Vec<String> = args
        .files
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ExitError::new(
            exit_codes::NOT_FOUND,
            format!("Input file not found: {}", missing.join(", ")),
        )
        .into());
    }

    if let Some(dir) = &args.out_dir {
        if !args.no_write {
            std::fs::create_dir_all(dir).map_err(|e| {
                ExitError::new(
                    exit_codes::INVALID_INPUT,
                    format!("Cannot create output directory {}: {}", dir.display(), e),
                )
            })?;
        }
    }

    let context = format!("{} file(s)", args.files.len());
    print(&ctx, &header(&ctx, "validate", Some(context.as_str())));

    let mut progress = ProgressCounter::new(&ctx, args.files.len());
    let mut slots: Vec<Option<FileOutcome>> = Vec::with_capacity(args.files.len());
    let mut readable: Vec<(usize, &PathBuf, Vec<u8>)> = Vec::new();

    for path in &args.files {
        match std::fs::read(path) {
            Ok(bytes) => {
                readable.push((slots.len(), path, bytes));
                slots.push(None);
            }
            Err(err) => {
                progress.inc(&path.display().to_string());
                slots.push(Some(FileOutcome::Failed {
                    path: path.clone(),
                    error: format!("Failed to read file: {}", err),
                }));
            }
        }
    }

    let items = validate_batch(
        readable
            .iter()
            .map(|(_, path, bytes)| (path.display().to_string(), bytes.as_slice())),
        &resolved.config,
        |item| progress.inc(&item.source),
    );
    progress.finish();

    let mut claimed = HashMap::new();
    for ((slot, path, _), item) in readable.iter().zip(items) {
        let outcome = match item.result {
            Ok(report) => finish_file(path, report, args, &mut claimed),
            Err(err) => FileOutcome::Failed {
                path: (*path).clone(),
                error: err.to_string(),
            },
        };
        slots[*slot] = Some(outcome);
    }
    let outcomes: Vec<FileOutcome> = slots.into_iter().flatten().collect();

    if ctx.mode.is_json() {
        let value = batch_json(&outcomes, resolved.path.as_deref(), args.records);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for outcome in &outcomes {
            print_outcome(&ctx, outcome);
        }
        print_batch_footer(&ctx, &outcomes);
    }

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    if failed > 0 {
        return Err(ExitError::new(
            exit_codes::FILE_FAILED,
            format!("{} of {} file(s) could not be validated", failed, outcomes.len()),
        )
        .into());
    }

    let with_violations = outcomes.iter().filter(|o| o.has_violations()).count();
    if args.fail_on_violations && with_violations > 0 {
        return Err(ExitError::new(
            exit_codes::VIOLATIONS,
            format!("{} file(s) with rule violations", with_violations),
        )
        .with_hint("Open the annotated CSV and filter the Erro column.")
        .into());
    }

    Ok(())
}

/// Write the CSV outputs for a validated report. A write failure, or an
/// output path already written for another input of the batch, turns the
/// file into a failed outcome.
fn finish_file(
    path: &Path,
    report: FileReport,
    args: &ValidateArgs,
    claimed: &mut HashMap<PathBuf, PathBuf>,
) -> FileOutcome {
    if args.no_write {
        return FileOutcome::Validated {
            path: path.to_path_buf(),
            report,
            outputs: None,
        };
    }

    let outputs = output_paths(path, args.out_dir.as_deref());
    if let Err(error) = claim_outputs(claimed, path, &outputs) {
        return FileOutcome::Failed {
            path: path.to_path_buf(),
            error,
        };
    }
    match write_outputs(&outputs, &report) {
        Ok(()) => {
            tracing::debug!(
                annotated = %outputs.annotated.display(),
                summary = %outputs.summary.display(),
                "wrote outputs"
            );
            FileOutcome::Validated {
                path: path.to_path_buf(),
                report,
                outputs: Some(outputs),
            }
        }
        Err(err) => FileOutcome::Failed {
            path: path.to_path_buf(),
            error: format!("{:#}", err),
        },
    }
}

/// `<dir>/<stem>_validado.csv` and `<dir>/<stem>_resumo.csv`, where `dir`
/// defaults to the input's directory.
pub fn output_paths(input: &Path, out_dir: Option<&Path>) -> WrittenOutputs {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "razao".to_string());
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    WrittenOutputs {
        annotated: dir.join(format!("{}{}", stem, ANNOTATED_SUFFIX)),
        summary: dir.join(format!("{}{}", stem, SUMMARY_SUFFIX)),
    }
}

/// Reserve the output files of `input`. Paths are compared after resolving
/// their directory, so `dados/x` and `./dados/x` collide.
fn claim_outputs(
    claimed: &mut HashMap<PathBuf, PathBuf>,
    input: &Path,
    outputs: &WrittenOutputs,
) -> Result<(), String> {
    let keys = [output_key(&outputs.annotated), output_key(&outputs.summary)];
    for (key, target) in keys.iter().zip([&outputs.annotated, &outputs.summary]) {
        if let Some(owner) = claimed.get(key) {
            return Err(format!(
                "Output {} is already written for {}; use different file names or --out-dir",
                target.display(),
                owner.display()
            ));
        }
    }
    for key in keys {
        claimed.insert(key, input.to_path_buf());
    }
    Ok(())
}

fn output_key(path: &Path) -> PathBuf {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir,
    }
}

fn write_outputs(outputs: &WrittenOutputs, report: &FileReport) -> anyhow::Result<()> {
    let mut annotated = create(&outputs.annotated)?;
    write_annotated_csv(&mut annotated, &report.records)?;
    annotated.flush()?;

    let mut summary = create(&outputs.summary)?;
    write_summary_csv(&mut summary, &report.summary)?;
    summary.flush()?;
    Ok(())
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path.display(), e))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_next_to_input() {
        let outputs = output_paths(Path::new("/dados/razao_2024.csv"), None);
        assert_eq!(outputs.annotated, PathBuf::from("/dados/razao_2024_validado.csv"));
        assert_eq!(outputs.summary, PathBuf::from("/dados/razao_2024_resumo.csv"));
    }

    #[test]
    fn test_output_paths_in_out_dir() {
        let outputs = output_paths(Path::new("razao.zip"), Some(Path::new("/tmp/saida")));
        assert_eq!(outputs.annotated, PathBuf::from("/tmp/saida/razao_validado.csv"));
        assert_eq!(outputs.summary, PathBuf::from("/tmp/saida/razao_resumo.csv"));
    }

    #[test]
    fn test_claim_outputs_rejects_repeated_paths() {
        let mut claimed = HashMap::new();
        let out_dir = Some(Path::new("/tmp/saida"));
        let jan = Path::new("/dados/jan/razao.csv");
        let fev = Path::new("/dados/fev/razao.csv");

        assert!(claim_outputs(&mut claimed, jan, &output_paths(jan, out_dir)).is_ok());
        let err = claim_outputs(&mut claimed, fev, &output_paths(fev, out_dir)).unwrap_err();
        assert!(err.contains("razao_validado.csv"));
        assert!(err.contains("/dados/jan/razao.csv"));

        let mar = Path::new("/dados/mar/marco.csv");
        assert!(claim_outputs(&mut claimed, mar, &output_paths(mar, out_dir)).is_ok());
    }

    #[test]
    fn test_output_paths_bare_file_name() {
        let outputs = output_paths(Path::new("razao.csv"), None);
        assert_eq!(outputs.annotated, PathBuf::from("razao_validado.csv"));
    }
}
