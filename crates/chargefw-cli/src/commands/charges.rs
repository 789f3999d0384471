use super::Outcome;
use crate::cli::ChargesArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chargefw::core::io::charges::write_charges_to_path;
use chargefw::core::io::pdb::PdbFile;
use chargefw::core::io::traits::MolecularFile;
use chargefw::engine::error::EngineError;
use chargefw::engine::progress::ProgressReporter;
use chargefw::workflows;
use tracing::{info, warn};

pub fn run(args: ChargesArgs) -> Result<Outcome> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;

    info!("Loading {} input structure(s).", config.inputs.len());
    let molecules = config
        .inputs
        .iter()
        .map(|path| {
            PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let total = molecules.len();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Computing {} charges for {} molecule(s)...",
        config.core_config.method, total
    );
    let results = workflows::charges::run(molecules, &config.core_config, &reporter)?;

    let mut computed = Vec::with_capacity(results.len());
    let mut template_failure: Option<EngineError> = None;
    for result in results {
        match result {
            Ok(charges) => computed.push(charges),
            Err(e @ EngineError::Templates { .. }) => {
                template_failure.get_or_insert(e);
            }
            Err(_) => {}
        }
    }

    write_charges_to_path(
        &config.output,
        config.format,
        computed
            .iter()
            .map(|c| (&c.molecule, c.charges.as_slice())),
    )
    .map_err(|source| CliError::Output {
        path: config.output.clone(),
        source,
    })?;
    println!(
        "✓ Charges for {}/{} molecule(s) written to: {}",
        computed.len(),
        total,
        config.output.display()
    );

    if let Some(e) = template_failure {
        return Err(e.into());
    }

    let failed = total - computed.len();
    if failed == 0 {
        return Ok(Outcome::Success);
    }

    let names = progress_handler.failed_molecules();
    warn!(failed, "Some molecules could not be processed.");
    eprintln!("✗ {} molecule(s) failed: {}", failed, names.join(", "));
    Ok(Outcome::PartialFailure { failed, total })
}
