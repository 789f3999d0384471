use super::Outcome;
use crate::cli::InfoArgs;
use crate::error::{CliError, Result};
use chargefw::core::io::pdb::PdbFile;
use chargefw::core::io::traits::MolecularFile;
use chargefw::core::models::molecule::Molecule;
use chargefw::core::topology::inference::infer_bonds;
use chargefw::core::topology::registry::ResidueTemplateStore;
use chargefw::engine::error::EngineError;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<Outcome> {
    info!("Loading input structure from {:?}", &args.input);
    let mut molecule = PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let bonds_inferred = !molecule.has_bonds();
    if bonds_inferred {
        let custom_store;
        let store = match &args.templates_dir {
            Some(dir) => {
                custom_store = ResidueTemplateStore::from_dir(dir);
                &custom_store
            }
            None => ResidueTemplateStore::bundled(),
        };
        let bonds = infer_bonds(molecule.atoms(), store).map_err(EngineError::from)?;
        molecule.set_bonds(bonds).map_err(EngineError::from)?;
    }

    let stdout = std::io::stdout();
    write_summary(&molecule, bonds_inferred, &mut stdout.lock())?;
    Ok(Outcome::Success)
}

fn write_summary(
    molecule: &Molecule,
    bonds_inferred: bool,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let mut composition: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in molecule.atoms() {
        *composition.entry(atom.element.as_str()).or_default() += 1;
    }
    let composition = composition
        .iter()
        .map(|(element, count)| format!("{}{}", element, count))
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(out, "Molecule:      {}", molecule.name())?;
    writeln!(out, "Atoms:         {}", molecule.len())?;
    writeln!(out, "Residues:      {}", molecule.residue_count())?;
    writeln!(
        out,
        "Bonds:         {} ({})",
        molecule.bonds().len(),
        if bonds_inferred { "inferred" } else { "from file" }
    )?;
    writeln!(out, "Total charge:  {}", molecule.total_charge())?;
    writeln!(out, "Composition:   {}", composition)?;
    Ok(())
}
