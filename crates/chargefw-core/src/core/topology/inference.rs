use super::registry::{ResidueTemplateStore, TemplateLoadError};
use crate::core::models::atom::Atom;
use crate::core::models::topology::{Bond, BondOrder};
use crate::core::utils::identifiers::normalize_atom_name;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

const BACKBONE_CARBON: &str = "C";
const BACKBONE_NITROGEN: &str = "N";

/// Infers bonds for a molecule that lacks explicit connectivity.
///
/// Atoms are grouped into residues by scanning for runs of equal residue id. Each residue's
/// template bonds are applied where both atom names are present, and peptide bonds are added
/// between the backbone carbon of residue `r` and the backbone nitrogen of residue `r + 1`.
///
/// Unknown residues and template atoms missing from a residue contribute no bonds and are not
/// errors. Output order is deterministic: template bonds per residue in scan order, then
/// backbone bonds by ascending residue id.
///
/// # Arguments
///
/// * `atoms` - The atoms of the molecule, in index order.
/// * `store` - The residue templates to match against.
///
/// # Errors
///
/// Returns [`TemplateLoadError`] if the template store cannot load a tier it needs.
pub fn infer_bonds(
    atoms: &[Atom],
    store: &ResidueTemplateStore,
) -> Result<Vec<Bond>, TemplateLoadError> {
    let mut bonds = Vec::new();
    let Some(first) = atoms.first() else {
        return Ok(bonds);
    };

    let mut current_residue_id = first.residue_id;
    let mut group_start = 0;
    let mut closed_residues = HashSet::new();

    for (position, atom) in atoms.iter().enumerate() {
        if atom.residue_id == current_residue_id {
            continue;
        }

        apply_residue_templates(&atoms[group_start..position], store, &mut bonds)?;
        closed_residues.insert(current_residue_id);

        if closed_residues.contains(&atom.residue_id) {
            debug!(
                residue_id = atom.residue_id,
                "Residue id reappears after its group was closed; treating as a separate residue."
            );
        }

        current_residue_id = atom.residue_id;
        group_start = position;
    }
    apply_residue_templates(&atoms[group_start..], store, &mut bonds)?;

    add_backbone_bonds(atoms, &mut bonds);

    Ok(bonds)
}

fn apply_residue_templates(
    residue_atoms: &[Atom],
    store: &ResidueTemplateStore,
    bonds: &mut Vec<Bond>,
) -> Result<(), TemplateLoadError> {
    let Some(first) = residue_atoms.first() else {
        return Ok(());
    };

    let Some(templates) = store.lookup(&first.residue_name)? else {
        trace!(
            residue = %first.residue_name,
            residue_id = first.residue_id,
            "No bond template for residue."
        );
        return Ok(());
    };

    let name_map: HashMap<String, usize> = residue_atoms
        .iter()
        .map(|atom| (normalize_atom_name(&atom.name), atom.index))
        .collect();

    for template in templates {
        match (name_map.get(&template.atom1), name_map.get(&template.atom2)) {
            (Some(&atom1), Some(&atom2)) if atom1 != atom2 => {
                bonds.push(Bond::new(atom1, atom2, template.order));
            }
            _ => {}
        }
    }

    Ok(())
}

fn add_backbone_bonds(atoms: &[Atom], bonds: &mut Vec<Bond>) {
    let mut carbons: BTreeMap<isize, usize> = BTreeMap::new();
    let mut nitrogens: BTreeMap<isize, usize> = BTreeMap::new();

    for atom in atoms {
        match normalize_atom_name(&atom.name).as_str() {
            BACKBONE_CARBON => {
                carbons.insert(atom.residue_id, atom.index);
            }
            BACKBONE_NITROGEN => {
                nitrogens.insert(atom.residue_id, atom.index);
            }
            _ => {}
        }
    }

    for (residue_id, &carbon) in &carbons {
        let Some(next_id) = residue_id.checked_add(1) else {
            continue;
        };
        if let Some(&nitrogen) = nitrogens.get(&next_id) {
            bonds.push(Bond::new(carbon, nitrogen, BondOrder::Single));
        }
    }
}
