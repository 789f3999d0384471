use phf::{Map, phf_map};

static ATOM_NAME_ALIASES: Map<&'static str, &'static str> = phf_map! {
    // --- Backbone amide hydrogen ---
    "HN" => "H",

    // --- N-terminal hydrogens ---
    "HT1" => "H1", "HT2" => "H2", "HT3" => "H3",

    // --- C-terminal oxygens ---
    "OT1" => "O", "OT2" => "OXT",

    // --- Water ---
    "OW" => "O",
};

/// Canonicalizes an atom name so that alternate naming conventions compare equal.
///
/// The name is trimmed and upper-cased; a leading digit (PDB v2 style, e.g. `1HB`)
/// is rotated to the end (`HB1`), and legacy aliases are mapped to their canonical form.
/// The same function is applied to template names and to atom names read from molecules.
pub fn normalize_atom_name(name: &str) -> String {
    let upper = name.trim().to_ascii_uppercase();

    let rotated = match upper.chars().next() {
        Some(first) if first.is_ascii_digit() && upper.len() > 1 => {
            format!("{}{}", &upper[1..], first)
        }
        _ => upper,
    };

    match ATOM_NAME_ALIASES.get(rotated.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => rotated,
    }
}

/// Guesses the element symbol from an atom name by taking its first alphabetic character.
///
/// Protein atom names (`CA`, `HB2`, `1HG1`) encode the element in their first letter, which is
/// what coordinate-only formats rely on when no element column is present.
pub fn guess_element(atom_name: &str) -> Option<String> {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
}

pub fn normalize_element(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

pub fn is_hydrogen(element: &str) -> bool {
    matches!(normalize_element(element).as_str(), "H" | "D")
}
