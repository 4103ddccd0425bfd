use phf::{Map, phf_map};

pub const ALPHA_CARBON: &str = "CA";

pub const GAP: char = '-';

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
};

// Protonation-state and modified variants, keyed by the name found in the file.
static COGNATE_PARENTS: Map<&'static str, &'static str> = phf_map! {
    "HSD" => "HIS", "HSE" => "HIS", "HSP" => "HIS",
    "HID" => "HIS", "HIE" => "HIS", "HIP" => "HIS",
    "HISA" => "HIS", "HISB" => "HIS", "HISD" => "HIS", "HISE" => "HIS", "HISH" => "HIS",
    "HIS1" => "HIS", "HIS2" => "HIS",
    "LYN" => "LYS", "LYP" => "LYS", "LSN" => "LYS",
    "CYX" => "CYS", "CYM" => "CYS", "CYN" => "CYS", "CYS1" => "CYS", "CYS2" => "CYS",
    "ASH" => "ASP", "ASPH" => "ASP",
    "GLH" => "GLU", "GLUH" => "GLU",
    "ARN" => "ARG",
    "MSE" => "MET",
};

/// Returns the parent residue name for a cognate variant, or the name itself.
pub fn parent_residue_name(res_name: &str) -> &str {
    let trimmed = res_name.trim();
    COGNATE_PARENTS.get(trimmed).copied().unwrap_or(trimmed)
}

pub fn is_cognate(res_name: &str) -> bool {
    COGNATE_PARENTS.contains_key(res_name.trim())
}

/// Translates a residue name to its one-letter amino-acid code.
///
/// Cognate variants resolve through their parent. Anything else that is not one of the
/// twenty standard amino acids yields `None`.
pub fn one_letter_code(res_name: &str) -> Option<char> {
    ONE_LETTER_CODES.get(parent_residue_name(res_name)).copied()
}
