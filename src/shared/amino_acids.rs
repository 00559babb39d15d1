//! Static amino-acid tables: physico-chemical scales and residue names.
use phf::phf_map;

/// Kyte-Doolittle hydropathy
pub static KYTE_DOOLITTLE: phf::Map<u8, f64> = phf_map! {
    b'A' => 1.8, b'C' => 2.5, b'D' => -3.5, b'E' => -3.5, b'F' => 2.8,
    b'G' => -0.4, b'H' => -3.2, b'I' => 4.5, b'K' => -3.9, b'L' => 3.8,
    b'M' => 1.9, b'N' => -3.5, b'P' => -1.6, b'Q' => -3.5, b'R' => -4.5,
    b'S' => -0.8, b'T' => -0.7, b'V' => 4.2, b'W' => -0.9, b'Y' => -1.3,
};

/// Hopp-Woods hydrophilicity
pub static HOPP_WOODS: phf::Map<u8, f64> = phf_map! {
    b'A' => -0.5, b'C' => -1.0, b'D' => 3.0, b'E' => 3.0, b'F' => -2.5,
    b'G' => 0.0, b'H' => -0.5, b'I' => -1.8, b'K' => 3.0, b'L' => -1.8,
    b'M' => -1.3, b'N' => 0.2, b'P' => 0.0, b'Q' => 0.2, b'R' => 3.0,
    b'S' => 0.3, b'T' => -0.4, b'V' => -1.5, b'W' => -3.4, b'Y' => -2.3,
};

/// Isoelectric point of the free amino acid
pub static ISOELECTRIC_POINT: phf::Map<u8, f64> = phf_map! {
    b'A' => 6.00, b'C' => 5.07, b'D' => 2.77, b'E' => 3.22, b'F' => 5.48,
    b'G' => 5.97, b'H' => 7.59, b'I' => 6.02, b'K' => 9.74, b'L' => 5.98,
    b'M' => 5.74, b'N' => 5.41, b'P' => 6.30, b'Q' => 5.65, b'R' => 10.76,
    b'S' => 5.68, b'T' => 5.60, b'V' => 5.96, b'W' => 5.89, b'Y' => 5.66,
};

/// Monoisotopic residue mass (Da)
pub static RESIDUE_MASS: phf::Map<u8, f64> = phf_map! {
    b'A' => 71.03711, b'C' => 103.00919, b'D' => 115.02694, b'E' => 129.04259,
    b'F' => 147.06841, b'G' => 57.02146, b'H' => 137.05891, b'I' => 113.08406,
    b'K' => 128.09496, b'L' => 113.08406, b'M' => 131.04049, b'N' => 114.04293,
    b'P' => 97.05276, b'Q' => 128.05858, b'R' => 156.10111, b'S' => 87.03203,
    b'T' => 101.04768, b'V' => 99.06841, b'W' => 186.07931, b'Y' => 163.06333,
};

/// Net side-chain charge at pH 7 (histidine mostly neutral)
pub static CHARGE: phf::Map<u8, f64> = phf_map! {
    b'A' => 0.0, b'C' => 0.0, b'D' => -1.0, b'E' => -1.0, b'F' => 0.0,
    b'G' => 0.0, b'H' => 0.1, b'I' => 0.0, b'K' => 1.0, b'L' => 0.0,
    b'M' => 0.0, b'N' => 0.0, b'P' => 0.0, b'Q' => 0.0, b'R' => 1.0,
    b'S' => 0.0, b'T' => 0.0, b'V' => 0.0, b'W' => 0.0, b'Y' => 0.0,
};

/// Emini surface accessibility
pub static EMINI_SURFACE: phf::Map<u8, f64> = phf_map! {
    b'A' => 0.815, b'C' => 0.394, b'D' => 1.283, b'E' => 1.445, b'F' => 0.695,
    b'G' => 0.714, b'H' => 1.180, b'I' => 0.603, b'K' => 1.545, b'L' => 0.603,
    b'M' => 0.714, b'N' => 1.296, b'P' => 1.236, b'Q' => 1.348, b'R' => 1.475,
    b'S' => 1.115, b'T' => 1.184, b'V' => 0.606, b'W' => 0.808, b'Y' => 1.089,
};

/// Three-letter residue names (upper case, as in PDB files) to one-letter code
pub static THREE_TO_ONE: phf::Map<&'static str, u8> = phf_map! {
    "ALA" => b'A', "ARG" => b'R', "ASN" => b'N', "ASP" => b'D', "CYS" => b'C',
    "GLN" => b'Q', "GLU" => b'E', "GLY" => b'G', "HIS" => b'H', "ILE" => b'I',
    "LEU" => b'L', "LYS" => b'K', "MET" => b'M', "PHE" => b'F', "PRO" => b'P',
    "SER" => b'S', "THR" => b'T', "TRP" => b'W', "TYR" => b'Y', "VAL" => b'V',
    "SEC" => b'U', "PYL" => b'O', "ASX" => b'B', "GLX" => b'Z', "XAA" => b'X',
    "XLE" => b'J',
};

/// One-letter code of a three-letter residue name (case insensitive)
/// ```
/// use imrex_data::shared::amino_acids::three_to_one;
/// assert_eq!(three_to_one("Trp"), Some(b'W'));
/// assert_eq!(three_to_one("HOH"), None);
/// ```
pub fn three_to_one(name: &str) -> Option<u8> {
    THREE_TO_ONE.get(name.to_ascii_uppercase().as_str()).copied()
}
