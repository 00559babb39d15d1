//! Map PDB structures onto sequences and measure CDR3-epitope distances
use crate::shared::amino_acids::three_to_one;
use crate::shared::errors::PipelineError;
use crate::shared::parser::delimiter_for;
use anyhow::{anyhow, Result};
use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;
use ndarray::Array2;
use pdbtbx::{Chain, Residue, PDB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Scores of the global alignment between the structure and the sequence
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MapperScoring {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for MapperScoring {
    fn default() -> MapperScoring {
        MapperScoring {
            match_score: 1,
            mismatch_score: 0,
            gap_open: 0,
            gap_extend: 0,
        }
    }
}

pub fn open_structure(path: &Path) -> Result<PDB> {
    let name = path
        .to_str()
        .ok_or_else(|| anyhow!("Non UTF-8 path {}", path.display()))?;
    let (pdb, errors) = pdbtbx::open(name).map_err(|errors| {
        PipelineError::structure(format!(
            "unable to read {}: {}",
            name,
            errors
                .iter()
                .map(|e| e.short_description().to_string())
                .collect::<Vec<_>>()
                .join("; ")
        ))
    })?;
    if !errors.is_empty() {
        log::debug!("{} warnings while reading {}", errors.len(), name);
    }
    Ok(pdb)
}

pub fn find_chain<'a>(pdb: &'a PDB, model: usize, chain: &str) -> Result<&'a Chain> {
    let m = pdb
        .models()
        .nth(model)
        .ok_or_else(|| PipelineError::structure(format!("no model {} in structure", model)))?;
    m.chains()
        .find(|c| c.id() == chain)
        .ok_or_else(|| PipelineError::structure(format!("no chain {} in model {}", chain, model)).into())
}

/// Standard (non hetero) residues of a chain
fn standard_residues(chain: &Chain) -> impl Iterator<Item = &Residue> {
    chain
        .residues()
        .filter(|r| r.atoms().next().is_some() && r.atoms().all(|a| !a.hetero()))
}

/// One-letter sequence of the standard residues of `chain`, with their PDB
/// residue numbers
pub fn chain_sequence(chain: &Chain) -> Result<(Vec<u8>, Vec<isize>)> {
    let mut seq = Vec::new();
    let mut numbers = Vec::new();
    for r in standard_residues(chain) {
        let name = r.name().unwrap_or_default();
        let aa = three_to_one(name).ok_or_else(|| {
            PipelineError::structure(format!(
                "unknown residue {} at position {} of chain {}",
                name,
                r.serial_number(),
                chain.id()
            ))
        })?;
        seq.push(aa);
        numbers.push(r.serial_number());
    }
    Ok((seq, numbers))
}

/// Map the residue numbers of `chain` (model `model`) to 0-based positions in
/// `fasta_seq`, through a global alignment. Residues aligned to a gap are
/// absent from the map.
pub fn pdb_to_fasta_mapper(
    pdb: &PDB,
    model: usize,
    chain: &str,
    fasta_seq: &str,
    scoring: &MapperScoring,
) -> Result<HashMap<isize, usize>> {
    let (pdb_seq, numbers) = chain_sequence(find_chain(pdb, model, chain)?)?;
    if pdb_seq.is_empty() || fasta_seq.is_empty() {
        return Err(PipelineError::structure(format!(
            "nothing to align for chain {}",
            chain
        )))?;
    }

    let (match_score, mismatch_score) = (scoring.match_score, scoring.mismatch_score);
    let score = move |a: u8, b: u8| if a == b { match_score } else { mismatch_score };
    let mut aligner = Aligner::with_capacity(
        pdb_seq.len(),
        fasta_seq.len(),
        scoring.gap_open,
        scoring.gap_extend,
        score,
    );
    let alignment = aligner.global(&pdb_seq, fasta_seq.as_bytes());

    let mut mapper = HashMap::new();
    let (mut x, mut y) = (alignment.xstart, alignment.ystart);
    for op in &alignment.operations {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                mapper.insert(numbers[x], y);
                x += 1;
                y += 1;
            }
            AlignmentOperation::Del => y += 1,
            AlignmentOperation::Ins => x += 1,
            AlignmentOperation::Xclip(n) => x += n,
            AlignmentOperation::Yclip(n) => y += n,
        }
    }
    log::debug!(
        "Chain {}: {} of {} residues mapped onto the sequence",
        chain,
        mapper.len(),
        numbers.len()
    );
    Ok(mapper)
}

/// Smallest distance between any atom of `res1` and any atom of `res2`
pub fn residue_distance_min(res1: &Residue, res2: &Residue) -> f64 {
    let mut dist = f64::INFINITY;
    for a1 in res1.atoms() {
        for a2 in res2.atoms() {
            dist = dist.min(a1.distance(a2));
        }
    }
    dist
}

/// One TCR-epitope complex with a solved structure
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ComplexRecord {
    #[serde(rename = "PDB_ID")]
    pub pdb_id: String,
    pub epitope_chain: String,
    pub tcrb_chain: String,
    pub tcrb_seq: String,
    pub cdr3: String,
    #[serde(rename = "antigen.epitope")]
    pub epitope: String,
    // 0-based positions of the first and last CDR3 residue in tcrb_seq
    #[serde(rename = "CDR3_start")]
    pub cdr3_start: usize,
    #[serde(rename = "CDR3_end")]
    pub cdr3_end: usize,
}

pub fn load_complex_records(path: &Path) -> Result<Vec<ComplexRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .from_path(path)
        .map_err(|e| anyhow!("Unable to open {}: {}", path.display(), e))?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: ComplexRecord = result.map_err(|e| {
            PipelineError::malformed(path.display().to_string(), e.to_string())
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Minimum atom distance between every CDR3 residue (rows) and every
/// epitope residue (columns). CDR3 residues missing from the structure keep
/// a zero row.
pub fn distance_matrix(pdb: &PDB, record: &ComplexRecord, scoring: &MapperScoring) -> Result<Array2<f64>> {
    let tcrb = find_chain(pdb, 0, &record.tcrb_chain)?;
    let epitope_chain = find_chain(pdb, 0, &record.epitope_chain)?;

    let mapper = pdb_to_fasta_mapper(pdb, 0, &record.tcrb_chain, &record.tcrb_seq, scoring)?;
    let by_number: HashMap<isize, &Residue> = standard_residues(tcrb)
        .map(|r| (r.serial_number(), r))
        .collect();
    // fasta position -> PDB residue
    let fasta_to_residue: HashMap<usize, &Residue> = mapper
        .iter()
        .filter_map(|(number, &pos)| by_number.get(number).map(|r| (pos, *r)))
        .collect();
    let epitope_residues: Vec<&Residue> = standard_residues(epitope_chain).collect();

    let mut dm = Array2::<f64>::zeros((record.cdr3.len(), record.epitope.len()));
    for (mi, pos) in (record.cdr3_start..=record.cdr3_end)
        .take(record.cdr3.len())
        .enumerate()
    {
        if let Some(res) = fasta_to_residue.get(&pos) {
            for (mj, ep) in epitope_residues.iter().take(record.epitope.len()).enumerate() {
                dm[[mi, mj]] = residue_distance_min(res, ep);
            }
        }
    }
    Ok(dm)
}

/// Distance matrices of all `records`, reading `<pdb_dir>/<pdb id lowercase>.pdb`
pub fn distance_matrices(
    records: &[ComplexRecord],
    pdb_dir: &Path,
    scoring: &MapperScoring,
) -> Result<HashMap<String, Array2<f64>>> {
    let mut matrices = HashMap::with_capacity(records.len());
    for record in records {
        let path = pdb_dir.join(format!("{}.pdb", record.pdb_id.to_lowercase()));
        let pdb = open_structure(&path)?;
        matrices.insert(record.pdb_id.clone(), distance_matrix(&pdb, record, scoring)?);
    }
    log::info!("Computed {} distance matrices", matrices.len());
    Ok(matrices)
}
