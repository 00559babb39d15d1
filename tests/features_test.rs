mod common;

use anyhow::Result;
use common::five_feature_builder;
use imrex_data::features::{parse_operator, FeatureScale, Operator};
use imrex_data::{FeatureBuilder, GeneratorParameters, PipelineError};
use ndarray::s;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn image_is_centered_in_padding() -> Result<()> {
    let builder = FeatureBuilder::new(vec![FeatureScale::Hydrophobicity], Operator::AbsDiff);
    let image = builder.generate_image("IRA", "RA", 5, 5)?;
    assert_eq!(image.dim(), (5, 5, 1));

    // content occupies rows 1..4 and columns 1..3
    assert!(image.slice(s![0, .., 0]).iter().all(|&v| v == 0.));
    assert!(image.slice(s![4, .., 0]).iter().all(|&v| v == 0.));
    assert!(image.slice(s![.., 0, 0]).iter().all(|&v| v == 0.));
    assert!(image.slice(s![.., 3.., 0]).iter().all(|&v| v == 0.));

    // I/R spans the whole hydrophobicity range
    assert!(approx(image[[1, 1, 0]], 1.));
    assert!(approx(image[[2, 2, 0]], 6.3 / 9.));
    assert!(approx(image[[3, 2, 0]], 0.));

    let m = builder.feature_matrix(&FeatureScale::Hydrophobicity, "IRA", "RA")?;
    assert_eq!(image.slice(s![1..4, 1..3, 0]), m);
    Ok(())
}

#[test]
fn raw_operator_values() -> Result<()> {
    let builder = FeatureBuilder::new(vec![FeatureScale::Hydrophobicity], Operator::Diff)
        .with_normalization(false);
    let m = builder.feature_matrix(&FeatureScale::Hydrophobicity, "I", "RA")?;
    assert!(approx(m[[0, 0]], 9.));
    assert!(approx(m[[0, 1]], 2.7));

    assert_eq!(
        Operator::Prod.bounds(&FeatureScale::Hydrophobicity),
        (-20.25, 20.25)
    );
    Ok(())
}

#[test]
fn normalized_layers_stay_in_unit_range() -> Result<()> {
    let builder = five_feature_builder()?;
    assert_eq!(builder.num_features(), 5);
    let image = builder.generate_image("CASSYSGGSYNEQFF", "KLGGALQAK", 20, 11)?;
    assert_eq!(image.dim(), (20, 11, 5));
    assert!(image.iter().all(|&v| (0. ..=1.).contains(&v)));

    for op in ["prod", "diff"] {
        let builder = FeatureBuilder::new(FeatureScale::ALL.to_vec(), parse_operator(op)?);
        let image = builder.generate_image("CASSWDRGHF", "RAKFKQLL", 12, 10)?;
        assert_eq!(image.dim(), (12, 10, 6));
        assert!(image.iter().all(|&v| v >= -1e-12 && v <= 1. + 1e-12));
    }
    Ok(())
}

#[test]
fn unknown_residues_and_long_sequences() -> Result<()> {
    let builder = five_feature_builder()?;
    let err = builder.generate_image("CASXF", "GILGFVFTL", 20, 11).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::UnknownResidue {
            residue: 'X',
            scale: "hydrophob".to_string()
        })
    );

    let err = builder.generate_image("CASSF", "GILGFVFTLAAA", 20, 11).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::RangeViolation {
            sequence: "GILGFVFTLAAA".to_string(),
            length: 12,
            max: 11
        })
    );

    assert!(parse_operator("ratio").is_err());
    Ok(())
}

#[test]
fn generator_parameters() -> Result<()> {
    let params = GeneratorParameters::default();
    assert_eq!(params.padded_shape(), (20, 11));
    assert_eq!(params.negatives_for(5), 5);

    let mut quarter = GeneratorParameters::new((10, 20), (8, 11));
    quarter.neg_ratio = 0.25;
    assert_eq!(quarter.negatives_for(6), 2);

    let mut bad = GeneratorParameters::default();
    bad.neg_ratio = 1.;
    assert!(matches!(
        bad.check().unwrap_err().downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidParameter(_))
    ));
    let bad = GeneratorParameters::new((12, 10), (8, 11));
    assert!(bad.check().is_err());

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("params.json");
    quarter.seed = Some(9);
    quarter.save_json(&path)?;
    assert_eq!(GeneratorParameters::load_json(&path)?, quarter);

    // missing fields take their default value
    let partial = dir.path().join("partial.json");
    std::fs::write(&partial, r#"{"neg_ratio": 0.2}"#)?;
    let loaded = GeneratorParameters::load_json(&partial)?;
    assert_eq!(loaded.neg_ratio, 0.2);
    assert_eq!(loaded.cdr3_range, (10, 20));
    Ok(())
}
