use anyhow::Result;
use imrex_data::LoggingConfig;
use log::LevelFilter;

#[test]
fn logging_to_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("imrex.log");
    let config = LoggingConfig::default()
        .with_level(LevelFilter::Debug)
        .with_file(path.clone());
    assert_eq!(config.module_levels[0].0, "pdbtbx");
    let _builder = config.builder()?;
    assert!(path.exists());

    let missing = LoggingConfig::default().with_file(dir.path().join("nope").join("imrex.log"));
    assert!(missing.builder().is_err());
    Ok(())
}
