//! The bundled demo dataset and config stay loadable.

use std::path::PathBuf;

use flora_core::{load_with_report, Category, DataSource, MapConfig, MapSession, RecordingSurface};

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn test_demo_config_parses() {
    let config = MapConfig::load(demos_dir().join("flora.toml")).unwrap();
    assert_eq!(config.marker_radius, 7.0);
    assert_eq!(config.dataset, Some(PathBuf::from("demos/datos.csv")));
    // Unset keys keep their defaults
    assert_eq!(config.popup_max_width, 220);
}

#[tokio::test]
async fn test_demo_dataset_loads() {
    let source = DataSource::path(demos_dir().join("datos.csv"));
    let (records, report) = load_with_report(&source).await.unwrap();
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.rows_skipped, 1);

    let session = MapSession::from_records(records, RecordingSurface::new(), MapConfig::default());
    let counts = session.category_counts();
    assert_eq!(counts[&Category::Azorella], 2);
    assert_eq!(counts[&Category::Polylepis], 2);
    assert_eq!(counts[&Category::Default], 1);
}
