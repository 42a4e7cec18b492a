//! End-to-end flows: load a dataset, build a session, drive it with events.

use std::io::Write;

use flora_core::{
    load, load_with_report, parse_records, Category, DataFormat, DataSource, LoadError, MapConfig,
    MapEvent, MapSession, RecordingSurface, Stats,
};

const THREE_ROWS: &str = "\
id,uuid,scientific_name,common_name,user_name,license,place_state_name,place_county_name,image_url,latitude,longitude
1,u-1,Azorella compacta,llareta,ana,CC-BY,Puno,Lampa,,-15.8,-70.0
2,u-2,Polylepis incana,queñua,beto,,Cusco,Urubamba,,,-72.0
3,u-3,Puya raimondii,titanka,,,Ancash,Recuay,,-9.9,-77.4
";

fn session_from(text: &str) -> MapSession<RecordingSurface> {
    let (records, _) = parse_records(text, DataFormat::Csv).unwrap();
    MapSession::from_records(records, RecordingSurface::new(), MapConfig::default())
}

fn visible_ids(session: &MapSession<RecordingSurface>) -> Vec<String> {
    session
        .registry()
        .entries()
        .iter()
        .filter(|e| e.is_visible())
        .map(|e| e.record().id.clone())
        .collect()
}

#[test]
fn test_rows_without_coordinates_never_registered() {
    let (records, report) = parse_records(THREE_ROWS, DataFormat::Csv).unwrap();
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_skipped, 1);

    let session = MapSession::from_records(records, RecordingSurface::new(), MapConfig::default());
    let ids: Vec<_> = session
        .registry()
        .entries()
        .iter()
        .map(|e| e.record().id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(session.registry().entries()[0].category(), Category::Azorella);
    assert_eq!(session.registry().entries()[1].category(), Category::Default);
    assert_eq!(session.stats(), Stats { total: 2, visible: 2 });
}

#[test]
fn test_query_by_common_name() {
    let mut session = session_from(THREE_ROWS);

    let stats = session.process_event(MapEvent::QueryChanged("llareta".to_string()));
    assert_eq!(stats, Stats { total: 2, visible: 1 });
    assert_eq!(session.last_outcome().visible_count, 1);
    assert_eq!(visible_ids(&session), vec!["1"]);

    // Same query twice leaves everything unchanged
    let again = session.process_event(MapEvent::QueryChanged("llareta".to_string()));
    assert_eq!(again, stats);
    assert_eq!(visible_ids(&session), vec!["1"]);

    let cleared = session.process_event(MapEvent::QueryCleared);
    assert_eq!(cleared, Stats { total: 2, visible: 2 });
}

#[test]
fn test_stats_invariants_hold_across_events() {
    let mut session = session_from(THREE_ROWS);
    let first = session.registry().entries()[0].id();

    let events = vec![
        MapEvent::QueryChanged("puno".to_string()),
        MapEvent::MarkerHovered(first),
        MapEvent::QueryChanged("zzz".to_string()),
        MapEvent::MarkerClicked(first),
        MapEvent::MarkerUnhovered,
        MapEvent::QueryChanged("  ".to_string()),
        MapEvent::MapClicked,
    ];

    for event in events {
        let stats = session.process_event(event.clone());
        assert!(stats.visible <= stats.total, "after {event:?}");
        assert_eq!(stats.total, 2);
        assert_eq!(
            stats.visible,
            session.registry().surface().attached_count(),
            "after {event:?}"
        );
    }
    assert_eq!(session.stats().visible, 2);
    assert!(session.selected().is_none());
}

#[test]
fn test_detail_escapes_markup() {
    let text = "id,scientific_name,latitude,longitude\n7,<b>Bold</b> & co,-10,-75\n";
    let mut session = session_from(text);
    let id = session.registry().entries()[0].id();

    session.process_event(MapEvent::MarkerClicked(id));
    let html = session.detail_html().unwrap();
    assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; co"));
    assert!(!html.contains("<b>Bold"));
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(THREE_ROWS.as_bytes()).unwrap();

    let source = DataSource::path(file.path());
    let (records, report) = load_with_report(&source).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(report.rows_loaded(), 2);
    assert_eq!(records[0].common_name, "llareta");
}

#[tokio::test]
async fn test_load_json_results_wrapper() {
    let json = r#"{"results": [
        {"id": 11, "taxon": {"name": "Polylepis tarapacana", "preferred_common_name": "queñua"},
         "user": {"login": "carla"}, "location": "-18.2,-69.1"},
        {"id": 12, "location": null}
    ]}"#;
    let records = load(&DataSource::text(json)).await.unwrap();
    assert_eq!(records.len(), 1);

    let session = MapSession::from_records(records, RecordingSurface::new(), MapConfig::default());
    assert_eq!(session.registry().entries()[0].category(), Category::Polylepis);
}

#[tokio::test]
async fn test_missing_file_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&DataSource::path(dir.path().join("missing.csv")))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Unreachable { .. }));
}

#[tokio::test]
async fn test_all_rows_invalid_is_empty() {
    let text = "id,latitude,longitude\n1,abc,-70\n2,,\n";
    let err = load(&DataSource::text_with_format(text, DataFormat::Csv))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Empty));
}

#[test]
fn test_llareta_scenario() {
    let text = "\
id,common_name,latitude,longitude
1,llareta,-10,-75
2,pata,bad,-75
3,other,-11,-76
";
    let mut session = session_from(text);
    let entries = session.registry().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record().id, "1");
    assert_eq!(entries[0].category(), Category::Azorella);
    assert_eq!(entries[1].record().id, "3");
    assert_eq!(entries[1].category(), Category::Default);

    session.process_event(MapEvent::QueryChanged("llareta".to_string()));
    assert_eq!(session.last_outcome().visible_count, 1);
    assert_eq!(visible_ids(&session), vec!["1"]);
}
