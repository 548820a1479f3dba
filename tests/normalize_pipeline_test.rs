use accommodation_registry::app::NormalizeUseCase;
use accommodation_registry::config::NormalizeConfig;
use accommodation_registry::domain::Grade;
use accommodation_registry::infra::{load_entities, CsvFileSource, CsvFileStore};
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str =
    " Name ,Type,District,Grade,Rooms,AGA Division,PS/MC/UC,Latitude,Logitiute,Address";

fn write_source(dir: &Path, rows: &[&str]) -> Result<std::path::PathBuf> {
    let path = dir.join("Information for Accommodation.csv");
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    fs::write(&path, text)?;
    Ok(path)
}

fn use_case(source: &Path, output: &Path) -> NormalizeUseCase {
    NormalizeUseCase::new(
        Box::new(CsvFileSource::new(source)),
        Box::new(CsvFileStore::new(output)),
        NormalizeConfig::default(),
    )
}

#[test]
fn test_lake_view_inn_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let source = write_source(
        dir.path(),
        &["Lake View Inn,hotel, colombo ,Deluxe,25,X,Y,6.9,79.8,12 Lake Road"],
    )?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let report = use_case(&source, &output).run()?;
    assert_eq!(report.stats.emitted_rows, 1);
    assert_eq!(report.source_sha256.len(), 64);

    let text = fs::read_to_string(&output)?;
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("hotel_id,name,type,district,grade,rooms,aga_division,local_authority,latitude,longitude,address")
    );
    assert_eq!(
        lines.next(),
        Some("HOTEL_0001,Lake View Inn,Hotel,Colombo,FIVE,25,X,Y,6.9,79.8,12 Lake Road")
    );
    assert_eq!(lines.next(), None);

    let entities = load_entities(&output)?;
    assert_eq!(entities[0].grade, Grade::Five);
    assert_eq!(entities[0].rooms, 25);
    assert_eq!(entities[0].latitude, 6.9);
    Ok(())
}

#[test]
fn test_null_longitude_row_is_dropped() -> Result<()> {
    let dir = tempdir()?;
    let source = write_source(
        dir.path(),
        &[
            "Lake View Inn,hotel,colombo,Deluxe,25,X,Y,6.9,NULL,",
            "Sea Breeze,villa,galle,B,4,X,Y,6.0,80.2,",
        ],
    )?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let report = use_case(&source, &output).run()?;
    assert_eq!(report.stats.total_rows, 2);
    assert_eq!(report.stats.dropped_rows, 1);
    assert_eq!(report.stats.drop_reasons.get("longitude"), Some(&1));

    let entities = load_entities(&output)?;
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name.as_deref(), Some("Sea Breeze"));
    // Ids are handed out after the gate, so the survivor is first
    assert_eq!(entities[0].hotel_id.as_deref(), Some("HOTEL_0001"));
    Ok(())
}

#[test]
fn test_complete_rows_appear_once_and_share_ids_by_name() -> Result<()> {
    let dir = tempdir()?;
    let source = write_source(
        dir.path(),
        &[
            "Alpha,Hotel,Kandy,A,10,X,Y,7.2,80.6,",
            "Beta,Guest House,Kandy,C,5,X,Y,7.3,80.6,",
            "Alpha,Hotel,Kandy,A,12,X,Y,7.2,80.7,",
            "Gamma,Hotel,Galle,Nope,abc,X,Y,6.0,80.2,",
            "Delta,Villa,Matara,,3,X,Y,5.9,80.5,",
        ],
    )?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let report = use_case(&source, &output).run()?;
    assert_eq!(report.stats.emitted_rows, 4);
    assert_eq!(report.stats.distinct_hotels, 3);
    assert_eq!(report.stats.drop_reasons.get("rooms"), Some(&1));

    let entities = load_entities(&output)?;
    let ids: Vec<&str> = entities.iter().filter_map(|e| e.hotel_id.as_deref()).collect();
    assert_eq!(ids, vec!["HOTEL_0001", "HOTEL_0002", "HOTEL_0001", "HOTEL_0003"]);

    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for entity in &entities {
        let name = entity.name.as_deref().unwrap_or_default();
        let id = entity.hotel_id.as_deref().unwrap_or_default();
        assert_eq!(*by_name.entry(name).or_insert(id), id);
    }

    assert_eq!(entities[1].grade, Grade::Three);
    assert_eq!(entities[3].grade, Grade::Unrated);
    Ok(())
}

#[test]
fn test_missing_source_leaves_existing_output_untouched() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("cleaned_accommodation.csv");
    fs::write(&output, "previous run\n")?;

    let result = use_case(&dir.path().join("absent.csv"), &output).run();

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("absent.csv"));
    assert_eq!(fs::read_to_string(&output)?, "previous run\n");
    Ok(())
}

#[test]
fn test_missing_required_column_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("raw.csv");
    fs::write(&source, "Name,Type,District,Grade,Rooms\nA,Hotel,Kandy,A,3\n")?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let result = use_case(&source, &output).run();

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_rerun_over_same_source_is_stable() -> Result<()> {
    let dir = tempdir()?;
    let source = write_source(
        dir.path(),
        &[
            "Alpha,hotel,kandy,Superior,10,X,Y,7.2,80.6,",
            "Beta,villa,galle,Standard,4,X,Y,6.0,80.2,",
        ],
    )?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let first = use_case(&source, &output).run()?;
    let first_text = fs::read_to_string(&output)?;
    let second = use_case(&source, &output).run()?;

    assert_eq!(first.source_sha256, second.source_sha256);
    assert_eq!(first.stats, second.stats);
    assert_eq!(fs::read_to_string(&output)?, first_text);
    Ok(())
}

#[test]
fn test_trailing_blank_headers_do_not_abort_the_run() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("raw.csv");
    fs::write(
        &source,
        format!("{},,\nInn,hotel,kandy,A,10,X,Y,7.2,80.6,addr,,\n", HEADER),
    )?;
    let output = dir.path().join("cleaned_accommodation.csv");

    let report = use_case(&source, &output).run()?;
    assert_eq!(report.stats.emitted_rows, 1);

    let text = fs::read_to_string(&output)?;
    assert!(text
        .lines()
        .next()
        .unwrap_or_default()
        .ends_with(",address,unnamed_10,unnamed_11"));
    Ok(())
}
