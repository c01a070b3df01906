use pregnancy_dating::utils::error::DatingError;
use pregnancy_dating::{DatingEngine, DatingOutcome, DatingPipeline, LocalStorage, TomlConfig};
use tempfile::TempDir;

const RECORDS: &str = "\
subject,lmp_date,reference_date,ultrasound_date,ga_weeks,ga_days,recorded_edd
S-001,2016-05-14,,2016-09-17,19,,2017-02-11
S-002,2016-05-14,,2016-09-13,19,,
S-003,,,2016-09-17,20,3,
S-004,2016-05-14,2016-06-11,,,,
S-005,2016-05-14,,2016-09-17,19,,2017-03-11
";

const RECORDS_WITH_BAD_CELLS: &str = "\
subject,lmp_date,reference_date,ultrasound_date,ga_weeks,ga_days,recorded_edd
S-001,2016-05-14,,2016-09-17,19,,
S-002,2016-02-30,,,,,
S-003,2016-05-14,,2016-09-17,19w,,
S-004,2016-05-14,2016-06-11,,,,
";

fn write_config(dir: &TempDir, on_invalid_record: &str) -> TomlConfig {
    write_config_for(dir, RECORDS, on_invalid_record)
}

fn write_config_for(dir: &TempDir, records: &str, on_invalid_record: &str) -> TomlConfig {
    let input = dir.path().join("records.csv");
    std::fs::write(&input, records).unwrap();
    let output = dir.path().join("output");

    let toml_content = format!(
        r#"
[batch]
name = "clinic-a"

[source]
input_path = "{}"

[policy]
evaluation_date = "2016-09-17"

[load]
output_path = "{}"
output_formats = ["csv", "json"]

[error_handling]
on_invalid_record = "{}"
"#,
        input.to_str().unwrap().replace('\\', "/"),
        output.to_str().unwrap().replace('\\', "/"),
        on_invalid_record
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_batch_with_reported_rejections() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "report");

    let pipeline = DatingPipeline::new(LocalStorage::new(String::new()), config);
    let summary = DatingEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.records, 5);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.outputs.len(), 2);

    let json_path = temp_dir.path().join("output").join("dating_output.json");
    let outcomes: Vec<DatingOutcome> =
        serde_json::from_slice(&std::fs::read(json_path).unwrap()).unwrap();

    // within the 10 day tolerance at 18 weeks
    assert_eq!(outcomes[0].edd.unwrap().to_string(), "2017-02-18");
    assert_eq!(outcomes[0].diffdays, Some(7));
    // 11 days apart, ultrasound wins
    assert_eq!(outcomes[1].edd.unwrap().to_string(), "2017-02-07");
    // ultrasound only
    assert_eq!(outcomes[2].ga_weeks, Some(20));
    assert_eq!(outcomes[2].ga_days, Some(3));
    assert_eq!(outcomes[2].lmp_edd, None);
    // LMP only, GA as of the reference date
    assert_eq!(outcomes[3].ga_weeks, Some(4));
    assert_eq!(outcomes[3].edd.unwrap().to_string(), "2017-02-18");
    assert_eq!(outcomes[3].lmp_days_until_edd, Some(252));
    // recorded EDD a month off the recorded GA
    assert!(outcomes[4].error.as_deref().unwrap().contains("Ultrasound inconsistency"));
    assert_eq!(outcomes[4].edd, None);

    let csv = std::fs::read_to_string(temp_dir.path().join("output").join("dating_output.csv"))
        .unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.contains("S-002,2017-02-07,ULTRASOUND,11,19,0,ULTRASOUND"));
}

#[tokio::test]
async fn test_batch_aborts_on_first_invalid_record() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "fail");

    let pipeline = DatingPipeline::new(LocalStorage::new(String::new()), config);
    let err = DatingEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, DatingError::RecordError { row: 6, .. }));
    assert!(!temp_dir.path().join("output").exists());
}

#[tokio::test]
async fn test_unreadable_cells_are_reported_per_row() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config_for(&temp_dir, RECORDS_WITH_BAD_CELLS, "report");

    let pipeline = DatingPipeline::new(LocalStorage::new(String::new()), config);
    let summary = DatingEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.records, 4);
    assert_eq!(summary.rejected, 2);

    let json_path = temp_dir.path().join("output").join("dating_output.json");
    let outcomes: Vec<DatingOutcome> =
        serde_json::from_slice(&std::fs::read(json_path).unwrap()).unwrap();

    assert_eq!(outcomes[0].edd.unwrap().to_string(), "2017-02-18");
    // February 30th
    assert_eq!(outcomes[1].subject, "S-002");
    assert!(outcomes[1].error.is_some());
    assert_eq!(outcomes[1].edd, None);
    // non-numeric weeks
    assert_eq!(outcomes[2].subject, "S-003");
    assert!(outcomes[2].error.is_some());
    assert_eq!(outcomes[3].ga_weeks, Some(4));
    assert_eq!(outcomes[3].error, None);
}

#[tokio::test]
async fn test_unreadable_cell_aborts_in_fail_mode() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config_for(&temp_dir, RECORDS_WITH_BAD_CELLS, "fail");

    let pipeline = DatingPipeline::new(LocalStorage::new(String::new()), config);
    let err = DatingEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, DatingError::RecordError { row: 3, .. }));
    assert!(!temp_dir.path().join("output").exists());
}

#[tokio::test]
async fn test_missing_input_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = write_config(&temp_dir, "fail");
    config.source.input_path = temp_dir
        .path()
        .join("missing.csv")
        .to_str()
        .unwrap()
        .to_string();

    let pipeline = DatingPipeline::new(LocalStorage::new(String::new()), config);
    let err = DatingEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, DatingError::IoError(_)));
}
