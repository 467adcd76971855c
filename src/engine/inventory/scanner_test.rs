use crate::engine::errors::MergeError;
use crate::engine::inventory::naming::{CrabJobNaming, IndexSuffixNaming};
use crate::engine::inventory::scanner::{DEFAULT_MASK, compile_mask, scan_directory};
use crate::test_helpers::factory::Factory;
use std::fs;
use tempfile::tempdir;

#[test]
fn scans_and_orders_by_numeric_index() {
    let fixture = Factory::fixture_dir()
        .with_file(10, 1)
        .with_file(2, 3)
        .with_file(1, 2)
        .create();

    let files = scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming).unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["sample_1.root", "sample_2.root", "sample_10.root"]);
    let indices: Vec<_> = files.iter().map(|f| f.sequence_index).collect();
    assert_eq!(indices, vec![1, 2, 10]);
}

#[test]
fn records_file_sizes_from_filesystem() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a_1.root"), vec![0u8; 17]).unwrap();
    fs::write(dir.path().join("a_2.root"), vec![0u8; 0]).unwrap();

    let files = scan_directory(dir.path(), DEFAULT_MASK, &IndexSuffixNaming).unwrap();
    assert_eq!(files[0].size, 17);
    assert_eq!(files[1].size, 0);
    assert_eq!(files[0].path, dir.path().join("a_1.root"));
}

#[test]
fn mask_filters_unrelated_files() {
    let fixture = Factory::fixture_dir()
        .with_record_counts(&[1, 1])
        .with_raw("notes.txt", "hello")
        .with_raw("crab.log", "")
        .with_raw("sample_3.root.bak", "")
        .create();

    let files = scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn custom_mask_narrows_selection() {
    let fixture = Factory::fixture_dir()
        .with_record_counts(&[1, 1])
        .with_raw("other_5.root", "")
        .create();

    let files = scan_directory(fixture.path(), r"sample_.*\.root", &IndexSuffixNaming).unwrap();
    assert!(files.iter().all(|f| f.name.starts_with("sample_")));
    assert_eq!(files.len(), 2);
}

#[test]
fn subdirectories_are_skipped() {
    let fixture = Factory::fixture_dir().with_record_counts(&[1]).create();
    fs::create_dir(fixture.path().join("nested_9.root")).unwrap();

    let files = scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming).unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn malformed_name_aborts_scan() {
    let fixture = Factory::fixture_dir()
        .with_record_counts(&[1, 1])
        .with_raw("summary.root", "")
        .create();

    match scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming) {
        Err(MergeError::NamingConvention { file }) => assert_eq!(file, "summary.root"),
        other => panic!("expected naming error, got {:?}", other),
    }
}

#[test]
fn crab_naming_orders_by_job_number() {
    let dir = tempdir().unwrap();
    for name in ["out_12_1_abc.root", "out_3_2_Xy9.root", "out_7_1_q1w.root"] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let files = scan_directory(dir.path(), DEFAULT_MASK, &CrabJobNaming).unwrap();
    let indices: Vec<_> = files.iter().map(|f| f.sequence_index).collect();
    assert_eq!(indices, vec![3, 7, 12]);
}

#[test]
fn empty_selection_is_an_error() {
    let fixture = Factory::fixture_dir().with_raw("readme.md", "").create();
    assert!(matches!(
        scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming),
        Err(MergeError::NoInputFiles { .. })
    ));
}

#[test]
fn mask_with_slash_is_rejected() {
    assert!(matches!(
        compile_mask(r"../.*\.root"),
        Err(MergeError::InvalidMask { .. })
    ));
}

#[test]
fn uncompilable_mask_is_rejected() {
    assert!(matches!(
        compile_mask(r"(.*\.root"),
        Err(MergeError::InvalidMask { .. })
    ));
}

#[test]
fn mask_matches_whole_name() {
    let re = compile_mask(DEFAULT_MASK).unwrap();
    assert!(re.is_match("sample_1.root"));
    assert!(!re.is_match("sample_1.root.tmp"));
}

#[cfg(unix)]
#[test]
fn non_utf8_name_matching_mask_aborts_scan() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = Factory::fixture_dir().with_record_counts(&[1, 1]).create();
    let raw = OsStr::from_bytes(b"sample_\xff_3.root");
    fs::write(fixture.path().join(raw), "").unwrap();

    match scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming) {
        Err(MergeError::NamingConvention { file }) => {
            assert_eq!(file, "sample_\u{FFFD}_3.root");
        }
        other => panic!("expected naming error, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn non_utf8_name_outside_mask_is_ignored() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = Factory::fixture_dir().with_record_counts(&[1, 1]).create();
    fs::write(fixture.path().join(OsStr::from_bytes(b"notes_\xff.txt")), "").unwrap();

    let files = scan_directory(fixture.path(), DEFAULT_MASK, &IndexSuffixNaming).unwrap();
    assert_eq!(files.len(), 2);
}
