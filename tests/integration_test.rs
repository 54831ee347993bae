//! Integration tests for sheetpack: write real files, read them back

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use sheetpack::types::{CellValue, Sheet};
use sheetpack::{
    write_sheet, write_sheets, CollisionPolicy, SerializeOptions, SheetError, WorkbookWriter,
};
use std::path::Path;
use tempfile::tempdir;

fn open(path: &Path) -> Xlsx<std::io::BufReader<std::fs::File>> {
    open_workbook(path).unwrap()
}

fn cards() -> Sheet {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    Sheet::new("Favro: cards/2024 & more", ["Name", "Estimate", "Due", "Double"])
        .with_rows(vec![
            vec![
                Some(CellValue::from("Write docs")),
                Some(CellValue::from(3.5)),
                Some(CellValue::from(date)),
                Some(CellValue::formula("=B2*2")),
            ],
            vec![Some(CellValue::from("Review")), None, None, None],
            vec![None, Some(CellValue::from(8i64))],
        ])
}

#[test]
fn test_write_and_read_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards.xlsx");

    let written = write_sheet(cards(), &path, &SerializeOptions::default()).unwrap();
    assert_eq!(written, path);

    let mut workbook = open(&path);
    assert_eq!(workbook.sheet_names(), vec!["Favro cards2024 & more"]);

    let range = workbook
        .worksheet_range("Favro cards2024 & more")
        .unwrap();

    // Header
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Name".to_string())));
    assert_eq!(range.get_value((0, 3)), Some(&Data::String("Double".to_string())));

    // Typed values
    assert_eq!(
        range.get_value((1, 0)),
        Some(&Data::String("Write docs".to_string()))
    );
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(3.5)));
    assert!(matches!(
        range.get_value((1, 2)),
        Some(Data::DateTimeIso(s)) if s.starts_with("2024-01-15")
    ));
    assert_eq!(range.get_value((3, 1)), Some(&Data::Float(8.0)));

    // Absent slots stay empty
    assert!(matches!(range.get_value((2, 1)), None | Some(Data::Empty)));
    assert!(matches!(range.get_value((3, 0)), None | Some(Data::Empty)));

    let formulas = workbook
        .worksheet_formula("Favro cards2024 & more")
        .unwrap();
    assert_eq!(formulas.get_value((1, 3)), Some(&"B2*2".to_string()));
}

#[test]
fn test_shared_strings_and_serial_dates_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("serial.xlsx");

    let options = SerializeOptions::builder()
        .inline_strings(false)
        .native_dates(false)
        .build();
    write_sheet(cards(), &path, &options).unwrap();

    let mut workbook = open(&path);
    let name = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&name).unwrap();

    assert_eq!(range.get_value((2, 0)), Some(&Data::String("Review".to_string())));
    assert!(matches!(
        range.get_value((1, 2)),
        Some(Data::DateTime(dt)) if dt.as_f64() == 45306.0
    ));
}

#[test]
fn test_multi_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("multi.xlsx");

    let people = Sheet::new("People", ["Name"]).with_rows(vec![vec![Some("Alice".into())]]);
    let numbers = Sheet::new("Sales/Q1", ["Total"]).with_rows(vec![vec![Some(10i64.into())]]);

    let written = write_sheets(
        vec![people, numbers],
        &path,
        CollisionPolicy::Error,
        &SerializeOptions::default(),
    )
    .unwrap();
    assert_eq!(written, path);

    let mut workbook = open(&path);
    assert_eq!(workbook.sheet_names(), vec!["People", "SalesQ1"]);

    let range = workbook.worksheet_range("SalesQ1").unwrap();
    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(10.0)));
}

#[test]
fn test_collision_overwrite_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overwrite.xlsx");

    let first = Sheet::new("Report", ["V"]).with_rows(vec![vec![Some("first".into())]]);
    let second = Sheet::new("Re:port", ["V"]).with_rows(vec![vec![Some("second".into())]]);

    write_sheets(
        vec![first, second],
        &path,
        CollisionPolicy::Overwrite,
        &SerializeOptions::default(),
    )
    .unwrap();

    let mut workbook = open(&path);
    assert_eq!(workbook.sheet_names(), vec!["Report"]);
    let range = workbook.worksheet_range("Report").unwrap();
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("second".to_string())));
}

#[test]
fn test_collision_error_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.xlsx");

    let err = write_sheets(
        vec![Sheet::new("Report", ["V"]), Sheet::new("Report", ["V"])],
        &path,
        CollisionPolicy::Error,
        &SerializeOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, SheetError::DuplicateSheetName(ref name) if name == "Report"));
    assert!(!path.exists());
}

#[test]
fn test_defective_cell_keeps_rest_of_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defects.xlsx");

    let sheet = Sheet::new("Data", ["A", "B"]).with_rows(vec![
        vec![Some(CellValue::Number(f64::NAN)), Some("kept".into())],
        vec![Some(CellValue::Number(1.0)), None],
    ]);
    write_sheet(sheet, &path, &SerializeOptions::default()).unwrap();

    let mut workbook = open(&path);
    let range = workbook.worksheet_range("Data").unwrap();
    assert!(matches!(range.get_value((1, 0)), None | Some(Data::Empty)));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("kept".to_string())));
    assert_eq!(range.get_value((2, 0)), Some(&Data::Float(1.0)));
}

#[test]
fn test_storage_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.xlsx");

    let err = write_sheet(cards(), &path, &SerializeOptions::default()).unwrap_err();
    assert!(matches!(err, SheetError::StorageWrite { .. }));
    assert!(!path.exists());
}

#[test]
fn test_legacy_suffix() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("export");

    let written = WorkbookWriter::new(&base)
        .legacy_suffix(true)
        .sheet(cards())
        .sheet(Sheet::new("Second", ["X"]))
        .save()
        .unwrap();

    assert_eq!(written, dir.path().join("export.xlsx"));
    let workbook = open(&written);
    assert_eq!(workbook.sheet_names().len(), 2);
}

#[test]
fn test_large_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("large.xlsx");

    let num_rows = 1000;
    let rows = (0..num_rows)
        .map(|i| {
            vec![
                Some(CellValue::from(i as i64)),
                Some(CellValue::from(format!("Name_{}", i))),
            ]
        })
        .collect();
    let sheet = Sheet::new("Large", ["ID", "Value"]).with_rows(rows);
    write_sheet(sheet, &path, &SerializeOptions::default()).unwrap();

    let mut workbook = open(&path);
    let range = workbook.worksheet_range("Large").unwrap();
    assert_eq!(range.height(), num_rows + 1);
    assert_eq!(
        range.get_value((num_rows as u32, 1)),
        Some(&Data::String(format!("Name_{}", num_rows - 1)))
    );
}

#[test]
fn test_sub_second_dates_roundtrip() {
    let dir = tempdir().unwrap();
    let when = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_milli_opt(12, 0, 0, 500)
        .unwrap();
    let sheet = || Sheet::new("Times", ["At"]).with_rows(vec![vec![Some(when.into())]]);

    let native = dir.path().join("native.xlsx");
    write_sheet(sheet(), &native, &SerializeOptions::default()).unwrap();
    let range = open(&native).worksheet_range("Times").unwrap();
    assert_eq!(
        range.get_value((1, 0)),
        Some(&Data::DateTimeIso("2024-01-15T12:00:00.500".to_string()))
    );

    let serial = dir.path().join("serial.xlsx");
    let options = SerializeOptions::builder().native_dates(false).build();
    write_sheet(sheet(), &serial, &options).unwrap();
    let range = open(&serial).worksheet_range("Times").unwrap();
    let expected = 45306.5 + 0.5 / 86_400.0;
    assert!(matches!(
        range.get_value((1, 0)),
        Some(Data::DateTime(dt)) if (dt.as_f64() - expected).abs() < 1e-9
    ));
}
