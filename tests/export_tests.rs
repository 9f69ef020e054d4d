mod common;

use assert_fs::prelude::*;
use common::{expense, fixed_instant, income, setup_test_env};
use daily_ledger::{
    errors::LedgerError,
    export::{export_csv, write_export},
    ledger::{sort_for_display, DateRange},
};
use predicates::prelude::*;
use regex::Regex;

#[test]
fn export_writes_a_timestamped_file() {
    let (mut book, _) = setup_test_env();
    book.add(&income("50000", "2024-01-01").with_category("Salary"))
        .unwrap();
    book.add(&expense("20000", "2024-01-02").with_category("Food"))
        .unwrap();

    let out = assert_fs::TempDir::new().unwrap();
    let path = write_export(out.path(), book.transactions(), fixed_instant()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let pattern = Regex::new(r"^transactions-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}\.csv$").unwrap();
    assert!(pattern.is_match(&name), "unexpected file name {name}");
    assert_eq!(name, "transactions-2024-01-01-00-00-00.csv");

    out.child(&name)
        .assert(predicate::str::starts_with(
            "id,date,type,amount,category,note\n",
        ))
        .assert(predicate::str::contains(r#""income","50000","Salary","""#));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.ends_with('\n'));
}

#[test]
fn rows_keep_the_order_they_are_given() {
    let (mut book, _) = setup_test_env();
    book.add(&income("1", "2024-01-01")).unwrap();
    book.add(&expense("2", "2024-01-05")).unwrap();

    let sorted = sort_for_display(book.transactions());
    let csv = export_csv(&sorted).unwrap();
    let dates: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(dates, vec!["\"2024-01-05\"", "\"2024-01-01\""]);
}

#[test]
fn empty_filtered_view_creates_no_file() {
    let (mut book, _) = setup_test_env();
    book.add(&income("1", "2024-01-01")).unwrap();
    let range = DateRange::parse("2030-01-01", "").unwrap();
    let visible = book.visible(Some(&range));

    let out = assert_fs::TempDir::new().unwrap();
    let target = out.child("exports");
    let err = write_export(target.path(), &visible, fixed_instant()).unwrap_err();
    assert!(matches!(err, LedgerError::NothingToExport));
    target.assert(predicate::path::missing());
}

#[test]
fn quoted_note_survives_a_csv_reader() {
    let (mut book, _) = setup_test_env();
    book.add(&expense("20000", "2024-01-02").with_note(r#"He said "hi""#))
        .unwrap();
    let csv = export_csv(book.transactions()).unwrap();
    assert!(csv.contains(r#""He said ""hi""""#));

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[5], r#"He said "hi""#);
}
