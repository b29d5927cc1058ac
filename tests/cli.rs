use std::fs;
use std::path::Path;

use assert_cmd::Command;
use calamine::{open_workbook, open_workbook_auto, Data, Reader, Xlsx};
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Weekly roster in the real layout: title on row 1, headers on row 2, totals on row 174
fn write_roster(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write(0, 0, "10월 3주차 방과후 신청").unwrap();
    for (col, header) in ["반", "번호", "이름", "국어", "수학", "과학"].iter().enumerate() {
        sheet.write(1, col as u16, *header).unwrap();
    }

    let students: [(f64, f64, &str, Option<f64>, Option<&str>); 4] = [
        (1.0, 1.0, "김민수", Some(1.0), None),
        (1.0, 2.0, "이서연", None, Some("1")),
        (2.0, 1.0, "박지훈", Some(1.0), Some("1")),
        (2.0, 2.0, "최유나", Some(0.0), None),
    ];
    for (i, (class, number, name, korean, math)) in students.iter().enumerate() {
        let row = 2 + i as u32;
        sheet.write(row, 0, *class).unwrap();
        sheet.write(row, 1, *number).unwrap();
        sheet.write(row, 2, *name).unwrap();
        if let Some(v) = korean {
            sheet.write(row, 3, *v).unwrap();
        }
        if let Some(v) = math {
            sheet.write(row, 4, *v).unwrap();
        }
    }

    sheet.write(173, 2, "합계").unwrap();
    sheet.write(173, 3, 2.0).unwrap();
    sheet.write(173, 4, 2.0).unwrap();
    sheet.write(173, 5, 0.0).unwrap();

    workbook.save(path).unwrap();
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    write_roster(&data.join("10월3주차.xlsx"));
    write_roster(&data.join("10월4주차.xlsx"));
    fs::write(data.join("notes.txt"), "not a roster").unwrap();
    dir
}

fn rosterpick(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rosterpick").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn lists_roster_files_sorted() {
    let dir = workspace();

    rosterpick(&dir)
        .arg("files")
        .assert()
        .success()
        .stdout("10월3주차.xlsx\n10월4주차.xlsx\n");
}

#[test]
fn empty_data_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    rosterpick(&dir)
        .arg("files")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("10월3주차.xlsx"));
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn subjects_skip_identity_and_zero_total_columns() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["subjects", "10월3주차.xlsx"])
        .assert()
        .success()
        .stdout("국어\n수학\n");
}

#[test]
fn show_prints_applicants() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["show", "10월3주차", "수학"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10월3주차 수학 수강자 명단"))
        .stdout(predicate::str::contains("이서연"))
        .stdout(predicate::str::contains("박지훈"))
        .stdout(predicate::str::contains("김민수").not())
        .stdout(predicate::str::contains("Total: 2"));
}

#[test]
fn show_without_arguments_picks_first_file_and_subject() {
    let dir = workspace();

    rosterpick(&dir)
        .arg("show")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("10월3주차 국어 수강자 명단"))
        .stdout(predicate::str::contains("김민수"));
}

#[test]
fn unknown_subject_fails() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["show", "10월3주차.xlsx", "체육"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("체육"));
}

#[test]
fn exports_formatted_workbook() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["export", "10월3주차.xlsx", "수학"])
        .assert()
        .success()
        .stderr(predicate::str::contains("10월3주차_수학.xlsx"));

    let out = dir.path().join("10월3주차_수학.xlsx");
    let mut workbook = open_workbook_auto(&out).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["필터결과".to_string()]);

    let range = workbook.worksheet_range("필터결과").unwrap();
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("10월3주차 수학".into()))
    );
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("순번".into())));
    assert_eq!(range.get_value((2, 8)), Some(&Data::String("금".into())));
    assert_eq!(range.get_value((3, 0)), Some(&Data::Float(1.0)));
    assert_eq!(range.get_value((3, 3)), Some(&Data::String("이서연".into())));
    assert_eq!(range.get_value((4, 3)), Some(&Data::String("박지훈".into())));
    assert_eq!(range.get_value((4, 1)), Some(&Data::Float(2.0)));

    let mut xlsx: Xlsx<_> = open_workbook(&out).unwrap();
    xlsx.load_merged_regions().unwrap();
    let merged: Vec<_> = xlsx
        .merged_regions()
        .iter()
        .map(|(sheet, _, dims)| (sheet.clone(), dims.start, dims.end))
        .collect();
    assert_eq!(merged, vec![("필터결과".to_string(), (0, 0), (0, 8))]);
}

#[test]
fn exports_csv_to_stdout() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["export", "10월4주차.xlsx", "국어", "--format", "csv", "--output", "-"])
        .assert()
        .success()
        .stdout("순번,반,번호,이름\n1,1,1,김민수\n2,2,1,박지훈\n");
}

#[test]
fn exports_pdf() {
    let dir = workspace();
    let out = dir.path().join("report.pdf");

    rosterpick(&dir)
        .args(["export", "10월3주차.xlsx", "국어", "-f", "pdf", "-o"])
        .arg(&out)
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn custom_sum_row_without_totals_offers_every_column() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["subjects", "10월3주차.xlsx", "--sum-row", "100"])
        .assert()
        .success()
        .stdout("반\n번호\n이름\n국어\n수학\n과학\n")
        .stderr(predicate::str::contains("showing every column"));
}

#[test]
fn fallback_warning_survives_quiet_logging() {
    let dir = workspace();

    rosterpick(&dir)
        .env("RUST_LOG", "error")
        .args(["subjects", "10월3주차.xlsx", "--sum-row", "100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no filterable subject columns"));
}

#[test]
fn narrow_sheet_without_identity_headers_keeps_its_own_columns() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(0, 0, "동아리 신청").unwrap();
    sheet.write(1, 0, "코드").unwrap();
    sheet.write(1, 1, "미술").unwrap();
    sheet.write(2, 0, "A-1").unwrap();
    sheet.write(2, 1, 1.0).unwrap();
    workbook.save(data.join("동아리.xlsx")).unwrap();

    rosterpick(&dir)
        .args(["export", "동아리.xlsx", "미술", "-f", "csv", "-o", "-"])
        .assert()
        .success()
        .stdout("순번,코드,미술\n1,A-1,1\n");
}

#[test]
fn exports_text_table() {
    let dir = workspace();

    rosterpick(&dir)
        .args(["export", "10월3주차.xlsx", "수학", "-f", "txt"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("10월3주차_수학.txt")).unwrap();
    assert!(text.contains("10월3주차 수학 수강자 명단"));
    assert!(text.contains("Total: 2"));
}

#[test]
fn rejects_bad_column_range() {
    let dir = workspace();

    for columns in ["AG:A", "A:ZZZZZZ"] {
        rosterpick(&dir)
            .args(["files", "--columns", columns])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid column range"));
    }
}
