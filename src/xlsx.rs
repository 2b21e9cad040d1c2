//! Minimal SpreadsheetML (.xlsx) writer for duration reports.
//!
//! An .xlsx workbook is itself a ZIP package of XML parts. Only the
//! parts a single-sheet workbook needs are emitted: content types, the
//! package relationships, the workbook, its relationships, and one
//! worksheet. Everything is assembled in memory and written to disk in
//! a single step, so a failed run never leaves a partial report behind.

use crate::error::{Error, Result};
use crate::report::{DurationReport, DurationRow, COLUMNS};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
    "</Types>",
);

const PACKAGE_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>",
    "</Relationships>",
);

const WORKBOOK: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
    "<sheets><sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/></sheets>",
    "</workbook>",
);

const WORKBOOK_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>",
    "</Relationships>",
);

/// Write a duration report to an .xlsx file, replacing any existing
/// file at that path.
pub fn write_report(report: &DurationReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = workbook_bytes(report)?;
    fs::write(path, bytes)
        .map_err(|e| Error::ReportWrite(format!("{}: {}", path.display(), e)))?;
    log::info!("wrote {} data rows to {}", report.len(), path.display());
    Ok(())
}

/// Assemble the full workbook package in memory.
pub fn workbook_bytes(report: &DurationReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let static_parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
    ];
    for (name, content) in static_parts {
        zip.start_file(name, options).map_err(write_err)?;
        zip.write_all(content.as_bytes()).map_err(write_err)?;
    }

    zip.start_file("xl/worksheets/sheet1.xml", options)
        .map_err(write_err)?;
    zip.write_all(&worksheet_xml(report)?).map_err(write_err)?;

    let cursor = zip.finish().map_err(write_err)?;
    Ok(cursor.into_inner())
}

fn write_err<E: Display>(err: E) -> Error {
    Error::ReportWrite(err.to_string())
}

/// Generate `xl/worksheets/sheet1.xml`: a header row followed by one
/// row per slide. Durations are numeric cells; an absent duration
/// leaves the cell out entirely.
fn worksheet_xml(report: &DurationReport) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_err)?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", NS_SPREADSHEET));
    worksheet.push_attribute(("xmlns:r", NS_RELATIONSHIPS));
    writer
        .write_event(Event::Start(worksheet))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(write_err)?;

    write_header_row(&mut writer)?;
    for (rank, row) in report.rows.iter().enumerate() {
        write_data_row(&mut writer, rank + 2, row)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(write_err)?;

    Ok(writer.into_inner().into_inner())
}

fn write_header_row(writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", "1"));
    writer.write_event(Event::Start(row)).map_err(write_err)?;
    for (column, title) in ["A", "B"].into_iter().zip(COLUMNS) {
        write_text_cell(writer, &format!("{}1", column), title)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(write_err)?;
    Ok(())
}

fn write_data_row(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    sheet_row: usize,
    data: &DurationRow,
) -> Result<()> {
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", sheet_row.to_string().as_str()));
    writer.write_event(Event::Start(row)).map_err(write_err)?;

    write_number_cell(writer, &format!("A{}", sheet_row), data.page)?;
    if let Some(duration) = data.duration {
        write_number_cell(writer, &format!("B{}", sheet_row), duration)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(write_err)?;
    Ok(())
}

/// `<c r=".." t="inlineStr"><is><t>..</t></is></c>`
fn write_text_cell(writer: &mut Writer<Cursor<Vec<u8>>>, cell_ref: &str, text: &str) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", cell_ref));
    cell.push_attribute(("t", "inlineStr"));
    writer.write_event(Event::Start(cell)).map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("is")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("t")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("t")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("is")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("c")))
        .map_err(write_err)?;
    Ok(())
}

/// `<c r=".."><v>..</v></c>`
fn write_number_cell(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    cell_ref: &str,
    value: impl Display,
) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", cell_ref));
    writer.write_event(Event::Start(cell)).map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("v")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&value.to_string())))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("v")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("c")))
        .map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_part(workbook: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(workbook.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    fn report(rows: Vec<DurationRow>) -> DurationReport {
        DurationReport { rows }
    }

    #[test]
    fn test_package_parts_present() {
        let bytes = workbook_bytes(&report(vec![])).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&expected), "missing part {}", expected);
        }
    }

    #[test]
    fn test_header_only_for_empty_report() {
        let bytes = workbook_bytes(&report(vec![])).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<t>number page</t>"));
        assert!(sheet.contains("<t>duration</t>"));
        assert!(!sheet.contains("<row r=\"2\">"));
    }

    #[test]
    fn test_rows_and_values() {
        let bytes = workbook_bytes(&report(vec![
            DurationRow {
                page: 1,
                duration: Some(2.5),
            },
            DurationRow {
                page: 2,
                duration: None,
            },
            DurationRow {
                page: 3,
                duration: Some(0.33),
            },
        ]))
        .unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

        assert!(sheet.contains("<c r=\"A2\"><v>1</v></c>"));
        assert!(sheet.contains("<c r=\"B2\"><v>2.5</v></c>"));
        // Page 2 has no duration cell at all.
        assert!(sheet.contains("<c r=\"A3\"><v>2</v></c>"));
        assert!(!sheet.contains("<c r=\"B3\""));
        assert!(sheet.contains("<c r=\"B4\"><v>0.33</v></c>"));
    }

    #[test]
    fn test_write_report_to_unwritable_path() {
        let row = DurationRow {
            page: 1,
            duration: None,
        };
        let err = write_report(&report(vec![row]), "no/such/dir/report.xlsx").unwrap_err();
        assert!(matches!(err, Error::ReportWrite(_)));
    }

    #[test]
    fn test_write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        fs::write(&path, b"stale content").unwrap();

        write_report(&report(vec![]), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(zip::ZipArchive::new(Cursor::new(bytes)).is_ok());
    }
}
