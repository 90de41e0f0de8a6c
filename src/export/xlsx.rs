//! Minimal Office Open XML workbook writer
//!
//! A workbook is a zip archive of XML parts. Cells are written as inline
//! strings or plain numbers, so no shared string table is needed.

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::{SuiteId, SuiteResult};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// Regular font plus a bold one (style index 1) for header rows
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

pub const TEST_CASES_SHEET: &str = "Test Cases";
pub const SUMMARY_SHEET: &str = "Summary";
pub const TEST_CASE_COLUMNS: [&str; 4] = [
    "Test Case ID",
    "Test Case Name",
    "Number of Steps",
    "Assigned To",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Int(n) => n.to_string().len(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

/// One worksheet; the first row is the header
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: vec![header.iter().map(|&h| Cell::from(h)).collect()],
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Width per column: longest cell plus two characters of padding
    pub fn column_widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect()
    }
}

pub fn file_name(suite_id: SuiteId) -> String {
    format!("Suite_{}_TestCases.xlsx", suite_id)
}

/// Build the "Test Cases" and "Summary" sheets for a suite
pub fn suite_sheets(suite: &SuiteResult, generated_at: &str) -> Vec<Sheet> {
    let mut cases = Sheet::new(TEST_CASES_SHEET, &TEST_CASE_COLUMNS);
    for tc in &suite.test_cases {
        cases.push_row(vec![
            tc.test_case_id.map(Cell::Int).unwrap_or_else(|| Cell::from("")),
            Cell::from(tc.test_case_name.as_str()),
            Cell::Int(tc.number_of_steps as i64),
            Cell::from(tc.assigned_to.as_str()),
        ]);
    }

    let mut summary = Sheet::new(SUMMARY_SHEET, &["Metric", "Value"]);
    summary.push_row(vec!["Suite ID".into(), Cell::Int(suite.suite_id as i64)]);
    summary.push_row(vec!["Suite Name".into(), suite.suite_name.as_str().into()]);
    summary.push_row(vec![
        "Total Test Cases".into(),
        Cell::Int(suite.test_cases.len() as i64),
    ]);
    summary.push_row(vec!["Generated At".into(), generated_at.into()]);

    vec![cases, summary]
}

/// Write the suite workbook into `dir`, creating it if needed
pub fn write_suite_workbook(suite: &SuiteResult, dir: &Path, generated_at: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name(suite.suite_id));
    write_workbook(&path, &suite_sheets(suite, generated_at))?;
    Ok(path)
}

pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut add = |name: &str, bytes: &[u8]| -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
        Ok(())
    };

    add("[Content_Types].xml", &content_types_xml(sheets.len())?)?;
    add("_rels/.rels", &root_rels_xml()?)?;
    add("xl/workbook.xml", &workbook_xml(sheets)?)?;
    add("xl/_rels/workbook.xml.rels", &workbook_rels_xml(sheets.len())?)?;
    add("xl/styles.xml", STYLES_XML.as_bytes())?;
    for (i, sheet) in sheets.iter().enumerate() {
        add(
            &format!("xl/worksheets/sheet{}.xml", i + 1),
            &worksheet_xml(sheet)?,
        )?;
    }

    zip.finish()?;
    Ok(())
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_part(body: impl FnOnce(&mut XmlWriter) -> Result<()>) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    body(&mut writer)?;
    Ok(writer.into_inner().into_inner())
}

fn content_types_xml(sheet_count: usize) -> Result<Vec<u8>> {
    xml_part(|w| {
        w.write_event(Event::Start(
            BytesStart::new("Types").with_attributes([("xmlns", NS_CONTENT_TYPES)]),
        ))?;
        w.write_event(Event::Empty(
            BytesStart::new("Default").with_attributes([("Extension", "rels"), ("ContentType", CT_RELS)]),
        ))?;
        w.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
            ("Extension", "xml"),
            ("ContentType", "application/xml"),
        ])))?;
        w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", "/xl/workbook.xml"),
            ("ContentType", CT_WORKBOOK),
        ])))?;
        w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", "/xl/styles.xml"),
            ("ContentType", CT_STYLES),
        ])))?;
        for i in 1..=sheet_count {
            let part = format!("/xl/worksheets/sheet{}.xml", i);
            w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
                ("PartName", part.as_str()),
                ("ContentType", CT_WORKSHEET),
            ])))?;
        }
        w.write_event(Event::End(BytesEnd::new("Types")))?;
        Ok(())
    })
}

fn root_rels_xml() -> Result<Vec<u8>> {
    xml_part(|w| {
        w.write_event(Event::Start(
            BytesStart::new("Relationships").with_attributes([("xmlns", NS_PKG_REL)]),
        ))?;
        let office_document = format!("{}/officeDocument", NS_REL);
        w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", "rId1"),
            ("Type", office_document.as_str()),
            ("Target", "xl/workbook.xml"),
        ])))?;
        w.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(())
    })
}

fn workbook_xml(sheets: &[Sheet]) -> Result<Vec<u8>> {
    xml_part(|w| {
        w.write_event(Event::Start(
            BytesStart::new("workbook").with_attributes([("xmlns", NS_MAIN), ("xmlns:r", NS_REL)]),
        ))?;
        w.write_event(Event::Start(BytesStart::new("sheets")))?;
        for (i, sheet) in sheets.iter().enumerate() {
            let sheet_id = (i + 1).to_string();
            let rel_id = format!("rId{}", i + 1);
            w.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
                ("name", sheet.name.as_str()),
                ("sheetId", sheet_id.as_str()),
                ("r:id", rel_id.as_str()),
            ])))?;
        }
        w.write_event(Event::End(BytesEnd::new("sheets")))?;
        w.write_event(Event::End(BytesEnd::new("workbook")))?;
        Ok(())
    })
}

fn workbook_rels_xml(sheet_count: usize) -> Result<Vec<u8>> {
    xml_part(|w| {
        w.write_event(Event::Start(
            BytesStart::new("Relationships").with_attributes([("xmlns", NS_PKG_REL)]),
        ))?;
        let worksheet_type = format!("{}/worksheet", NS_REL);
        for i in 1..=sheet_count {
            let id = format!("rId{}", i);
            let target = format!("worksheets/sheet{}.xml", i);
            w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
                ("Id", id.as_str()),
                ("Type", worksheet_type.as_str()),
                ("Target", target.as_str()),
            ])))?;
        }
        let styles_id = format!("rId{}", sheet_count + 1);
        let styles_type = format!("{}/styles", NS_REL);
        w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", styles_id.as_str()),
            ("Type", styles_type.as_str()),
            ("Target", "styles.xml"),
        ])))?;
        w.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(())
    })
}

fn worksheet_xml(sheet: &Sheet) -> Result<Vec<u8>> {
    xml_part(|w| {
        w.write_event(Event::Start(
            BytesStart::new("worksheet").with_attributes([("xmlns", NS_MAIN)]),
        ))?;

        let widths = sheet.column_widths();
        if !widths.is_empty() {
            w.write_event(Event::Start(BytesStart::new("cols")))?;
            for (i, width) in widths.iter().enumerate() {
                let col = (i + 1).to_string();
                let width = width.to_string();
                w.write_event(Event::Empty(BytesStart::new("col").with_attributes([
                    ("min", col.as_str()),
                    ("max", col.as_str()),
                    ("width", width.as_str()),
                    ("customWidth", "1"),
                ])))?;
            }
            w.write_event(Event::End(BytesEnd::new("cols")))?;
        }

        w.write_event(Event::Start(BytesStart::new("sheetData")))?;
        for (r, row) in sheet.rows.iter().enumerate() {
            let row_num = (r + 1).to_string();
            w.write_event(Event::Start(
                BytesStart::new("row").with_attributes([("r", row_num.as_str())]),
            ))?;
            for (c, cell) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", column_letter(c), r + 1);
                write_cell(w, &cell_ref, cell, r == 0)?;
            }
            w.write_event(Event::End(BytesEnd::new("row")))?;
        }
        w.write_event(Event::End(BytesEnd::new("sheetData")))?;

        w.write_event(Event::End(BytesEnd::new("worksheet")))?;
        Ok(())
    })
}

fn write_cell(w: &mut XmlWriter, cell_ref: &str, cell: &Cell, header: bool) -> Result<()> {
    let mut start = BytesStart::new("c");
    start.push_attribute(("r", cell_ref));
    if header {
        start.push_attribute(("s", "1"));
    }

    match cell {
        Cell::Text(text) => {
            start.push_attribute(("t", "inlineStr"));
            w.write_event(Event::Start(start))?;
            w.write_event(Event::Start(BytesStart::new("is")))?;
            w.write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))?;
            w.write_event(Event::Text(BytesText::new(&xml_safe(text))))?;
            w.write_event(Event::End(BytesEnd::new("t")))?;
            w.write_event(Event::End(BytesEnd::new("is")))?;
        }
        Cell::Int(n) => {
            w.write_event(Event::Start(start))?;
            w.write_event(Event::Start(BytesStart::new("v")))?;
            w.write_event(Event::Text(BytesText::new(&n.to_string())))?;
            w.write_event(Event::End(BytesEnd::new("v")))?;
        }
    }

    w.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, LF, CR; U+FFFE, U+FFFF)
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

/// Spreadsheet column name for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizedTestCase;
    use std::io::Read;

    fn suite(cases: usize) -> SuiteResult {
        SuiteResult {
            suite_id: 42,
            suite_name: "Suite_42".to_string(),
            test_cases: (0..cases)
                .map(|i| NormalizedTestCase {
                    test_case_id: Some(1000 + i as i64),
                    test_case_name: format!("Case <{}> & more", i),
                    number_of_steps: i,
                    assigned_to: "Jane Doe".to_string(),
                })
                .collect(),
        }
    }

    fn read_part(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_column_widths() {
        let sheets = suite_sheets(&suite(1), "2026-01-01 00:00:00");
        let widths = sheets[0].column_widths();
        assert_eq!(widths[0], "Test Case ID".len() + 2);
        assert_eq!(widths[1], "Test Case Name".len() + 2);
        assert_eq!(sheets[1].column_widths()[1], "2026-01-01 00:00:00".len() + 2);
    }

    #[test]
    fn test_workbook_parts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_suite_workbook(&suite(2), tmp.path(), "2026-01-01 00:00:00").unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Suite_42_TestCases.xlsx")
        );

        let workbook = read_part(&path, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Test Cases""#));
        assert!(workbook.contains(r#"name="Summary""#));

        let cases = read_part(&path, "xl/worksheets/sheet1.xml");
        assert_eq!(cases.matches("<row ").count(), 3);
        assert!(cases.contains("Case &lt;1&gt; &amp; more"));
        assert!(cases.contains(r#"<c r="A2"><v>1000</v></c>"#));

        let summary = read_part(&path, "xl/worksheets/sheet2.xml");
        assert_eq!(summary.matches("<row ").count(), 5);
        assert!(summary.contains("Total Test Cases"));
    }

    #[test]
    fn test_xml_safe() {
        assert_eq!(xml_safe("plain"), "plain");
        assert!(matches!(xml_safe("a\tb\nc"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("Verify\u{0B}tab\u{01}"), "Verifytab");
        assert_eq!(xml_safe("x\u{FFFF}y\u{0}"), "xy");
    }

    #[test]
    fn test_control_characters_are_dropped_from_sheet() {
        let mut suite = suite(1);
        suite.test_cases[0].test_case_name = "Verify\u{0B}tab\u{01}".to_string();
        suite.test_cases[0].assigned_to = "Jane\u{1F} Doe".to_string();

        let tmp = tempfile::tempdir().unwrap();
        let path = write_suite_workbook(&suite, tmp.path(), "now").unwrap();

        let cases = read_part(&path, "xl/worksheets/sheet1.xml");
        assert!(cases.contains("Verifytab"));
        assert!(cases.contains("Jane Doe"));
        assert!(!cases
            .chars()
            .any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
    }

    #[test]
    fn test_empty_suite_has_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_suite_workbook(&suite(0), tmp.path(), "now").unwrap();

        let cases = read_part(&path, "xl/worksheets/sheet1.xml");
        assert_eq!(cases.matches("<row ").count(), 1);
        assert!(cases.contains("Assigned To"));
    }
}
