// src/tabular/xlsx.rs

use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek};
use tracing::debug;
use zip::ZipArchive;

use super::RowRecord;

const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";
/// Column `XFD`, the last one a worksheet can address.
const MAX_COLUMN: usize = 16_383;

/// Read the first worksheet of an XLSX workbook into row records.
///
/// The first row is the header; blank rows are skipped and missing cells
/// default to "". Keys are returned as found; call [`RowRecord::normalized`]
/// to trim them.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<RowRecord>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("opening workbook archive")?;

    let sheet_path = first_sheet_path(&mut archive).unwrap_or_else(|| DEFAULT_SHEET.to_string());
    debug!(sheet = %sheet_path, "reading worksheet");

    let shared = match read_entry(&mut archive, "xl/sharedStrings.xml") {
        Ok(xml) => parse_shared_strings(&xml).context("parsing shared strings")?,
        Err(_) => Vec::new(),
    };
    let sheet_xml = read_entry(&mut archive, &sheet_path)?;
    let grid = parse_sheet(&sheet_xml, &shared).with_context(|| format!("parsing {}", sheet_path))?;
    Ok(grid_to_records(grid))
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("workbook entry {} missing", name))?;
    let mut out = String::new();
    entry
        .read_to_string(&mut out)
        .with_context(|| format!("reading {}", name))?;
    Ok(out)
}

fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Resolve the first `<sheet>` of the workbook to its part path.
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let workbook = read_entry(archive, "xl/workbook.xml").ok()?;
    let rels = read_entry(archive, "xl/_rels/workbook.xml.rels").ok()?;

    let rid = find_element_attr(&workbook, b"sheet", b"id", None)?;
    let target = find_element_attr(
        &rels,
        b"Relationship",
        b"Target",
        Some((&b"Id"[..], rid.as_str())),
    )?;
    Some(match target.strip_prefix('/') {
        Some(abs) => abs.to_string(),
        None => format!("xl/{}", target),
    })
}

/// First `want` attribute of an element named `tag`, optionally requiring
/// another attribute to equal a value.
fn find_element_attr(
    xml: &str,
    tag: &[u8],
    want: &[u8],
    filter: Option<(&[u8], &str)>,
) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == tag => {
                if let Some((key, value)) = filter {
                    if attr(&e, key).as_deref() != Some(value) {
                        continue;
                    }
                }
                if let Some(v) = attr(&e, want) {
                    return Some(v);
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    // phonetic runs carry their own <t> nodes
    let mut in_rph = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_t = true,
                b"rPh" => in_rph = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => out.push(std::mem::take(&mut current)),
                b"t" => in_t = false,
                b"rPh" => in_rph = false,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => out.push(String::new()),
            Event::Text(t) if in_t && !in_rph => current.push_str(&t.unescape()?),
            Event::CData(t) if in_t && !in_rph => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()))
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

/// Zero-based column index of a cell reference like `"AB12"`.
///
/// `None` when the reference has no column letters or lies past `XFD`.
fn column_index(cell_ref: &str) -> Option<usize> {
    let mut idx = 0usize;
    let mut seen = false;
    for c in cell_ref.chars().take_while(|c| c.is_ascii_alphabetic()) {
        let digit = c.to_ascii_uppercase() as usize - 'A' as usize + 1;
        idx = idx.checked_mul(26)?.checked_add(digit)?;
        if idx > MAX_COLUMN + 1 {
            return None;
        }
        seen = true;
    }
    seen.then(|| idx - 1)
}

/// Column of a `<c>` element: its `r` reference when present, otherwise
/// the slot after the previous cell.
fn cell_column(e: &BytesStart<'_>, next_col: usize) -> Result<usize> {
    match attr(e, b"r") {
        Some(r) if r.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            column_index(&r).ok_or_else(|| anyhow!("cell reference {} out of range", r))
        }
        _ => Ok(next_col),
    }
}

#[derive(Default)]
struct Cell {
    col: usize,
    kind: Option<String>,
    raw: String,
}

fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<Cell> = None;
    let mut next_col = 0usize;
    let mut capture = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row.clear();
                    next_col = 0;
                }
                b"c" => {
                    cell = Some(Cell {
                        col: cell_column(&e, next_col)?,
                        kind: attr(&e, b"t"),
                        raw: String::new(),
                    });
                }
                b"v" | b"t" => capture = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => next_col = cell_column(&e, next_col)? + 1,
                _ => {}
            },
            Event::Text(t) if capture => {
                if let Some(c) = cell.as_mut() {
                    c.raw.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => capture = false,
                b"c" => {
                    if let Some(c) = cell.take() {
                        let value = cell_value(&c, shared);
                        if row.len() <= c.col {
                            row.resize(c.col + 1, String::new());
                        }
                        row[c.col] = value;
                        next_col = c.col + 1;
                    }
                }
                b"row" => rows.push(std::mem::take(&mut row)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}

fn cell_value(cell: &Cell, shared: &[String]) -> String {
    match cell.kind.as_deref() {
        Some("s") => cell
            .raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i).cloned())
            .unwrap_or_default(),
        Some("b") => match cell.raw.trim() {
            "1" => "true".to_string(),
            _ => "false".to_string(),
        },
        _ => cell.raw.clone(),
    }
}

fn grid_to_records(grid: Vec<Vec<String>>) -> Vec<RowRecord> {
    let mut rows = grid
        .into_iter()
        .filter(|r| r.iter().any(|v| !v.trim().is_empty()));

    let headers = match rows.next() {
        Some(h) => h,
        None => return Vec::new(),
    };

    rows.map(|r| {
        let mut rec = RowRecord::new();
        for (i, h) in headers.iter().enumerate() {
            if h.trim().is_empty() {
                continue;
            }
            rec.insert(h.clone(), r.get(i).cloned().unwrap_or_default());
        }
        rec
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Build a minimal workbook with one sheet at a non-default path.
    pub(crate) fn build_workbook(shared: &[&str], sheet_data: &str) -> Vec<u8> {
        let workbook = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Highlights" sheetId="1" r:id="rId7"/></sheets></workbook>"#;
        let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="styles" Target="styles.xml"/>
<Relationship Id="rId7" Type="worksheet" Target="worksheets/highlights.xml"/>
</Relationships>"#;
        let sst: String = shared
            .iter()
            .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", s))
            .collect();
        let sst = format!(
            "<?xml version=\"1.0\"?><sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">{}</sst>",
            sst
        );
        let sheet = format!(
            "<?xml version=\"1.0\"?><worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>{}</sheetData></worksheet>",
            sheet_data
        );

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        for (name, body) in [
            ("xl/workbook.xml", workbook.to_string()),
            ("xl/_rels/workbook.xml.rels", rels.to_string()),
            ("xl/sharedStrings.xml", sst),
            ("xl/worksheets/highlights.xml", sheet),
        ] {
            zip.start_file(name, opts).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("Z9"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("12"), None);
        assert_eq!(column_index("XFD1"), Some(MAX_COLUMN));
        assert_eq!(column_index("XFE1"), None);
        assert_eq!(column_index("ZZZZZZZZZZZZZZ2"), None);
    }

    #[test]
    fn test_out_of_range_cell_ref_is_an_error() {
        let data = r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>
<row r="2"><c r="ZZZZZZZZZZZZZZ2" t="s"><v>1</v></c></row>"#;
        let bytes = build_workbook(&["Title", "Lost"], data);
        assert!(read_first_sheet(&bytes).is_err());

        let data = r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="XFE1"/></row>"#;
        let bytes = build_workbook(&["Title"], data);
        assert!(read_first_sheet(&bytes).is_err());
    }

    #[test]
    fn test_reads_shared_inline_and_sparse_cells() {
        let data = r#"
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row>
<row r="2"><c r="A2" t="s"><v>3</v></c><c r="C2"><v>2021</v></c></row>
<row r="3"/>
<row r="4"><c r="A4" t="inlineStr"><is><t>Second &amp; last</t></is></c><c r="B4" t="s"><v>4</v></c><c r="C4" t="str"><v>2019</v></c></row>
"#;
        let bytes = build_workbook(&["Title", "\tAuthors", "Year", "First paper", "JB Kinney"], data);
        let rows: Vec<RowRecord> = read_first_sheet(&bytes)
            .unwrap()
            .iter()
            .map(RowRecord::normalized)
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Title"), "First paper");
        assert_eq!(rows[0].get("Authors"), "");
        assert_eq!(rows[0].get("Year"), "2021");
        assert_eq!(rows[1].get("Title"), "Second & last");
        assert_eq!(rows[1].get("Authors"), "JB Kinney");
        assert_eq!(rows[1].get("Year"), "2019");
    }

    #[test]
    fn test_matches_equivalent_csv() {
        let data = r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2" t="s"><v>3</v></c></row>"#;
        let bytes = build_workbook(&["Name", "Section", "Ada, Jr.", "Staff"], data);
        let from_xlsx = read_first_sheet(&bytes).unwrap();
        let from_csv = crate::tabular::parse_csv("Name,Section\n\"Ada, Jr.\",Staff");
        assert_eq!(from_xlsx, from_csv);
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(read_first_sheet(b"Title,Authors\nnot,a workbook").is_err());
    }
}
