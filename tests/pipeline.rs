//! End-to-end conversion tests over workbooks built in memory.
//!
//! Run with: cargo test --test pipeline

use std::io::{Cursor, Write};
use xlsx2xml::render::{parse_xml, to_xml};
use xlsx2xml::transform::grid_to_element;
use xlsx2xml::{
    convert_bytes, load_grid, CellValue, Converter, Element, Error, ErrorKind, Grid, GridRow,
    Stage, XmlOptions,
};
use zip::write::SimpleFileOptions;

const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// A sheet to place in a synthetic workbook.
struct TestSheet<'a> {
    name: &'a str,
    part: &'a str,
    sheet_data: &'a str,
}

/// Build an XLSX package with the given sheets, in workbook order.
fn build_workbook(sheets: &[TestSheet<'_>], shared_strings: Option<&[&str]>) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="{}"/>
</Types>"#,
        WORKBOOK_CONTENT_TYPE
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    )
    .unwrap();

    let mut sheet_entries = String::new();
    let mut rels = String::new();
    for (idx, sheet) in sheets.iter().enumerate() {
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rIdS{}"/>"#,
            sheet.name,
            idx + 1,
            idx
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rIdS{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/{}"/>"#,
            idx, sheet.part
        ));
    }
    if shared_strings.is_some() {
        rels.push_str(r#"<Relationship Id="rIdSST" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#);
    }

    zip.start_file("xl/workbook.xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>{}</sheets>
</workbook>"#,
        sheet_entries
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        rels
    )
    .unwrap();

    for sheet in sheets {
        zip.start_file(format!("xl/worksheets/{}", sheet.part), options)
            .unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            sheet.sheet_data
        )
        .unwrap();
    }

    if let Some(strings) = shared_strings {
        let items: String = strings
            .iter()
            .map(|s| format!("<si><t xml:space=\"preserve\">{}</t></si>", s))
            .collect();
        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
            strings.len(),
            items
        )
        .unwrap();
    }

    zip.finish().unwrap();
    buffer
}

fn single_sheet(sheet_data: &str, shared_strings: Option<&[&str]>) -> Vec<u8> {
    build_workbook(
        &[TestSheet {
            name: "Sheet1",
            part: "sheet1.xml",
            sheet_data,
        }],
        shared_strings,
    )
}

fn leaf_texts(row: &Element) -> Vec<&str> {
    row.children.iter().map(|c| c.text().unwrap_or("<container>")).collect()
}

#[test]
fn test_concrete_workbook() {
    let data = single_sheet(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c></row>"#,
        Some(&["a", "b", "c"]),
    );

    let xml = convert_bytes(&data).unwrap();
    assert_eq!(
        xml,
        "<?xml version=\"1.0\"?>\n\
         <root>\n  \
           <row>\n    \
             <column0>a</column0>\n    \
             <column1>b</column1>\n  \
           </row>\n  \
           <row>\n    \
             <column0>c</column0>\n  \
           </row>\n\
         </root>\n"
    );
    assert_eq!(xml.matches("<row>").count(), 2);
}

#[test]
fn test_first_sheet_by_position() {
    let data = build_workbook(
        &[
            TestSheet {
                name: "Zeta",
                part: "sheet2.xml",
                sheet_data: r#"<row r="1"><c r="A1" t="inlineStr"><is><t>first</t></is></c></row>"#,
            },
            TestSheet {
                name: "Alpha",
                part: "sheet1.xml",
                sheet_data: r#"<row r="1"><c r="A1" t="inlineStr"><is><t>second</t></is></c></row>"#,
            },
        ],
        None,
    );

    let grid = load_grid(&data).unwrap();
    assert_eq!(grid.rows[0].cells, vec![CellValue::text("first")]);

    let workbook = xlsx2xml::xlsx::Workbook::from_bytes(data).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Zeta", "Alpha"]);
    assert_eq!(workbook.first_sheet_name(), Some("Zeta"));
}

#[test]
fn test_header_row_is_ordinary_data() {
    let data = single_sheet(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>30</v></c></row>"#,
        Some(&["Name", "Age", "Ann"]),
    );

    let root = parse_xml(&convert_bytes(&data).unwrap()).unwrap();
    assert_eq!(root.children.len(), 2);
    assert_eq!(leaf_texts(&root.children[0]), vec!["Name", "Age"]);
    assert_eq!(leaf_texts(&root.children[1]), vec!["Ann", "30"]);
}

#[test]
fn test_empty_sheet() {
    let data = single_sheet("", None);

    let grid = load_grid(&data).unwrap();
    assert!(grid.is_empty());

    let xml = convert_bytes(&data).unwrap();
    assert_eq!(xml, "<?xml version=\"1.0\"?>\n<root/>\n");
}

#[test]
fn test_ragged_sheet() {
    let data = single_sheet(
        r#"<row r="1"><c r="A1"><v>1</v></c><c r="B1"><v>2</v></c><c r="C1"><v>3</v></c></row>
<row r="2"><c r="A2"><v>4</v></c></row>
<row r="4"><c r="A4"><v>5</v></c></row>"#,
        None,
    );

    let root = parse_xml(&convert_bytes(&data).unwrap()).unwrap();
    let counts: Vec<usize> = root.children.iter().map(|r| r.children.len()).collect();
    assert_eq!(counts, vec![3, 1, 0, 1]);
}

#[test]
fn test_value_types() {
    let data = single_sheet(
        r#"<row r="1">
<c r="A1"><v>1.50</v></c>
<c r="B1"><v>1E3</v></c>
<c r="C1" t="b"><v>1</v></c>
<c r="E1" t="e"><v>#N/A</v></c>
<c r="F1" t="str"><f>1/0</f><v>text</v></c>
</row>"#,
        None,
    );

    let root = parse_xml(&convert_bytes(&data).unwrap()).unwrap();
    assert_eq!(
        leaf_texts(&root.children[0]),
        vec!["1.5", "1000", "true", "", "", "text"]
    );
}

#[test]
fn test_escaping_through_pipeline() {
    let data = single_sheet(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
        Some(&["a &lt; b &amp; c", "say &quot;hi&quot; &apos;there&apos; &gt;"]),
    );

    let xml = convert_bytes(&data).unwrap();
    assert!(xml.contains("<column0>a &lt; b &amp; c</column0>"));
    assert!(xml.contains("<column1>say &quot;hi&quot; &apos;there&apos; &gt;</column1>"));

    let root = parse_xml(&xml).unwrap();
    assert_eq!(
        leaf_texts(&root.children[0]),
        vec!["a < b & c", r#"say "hi" 'there' >"#]
    );
}

#[test]
fn test_roundtrip_property() {
    let grids = vec![
        Grid::new(),
        Grid::from_text_rows(&[&["a", "b"], &["c"]]),
        Grid::from_text_rows(&[&["1", "2", "3"], &["4"], &[]]),
        Grid::from_text_rows(&[&[], &[], &["only"]]),
        Grid::from_text_rows(&[&["<&>\"'", "  padded  ", "multi\nline"]]),
        Grid {
            rows: vec![GridRow {
                cells: vec![
                    CellValue::Empty,
                    CellValue::Number(-2.25),
                    CellValue::Bool(false),
                    CellValue::text("crlf\r\nkept"),
                ],
            }],
        },
    ];

    for options in [XmlOptions::default(), XmlOptions::compact()] {
        for grid in &grids {
            let tree = grid_to_element(grid);

            assert_eq!(tree.children.len(), grid.row_count());
            for (row, element) in grid.rows.iter().zip(&tree.children) {
                assert_eq!(element.name, "row");
                assert_eq!(element.children.len(), row.len());
                for (n, (cell, leaf)) in row.cells.iter().zip(&element.children).enumerate() {
                    assert_eq!(leaf.name, format!("column{}", n));
                    assert_eq!(leaf.text(), Some(cell.to_string().as_str()));
                }
            }

            let xml = to_xml(&tree, &options).unwrap();
            assert_eq!(parse_xml(&xml).unwrap(), tree);
        }
    }
}

#[test]
fn test_progress_events_for_workbook() {
    let data = single_sheet(
        r#"<row r="1"><c r="A1"><v>1</v></c></row><row r="2"><c r="A2"><v>2</v></c></row>"#,
        None,
    );

    let mut stages = Vec::new();
    let conversion = Converter::new()
        .with_progress(|p| stages.push(p.stage))
        .convert(&data)
        .unwrap();

    assert_eq!(conversion.rows, 2);
    assert_eq!(
        stages,
        vec![
            Stage::Loading,
            Stage::Transforming,
            Stage::Transforming,
            Stage::Serializing,
            Stage::Done
        ]
    );
}

#[test]
fn test_convert_file() {
    let data = single_sheet(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>x</t></is></c></row>"#, None);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.xlsx");
    std::fs::write(&input, &data).unwrap();

    let xml = xlsx2xml::convert_file(&input).unwrap();
    assert!(xml.contains("<column0>x</column0>"));
    assert_eq!(
        xlsx2xml::detect_format_from_path(&input).unwrap(),
        xlsx2xml::FormatType::Xlsx
    );
}

#[test]
fn test_parse_errors() {
    // Not a container at all
    let err = convert_bytes(b"name,age\nann,30\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    // Truncated ZIP
    let data = single_sheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#, None);
    let err = convert_bytes(&data[..data.len() / 2]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    // Workbook with no sheets
    let data = build_workbook(&[], None);
    let err = convert_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::MissingSheet));
}

#[test]
fn test_missing_sheet_part() {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        write!(
            zip,
            r#"<Types><Override PartName="/xl/workbook.xml" ContentType="{}"/></Types>"#,
            WORKBOOK_CONTENT_TYPE
        )
        .unwrap();
        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(br#"<workbook><sheets><sheet name="Gone" sheetId="1" r:id="rId1"/></sheets></workbook>"#)
            .unwrap();
        zip.finish().unwrap();
    }

    let err = convert_bytes(&buffer).unwrap_err();
    assert!(matches!(err, Error::MissingComponent(_)));
    assert!(err.is_parse_error());
}
