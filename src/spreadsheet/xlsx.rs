use crate::error::SheetStatsError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt"); // Individual custom number format
const TAG_CELL_STYLES: QName = QName(b"cellXfs"); // Cell styles container
const TAG_CELL_STYLE: QName = QName(b"xf"); // Individual cell style
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic reading, not part of the value
const TAG_TEXT: QName = QName(b"t");
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");

/// An Office Open XML workbook (`.xlsx`, `.xlsm`).
pub(crate) struct XlsxSpreadsheet<RS: Read + Seek = BufReader<File>> {
    /// File name of the workbook
    name: String,
    zip: ZipArchive<RS>,
    /// Cell type of every cell style, indexed by style ID
    number_formats: Vec<CellType>,
    /// Worksheets as (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens a workbook file and reads its structure.
    pub(crate) fn open(path: &Path) -> Result<XlsxSpreadsheet, SheetStatsError> {
        let name = path.display().to_string();
        let file = File::open(path)?;
        Self::from_reader(&name, BufReader::new(file))
    }
}

impl<RS: Read + Seek> XlsxSpreadsheet<RS> {
    /// Reads the workbook structure from any seekable source.
    pub(crate) fn from_reader(name: &str, mut reader: RS) -> Result<XlsxSpreadsheet<RS>, SheetStatsError> {
        if excel::is_password_protected(&mut reader)? {
            Err(SpreadsheetError::PasswordProtected(name.to_owned()))?
        }

        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook(name.to_owned()))?
        }
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        debug!(
            workbook = name,
            sheets = sheets.len(),
            styles = number_formats.len(),
            is_1904,
            "workbook opened"
        );

        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            number_formats,
            sheets,
        })
    }

    /// Loads the shared string table. Workbooks without one have no shared strings.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetStatsError> {
        let mut shared_strings = Vec::<String>::new();
        let Some(mut reader) = self.zip.xml_reader("xl/sharedStrings.xml")? else {
            return Ok(shared_strings);
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
            }
        });
        Ok(shared_strings)
    }
}

impl<RS: Read + Seek> Spreadsheet for XlsxSpreadsheet<RS> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Reads the cells of the selected worksheet.
    ///
    /// Shared strings are resolved while reading, so every text cell of the
    /// returned sheet carries its final value.
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, SheetStatsError> {
        let (sheet_name, zip_path) = match &criteria.sheet_name {
            Some(wanted) => self
                .sheets
                .iter()
                .find(|(name, _)| name == wanted)
                .cloned()
                .ok_or_else(|| SpreadsheetError::SheetNotFound {
                    file: self.name.to_owned(),
                    sheet: wanted.to_owned(),
                    available: self.sheet_names().join(", "),
                })?,
            None => self
                .sheets
                .first()
                .cloned()
                .ok_or_else(|| SpreadsheetError::EmptyWorkbook(self.name.to_owned()))?,
        };
        let shared_strings = self.load_shared_strings()?;

        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self
            .zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::MissingPart(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(index) = event.attribute("r")?.and_then(|r| r.parse::<usize>().ok()) {
                    row_count = index.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event
                    .attribute("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                value.clear();
                kind = match event.attribute("t")?.as_deref() {
                    Some("inlineStr") | Some("str") => CellType::Text,
                    Some("s") => CellType::SharedString,
                    Some("d") => CellType::IsoDateTime,
                    Some("b") => CellType::Boolean,
                    Some("e") if criteria.error_as_null => CellType::Empty,
                    Some("e") => CellType::Error,
                    _ => CellType::Number,
                };
                if kind == CellType::Number {
                    if let Some(style) = event.attribute("s")?.filter(|style| !style.is_empty()) {
                        let index = style.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if kind != CellType::Empty && !value.is_empty() && event.name() == TAG_CELL => {
                match kind {
                    CellType::Error => Err(SpreadsheetError::CellValueError(
                        sheet.file_name.to_owned(),
                        sheet.name.to_owned(),
                        index_to_reference(row, col),
                        value.to_owned(),
                    ))?,
                    CellType::SharedString => {
                        let text = value
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|index| shared_strings.get(index))
                            .ok_or_else(|| SpreadsheetError::CellValueError(
                                sheet.file_name.to_owned(),
                                sheet.name.to_owned(),
                                index_to_reference(row, col),
                                format!("shared string {value}"),
                            ))?;
                        sheet.push(Cell { row, col, kind: CellType::Text, value: text.to_owned() });
                    }
                    _ => sheet.push(Cell { row, col, kind, value: std::mem::take(&mut value) }),
                }
                kind = CellType::default();
            }
        });
        debug!(
            sheet = %sheet.name,
            cells = sheet.cells.len(),
            first_row = ?sheet.row_lower_bound,
            last_row = ?sheet.row_upper_bound,
            "worksheet read"
        );
        Ok(sheet)
    }
}

/// Loads worksheet names and paths from `xl/workbook.xml`, plus the date system flag.
fn load_workbook<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<(Vec<(String, String)>, bool), SheetStatsError> {
    let relationships = excel::load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::MissingPart("xl/workbook.xml".to_owned()))?;
    let mut sheets = Vec::<(String, String)>::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let name = event.attribute("name")?;
            let id = event.local_attribute("id")?;
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.into_owned(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event
                .attribute("date1904")?
                .map(|value| value == "1" || value == "true")
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads the cell type of every cell style from `xl/styles.xml`.
fn load_number_formats<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    is_1904: bool,
) -> Result<Vec<CellType>, SheetStatsError> {
    let Some(mut reader) = zip.xml_reader("xl/styles.xml")? else {
        return Ok(Vec::new());
    };

    let mut in_custom_formats = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut in_cell_styles = false;
    let mut style_format_ids = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => in_custom_formats = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => in_custom_formats = false,
        Event::Start(event) if in_custom_formats && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.attribute("numFmtId")?;
            let format = event.attribute("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.into_owned(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_CELL_STYLES => in_cell_styles = true,
        Event::End(event) if event.name() == TAG_CELL_STYLES => in_cell_styles = false,
        Event::Start(event) if in_cell_styles && event.name() == TAG_CELL_STYLE => {
            let id = event.attribute("numFmtId")?;
            style_format_ids.push(id.map(|id| id.into_owned()).unwrap_or_default());
        }
    });

    Ok(excel::resolve_number_formats(style_format_ids, custom_formats, is_1904))
}

/// Reads the text of a string item up to `end_tag`, skipping phonetic runs.
///
/// With `is_text_content` set, text directly inside the element counts;
/// otherwise only text inside `<t>` elements does.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetStatsError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_reference(&event)?,
    });
    Ok(text)
}
