//! Office Open XML package helpers
use crate::error::SheetStatsError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use zip::ZipArchive;

const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of OLE compound files. Encrypted workbooks are wrapped in one
/// instead of the usual zip container.
const COMPOUND_FILE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Loads worksheet relationships of a package part.
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths inside the archive
pub(super) fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
) -> Result<HashMap<String, String>, SheetStatsError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::MissingPart(path.to_owned()))?;
    let mut relationships = HashMap::<String, String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.attribute("Id")?;
            let kind = event.attribute("Type")?;
            let target = event.attribute("Target")?;
            if kind.map(|kind| kind.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.into_owned(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Maps each cell style to a cell type using custom and built-in number formats.
pub(super) fn resolve_number_formats(
    style_format_ids: Vec<String>,
    custom_formats: HashMap<String, CellType>,
    is_1904: bool,
) -> Vec<CellType> {
    style_format_ids
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect()
}

/// Turns a relationship target into a path inside the archive.
pub(super) fn to_zip_path(target: &str) -> String {
    if let Some(path) = target.strip_prefix('/') {
        path.to_owned()
    } else if target.starts_with("xl/") {
        target.to_owned()
    } else {
        format!("xl/{target}")
    }
}

/// Checks for the compound file signature, restoring the read position afterwards.
pub(super) fn is_password_protected<R: Read + Seek>(reader: &mut R) -> Result<bool, SheetStatsError> {
    let mut signature = [0u8; 8];
    let protected = match reader.read_exact(&mut signature) {
        Ok(()) => signature == COMPOUND_FILE_SIGNATURE,
        Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(error) => Err(error)?,
    };
    reader.seek(SeekFrom::Start(0))?;
    Ok(protected)
}
