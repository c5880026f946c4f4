//! Lookup of workbook parts inside the `.xlsx` zip container.

use crate::error::SheetStatsError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Opens a part by path. Matching ignores ASCII case and accepts `\` separators.
    fn part(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetStatsError>;

    /// Opens a part as an XML event stream.
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetStatsError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn part(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetStatsError> {
        let wanted = name.replace('\\', "/");
        let Some(path) = self
            .file_names()
            .find(|file_name| wanted.eq_ignore_ascii_case(&file_name.replace('\\', "/")))
            .map(str::to_owned)
        else {
            return Ok(None);
        };
        match self.by_name(&path) {
            Ok(file) => Ok(Some(file)),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetStatsError> {
        Ok(self
            .part(name)?
            .map(|file| XmlReader::new(BufReader::new(file))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive() -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("xl/Workbook.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<workbook/>").unwrap();
        let cursor = writer.finish().unwrap();
        ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn part_lookup_ignores_case_and_separator() {
        let mut zip = archive();
        let mut content = String::new();
        zip.part("XL\\workbook.xml")
            .unwrap()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<workbook/>");
        assert!(zip.part("xl/styles.xml").unwrap().is_none());
        assert!(zip.xml_reader("xl/styles.xml").unwrap().is_none());
    }
}
