//! Thin layer over `quick_xml` used by the workbook loader.
//! Wraps the pull reader and adds attribute and text accessors.

use crate::error::SheetStatsError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

/// Errors raised while decoding XML content.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown XML entity '&{0};'")]
    UnknownEntity(String),

    #[error("Invalid character reference '&{0};'")]
    InvalidCharacterReference(String),
}

/// Pull reader over one XML part of a workbook.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(source: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // `<v/>` and `<v></v>` must look the same to the cell parser
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Returns the next event, or None at end of document.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SheetStatsError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

/// Attribute lookup on start tags.
pub(crate) trait XmlNodeHelper<'a> {
    /// Gets the unescaped value of the attribute with the given qualified name.
    fn attribute(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetStatsError>;

    /// Gets an attribute by local name, ignoring its namespace prefix.
    fn local_attribute(&'a self, local_name: &str) -> Result<Option<Cow<'a, str>>, SheetStatsError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn attribute(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetStatsError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }

    fn local_attribute(&'a self, local_name: &str) -> Result<Option<Cow<'a, str>>, SheetStatsError> {
        for result in self.attributes() {
            let attribute = result?;
            if attribute.key.local_name().as_ref() == local_name.as_bytes() {
                return Ok(Some(attribute.unescape_value()?));
            }
        }
        Ok(None)
    }
}

/// Accumulates text content split across text and reference events.
pub(crate) trait XmlTextHelper {
    /// Appends the character an entity or character reference stands for.
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SheetStatsError>;
}

impl XmlTextHelper for String {
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SheetStatsError> {
        let raw = reference.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => number.parse::<u32>(),
            };
            match code.ok().and_then(char::from_u32) {
                Some(character) => self.push(character),
                None => Err(XmlError::InvalidCharacterReference(raw.to_string()))?,
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::UnknownEntity(raw.to_string()))?
        }
        Ok(())
    }
}

/// Drives an [`XmlReader`] to the end of its document, dispatching each event
/// to the given match arms. Unmatched events are skipped.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next()? {
            match event {
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::name::QName;

    fn read_text(xml: &str) -> String {
        let mut reader = XmlReader::new(xml.as_bytes());
        let mut text = String::new();
        let result: Result<(), SheetStatsError> = (|| {
            match_xml_events!(reader => {
                Event::Text(event) => text.push_str(&event.xml_content()?),
                Event::GeneralRef(event) => text.push_reference(&event)?,
            });
            Ok(())
        })();
        result.unwrap();
        text
    }

    #[test]
    fn text_with_references() {
        assert_eq!(read_text("<t>a &amp; b &#65;&#x42;</t>"), "a & b AB");
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let mut reader = XmlReader::new("<t>&bogus;</t>".as_bytes());
        let mut text = String::new();
        let result: Result<(), SheetStatsError> = (|| {
            match_xml_events!(reader => {
                Event::GeneralRef(event) => text.push_reference(&event)?,
            });
            Ok(())
        })();
        assert!(matches!(
            result,
            Err(SheetStatsError::XmlHelperError(XmlError::UnknownEntity(_)))
        ));
    }

    #[test]
    fn attributes() {
        let mut reader = XmlReader::new(r#"<sheet name="A &amp; B" r:id="rId1"/>"#.as_bytes());
        let mut found = None;
        let result: Result<(), SheetStatsError> = (|| {
            match_xml_events!(reader => {
                Event::Start(event) if event.name() == QName(b"sheet") => {
                    found = Some((
                        event.attribute("name")?.map(Cow::into_owned),
                        event.local_attribute("id")?.map(Cow::into_owned),
                        event.attribute("missing")?.map(Cow::into_owned),
                    ));
                }
            });
            Ok(())
        })();
        result.unwrap();
        assert_eq!(
            found,
            Some((Some("A & B".to_owned()), Some("rId1".to_owned()), None))
        );
    }
}
