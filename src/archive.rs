//! ZIP container abstraction over a presentation archive.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Read-only view of a ZIP-structured presentation file.
///
/// The whole archive is buffered in memory; the handle is released when
/// the value is dropped, on success and failure paths alike.
pub struct PresentationArchive {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl PresentationArchive {
    /// Open a presentation archive from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slidetime::archive::PresentationArchive;
    ///
    /// let archive = PresentationArchive::open("deck.pptx")?;
    /// # Ok::<(), slidetime::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Create a presentation archive from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create a presentation archive from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// List all entry names in the archive, in its internal order.
    pub fn entry_names(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Read a named entry and decode it as XML text.
    ///
    /// Handles UTF-8 (with or without BOM) and BOM-marked UTF-16 LE/BE,
    /// the encodings seen in real OOXML packages.
    pub fn read_entry(&self, name: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(name)
            .map_err(|e| Error::slide_parse(name, e))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::slide_parse(name, e))?;

        decode_xml_text(&bytes).map_err(|reason| Error::slide_parse(name, reason))
    }
}

impl std::fmt::Debug for PresentationArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationArchive")
            .field("entries", &self.archive.borrow().len())
            .finish()
    }
}

/// Decode raw XML bytes, honoring a leading BOM.
fn decode_xml_text(bytes: &[u8]) -> std::result::Result<String, String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).map_err(|e| e.to_string())
        }
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    // Ignore a trailing odd byte
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| from_bytes([bytes[i], bytes[i + 1]]));
    let content: String = char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| e.to_string())?;
    // The declaration still claims UTF-16 after decoding; fix it so the
    // XML reader does not try to re-interpret the text.
    Ok(fix_encoding_declaration(&content))
}

fn fix_encoding_declaration(content: &str) -> String {
    if let Some(end) = content.find("?>") {
        if content.starts_with("<?xml") {
            let (decl, rest) = content.split_at(end + 2);
            let fixed = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{}{}", fixed, rest);
        }
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive_with(entries: &[(&str, &[u8])]) -> PresentationArchive {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content).unwrap();
        }
        let cursor = zip.finish().unwrap();
        PresentationArchive::from_bytes(cursor.into_inner()).unwrap()
    }

    #[test]
    fn test_open_rejects_garbage() {
        let err = PresentationArchive::from_bytes(b"not a zip at all".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_open_rejects_missing_file() {
        let err = PresentationArchive::open("no/such/file.pptx").unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_entry_names_and_read() {
        let archive = archive_with(&[
            ("ppt/slides/slide1.xml", b"<p:sld/>".as_slice()),
            ("ppt/presentation.xml", b"<p:presentation/>".as_slice()),
        ]);
        let names = archive.entry_names();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n == "ppt/slides/slide1.xml"));

        let xml = archive.read_entry("ppt/slides/slide1.xml").unwrap();
        assert_eq!(xml, "<p:sld/>");
    }

    #[test]
    fn test_read_missing_entry() {
        let archive = archive_with(&[("a.xml", b"<a/>".as_slice())]);
        let err = archive.read_entry("b.xml").unwrap_err();
        assert!(matches!(err, Error::SlideParse { .. }));
    }

    #[test]
    fn test_decode_utf8_bom() {
        assert_eq!(decode_xml_text(b"\xEF\xBB\xBF<a/>").unwrap(), "<a/>");
    }

    #[test]
    fn test_decode_utf16_le_bom() {
        let decoded = decode_xml_text(b"\xFF\xFE<\0a\0/\0>\0").unwrap();
        assert_eq!(decoded, "<a/>");
    }

    #[test]
    fn test_decode_utf16_be_bom() {
        let decoded = decode_xml_text(b"\xFE\xFF\0<\0a\0/\0>").unwrap();
        assert_eq!(decoded, "<a/>");
    }

    #[test]
    fn test_decode_fixes_utf16_declaration() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_text(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }
}
