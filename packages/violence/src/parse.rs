//! Positional CSV parsing.
//!
//! The export is strictly positional and unquoted: a literal comma inside a
//! value shifts every following column. Quoting is disabled on the CSV
//! reader so a document parses exactly like splitting each line on `,`.

use std::borrow::Cow;
use std::io::Read;

use memorial_violence_models::RawRecord;

use crate::ViolenceError;

/// Splits one line into a [`RawRecord`].
///
/// Returns `None` when the line has fewer than nine comma-separated fields.
/// Fields are not trimmed.
#[must_use]
pub fn parse_line(line: &str) -> Option<RawRecord> {
    RawRecord::from_fields(line.split(','))
}

/// Rows of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Rows with at least nine fields.
    pub records: Vec<RawRecord>,
    /// Non-blank data lines read (header excluded).
    pub lines_read: u64,
    /// Lines with fewer than nine fields.
    pub lines_dropped: u64,
}

/// Parses a whole document. The first row is a header and is skipped;
/// blank lines are ignored. Bytes that are not valid UTF-8 are replaced
/// rather than failing the whole file.
///
/// # Errors
///
/// Returns [`ViolenceError::Csv`] if the underlying reader fails.
pub fn parse_document<R: Read>(reader: R) -> Result<ParsedDocument, ViolenceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut document = ParsedDocument::default();

    for (index, result) in reader.byte_records().enumerate() {
        let row = result?;
        let fields: Vec<Cow<'_, str>> = row.iter().map(String::from_utf8_lossy).collect();

        if fields.len() == 1 && fields[0].trim().is_empty() {
            continue;
        }

        document.lines_read += 1;

        match RawRecord::from_fields(fields.iter().map(|f| &**f)) {
            Some(record) => document.records.push(record),
            None => {
                log::debug!(
                    "Dropping data row {}: {} fields, expected 9",
                    index + 1,
                    fields.len()
                );
                document.lines_dropped += 1;
            }
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nine_fields() {
        let record =
            parse_line("2024,1,RMS,2927408,Salvador,2024,3,HOMICIDIO DOLOSO,4").unwrap();
        assert_eq!(record.year_label, "2024");
        assert_eq!(record.municipality, "Salvador");
        assert_eq!(record.month, "3");
        assert_eq!(record.category, "HOMICIDIO DOLOSO");
        assert_eq!(record.victims, "4");
    }

    #[test]
    fn rejects_short_line() {
        assert!(parse_line("2024,1,RMS,2927408,Salvador,2024").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn does_not_trim_fields() {
        let record = parse_line("2024,1,RMS,2927408, Salvador,2024,3,X,4").unwrap();
        assert_eq!(record.municipality, " Salvador");
    }

    #[test]
    fn quotes_are_not_special() {
        // A quoted comma still splits, shifting columns.
        let record = parse_line("2024,1,\"RMS,Norte\",2927408,Salvador,2024,3,X,4").unwrap();
        assert_eq!(record.region, "\"RMS");
        assert_eq!(record.municipality, "2927408");
    }

    #[test]
    fn document_skips_header_and_blank_lines() {
        let text = "ANO_1,ID_REGIAO,REGIAO,ID_MUNICIPIO,MUNICIPIO,ANO,MES,GR_NATUREZA,QT_VITIMAS\n\
                    2024,1,RMS,2927408,Salvador,2024,3,HOMICIDIO DOLOSO,4\n\
                    \n\
                    2024,1,RMS,2927408,Salvador\n\
                    2024,1,RMS,2927408,Salvador,2024,4,HOMICIDIO DOLOSO,2\r\n";
        let document = parse_document(text.as_bytes()).unwrap();

        assert_eq!(document.records.len(), 2);
        assert_eq!(document.lines_read, 3);
        assert_eq!(document.lines_dropped, 1);
        assert_eq!(document.records[1].victims, "2");
    }

    #[test]
    fn document_matches_line_parser() {
        let line = "2024,1,\"RMS,Norte\",2927408,Salvador,2024,3,X,4";
        let text = format!("header\n{line}\n");
        let document = parse_document(text.as_bytes()).unwrap();

        assert_eq!(document.records, vec![parse_line(line).unwrap()]);
    }

    #[test]
    fn document_tolerates_invalid_utf8() {
        let mut bytes = b"h\n2024,1,RMS,2927408,Salvador,2024,3,HOMIC".to_vec();
        bytes.push(0xCD);
        bytes.extend_from_slice(b"DIO,4\n");
        let document = parse_document(bytes.as_slice()).unwrap();

        assert_eq!(document.records.len(), 1);
        assert_eq!(document.records[0].municipality, "Salvador");
    }
}
