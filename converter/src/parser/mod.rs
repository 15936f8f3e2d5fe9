//! Delimited text reader with encoding and delimiter auto-detection.
//!
//! Reads the vendor export and the template header. Vendor exports arrive as
//! UTF-8, Latin-1 or Windows-1252 with `,` or `;` separators depending on the
//! spreadsheet that produced them.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{InputRecord, InputTable, TemplateSchema};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed header and rows
    pub table: InputTable,
    /// Detected encoding
    pub encoding: String,
    /// Detected or forced delimiter
    pub delimiter: u8,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding. A leading BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoder = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        // Anything else is read as UTF-8, invalid sequences replaced
        _ => encoding_rs::UTF_8,
    };
    decoder.decode(bytes).0.into_owned()
}

/// Detect the delimiter by counting occurrences in the header line
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [b',', b';', b'\t', b'|'];
    let mut best_sep = b',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse decoded CSV text into a table.
///
/// Header names are trimmed; cell values are kept verbatim except that empty
/// cells and cells equal to one of `null_tokens` become null. Short rows are
/// padded with nulls, extra cells ignored.
pub fn parse_str(content: &str, delimiter: u8, null_tokens: &[String]) -> CsvResult<InputTable> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(InputRecord::from_cells(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), row.get(i).unwrap_or("").to_string())),
            null_tokens,
        ));
    }

    Ok(InputTable { headers, records })
}

/// Parse CSV bytes with auto-detection of encoding, and of the delimiter
/// unless one is given.
pub fn parse_bytes(
    bytes: &[u8],
    delimiter: Option<u8>,
    null_tokens: &[String],
) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_str(&content, delimiter, null_tokens)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a CSV file with auto-detection.
///
/// # Example
/// ```ignore
/// let tables = LookupTables::default();
/// let result = parse_file(Path::new("menu_export.csv"), None, &tables.null_tokens)?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter as char);
/// println!("Rows: {}", result.table.len());
/// ```
pub fn parse_file(
    path: &Path,
    delimiter: Option<u8>,
    null_tokens: &[String],
) -> CsvResult<ParseResult> {
    let bytes = read_bytes(path)?;
    parse_bytes(&bytes, delimiter, null_tokens)
}

/// Read the template header. Rows below the header are ignored.
pub fn read_template(path: &Path) -> CsvResult<TemplateSchema> {
    let bytes = read_bytes(path)?;
    template_from_bytes(&bytes)
}

/// Template header from raw bytes.
pub fn template_from_bytes(bytes: &[u8]) -> CsvResult<TemplateSchema> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let header_line = content.lines().next().unwrap_or("");
    if header_line.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let table = parse_str(header_line, detect_delimiter(header_line), &[])?;
    Ok(TemplateSchema::new(table.headers))
}

fn read_bytes(path: &Path) -> CsvResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupTables;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("ItemNameInternal,SupplierRrp\nBurger,10.5\nFries,3", b',', &[]).unwrap();

        assert_eq!(table.headers, vec!["ItemNameInternal", "SupplierRrp"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("ItemNameInternal"), Some("Burger"));
        assert_eq!(table.records[1].get("SupplierRrp"), Some("3"));
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "DescCust,Allergens\n\"Bun, patty, cheese\",Gluten|Dairy";
        let table = parse_str(csv, b',', &[]).unwrap();

        assert_eq!(table.records[0].get("DescCust"), Some("Bun, patty, cheese"));
        assert_eq!(table.records[0].get("Allergens"), Some("Gluten|Dairy"));
    }

    #[test]
    fn test_missing_values_are_null() {
        let table = parse_str("a;b;c\n1;;3\n4", b';', &[]).unwrap();

        assert_eq!(table.records[0].get("b"), None);
        assert_eq!(table.records[0].get("c"), Some("3"));
        assert_eq!(table.records[1].get("a"), Some("4"));
        assert_eq!(table.records[1].get("c"), None);
    }

    #[test]
    fn test_null_tokens_become_null() {
        let tables = LookupTables::default();
        let csv = "ItemNameInternal,DescCust,FlavourName,SupplierRrp\nBurger,N/A,NA,nan\nNA Burger,n/a,NULL,10";
        let table = parse_str(csv, b',', &tables.null_tokens).unwrap();

        assert_eq!(table.records[0].get("ItemNameInternal"), Some("Burger"));
        assert_eq!(table.records[0].get("DescCust"), None);
        assert_eq!(table.records[0].get("FlavourName"), None);
        assert_eq!(table.records[0].get("SupplierRrp"), None);
        assert_eq!(table.records[1].get("ItemNameInternal"), Some("NA Burger"));
        assert_eq!(table.records[1].get("DescCust"), None);
        assert_eq!(table.records[1].get("FlavourName"), None);
    }

    #[test]
    fn test_null_tokens_off() {
        let table = parse_str("DescCust\nN/A", b',', &[]).unwrap();
        assert_eq!(table.records[0].get("DescCust"), Some("N/A"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let table = parse_str("a,b\n1,2,3,4", b',', &[]).unwrap();
        assert_eq!(table.records[0].get("a"), Some("1"));
        assert_eq!(table.records[0].get("b"), Some("2"));
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse_str("", b',', &[]).unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a,b,c\n1|2|3"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "ItemNameInternal;ItemStatus\nBurger;Active";
        let result = parse_bytes(csv.as_bytes(), None, &[]).unwrap();

        assert_eq!(result.delimiter, b';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.headers, vec!["ItemNameInternal", "ItemStatus"]);
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFName*,vatRate\n";
        let schema = template_from_bytes(bytes).unwrap();
        assert_eq!(schema.columns(), &["Name*".to_string(), "vatRate".to_string()]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Crème" in ISO-8859-1
        let bytes: &[u8] = &[0x43, 0x72, 0xE8, 0x6D, 0x65];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Crème");
    }

    #[test]
    fn test_template_ignores_rows() {
        let bytes = b"Name*,Allergen*: Milk,Dietary: Vegan\nexample,TRUE,FALSE\n";
        let schema = template_from_bytes(bytes).unwrap();
        assert_eq!(schema.columns().len(), 3);
        assert!(schema.contains("Allergen*: Milk"));
    }
}
