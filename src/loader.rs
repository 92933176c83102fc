//! Reads brokerage CSV exports of unknown text encoding and delimiter.

use std::{fmt, path::Path};

use anyhow::Error;
use csv::ReaderBuilder;
use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

use crate::{normalize::Column, Result};

const DELIMITERS: [u8; 3] = [b'\t', b';', b','];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-16 with byte-order detection, little-endian when there is no BOM.
    Utf16,
    Utf16Le,
    Utf8,
    /// Maps every byte, so it must stay last. Also covers latin-1 input,
    /// which differs only in the rarely used 0x80-0x9F range.
    Windows1252,
}

impl TextEncoding {
    /// Order in which encodings are tried; Nordnet exports are UTF-16.
    pub const CANDIDATES: [TextEncoding; 4] = [
        TextEncoding::Utf16,
        TextEncoding::Utf16Le,
        TextEncoding::Utf8,
        TextEncoding::Windows1252,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "cp1252",
        }
    }

    /// Strict decoding: `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let decoded = match self {
            TextEncoding::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => {
                    UTF_16LE.decode_without_bom_handling_and_without_replacement(rest)
                }
                [0xFE, 0xFF, rest @ ..] => {
                    UTF_16BE.decode_without_bom_handling_and_without_replacement(rest)
                }
                _ => UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes),
            },
            TextEncoding::Utf16Le => {
                UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            TextEncoding::Windows1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
        };
        decoded.map(|text| text.into_owned())
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed input file, cells as raw strings.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub source: String,
    pub encoding: TextEncoding,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Picks the candidate delimiter occurring most often in the header line.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for d in DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == d).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

/// Parses decoded text. Returns `None` unless the header names at least one
/// known column, which is how a wrong encoding guess is detected.
pub fn parse_table(text: &str) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text.lines().find(|l| !l.trim().is_empty())?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(sniff_delimiter(header_line))
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .ok()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if !headers.iter().any(|h| Column::from_header(h).is_some()) {
        return None;
    }

    let rows = rdr
        .records()
        .filter_map(|r| r.ok())
        .filter(|r| r.len() <= headers.len())
        .map(|r| r.iter().map(String::from).collect())
        .collect();
    Some((headers, rows))
}

pub fn read_table(source: &str, bytes: &[u8]) -> Option<CsvTable> {
    TextEncoding::CANDIDATES.into_iter().find_map(|encoding| {
        let text = encoding.decode(bytes)?;
        let (headers, rows) = parse_table(&text)?;
        Some(CsvTable {
            source: source.to_string(),
            encoding,
            headers,
            rows,
        })
    })
}

/// Loads every readable file in `paths`. Unreadable files are reported and
/// skipped; it is an error only when none could be read.
pub fn load_csv_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<CsvTable>> {
    let mut tables = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        if !path.exists() {
            println!("✗ File not found: {}", path.display());
            continue;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("✗ Could not read {file_name}: {e}");
                continue;
            }
        };
        match read_table(&file_name, &bytes) {
            Some(table) => {
                println!(
                    "✓ {}: {} rows (encoding: {})",
                    file_name,
                    table.rows.len(),
                    table.encoding
                );
                tables.push(table);
            }
            None => println!("✗ Could not read {file_name} with any encoding"),
        }
    }

    if tables.is_empty() {
        return Err(Error::msg("no CSV files could be read"));
    }
    Ok(tables)
}
