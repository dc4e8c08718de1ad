//! FITS binary table reader
//!
//! Decodes the `FitsDisplay` answer of the batch interface: a primary HDU
//! without data followed by a `BINTABLE` extension holding the matched rows.
//! Only fixed-width column formats are supported.

use std::borrow::Cow;

use tracing::debug;

use super::{Column, Table, Value};
use crate::constants::fits::{BINTABLE, BLOCK_SIZE, CARD_SIZE, MAX_FIELDS};
use crate::errors::{TableError, TableResult};

/// Parsed header keyword value
#[derive(Debug, Clone, PartialEq)]
enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug, Default)]
struct Header {
    cards: Vec<(String, HeaderValue)>,
}

impl Header {
    /// Parses the header starting at `offset`, returning it with its padded length
    fn parse(data: &[u8], offset: usize) -> TableResult<(Self, usize)> {
        let mut header = Header::default();
        let mut position = offset;

        loop {
            let end = position + CARD_SIZE;
            if end > data.len() {
                return Err(TableError::Truncated {
                    expected: end,
                    actual: data.len(),
                });
            }

            let card = String::from_utf8_lossy(&data[position..end]).into_owned();
            position = end;

            let keyword = card.get(..8).unwrap_or(card.as_str()).trim_end();
            if keyword == "END" {
                break;
            }

            if card.get(8..10) == Some("= ") {
                if let Some(value) = parse_value(&card[10..]) {
                    header.cards.push((keyword.to_string(), value));
                }
            }
        }

        Ok((header, padded(position - offset)?))
    }

    fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v)
    }

    fn get_int(&self, keyword: &str) -> Option<i64> {
        match self.get(keyword)? {
            HeaderValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    fn get_float(&self, keyword: &str) -> Option<f64> {
        match self.get(keyword)? {
            HeaderValue::Integer(v) => Some(*v as f64),
            HeaderValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    fn get_str(&self, keyword: &str) -> Option<&str> {
        match self.get(keyword)? {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn get_bool(&self, keyword: &str) -> Option<bool> {
        match self.get(keyword)? {
            HeaderValue::Logical(b) => Some(*b),
            _ => None,
        }
    }

    fn require_usize(&self, keyword: &str) -> TableResult<usize> {
        let value = self
            .get_int(keyword)
            .ok_or_else(|| TableError::MissingKeyword {
                keyword: keyword.to_string(),
            })?;
        usize::try_from(value).map_err(|_| TableError::InvalidHeader {
            reason: format!("{} must be non-negative, got {}", keyword, value),
        })
    }

    /// Size in bytes of the data unit following this header, without padding
    fn data_size(&self) -> TableResult<usize> {
        let bitpix = self
            .get_int("BITPIX")
            .ok_or_else(|| TableError::MissingKeyword {
                keyword: "BITPIX".to_string(),
            })?;
        let naxis = self.require_usize("NAXIS")?;
        if naxis == 0 {
            return Ok(0);
        }

        let mut elements = 1usize;
        for axis in 1..=naxis {
            let keyword = format!("NAXIS{}", axis);
            elements = elements
                .checked_mul(self.require_usize(&keyword)?)
                .ok_or_else(|| overflow(&keyword))?;
        }

        let pcount = self.get_int("PCOUNT").unwrap_or(0).max(0) as usize;
        let gcount = self.get_int("GCOUNT").unwrap_or(1).max(0) as usize;
        let bytes_per_element = (bitpix.unsigned_abs() / 8) as usize;

        pcount
            .checked_add(elements)
            .and_then(|n| n.checked_mul(gcount))
            .and_then(|n| n.checked_mul(bytes_per_element))
            .ok_or_else(|| overflow("data unit size"))
    }
}

fn overflow(what: &str) -> TableError {
    TableError::InvalidHeader {
        reason: format!("{} overflows the addressable size", what),
    }
}

/// Rounds `len` up to a whole number of blocks
fn padded(len: usize) -> TableResult<usize> {
    len.checked_add(BLOCK_SIZE - 1)
        .map(|n| n / BLOCK_SIZE * BLOCK_SIZE)
        .ok_or_else(|| overflow("padded length"))
}

/// Parses the value field of a card (everything after `"= "`)
fn parse_value(field: &str) -> Option<HeaderValue> {
    let field = field.trim_start();

    if let Some(rest) = field.strip_prefix('\'') {
        let mut text = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    text.push('\'');
                    continue;
                }
                break;
            }
            text.push(c);
        }
        return Some(HeaderValue::Text(text.trim_end().to_string()));
    }

    let raw = field.split('/').next().unwrap_or("").trim();
    match raw {
        "" => None,
        "T" => Some(HeaderValue::Logical(true)),
        "F" => Some(HeaderValue::Logical(false)),
        _ => {
            if let Ok(v) = raw.parse::<i64>() {
                Some(HeaderValue::Integer(v))
            } else if let Ok(v) = raw.replace(['D', 'd'], "E").parse::<f64>() {
                Some(HeaderValue::Real(v))
            } else {
                Some(HeaderValue::Text(raw.to_string()))
            }
        }
    }
}

/// Fixed-width column storage (`rT` in `TFORMn`)
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnFormat {
    repeat: usize,
    code: char,
    /// Bytes occupied in each row
    width: usize,
}

impl ColumnFormat {
    fn parse(column: &str, tform: &str) -> TableResult<Self> {
        let tform = tform.trim();
        let digits = tform.chars().take_while(char::is_ascii_digit).count();
        let repeat = if digits == 0 {
            1
        } else {
            tform[..digits]
                .parse()
                .map_err(|_| TableError::UnsupportedFormat {
                    column: column.to_string(),
                    tform: tform.to_string(),
                })?
        };

        let code = tform[digits..]
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| TableError::UnsupportedFormat {
                column: column.to_string(),
                tform: tform.to_string(),
            })?;

        if !matches!(code, 'L' | 'X' | 'B' | 'I' | 'J' | 'K' | 'A' | 'E' | 'D') {
            return Err(TableError::UnsupportedFormat {
                column: column.to_string(),
                tform: tform.to_string(),
            });
        }

        let width = match code {
            'X' => Some(repeat / 8 + usize::from(repeat % 8 != 0)),
            _ => repeat.checked_mul(element_size(code)),
        }
        .ok_or_else(|| TableError::UnsupportedFormat {
            column: column.to_string(),
            tform: tform.to_string(),
        })?;

        Ok(Self {
            repeat,
            code,
            width,
        })
    }

    fn element_size(&self) -> usize {
        element_size(self.code)
    }

    fn width(&self) -> usize {
        self.width
    }
}

fn element_size(code: char) -> usize {
    match code {
        'I' => 2,
        'J' | 'E' => 4,
        'K' | 'D' => 8,
        _ => 1,
    }
}

#[derive(Debug)]
struct ColumnSpec {
    format: ColumnFormat,
    offset: usize,
    null: Option<i64>,
    scale: f64,
    zero: f64,
}

impl ColumnSpec {
    fn is_scaled(&self) -> bool {
        self.scale != 1.0 || self.zero != 0.0
    }

    fn decode(&self, row: &[u8]) -> Value {
        let bytes = &row[self.offset..self.offset + self.format.width()];
        let repeat = self.format.repeat;

        match self.format.code {
            _ if repeat == 0 => Value::Null,
            'A' => Value::Text(decode_text(bytes).into_owned()),
            'X' => Value::Array(
                (0..repeat)
                    .map(|bit| Value::Bool(bytes[bit / 8] & (0x80 >> (bit % 8)) != 0))
                    .collect(),
            ),
            _ => {
                let size = self.format.element_size();
                let mut values: Vec<Value> = bytes
                    .chunks_exact(size)
                    .map(|element| self.decode_element(element))
                    .collect();
                if repeat == 1 {
                    values.pop().unwrap_or(Value::Null)
                } else {
                    Value::Array(values)
                }
            }
        }
    }

    fn decode_element(&self, bytes: &[u8]) -> Value {
        match self.format.code {
            'L' => match bytes[0] {
                b'T' => Value::Bool(true),
                b'F' => Value::Bool(false),
                _ => Value::Null,
            },
            'E' => self.scale_float(f32::from_be_bytes(be_array(bytes)) as f64),
            'D' => self.scale_float(f64::from_be_bytes(be_array(bytes))),
            code => {
                let raw = match code {
                    'B' => bytes[0] as i64,
                    'I' => i16::from_be_bytes(be_array(bytes)) as i64,
                    'J' => i32::from_be_bytes(be_array(bytes)) as i64,
                    _ => i64::from_be_bytes(be_array(bytes)),
                };
                self.scale_int(raw)
            }
        }
    }

    fn scale_int(&self, raw: i64) -> Value {
        if self.null == Some(raw) {
            return Value::Null;
        }
        if !self.is_scaled() {
            return Value::Int(raw);
        }

        // Integral offsets (unsigned columns) stay integers
        if self.scale == 1.0 && self.zero.fract() == 0.0 {
            let shifted = raw as i128 + self.zero as i128;
            if let Ok(v) = i64::try_from(shifted) {
                return Value::Int(v);
            }
        }
        Value::Float(raw as f64 * self.scale + self.zero)
    }

    fn scale_float(&self, raw: f64) -> Value {
        if raw.is_nan() {
            Value::Null
        } else {
            Value::Float(raw * self.scale + self.zero)
        }
    }
}

fn be_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Character data ends at the first NUL; trailing blanks are padding
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    match String::from_utf8_lossy(&bytes[..end]) {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim_end()),
        Cow::Owned(s) => Cow::Owned(s.trim_end().to_string()),
    }
}

/// Reads the first binary table extension of a FITS file
///
/// # Errors
///
/// Returns `TableError` if the data is not FITS, holds no `BINTABLE`
/// extension, uses an unsupported column format, or is truncated
pub fn read_bintable(data: &[u8]) -> TableResult<Table> {
    let (primary, header_len) = Header::parse(data, 0)?;
    if primary.get_bool("SIMPLE") != Some(true) {
        return Err(TableError::InvalidHeader {
            reason: "primary header does not start with SIMPLE = T".to_string(),
        });
    }

    let mut offset = header_len
        .checked_add(padded(primary.data_size()?)?)
        .ok_or_else(|| overflow("primary HDU size"))?;
    while offset < data.len() {
        let (header, header_len) = Header::parse(data, offset)?;
        let data_start = offset + header_len;

        if header.get_str("XTENSION") == Some(BINTABLE) {
            return decode_bintable(&header, &data[data_start.min(data.len())..]);
        }

        debug!(
            "Skipping {} extension at byte {}",
            header.get_str("XTENSION").unwrap_or("unknown"),
            offset
        );
        offset = data_start
            .checked_add(padded(header.data_size()?)?)
            .ok_or_else(|| overflow("extension size"))?;
    }

    Err(TableError::NoTableExtension)
}

fn decode_bintable(header: &Header, data: &[u8]) -> TableResult<Table> {
    let row_bytes = header.require_usize("NAXIS1")?;
    let row_count = header.require_usize("NAXIS2")?;
    let field_count = header.require_usize("TFIELDS")?;
    if field_count > MAX_FIELDS {
        return Err(TableError::InvalidHeader {
            reason: format!("TFIELDS is {}, at most {} allowed", field_count, MAX_FIELDS),
        });
    }

    let needed = row_bytes
        .checked_mul(row_count)
        .ok_or_else(|| overflow("table data size"))?;
    if data.len() < needed {
        return Err(TableError::Truncated {
            expected: needed,
            actual: data.len(),
        });
    }

    let mut columns = Vec::with_capacity(field_count);
    let mut specs = Vec::with_capacity(field_count);
    let mut offset = 0;

    for i in 1..=field_count {
        let name = header
            .get_str(&format!("TTYPE{}", i))
            .map(str::to_string)
            .unwrap_or_else(|| format!("col{}", i));
        let tform = header
            .get_str(&format!("TFORM{}", i))
            .ok_or_else(|| TableError::MissingKeyword {
                keyword: format!("TFORM{}", i),
            })?;
        let format = ColumnFormat::parse(&name, tform)?;

        let mut column = Column::new(name, tform);
        if let Some(unit) = header.get_str(&format!("TUNIT{}", i)) {
            column = column.with_unit(unit);
        }

        specs.push(ColumnSpec {
            format,
            offset,
            null: header.get_int(&format!("TNULL{}", i)),
            scale: header.get_float(&format!("TSCAL{}", i)).unwrap_or(1.0),
            zero: header.get_float(&format!("TZERO{}", i)).unwrap_or(0.0),
        });
        columns.push(column);
        offset = offset
            .checked_add(format.width())
            .ok_or_else(|| overflow("row width"))?;
    }

    if offset > row_bytes {
        return Err(TableError::InvalidHeader {
            reason: format!(
                "columns occupy {} bytes but NAXIS1 is {}",
                offset, row_bytes
            ),
        });
    }

    let mut table = Table::new(columns);
    if row_bytes > 0 {
        for row in data[..needed].chunks_exact(row_bytes) {
            table.push_row(specs.iter().map(|spec| spec.decode(row)).collect())?;
        }
    }

    debug!(
        "Decoded FITS table with {} rows and {} columns",
        table.len(),
        table.num_columns()
    );
    Ok(table)
}
