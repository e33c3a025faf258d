//! Table text codec using nom
//!
//! File format:
//! ```text
//! id;name;password;
//! 1;lala;lulu;
//! 2;mumu;meme;
//! ```
//!
//! Every line, header included, ends with the delimiter. Lines are joined by
//! the line separator with no separator after the last line. The header line
//! is only present when field names are inferred from the file.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{opt, recognize, rest},
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::Result;
use crate::format::{Fields, Format};
use crate::record::Record;

fn lines<'a>(input: &'a str, separator: &str) -> IResult<&'a str, Vec<&'a str>> {
    separated_list0(tag(separator), alt((take_until(separator), rest)))(input)
}

fn columns(input: &str, delimiter: char) -> IResult<&str, Vec<&str>> {
    separated_list0(char(delimiter), take_till(move |c: char| c == delimiter))(input)
}

fn leading_int(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, recognize(pair(opt(one_of("+-")), digit1)))(input)
}

/// Split text into lines. Like `str::split`, an empty input yields one empty
/// line and a trailing separator yields a trailing empty line.
pub fn split_lines<'a>(input: &'a str, separator: &str) -> Result<Vec<&'a str>> {
    let (_, lines) = lines(input, separator)?;
    Ok(lines)
}

/// Split one line into columns, keeping empty columns
pub fn split_columns(line: &str, delimiter: char) -> Result<Vec<&str>> {
    let (_, cols) = columns(line, delimiter)?;
    Ok(cols)
}

/// Parse an id the lenient way: optional leading whitespace, optional sign,
/// then as many digits as there are. Trailing junk is ignored (`"12abc"` is 12).
/// Digit runs too long for `i128` saturate instead of being rejected.
pub fn parse_id(value: &str) -> Option<i128> {
    let (_, digits) = leading_int(value).ok()?;
    match digits.parse::<i128>() {
        Ok(id) => Some(id),
        Err(_) if digits.starts_with('-') => Some(i128::MIN),
        Err(_) => Some(i128::MAX),
    }
}

/// Parse a header line into trimmed field names.
///
/// The empty name produced by the trailing delimiter is dropped.
pub fn parse_header(line: &str, delimiter: char) -> Result<Vec<String>> {
    let mut names: Vec<String> = split_columns(line, delimiter)?
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();

    if names.last().is_some_and(|name| name.is_empty()) {
        names.pop();
    }

    Ok(names)
}

/// Parse a data line against a field list.
///
/// Fields past the end of the row are undefined; extra columns are ignored.
pub fn parse_row(line: &str, fields: &[String], delimiter: char) -> Result<Record> {
    let cols = split_columns(line, delimiter)?;
    let mut record = Record::new();

    for (j, field) in fields.iter().enumerate() {
        record.insert(field.clone(), cols.get(j).map(|col| col.to_string()));
    }

    Ok(record)
}

/// Parse whole table text into records
pub fn parse_records(input: &str, fields: &Fields, format: &Format) -> Result<Vec<Record>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = split_lines(input, format.line_separator())?.into_iter();

    let header;
    let names: &[String] = match fields {
        Fields::Explicit(names) => names,
        Fields::InferFromHeader => {
            header = parse_header(lines.next().unwrap_or_default(), format.delimiter())?;
            &header
        }
    };

    lines
        .map(|line| parse_row(line, names, format.delimiter()))
        .collect()
}

fn format_line<'a>(values: impl Iterator<Item = &'a str>, delimiter: char) -> String {
    let mut line = values.collect::<Vec<_>>().join(&delimiter.to_string());
    line.push(delimiter);
    line
}

/// Serialize records, header first.
///
/// Columns follow the key order of the first record. Records lacking one of
/// those keys, or holding it undefined, get an empty column.
pub fn flatten_records(records: &[Record], format: &Format) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let delimiter = format.delimiter();
    let columns: Vec<&str> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format_line(columns.iter().copied(), delimiter));

    for record in records {
        let values = columns.iter().map(|col| record.get(col).unwrap_or(""));
        lines.push(format_line(values, delimiter));
    }

    lines.join(format.line_separator())
}
