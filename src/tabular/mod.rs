// src/tabular/mod.rs

use std::collections::HashMap;
use std::mem::take;

pub mod xlsx;

/// One parsed data line, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    fields: HashMap<String, String>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(header, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut rec = Self::new();
        for (k, v) in pairs {
            rec.insert(k, v);
        }
        rec
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Value for `key`, or "" when the column is absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value for `key`, `None` when absent or blank.
    pub fn opt(&self, key: &str) -> Option<String> {
        let v = self.get(key).trim();
        (!v.is_empty()).then(|| v.to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy with keys and values trimmed, so `"\tAuthors"` becomes `"Authors"`.
    pub fn normalized(&self) -> Self {
        Self::from_pairs(
            self.fields
                .iter()
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string())),
        )
    }
}

/// Parse comma-separated text.
pub fn parse_csv(text: &str) -> Vec<RowRecord> {
    parse_delimited(text, ',')
}

/// Parse delimited text with a header line into row records.
///
/// Carriage returns are dropped and the whole text is trimmed before
/// splitting into lines. Input with fewer than two lines yields nothing.
/// Blank data lines are skipped; short lines are padded with "".
pub fn parse_delimited(text: &str, delimiter: char) -> Vec<RowRecord> {
    let cleaned = text.replace('\r', "");
    let lines: Vec<&str> = cleaned.trim().split('\n').collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = split_line(lines[0], delimiter)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        // blank check only; a whitespace delimiter may lead the line
        if line.trim().is_empty() {
            continue;
        }
        let values = split_line(line, delimiter);
        let mut rec = RowRecord::new();
        for (i, header) in headers.iter().enumerate() {
            let v = values.get(i).map(|s| s.trim()).unwrap_or("");
            rec.insert(header.clone(), v);
        }
        rows.push(rec);
    }
    rows
}

/// Split one line on `delimiter`, honouring double quotes as a toggle.
///
/// Quotes are never emitted and there is no `""` escape.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            out.push(take(&mut field));
        } else {
            field.push(ch);
        }
    }
    out.push(field);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_record_per_data_line() {
        let text = "Name,Position,Email\nAda,PI,ada@lab.org\nBo,Staff,\nCy,Postdoc,cy@lab.org\n";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 3);
        for r in &rows {
            assert_eq!(r.len(), 3);
        }
        assert_eq!(rows[0].get("Name"), "Ada");
        assert_eq!(rows[1].get("Email"), "");
        assert_eq!(rows[2].get("Position"), "Postdoc");
    }

    #[test]
    fn test_quoted_delimiter_is_not_split() {
        let rows = parse_csv("A,B\n\"x,y\",z");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("A"), "x,y");
        assert_eq!(rows[0].get("B"), "z");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(parse_csv("A,B,C").is_empty());
        assert!(parse_csv("A,B,C\n\n   \n").is_empty());
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn test_crlf_blank_lines_and_padding() {
        let text = "  A , B ,C\r\n1,2\r\n   \r\n\r\n 4 , 5 , 6 \r\n";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("A"), "1");
        assert_eq!(rows[0].get("B"), "2");
        assert_eq!(rows[0].get("C"), "");
        assert_eq!(rows[1].get("A"), "4");
        assert_eq!(rows[1].get("C"), "6");
    }

    #[test]
    fn test_tab_delimited_leading_empty_field() {
        let rows = parse_delimited("A\tB\n\tx\n", '\t');
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("A"), "");
        assert_eq!(rows[0].get("B"), "x");
    }

    #[test]
    fn test_duplicate_header_later_column_wins() {
        let rows = parse_csv("Name,Name\nfirst,second");
        assert_eq!(rows[0].get("Name"), "second");
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn test_split_line_quote_toggle() {
        assert_eq!(split_line("a,\"b,c\",d", ','), vec!["a", "b,c", "d"]);
        // no "" escape: the two quotes just toggle twice
        assert_eq!(split_line("\"say \"\"hi\"\"\",x", ','), vec!["say hi", "x"]);
        // unterminated quote swallows the rest of the line
        assert_eq!(split_line("a,\"b,c", ','), vec!["a", "b,c"]);
        assert_eq!(split_line("", ','), vec![""]);
        assert_eq!(split_line("a\tb", '\t'), vec!["a", "b"]);
    }

    #[test]
    fn test_normalized_trims_keys() {
        let rec = RowRecord::from_pairs([("\tAuthors", " A Smith "), ("Title ", "T")]);
        let n = rec.normalized();
        assert_eq!(n.get("Authors"), "A Smith");
        assert_eq!(n.get("Title"), "T");
        assert_eq!(n.opt("Missing"), None);
    }
}
