use anyhow::{Result, bail};

/// One parsed delimited-text source: a required header row plus data rows
/// addressed by column name. Quoted cells may contain delimiters, doubled
/// quotes and line breaks; blank lines between records are skipped.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = parse_records(text)?;

        if records.is_empty() {
            bail!("source contains no header row");
        }

        let headers = records.remove(0);
        Ok(Self {
            headers,
            rows: records,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            headers: &self.headers,
            cells,
        })
    }
}

/// Field-addressable view of one data row. A row shorter than the header
/// reads as absent for the trailing columns.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let position = self.headers.iter().position(|header| header == column)?;
        self.cells.get(position).map(String::as_str)
    }
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_record(&mut records, &mut record, &mut field);
            }
            '\n' => flush_record(&mut records, &mut record, &mut field),
            _ => field.push(ch),
        }
    }

    if in_quotes {
        bail!("unterminated quoted field at end of source");
    }

    flush_record(&mut records, &mut record, &mut field);

    Ok(records)
}

fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));

    // A lone empty cell is a blank line, not a record.
    if record.len() == 1 && record[0].is_empty() {
        record.clear();
        return;
    }

    records.push(std::mem::take(record));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_addresses_cells_by_header() -> Result<()> {
        let table = Table::parse("model,query,answer\nm1,what,because\n")?;
        assert_eq!(table.rows().count(), 1);

        let row = table.rows().next().unwrap();
        assert_eq!(row.get("model"), Some("m1"));
        assert_eq!(row.get("answer"), Some("because"));
        assert_eq!(row.get("missing-column"), None);
        Ok(())
    }

    #[test]
    fn parse_handles_quoted_cells_with_delimiters_and_breaks() -> Result<()> {
        let text = "query,answer\n\"a, b\",\"line one\nline two\"\n\"he said \"\"hi\"\"\",plain\n";
        let table = Table::parse(text)?;

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("query"), Some("a, b"));
        assert_eq!(rows[0].get("answer"), Some("line one\nline two"));
        assert_eq!(rows[1].get("query"), Some("he said \"hi\""));
        Ok(())
    }

    #[test]
    fn parse_skips_blank_lines_and_handles_crlf() -> Result<()> {
        let text = "a,b\r\n\r\n1,2\r\n\n3,4";
        let table = Table::parse(text)?;

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[1].get("b"), Some("4"));
        Ok(())
    }

    #[test]
    fn short_rows_read_as_absent_for_trailing_columns() -> Result<()> {
        let table = Table::parse("a,b,c\n1,2\n")?;

        let row = table.rows().next().unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some("2"));
        assert_eq!(row.get("c"), None);
        Ok(())
    }

    #[test]
    fn unterminated_quote_is_a_parse_failure() {
        assert!(Table::parse("a,b\n\"open,2\n").is_err());
    }

    #[test]
    fn empty_source_is_a_parse_failure() {
        assert!(Table::parse("").is_err());
        assert!(Table::parse("\n\n").is_err());
    }

    #[test]
    fn empty_trailing_cells_are_kept_as_empty_strings() -> Result<()> {
        let table = Table::parse("a,b,c\n1,,\n")?;

        let row = table.rows().next().unwrap();
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get("c"), Some(""));
        Ok(())
    }
}
