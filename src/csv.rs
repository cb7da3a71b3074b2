//! CSV-flavoured output rows.
//!
//! Rows have a fixed column count and are joined with `", "`. Fields are not
//! quote-escaped; free text instead has embedded commas replaced with a space
//! so columns stay aligned.

/// Replaces every comma in free text with a single space.
pub fn sanitize(text: &str) -> String {
    text.replace(',', " ")
}

/// One output row. Columns not set stay blank, which is how sparse roster
/// rows mark the fields that do not apply to them.
#[derive(Debug)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    pub fn new(columns: usize) -> Self {
        Self {
            fields: vec![String::new(); columns],
        }
    }

    /// Sets a column to a value that is known to be comma-free (logins,
    /// counts, timestamps).
    pub fn field(mut self, index: usize, value: impl Into<String>) -> Self {
        self.fields[index] = value.into();
        self
    }

    /// Sets a column to free text, sanitizing embedded commas.
    pub fn text_field(self, index: usize, value: &str) -> Self {
        self.field(index, sanitize(value))
    }

    pub fn render(&self) -> String {
        let mut row = self.fields.join(", ");
        // A blank final column would leave a dangling ", "; the row ends on
        // the bare comma instead.
        if self.fields.last().is_some_and(|field| field.is_empty()) {
            row.pop();
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_commas_with_spaces() {
        assert_eq!(sanitize("Tool, for X"), "Tool  for X");
        assert_eq!(sanitize("no commas"), "no commas");
    }

    #[test]
    fn full_row_renders_comma_space_separated() {
        let row = Row::new(2).field(0, "demo").field(1, "42");
        assert_eq!(row.render(), "demo, 42");
    }

    #[test]
    fn trailing_blank_columns_end_on_the_comma() {
        let row = Row::new(7)
            .field(0, "demo")
            .text_field(1, "Tool, for X")
            .field(2, "2023-05-15T10:00:00Z")
            .field(3, "octocat");
        assert_eq!(row.render(), "demo, Tool  for X, 2023-05-15T10:00:00Z, octocat, , ,");
    }

    #[test]
    fn leading_blank_columns_stay_blank() {
        let row = Row::new(7).field(4, "alice").field(5, "https://example.test/alice");
        assert_eq!(row.render(), ", , , , alice, https://example.test/alice,");
    }

    #[test]
    fn populated_final_column_keeps_its_value() {
        let row = Row::new(7).field(6, "Jane Doe (anon)");
        assert_eq!(row.render(), ", , , , , , Jane Doe (anon)");
    }
}
