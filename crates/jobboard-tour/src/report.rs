//! Plain-text rendering of query results for the walkthrough output.

use core::fmt::Display;

/// Render rows as `label: [row, row, ...]`.
pub fn rows<T: Display>(label: &str, rows: &[T]) -> String {
    let rendered: Vec<String> = rows.iter().map(ToString::to_string).collect();
    format!("{label}: [{}]", rendered.join(", "))
}

/// Render names as `label -> {a, b}`.
pub fn names<'a, I>(label: &str, names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    format!("{label} -> {{{}}}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_render_as_empty_list() {
        let empty: [u8; 0] = [];
        assert_eq!(rows("Empty table", &empty), "Empty table: []");
    }

    #[test]
    fn rows_are_comma_separated() {
        assert_eq!(rows("Characters", &[1, 2, 3]), "Characters: [1, 2, 3]");
    }

    #[test]
    fn names_render_as_set() {
        assert_eq!(
            names("Digital", ["CEO", "Programmer"]),
            "Digital -> {CEO, Programmer}"
        );
    }
}
