/// SQL Template Builder Module
///
/// Pure string assembly for the three statement shapes the engine issues:
/// filtered selects, positional-parameter statements, and the auto-generated
/// inserts used by the write path. Nothing in this module touches a
/// connection.

/// One equality filter: `column = literal`, combined with `and` between
/// siblings.
///
/// The literal is embedded verbatim. The coercion layer is responsible for
/// producing a SQL-literal-safe token (numbers bare, text and dates
/// single-quoted); no quoting or escaping happens here, which makes this a
/// known injection-risk boundary for hostile column or value input.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereTerm {
    pub column: String,
    pub literal: String,
}

impl WhereTerm {
    pub fn new(column: impl Into<String>, literal: impl Into<String>) -> Self {
        WhereTerm {
            column: column.into(),
            literal: literal.into(),
        }
    }
}

/// Assembles a WHERE clause body from filter terms.
///
/// Returns the empty string for no terms (no filter), otherwise
/// `col1 = val1 and col2 = val2 and ...` in input order.
pub fn where_clause(terms: &[WhereTerm]) -> String {
    let mut clause = String::new();
    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            clause.push_str(" and ");
        }
        clause.push_str(&term.column);
        clause.push_str(" = ");
        clause.push_str(&term.literal);
    }
    clause
}

/// Builds the select statement for a table read.
///
/// `clause` is the output of [`where_clause`]; an empty clause selects the
/// whole table.
pub fn select_all(table: &str, clause: &str) -> String {
    if clause.is_empty() {
        format!("SELECT * FROM {}", table)
    } else {
        format!("SELECT * FROM {} WHERE {}", table, clause)
    }
}

/// Replaces every `@1`, `@2`, ... marker in a SQL template with the string
/// form of the corresponding 1-based value.
///
/// Substitution proceeds from the highest index down to the lowest, so a
/// multi-digit marker like `@10` is always consumed before `@1` could match
/// inside it. A marker only matches when it is not followed by a further
/// digit, which keeps markers above the supplied count untouched (they are
/// not an error at this layer).
///
/// # Examples
///
/// ```
/// use simql::sqlgen::substitute_positional;
///
/// let sql = substitute_positional(
///     "UPDATE jobs SET due = @10 WHERE id = @1",
///     &["7".to_string(), "b".into(), "c".into(), "d".into(), "e".into(),
///       "f".into(), "g".into(), "h".into(), "i".into(), "'2024-01-01'".into()],
/// );
/// assert_eq!(sql, "UPDATE jobs SET due = '2024-01-01' WHERE id = 7");
/// ```
pub fn substitute_positional(template: &str, values: &[String]) -> String {
    let mut sql = template.to_string();
    // Backwards so higher markers are never clobbered by lower ones.
    for index in (1..=values.len()).rev() {
        let marker = format!("@{}", index);
        sql = replace_marker(&sql, &marker, &values[index - 1]);
    }
    sql
}

/// Replaces each occurrence of `marker` that is not followed by another
/// digit, leaving longer markers that merely start with `marker` intact.
fn replace_marker(sql: &str, marker: &str, value: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;
    while let Some(pos) = rest.find(marker) {
        let after = &rest[pos + marker.len()..];
        out.push_str(&rest[..pos]);
        let continues_with_digit = after.chars().next().map_or(false, |c| c.is_ascii_digit());
        if continues_with_digit {
            out.push_str(marker);
        } else {
            out.push_str(value);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Builds the insert template for the write path from a learned column
/// layout: `INSERT INTO t (c1, ..., ck) VALUES (?1, ..., ?k)`.
///
/// The placeholders are provider positional parameters bound by the
/// provider's bulk-fill primitive; grid column `j` maps to `columns[j]`
/// strictly by position.
pub fn insert_template(table: &str, columns: &[String]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}
