//! Metadata queries against `information_schema`.

/// Columns of every table in `schema`, ordered by table then ordinal position.
///
/// The ordering is the only thing that fixes attribute display order.
pub fn columns_query(schema: &str) -> String {
    format!(
        "SELECT table_name, column_name, data_type \
         FROM information_schema.columns \
         WHERE table_schema = {} \
         ORDER BY table_name, ordinal_position",
        quote_literal(schema)
    )
}

/// Every column taking part in a foreign key constraint in `schema`, with the
/// table and column it references.
pub fn foreign_keys_query(schema: &str) -> String {
    format!(
        "SELECT tc.table_name, kcu.column_name, ccu.table_name, ccu.column_name \
         FROM information_schema.table_constraints AS tc \
         JOIN information_schema.key_column_usage AS kcu \
           ON tc.constraint_name = kcu.constraint_name \
         JOIN information_schema.constraint_column_usage AS ccu \
           ON ccu.constraint_name = tc.constraint_name \
         WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = {}",
        quote_literal(schema)
    )
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_literal_is_quoted() {
        let sql = columns_query("main");
        assert!(sql.contains("table_schema = 'main'"));
        assert!(sql.ends_with("ORDER BY table_name, ordinal_position"));

        let sql = foreign_keys_query("o'brien");
        assert!(sql.contains("tc.table_schema = 'o''brien'"));
    }
}
