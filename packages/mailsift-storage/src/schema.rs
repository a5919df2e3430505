const INIT_SQL: &str = include_str!("../sql/init.sql");

/// Idempotent bootstrap statements, in execution order.
pub fn statements() -> impl Iterator<Item = &'static str> {
	INIT_SQL.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}
