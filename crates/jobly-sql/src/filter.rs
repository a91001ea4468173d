//! Filtered-read compilation.
//!
//! List endpoints accept optional criteria (`?minSalary=2&title=eng`). A
//! [`FilterSpec`] declares which criteria an entity understands and which
//! predicate each one compiles to; [`compile_filter`] turns the criteria that
//! are present into a `WHERE` fragment with bound values.
//!
//! | Predicate              | Fragment          | Bound value   |
//! |------------------------|-------------------|---------------|
//! | [`Predicate::AtLeast`] | `column >= $n`    | the number    |
//! | [`Predicate::AtMost`]  | `column <= $n`    | the number    |
//! | [`Predicate::Contains`]| `column ILIKE $n` | `%text%`      |
//! | [`Predicate::Positive`]| `column > 0`      | none          |
//!
//! Query strings carry everything as text, so numeric criteria also accept
//! integer strings and `Positive` accepts the string `"true"`. Numeric
//! criteria are whole numbers: `2.5`, `"NaN"` and `"inf"` are rejected here
//! rather than failing later against an integer column.

use crate::attrs::AttributeBag;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

/// The comparison a filter criterion compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `column >= $n`
    AtLeast,
    /// `column <= $n`
    AtMost,
    /// `column ILIKE $n`, case-insensitive substring match
    Contains,
    /// `column > 0` when the criterion is true; no constraint when false
    Positive,
}

/// One criterion an entity can be filtered on.
#[derive(Debug, Clone, Copy)]
pub struct FilterField<'a> {
    pub key: &'a str,
    pub column: &'a str,
    pub predicate: Predicate,
}

impl<'a> FilterField<'a> {
    pub const fn new(key: &'a str, column: &'a str, predicate: Predicate) -> Self {
        Self {
            key,
            column,
            predicate,
        }
    }
}

/// The criteria an entity's list endpoint accepts.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec<'a> {
    fields: &'a [FilterField<'a>],
}

impl<'a> FilterSpec<'a> {
    pub const fn new(fields: &'a [FilterField<'a>]) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&FilterField<'a>> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().map(|f| f.key)
    }
}

/// Predicates joined by `AND`, plus their bind values.
///
/// An empty fragment means "no constraint": [`where_clause`](Self::where_clause)
/// is then the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereFragment {
    predicates: String,
    values: Vec<Value>,
}

impl WhereFragment {
    /// The joined predicates without the `WHERE` keyword.
    pub fn predicates(&self) -> &str {
        &self.predicates
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `" WHERE <predicates>"`, or `""` when there is nothing to filter on.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates)
        }
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.predicates, self.values)
    }

    fn push_predicate(&mut self, predicate: &str) {
        if !self.predicates.is_empty() {
            self.predicates.push_str(" AND ");
        }
        self.predicates.push_str(predicate);
    }

    fn bind(&mut self, column: &str, op: &str, ordinal: usize, value: Value) {
        self.values.push(value);
        self.push_predicate(&format!("{column} {op} ${ordinal}"));
    }
}

/// Compile the criteria in `criteria` against `spec`, numbering placeholders from `$1`.
///
/// Absent and `null` criteria add no constraint. Criteria `spec` does not list
/// are rejected with [`SqlError::UnknownField`]; values of the wrong kind with
/// [`SqlError::Validation`].
pub fn compile_filter(criteria: &AttributeBag, spec: &FilterSpec<'_>) -> SqlResult<WhereFragment> {
    compile_filter_from(criteria, spec, 1)
}

/// Like [`compile_filter`], numbering placeholders from `$first_ordinal`.
///
/// Use this when the filter follows other bound parameters in the statement.
/// Postgres ordinals start at `$1`, so `first_ordinal` must be at least 1.
pub fn compile_filter_from(
    criteria: &AttributeBag,
    spec: &FilterSpec<'_>,
    first_ordinal: usize,
) -> SqlResult<WhereFragment> {
    debug_assert!(first_ordinal >= 1, "placeholder ordinals start at $1");
    let mut fragment = WhereFragment::default();

    for (key, value) in criteria.iter() {
        let field = spec.field(key).ok_or_else(|| SqlError::unknown_field(key))?;
        if value.is_null() {
            continue;
        }

        let ordinal = first_ordinal + fragment.values.len();
        match field.predicate {
            Predicate::AtLeast => {
                let n = integer(key, value)?;
                fragment.bind(field.column, ">=", ordinal, n);
            }
            Predicate::AtMost => {
                let n = integer(key, value)?;
                fragment.bind(field.column, "<=", ordinal, n);
            }
            Predicate::Contains => {
                let text = value.as_str().ok_or_else(|| wrong_kind(key, "a string", value))?;
                fragment.bind(field.column, "ILIKE", ordinal, Value::Text(format!("%{text}%")));
            }
            Predicate::Positive => {
                if flag(key, value)? {
                    fragment.push_predicate(&format!("{} > 0", field.column));
                }
            }
        }
    }

    Ok(fragment)
}

fn wrong_kind(key: &str, expected: &str, got: &Value) -> SqlError {
    SqlError::validation(format!(
        "filter '{key}' expects {expected}, got {}",
        got.kind()
    ))
}

fn integer(key: &str, value: &Value) -> SqlResult<Value> {
    value
        .as_integer()
        .map(Value::Int)
        .ok_or_else(|| wrong_kind(key, "an integer", value))
}

// Query strings only ever say "true" for a set flag; anything else is unset.
fn flag(key: &str, value: &Value) -> SqlResult<bool> {
    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    match value.as_str() {
        Some(s) => Ok(s == "true"),
        None => Err(wrong_kind(key, "a boolean", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOBS: FilterSpec<'static> = FilterSpec::new(&[
        FilterField::new("minSalary", "salary", Predicate::AtLeast),
        FilterField::new("hasEquity", "equity", Predicate::Positive),
        FilterField::new("title", "title", Predicate::Contains),
    ]);

    #[test]
    fn no_criteria_means_no_where() {
        let fragment = compile_filter(&AttributeBag::new(), &JOBS).unwrap();
        assert!(fragment.is_empty());
        assert_eq!(fragment.where_clause(), "");
        assert!(fragment.values().is_empty());
    }

    #[test]
    fn threshold_and_substring() {
        let criteria = AttributeBag::new().with("minSalary", 2).with("title", "3");
        let fragment = compile_filter(&criteria, &JOBS).unwrap();
        assert_eq!(
            fragment.where_clause(),
            " WHERE salary >= $1 AND title ILIKE $2"
        );
        assert_eq!(fragment.values(), [Value::Int(2), Value::from("%3%")]);
    }

    #[test]
    fn positive_flag_binds_nothing() {
        let criteria = AttributeBag::new().with("hasEquity", true).with("title", "j");
        let fragment = compile_filter(&criteria, &JOBS).unwrap();
        assert_eq!(fragment.predicates(), "equity > 0 AND title ILIKE $1");
        assert_eq!(fragment.values(), [Value::from("%j%")]);
    }

    #[test]
    fn false_flag_is_no_constraint() {
        let criteria = AttributeBag::new().with("hasEquity", false);
        assert!(compile_filter(&criteria, &JOBS).unwrap().is_empty());

        let criteria = AttributeBag::new().with("hasEquity", "yes");
        assert!(compile_filter(&criteria, &JOBS).unwrap().is_empty());
    }

    #[test]
    fn query_string_values_are_coerced() {
        let criteria = AttributeBag::new()
            .with("minSalary", "150")
            .with("hasEquity", "true");
        let fragment = compile_filter(&criteria, &JOBS).unwrap();
        assert_eq!(fragment.predicates(), "salary >= $1 AND equity > 0");
        assert_eq!(fragment.values(), [Value::Int(150)]);
    }

    #[test]
    fn null_criteria_are_skipped() {
        let criteria = AttributeBag::new().with("title", Value::Null).with("minSalary", 1);
        let fragment = compile_filter(&criteria, &JOBS).unwrap();
        assert_eq!(fragment.predicates(), "salary >= $1");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let criteria = AttributeBag::new().with("minSalary", 2).with("nope", "nope");
        let err = compile_filter(&criteria, &JOBS).unwrap_err();
        assert!(matches!(err, SqlError::UnknownField(k) if k == "nope"));
    }

    #[test]
    fn wrong_value_kind_is_rejected() {
        let criteria = AttributeBag::new().with("minSalary", "lots");
        assert!(matches!(
            compile_filter(&criteria, &JOBS).unwrap_err(),
            SqlError::Validation(_)
        ));

        let criteria = AttributeBag::new().with("title", 3);
        assert!(matches!(
            compile_filter(&criteria, &JOBS).unwrap_err(),
            SqlError::Validation(_)
        ));
    }

    #[test]
    fn fractional_and_non_finite_thresholds_are_rejected() {
        for bad in [Value::from("2.5"), Value::from("NaN"), Value::from("inf"), Value::Float(2.5)] {
            let criteria = AttributeBag::new().with("minSalary", bad.clone());
            assert!(
                matches!(compile_filter(&criteria, &JOBS), Err(SqlError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_scalar_flag_is_rejected() {
        let criteria = AttributeBag::new().with("hasEquity", 1);
        assert!(matches!(
            compile_filter(&criteria, &JOBS).unwrap_err(),
            SqlError::Validation(_)
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "placeholder ordinals start at $1")]
    fn ordinal_zero_is_refused() {
        let criteria = AttributeBag::new().with("title", "a");
        let _ = compile_filter_from(&criteria, &JOBS, 0);
    }

    #[test]
    fn ordinals_can_start_later() {
        let criteria = AttributeBag::new().with("title", "a").with("minSalary", 5);
        let fragment = compile_filter_from(&criteria, &JOBS, 3).unwrap();
        assert_eq!(fragment.predicates(), "title ILIKE $3 AND salary >= $4");
    }
}
