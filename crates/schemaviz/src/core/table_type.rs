//! Table type classification
//!
//! Database catalogs report relation types inconsistently across vendors
//! (`TABLE`, `BASE TABLE`, `SYSTEM VIEW`, `materialized view`, ...). A
//! [`TableType`] keeps the label exactly as the database reported it, but
//! compares, hashes and prints through its lowercase form so listings sort the
//! same way no matter which vendor produced them.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::error::SchemaError;

/// A type of table in the database, such as a base table, a view or a global
/// temporary table
///
/// The label is case-preserving; equality, hashing and ordering are
/// case-insensitive.
///
/// # Ordering
///
/// `table` sorts first, `view` second, and every other type follows in
/// lexicographic order of its lowercase form.
///
/// ```rust
/// use schemaviz::TableType;
///
/// let mut types = vec![
///     TableType::new("SYNONYM").unwrap(),
///     TableType::new("VIEW").unwrap(),
///     TableType::new("TABLE").unwrap(),
/// ];
/// types.sort();
/// let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
/// assert_eq!(names, ["table", "view", "synonym"]);
/// ```
#[derive(Debug, Clone)]
pub struct TableType {
    table_type: Cow<'static, str>,
    key: Cow<'static, str>,
}

impl TableType {
    /// Sentinel for relations whose type was not reported
    pub const UNKNOWN: TableType = TableType {
        table_type: Cow::Borrowed("unknown"),
        key: Cow::Borrowed("unknown"),
    };

    /// Create a table type from a label reported by the database
    ///
    /// Surrounding whitespace is trimmed and case is preserved. Blank labels
    /// are rejected.
    pub fn new(label: &str) -> Result<Self, SchemaError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::invalid_argument("No table type provided"));
        }
        Ok(Self {
            table_type: Cow::Owned(trimmed.to_string()),
            key: Cow::Owned(trimmed.to_lowercase()),
        })
    }

    /// The table type, with the case preserved
    pub fn table_type(&self) -> &str {
        &self.table_type
    }

    /// Case-insensitive check of a raw type string against this table type
    ///
    /// The candidate is trimmed first. Blank candidates never match.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }
        candidate.to_lowercase() == self.key
    }

    /// Checks if the table type is a view of any kind
    pub fn is_view(&self) -> bool {
        let upper = self.table_type.to_uppercase();
        upper.contains("VIEW") || upper.contains("MATERIALIZED")
    }

    /// Compare against a value that may be absent; a missing value sorts last
    pub fn compare_to(&self, other: Option<&TableType>) -> Ordering {
        match other {
            Some(other) => self.cmp(other),
            None => Ordering::Less,
        }
    }

    fn is_table(&self) -> bool {
        self.key == "table"
    }

    fn is_plain_view(&self) -> bool {
        self.key == "view"
    }
}

impl PartialEq for TableType {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TableType {}

impl Hash for TableType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for TableType {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.key == other.key {
            return Ordering::Equal;
        }

        // Tables first
        match (self.is_table(), other.is_table()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        // Views second
        match (self.is_plain_view(), other.is_plain_view()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        self.key.cmp(&other.key)
    }
}

impl PartialOrd for TableType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl FromStr for TableType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TableType {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Default for TableType {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Sort table types for a report and drop case-insensitive duplicates
///
/// The first spelling encountered for each type is the one kept.
pub fn sort_and_dedup(types: impl IntoIterator<Item = TableType>) -> Vec<TableType> {
    let mut sorted: Vec<TableType> = types.into_iter().collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tt(label: &str) -> TableType {
        TableType::new(label).unwrap()
    }

    #[test]
    fn test_label_is_trimmed_and_case_preserved() {
        let table_type = tt("  Base Table\t");
        assert_eq!(table_type.table_type(), "Base Table");
        assert_eq!(table_type.to_string(), "base table");
    }

    #[test]
    fn test_blank_labels_rejected() {
        for label in ["", " ", "\t\n", "   \r\n  "] {
            let err = TableType::new(label).unwrap_err();
            assert!(err.is_invalid_argument(), "{:?} should be rejected", label);
        }
    }

    #[test]
    fn test_case_insensitive_equality_and_hash() {
        let upper = tt("VIEW");
        let lower = tt("view");
        assert_eq!(upper, lower);
        let set: HashSet<TableType> = [upper, lower].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_tiers() {
        assert_eq!(tt("TABLE").cmp(&tt("VIEW")), Ordering::Less);
        assert_eq!(tt("VIEW").cmp(&tt("SYNONYM")), Ordering::Less);
        assert_eq!(tt("a").cmp(&tt("b")), Ordering::Less);
        assert_eq!(tt("ALIAS").cmp(&tt("table")), Ordering::Greater);
        assert_eq!(tt("Table").cmp(&tt("tABLE")), Ordering::Equal);
    }

    #[test]
    fn test_base_table_is_not_the_table_tier() {
        // Only an exact "table" label gets the first tier
        assert_eq!(tt("BASE TABLE").cmp(&tt("VIEW")), Ordering::Greater);
        assert_eq!(tt("BASE TABLE").cmp(&tt("SYNONYM")), Ordering::Less);
    }

    #[test]
    fn test_compare_to_absent() {
        assert_eq!(tt("synonym").compare_to(None), Ordering::Less);
        assert_eq!(tt("table").compare_to(Some(&tt("view"))), Ordering::Less);
    }

    #[test]
    fn test_matches() {
        let table_type = tt("SYSTEM VIEW");
        assert!(table_type.matches("system view"));
        assert!(table_type.matches("  System View  "));
        assert!(!table_type.matches("view"));
        assert!(!table_type.matches(""));
        assert!(!table_type.matches("   "));
    }

    #[test]
    fn test_is_view() {
        assert!(tt("VIEW").is_view());
        assert!(tt("MATERIALIZED VIEW").is_view());
        assert!(tt("SYSTEM VIEW").is_view());
        assert!(tt("materialized query table").is_view());
        assert!(!tt("TABLE").is_view());
        assert!(!tt("SYNONYM").is_view());
    }

    #[test]
    fn test_unknown_sentinel() {
        assert_eq!(TableType::UNKNOWN.table_type(), "unknown");
        assert_eq!(TableType::default(), tt("UNKNOWN"));
        assert!(!TableType::UNKNOWN.is_view());
    }

    #[test]
    fn test_parse() {
        let table_type: TableType = "GLOBAL TEMPORARY".parse().unwrap();
        assert_eq!(table_type.table_type(), "GLOBAL TEMPORARY");
        assert!(" ".parse::<TableType>().is_err());
        assert!(TableType::try_from("LOCAL TEMPORARY").is_ok());
    }

    #[test]
    fn test_sort_and_dedup() {
        let listing = sort_and_dedup(vec![
            tt("SYNONYM"),
            tt("view"),
            tt("GLOBAL TEMPORARY"),
            tt("TABLE"),
            tt("VIEW"),
            tt("table"),
        ]);
        let labels: Vec<&str> = listing.iter().map(|t| t.table_type()).collect();
        assert_eq!(labels, ["TABLE", "view", "GLOBAL TEMPORARY", "SYNONYM"]);
    }
}
