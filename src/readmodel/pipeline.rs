//! Typed aggregation-pipeline descriptors.
//!
//! A [`Pipeline`] is an ordered list of stages over a named base collection,
//! independent of any database's query language. The SQL backend in
//! [`super::sql`] treats stages positionally loose: matches are AND-combined,
//! the last sort wins, and lookups always surface in the projection. Fields
//! may be qualified with the alias of an earlier `First` lookup
//! (e.g. `"video.owner_id"`).
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Str(String),
    Uuid(Uuid),
    Bool(bool),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact equality.
    Eq { field: String, value: Operand },
    /// Case-insensitive string equality.
    EqCi { field: String, value: String },
    /// Case-insensitive substring match across any of the fields.
    Contains { fields: Vec<String>, needle: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupKind {
    /// Count of matching foreign rows, surfaced as a scalar column.
    Count { alias: String },
    /// Membership test against the foreign collection, with one extra
    /// condition evaluated on the foreign rows.
    Exists { alias: String, extra: Condition },
    /// First matching foreign row, surfaced under `alias` with the listed
    /// fields available as `alias.field`.
    First { alias: String, fields: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub kind: LookupKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Vec<Condition>),
    Lookup(Lookup),
    Sort {
        field: String,
        direction: SortDirection,
    },
    Skip(u64),
    Limit(u64),
    Project(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    pub collection: String,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn over(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            stages: Vec::new(),
        }
    }

    pub fn filter(mut self, conditions: Vec<Condition>) -> Self {
        if !conditions.is_empty() {
            self.stages.push(Stage::Match(conditions));
        }
        self
    }

    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.stages.push(Stage::Lookup(lookup));
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.stages.push(Stage::Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.stages.push(Stage::Skip(n));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages
            .push(Stage::Project(fields.into_iter().map(Into::into).collect()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_stage_order() {
        let p = Pipeline::over("videos")
            .filter(vec![Condition::Eq {
                field: "is_published".into(),
                value: Operand::Bool(true),
            }])
            .sort("created_at", SortDirection::Descending)
            .skip(10)
            .limit(10);

        assert_eq!(p.collection, "videos");
        assert_eq!(p.stages.len(), 4);
        assert!(matches!(p.stages[0], Stage::Match(_)));
        assert!(matches!(p.stages[3], Stage::Limit(10)));
    }

    #[test]
    fn test_empty_filter_adds_no_stage() {
        let p = Pipeline::over("videos").filter(vec![]);
        assert!(p.stages.is_empty());
    }
}
