//! Postgres backend for the pipeline descriptors.
//!
//! Compiles a [`Pipeline`] into one SELECT with ordered bind operands:
//! `Count` becomes a correlated scalar subquery, `Exists` an EXISTS
//! subquery, `First` a `LEFT JOIN LATERAL ... LIMIT 1`. Qualified projection
//! fields (`video.title`) are aliased with underscores (`video_title`).
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

use super::pipeline::{Condition, LookupKind, Operand, Pipeline, SortDirection, Stage};

#[derive(Debug)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: Vec<Operand>,
}

impl CompiledQuery {
    /// Bind the collected operands onto the compiled statement.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        let mut q = sqlx::query(&self.sql);
        for operand in &self.binds {
            q = match operand {
                Operand::Str(v) => q.bind(v.as_str()),
                Operand::Uuid(v) => q.bind(*v),
                Operand::Bool(v) => q.bind(*v),
                Operand::Int(v) => q.bind(*v),
            };
        }
        q
    }
}

struct BindCollector {
    binds: Vec<Operand>,
}

impl BindCollector {
    fn push(&mut self, operand: Operand) -> String {
        self.binds.push(operand);
        format!("${}", self.binds.len())
    }
}

fn qualify(base: &str, field: &str) -> String {
    if field.contains('.') {
        field.to_string()
    } else {
        format!("{base}.{field}")
    }
}

fn column_alias(field: &str) -> String {
    field.replace('.', "_")
}

fn render_condition(collector: &mut BindCollector, table: &str, condition: &Condition) -> String {
    match condition {
        Condition::Eq { field, value } => {
            let placeholder = collector.push(value.clone());
            format!("{} = {}", qualify(table, field), placeholder)
        }
        Condition::EqCi { field, value } => {
            let placeholder = collector.push(Operand::Str(value.clone()));
            format!("LOWER({}) = LOWER({})", qualify(table, field), placeholder)
        }
        Condition::Contains { fields, needle } => {
            // One bind shared by every field comparison.
            let placeholder = collector.push(Operand::Str(needle.clone()));
            let parts: Vec<String> = fields
                .iter()
                .map(|f| format!("{} ILIKE '%' || {} || '%'", qualify(table, f), placeholder))
                .collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

pub fn compile(pipeline: &Pipeline) -> CompiledQuery {
    let base = pipeline.collection.as_str();
    let mut collector = BindCollector { binds: Vec::new() };

    // Match conditions claim the first bind slots.
    let mut where_parts: Vec<String> = Vec::new();
    for stage in &pipeline.stages {
        if let Stage::Match(conditions) = stage {
            for condition in conditions {
                where_parts.push(render_condition(&mut collector, base, condition));
            }
        }
    }

    let mut scalar_columns: Vec<String> = Vec::new();
    let mut joins: Vec<String> = Vec::new();
    for stage in &pipeline.stages {
        if let Stage::Lookup(lookup) = stage {
            let local = qualify(base, &lookup.local_field);
            let from = lookup.from.as_str();
            let foreign = lookup.foreign_field.as_str();
            match &lookup.kind {
                LookupKind::Count { alias } => {
                    scalar_columns.push(format!(
                        "(SELECT COUNT(*) FROM {from} WHERE {from}.{foreign} = {local}) AS {alias}"
                    ));
                }
                LookupKind::Exists { alias, extra } => {
                    let extra_sql = render_condition(&mut collector, from, extra);
                    scalar_columns.push(format!(
                        "EXISTS(SELECT 1 FROM {from} WHERE {from}.{foreign} = {local} AND {extra_sql}) AS {alias}"
                    ));
                }
                LookupKind::First { alias, fields } => {
                    let columns = fields.join(", ");
                    joins.push(format!(
                        "LEFT JOIN LATERAL (SELECT {columns} FROM {from} WHERE {from}.{foreign} = {local} LIMIT 1) AS {alias} ON TRUE"
                    ));
                }
            }
        }
    }

    let mut projection: Vec<String> = Vec::new();
    for stage in &pipeline.stages {
        if let Stage::Project(fields) = stage {
            for field in fields {
                projection.push(format!(
                    "{} AS {}",
                    qualify(base, field),
                    column_alias(field)
                ));
            }
        }
    }
    if projection.is_empty() {
        projection.push(format!("{base}.*"));
    }
    projection.extend(scalar_columns);

    let mut order_by: Option<String> = None;
    let mut limit: Option<u64> = None;
    let mut offset: Option<u64> = None;
    for stage in &pipeline.stages {
        match stage {
            Stage::Sort { field, direction } => {
                let dir = match direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                order_by = Some(format!("ORDER BY {} {}", qualify(base, field), dir));
            }
            Stage::Skip(n) => offset = Some(*n),
            Stage::Limit(n) => limit = Some(*n),
            _ => {}
        }
    }

    let mut sql = format!("SELECT {} FROM {}", projection.join(", "), base);
    for join in &joins {
        sql.push(' ');
        sql.push_str(join);
    }
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    if let Some(order) = order_by {
        sql.push(' ');
        sql.push_str(&order);
    }
    if let Some(n) = limit {
        let placeholder = collector.push(Operand::Int(n as i64));
        sql.push_str(&format!(" LIMIT {placeholder}"));
    }
    if let Some(n) = offset {
        let placeholder = collector.push(Operand::Int(n as i64));
        sql.push_str(&format!(" OFFSET {placeholder}"));
    }

    CompiledQuery {
        sql,
        binds: collector.binds,
    }
}

/// Total-count variant: only the base collection and the match stages are
/// kept; sort, pagination, lookups and projection are dropped.
pub fn compile_count(pipeline: &Pipeline) -> CompiledQuery {
    let base = pipeline.collection.as_str();
    let mut collector = BindCollector { binds: Vec::new() };

    let mut where_parts: Vec<String> = Vec::new();
    for stage in &pipeline.stages {
        if let Stage::Match(conditions) = stage {
            for condition in conditions {
                where_parts.push(render_condition(&mut collector, base, condition));
            }
        }
    }

    let mut sql = format!("SELECT COUNT(*) FROM {base}");
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }

    CompiledQuery {
        sql,
        binds: collector.binds,
    }
}
