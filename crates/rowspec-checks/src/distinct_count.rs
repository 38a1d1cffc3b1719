use std::collections::BTreeSet;
use std::fmt;

use rowspec_model::{CheckError, CheckSpec, InterfaceError, Location, RowMap, Value,
    validate_field_name};

use crate::Check;

/// Comparison operators accepted in a distinct-count rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonOp {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}

impl ComparisonOp {
    fn evaluate(self, count: i64, limit: i64) -> bool {
        match self {
            ComparisonOp::Less => count < limit,
            ComparisonOp::LessOrEqual => count <= limit,
            ComparisonOp::Equal => count == limit,
            ComparisonOp::GreaterOrEqual => count >= limit,
            ComparisonOp::Greater => count > limit,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::Equal => "==",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Greater => ">",
        };
        write!(f, "{text}")
    }
}

/// Check that the number of distinct values of a field satisfies a
/// comparison, e.g. `branch_id <= 3`.
///
/// The verdict is only decidable once all rows have been seen, so the
/// comparison is evaluated in `check_at_end` and never mid-stream.
#[derive(Debug)]
pub struct DistinctCountCheck {
    description: String,
    field_name: String,
    operator: ComparisonOp,
    limit: i64,
    distinct_values: BTreeSet<Value>,
}

impl DistinctCountCheck {
    pub fn new(spec: &CheckSpec, field_names: &[String]) -> Result<Self, InterfaceError> {
        let (field_name, operator, limit) = parse_rule(spec, field_names)?;
        Ok(Self {
            description: spec.description.clone(),
            field_name,
            operator,
            limit,
            distinct_values: BTreeSet::new(),
        })
    }
}

fn parse_rule(
    spec: &CheckSpec,
    field_names: &[String],
) -> Result<(String, ComparisonOp, i64), InterfaceError> {
    let rule = spec.rule.trim();
    let operator_start = rule.find(['<', '=', '>']).ok_or_else(|| {
        InterfaceError::at(
            format!(
                "distinct count rule must be of the form \"field operator limit\" \
                 but is: {rule:?}"
            ),
            spec.location.clone(),
        )
    })?;
    let field_name = validate_field_name(&rule[..operator_start], &spec.location)?;
    if !field_names.contains(&field_name) {
        return Err(InterfaceError::at(
            format!(
                "unknown field name {field_name:?} must be replaced by one of: {}",
                field_names.join(", ")
            ),
            spec.location.clone(),
        ));
    }
    let rest = &rule[operator_start..];
    let (operator, limit_text) = if let Some(limit) = rest.strip_prefix("<=") {
        (ComparisonOp::LessOrEqual, limit)
    } else if let Some(limit) = rest.strip_prefix(">=") {
        (ComparisonOp::GreaterOrEqual, limit)
    } else if let Some(limit) = rest.strip_prefix("==") {
        (ComparisonOp::Equal, limit)
    } else if let Some(limit) = rest.strip_prefix('<') {
        (ComparisonOp::Less, limit)
    } else if let Some(limit) = rest.strip_prefix('>') {
        (ComparisonOp::Greater, limit)
    } else {
        return Err(InterfaceError::at(
            format!("comparison operator must be one of: <, <=, ==, >=, > but found: {rest:?}"),
            spec.location.clone(),
        ));
    };
    let limit: i64 = limit_text.trim().parse().map_err(|_| {
        InterfaceError::at(
            format!("limit for distinct count must be an integer number but is: {limit_text:?}"),
            spec.location.clone(),
        )
    })?;
    Ok((field_name, operator, limit))
}

impl Check for DistinctCountCheck {
    fn description(&self) -> &str {
        &self.description
    }

    fn reset(&mut self) {
        self.distinct_values.clear();
    }

    fn check_row(&mut self, row: &RowMap, _location: &Location) -> Result<(), CheckError> {
        let value = row
            .get(&self.field_name)
            .cloned()
            .unwrap_or(Value::Empty);
        self.distinct_values.insert(value);
        Ok(())
    }

    fn check_at_end(&mut self, location: &Location) -> Result<(), CheckError> {
        let count = self.distinct_values.len() as i64;
        if self.operator.evaluate(count, self.limit) {
            return Ok(());
        }
        Err(CheckError::new(
            format!(
                "distinct count for field {:?} is {count} but check requires: {} {} {}",
                self.field_name, self.field_name, self.operator, self.limit
            ),
            location.clone(),
        ))
    }
}
