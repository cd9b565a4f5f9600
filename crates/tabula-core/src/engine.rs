//! Compiled decision tables and first-match evaluation.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::domain::{
    CompileError, InputColumn, Inputs, OutputColumn, TableDefinition, Value,
};
use crate::expr::{Predicate, compile_input_expression, compile_output_expression};

static ABSENT: Value = Value::Absent;

/// Result of one evaluation: the output column name mapped to the payload of
/// the rule that fired, or to `null` when none did.
pub type Outputs = BTreeMap<String, Value>;

/// One compiled input entry of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    input: String,
    predicate: Predicate,
}

impl Condition {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    fn holds(&self, inputs: &Inputs) -> bool {
        self.predicate
            .test(inputs.get(&self.input).unwrap_or(&ABSENT))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    conditions: Vec<Condition>,
    output: Value,
    description: Option<String>,
}

impl CompiledRule {
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn output(&self) -> &Value {
        &self.output
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Conjunction of all conditions, stopping at the first that fails.
    pub fn matches(&self, inputs: &Inputs) -> bool {
        self.conditions.iter().all(|c| c.holds(inputs))
    }
}

/// A rule that fired, with its 0-based position in the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a CompiledRule,
}

/// A decision table whose entries have all been compiled.
///
/// Immutable once built; share it behind an `Arc` and evaluate from as many
/// threads as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTable {
    name: Option<String>,
    inputs: Vec<InputColumn>,
    output: OutputColumn,
    rules: Vec<CompiledRule>,
}

impl DecisionTable {
    /// Compiles every entry of `definition`.
    ///
    /// Fails on the first malformed entry; a partially compiled table is never
    /// returned.
    #[instrument(
        name = "table::compile",
        level = "debug",
        skip_all,
        fields(table = definition.name.as_deref().unwrap_or("<unnamed>"))
    )]
    pub fn compile(definition: &TableDefinition) -> Result<Self, CompileError> {
        if definition.rules.is_empty() {
            return Err(CompileError::NoRules);
        }

        let mut seen = HashSet::with_capacity(definition.inputs.len());
        for column in &definition.inputs {
            if !seen.insert(column.name.as_str()) {
                return Err(CompileError::DuplicateInput(column.name.clone()));
            }
        }

        let rules = definition
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| -> Result<CompiledRule, CompileError> {
                let number = i + 1;
                if rule.inputs.len() != definition.inputs.len() {
                    return Err(CompileError::ArityMismatch {
                        rule: number,
                        expected: definition.inputs.len(),
                        found: rule.inputs.len(),
                    });
                }

                let conditions = definition
                    .inputs
                    .iter()
                    .zip(&rule.inputs)
                    .map(|(column, entry)| -> Result<Condition, CompileError> {
                        let predicate = compile_input_expression(entry).map_err(|source| {
                            CompileError::InputEntry {
                                rule: number,
                                column: column.name.clone(),
                                source,
                            }
                        })?;
                        Ok(Condition {
                            input: column.name.clone(),
                            predicate,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let output = compile_output_expression(&rule.output).map_err(|source| {
                    CompileError::OutputEntry {
                        rule: number,
                        column: definition.output.name.clone(),
                        source,
                    }
                })?;

                Ok(CompiledRule {
                    conditions,
                    output,
                    description: rule.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            inputs = definition.inputs.len(),
            rules = rules.len(),
            "compiled decision table"
        );

        Ok(Self {
            name: definition.name.clone(),
            inputs: definition.inputs.clone(),
            output: definition.output.clone(),
            rules,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn inputs(&self) -> &[InputColumn] {
        &self.inputs
    }

    pub fn output(&self) -> &OutputColumn {
        &self.output
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Finds the first rule, in table order, whose conditions all hold.
    pub fn first_match(&self, inputs: &Inputs) -> Option<RuleMatch<'_>> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(inputs))
            .map(|(index, rule)| RuleMatch { index, rule })
    }

    /// Evaluates the table with first-match-wins semantics.
    ///
    /// No match is not an error: the output column maps to `null`.
    pub fn evaluate(&self, inputs: &Inputs) -> Outputs {
        self.evaluate_with_match(inputs).1
    }

    /// Like [`evaluate`](Self::evaluate), but also reports which rule fired.
    /// The rules are scanned once.
    #[instrument(
        name = "table::evaluate",
        level = "trace",
        skip_all,
        fields(table = self.name().unwrap_or("<unnamed>"))
    )]
    pub fn evaluate_with_match(&self, inputs: &Inputs) -> (Option<RuleMatch<'_>>, Outputs) {
        let hit = self.first_match(inputs);
        let value = match &hit {
            Some(hit) => {
                trace!(rule = hit.index + 1, output = %hit.rule.output, "rule matched");
                hit.rule.output.clone()
            }
            None => {
                trace!("no rule matched");
                Value::Absent
            }
        };

        (hit, BTreeMap::from([(self.output.name.clone(), value)]))
    }
}
