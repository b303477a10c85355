//! Builders for DynamoDB update, condition and key-condition expressions.
//!
//! Every attribute is referenced through a `#name` placeholder and every value
//! through a `:name` placeholder, so reserved words such as `name` and `type`
//! never appear in the raw expression text.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// Expression text plus the placeholder maps it refers to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl RenderedExpression {
    /// Fold another expression's placeholders into this one
    pub fn absorb_placeholders(&mut self, other: RenderedExpression) {
        self.names.extend(other.names);
        self.values.extend(other.values);
    }
}

fn name_placeholder(attribute: &str) -> String {
    format!("#{}", attribute)
}

fn value_placeholder(attribute: &str) -> String {
    format!(":{}", attribute)
}

/// `SET` clause assembled one attribute at a time, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<(String, AttributeValue)>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `attribute`, replacing an earlier assignment to the same attribute
    pub fn set(mut self, attribute: &str, value: AttributeValue) -> Self {
        match self
            .assignments
            .iter_mut()
            .find(|(existing, _)| existing == attribute)
        {
            Some((_, existing_value)) => *existing_value = value,
            None => self.assignments.push((attribute.to_string(), value)),
        }
        self
    }

    /// Assign a string attribute only when a non-empty value is supplied
    pub fn set_non_empty(self, attribute: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => {
                self.set(attribute, AttributeValue::S(value.to_string()))
            }
            _ => self,
        }
    }

    pub fn assignments(&self) -> &[(String, AttributeValue)] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn render(&self) -> RenderedExpression {
        let mut rendered = RenderedExpression::default();
        let clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|(attribute, value)| {
                let name = name_placeholder(attribute);
                let placeholder = value_placeholder(attribute);
                let clause = format!("{} = {}", name, placeholder);
                rendered.names.insert(name, attribute.clone());
                rendered.values.insert(placeholder, value.clone());
                clause
            })
            .collect();
        rendered.expression = format!("SET {}", clauses.join(", "));
        rendered
    }
}

/// Precondition attached to a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    AttributeExists(String),
}

impl Condition {
    pub fn render(&self) -> RenderedExpression {
        match self {
            Condition::AttributeExists(attribute) => {
                let name = name_placeholder(attribute);
                RenderedExpression {
                    expression: format!("attribute_exists({})", name),
                    names: HashMap::from([(name, attribute.clone())]),
                    values: HashMap::new(),
                }
            }
        }
    }
}

/// Conjunction of equality tests on key attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyCondition {
    equals: Vec<(String, AttributeValue)>,
}

impl KeyCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, attribute: &str, value: AttributeValue) -> Self {
        self.equals.push((attribute.to_string(), value));
        self
    }

    pub fn equals(&self) -> &[(String, AttributeValue)] {
        &self.equals
    }

    pub fn render(&self) -> RenderedExpression {
        let mut rendered = RenderedExpression::default();
        let clauses: Vec<String> = self
            .equals
            .iter()
            .map(|(attribute, value)| {
                let name = name_placeholder(attribute);
                let placeholder = value_placeholder(attribute);
                let clause = format!("{} = {}", name, placeholder);
                rendered.names.insert(name, attribute.clone());
                rendered.values.insert(placeholder, value.clone());
                clause
            })
            .collect();
        rendered.expression = clauses.join(" AND ");
        rendered
    }

    /// True when `item` carries every attribute with an equal value
    pub fn matches(&self, item: &HashMap<String, AttributeValue>) -> bool {
        self.equals
            .iter()
            .all(|(attribute, value)| item.get(attribute) == Some(value))
    }
}
