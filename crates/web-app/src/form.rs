use std::collections::BTreeMap;

use gymlog_domain::{Metric, MetricError, MetricSchema, Metrics};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub input: String,
    pub validated: Result<T, String>,
    pub orig: String,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        Self {
            input: String::new(),
            validated: Err(String::new()),
            orig: String::new(),
        }
    }
}

impl<T: ToString> FieldValue<T> {
    pub fn new(value: T) -> Self {
        let value_string = value.to_string();
        Self {
            input: value_string.clone(),
            validated: Ok(value),
            orig: value_string,
        }
    }
}

impl<T> FieldValue<T> {
    /// Error message to be shown, if the field has been edited and is invalid.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.validated {
            Err(err) if !err.is_empty() => Some(err),
            _ => None,
        }
    }
}

impl FieldValue<()> {
    pub fn has_valid_changes(values: &[&dyn FieldValueState]) -> bool {
        values.iter().any(|v| v.changed()) && values.iter().all(|v| v.valid())
    }
}

pub trait FieldValueState {
    fn valid(&self) -> bool;
    fn changed(&self) -> bool;
}

impl<T> FieldValueState for FieldValue<T> {
    fn valid(&self) -> bool {
        self.validated.is_ok()
    }

    fn changed(&self) -> bool {
        self.input.trim() != self.orig
    }
}

/// Input field of a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricField {
    pub metric: Metric,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub min: &'static str,
    pub step: &'static str,
    pub input: String,
    pub error: Option<String>,
}

/// Raw inputs of the metrics of a workout.
///
/// Only the metrics active in the current schema can be edited. When the schema changes, inputs
/// of metrics that are no longer active are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricInputs {
    schema: MetricSchema,
    inputs: BTreeMap<Metric, String>,
    orig: BTreeMap<Metric, String>,
    errors: BTreeMap<Metric, MetricError>,
}

impl MetricInputs {
    #[must_use]
    pub fn new(schema: MetricSchema) -> Self {
        Self {
            schema,
            inputs: BTreeMap::new(),
            orig: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Pre-populate the active metrics with the given values.
    #[must_use]
    pub fn from_metrics(schema: MetricSchema, metrics: &Metrics) -> Self {
        let inputs = schema
            .metrics()
            .iter()
            .map(|metric| (*metric, metrics.input(*metric)))
            .filter(|(_, input)| !input.is_empty())
            .collect::<BTreeMap<_, _>>();
        Self {
            schema,
            orig: inputs.clone(),
            inputs,
            errors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> MetricSchema {
        self.schema
    }

    pub fn set_schema(&mut self, schema: MetricSchema) {
        self.schema = schema;
        self.inputs.retain(|metric, _| schema.is_active(*metric));
        self.errors.clear();
    }

    /// Set the input of a metric. Inputs of inactive metrics are ignored.
    pub fn set(&mut self, metric: Metric, input: &str) {
        if !self.schema.is_active(metric) {
            return;
        }
        self.inputs.insert(metric, input.to_string());
        self.errors.remove(&metric);
    }

    #[must_use]
    pub fn input(&self, metric: Metric) -> &str {
        self.inputs.get(&metric).map_or("", String::as_str)
    }

    #[must_use]
    pub fn error(&self, metric: Metric) -> Option<&MetricError> {
        self.errors.get(&metric)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<MetricField> {
        self.schema
            .metrics()
            .iter()
            .map(|metric| MetricField {
                metric: *metric,
                label: metric.label(),
                placeholder: self.schema.placeholder(*metric),
                min: metric.min_value(),
                step: metric.step(),
                input: self.input(*metric).to_string(),
                error: self.error(*metric).map(ToString::to_string),
            })
            .collect()
    }

    /// Validate all active metrics.
    ///
    /// On failure, the errors are kept per field and `None` is returned.
    pub fn validate(&mut self) -> Option<Metrics> {
        match self.schema.validate(&self.inputs) {
            Ok(metrics) => {
                self.errors.clear();
                Some(metrics)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.orig.clear();
        self.errors.clear();
    }
}

impl FieldValueState for MetricInputs {
    fn valid(&self) -> bool {
        self.schema.validate(&self.inputs).is_ok()
    }

    fn changed(&self) -> bool {
        self.schema.metrics().iter().any(|metric| {
            self.inputs.get(metric).map(|i| i.trim())
                != self.orig.get(metric).map(String::as_str)
        })
    }
}
