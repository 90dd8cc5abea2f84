//! Metric schema
//!
//! Exercises of different muscle groups are measured in incompatible units. The metric schema of
//! an exercise determines which metrics are recorded for it, how they are validated and how they
//! are displayed. The entry form, the workout table and the edit dialog all derive their fields
//! from `MetricSchema::for_muscle_group`.

use std::collections::BTreeMap;

use derive_more::{Display, Into};

use crate::MuscleGroup;

/// Marker shown in place of a metric that has no value.
pub const ABSENT: &str = "-";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricSchema {
    #[default]
    Strength,
    Functional,
    Abdomen,
    Cardio,
}

impl MetricSchema {
    #[must_use]
    pub fn for_muscle_group(muscle_group: MuscleGroup) -> Self {
        match muscle_group {
            MuscleGroup::Cardio => MetricSchema::Cardio,
            MuscleGroup::Abdomen => MetricSchema::Abdomen,
            MuscleGroup::Functional => MetricSchema::Functional,
            MuscleGroup::Chest
            | MuscleGroup::Back
            | MuscleGroup::Legs
            | MuscleGroup::Glutes
            | MuscleGroup::Shoulders
            | MuscleGroup::Arms
            | MuscleGroup::Other => MetricSchema::Strength,
        }
    }

    #[must_use]
    pub fn primary(self) -> Metric {
        match self {
            MetricSchema::Strength | MetricSchema::Functional => Metric::Weight,
            MetricSchema::Abdomen => Metric::Repetitions,
            MetricSchema::Cardio => Metric::Time,
        }
    }

    #[must_use]
    pub fn secondary(self) -> Metric {
        match self {
            MetricSchema::Strength | MetricSchema::Functional => Metric::Repetitions,
            MetricSchema::Abdomen => Metric::Time,
            MetricSchema::Cardio => Metric::Distance,
        }
    }

    #[must_use]
    pub fn shows_sets(self) -> bool {
        self != MetricSchema::Cardio
    }

    /// Active metrics in the order in which they are presented.
    #[must_use]
    pub fn metrics(self) -> &'static [Metric] {
        match self {
            MetricSchema::Strength | MetricSchema::Functional => {
                &[Metric::Weight, Metric::Repetitions, Metric::Sets]
            }
            MetricSchema::Abdomen => &[Metric::Repetitions, Metric::Time, Metric::Sets],
            MetricSchema::Cardio => &[Metric::Time, Metric::Distance],
        }
    }

    #[must_use]
    pub fn is_active(self, metric: Metric) -> bool {
        self.metrics().contains(&metric)
    }

    #[must_use]
    pub fn placeholder(self, metric: Metric) -> Option<&'static str> {
        if !self.is_active(metric) {
            return None;
        }
        if metric == Metric::Sets {
            return Some("3");
        }
        let (primary, secondary) = match self {
            MetricSchema::Strength => ("50", "10"),
            MetricSchema::Functional => ("20", "15"),
            MetricSchema::Abdomen => ("20", "5"),
            MetricSchema::Cardio => ("30", "5"),
        };
        if metric == self.primary() {
            Some(primary)
        } else {
            Some(secondary)
        }
    }

    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            MetricSchema::Strength => None,
            MetricSchema::Functional => Some("Use the weight of the implement if applicable"),
            MetricSchema::Abdomen => Some("Record the repetitions and the total time"),
            MetricSchema::Cardio => Some("Record the duration and the distance if applicable"),
        }
    }

    /// Validate the inputs of all active metrics.
    ///
    /// Inputs of inactive metrics are ignored. Every active metric is required. On failure, an
    /// error is returned for each invalid field.
    pub fn validate(
        self,
        inputs: &BTreeMap<Metric, String>,
    ) -> Result<Metrics, BTreeMap<Metric, MetricError>> {
        let mut metrics = Metrics::default();
        let mut errors = BTreeMap::new();

        for metric in self.metrics() {
            let input = inputs.get(metric).map_or("", String::as_str);
            match metric.parse(input) {
                Ok(value) => metrics.set(value),
                Err(err) => {
                    errors.insert(*metric, err);
                }
            }
        }

        if errors.is_empty() {
            Ok(metrics)
        } else {
            Err(errors)
        }
    }

    /// Remove the values of all inactive metrics.
    #[must_use]
    pub fn restrict(self, metrics: &Metrics) -> Metrics {
        Metrics {
            weight: metrics.weight.filter(|_| self.is_active(Metric::Weight)),
            reps: metrics.reps.filter(|_| self.is_active(Metric::Repetitions)),
            sets: metrics.sets.filter(|_| self.is_active(Metric::Sets)),
            time: metrics.time.filter(|_| self.is_active(Metric::Time)),
            distance: metrics.distance.filter(|_| self.is_active(Metric::Distance)),
        }
    }

    #[must_use]
    pub fn format_primary(self, metrics: &Metrics) -> String {
        match self {
            MetricSchema::Strength | MetricSchema::Functional => {
                or_absent(metrics.weight.map(|w| format!("{w} kg")))
            }
            MetricSchema::Abdomen => sets_x_reps(metrics),
            MetricSchema::Cardio => or_absent(metrics.time.map(|t| format!("{t} min"))),
        }
    }

    #[must_use]
    pub fn format_secondary(self, metrics: &Metrics) -> String {
        match self {
            MetricSchema::Strength | MetricSchema::Functional => sets_x_reps(metrics),
            MetricSchema::Abdomen => or_absent(metrics.time.map(|t| format!("{t} min"))),
            MetricSchema::Cardio => or_absent(metrics.distance.map(|d| format!("{d} km"))),
        }
    }
}

fn sets_x_reps(metrics: &Metrics) -> String {
    match (metrics.sets, metrics.reps) {
        (Some(sets), Some(reps)) => format!("{sets} x {reps}"),
        (None, Some(reps)) => reps.to_string(),
        (_, None) => ABSENT.to_string(),
    }
}

fn or_absent(value: Option<String>) -> String {
    value.unwrap_or_else(|| ABSENT.to_string())
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Weight,
    Repetitions,
    Sets,
    Time,
    Distance,
}

impl Metric {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Weight => "Weight (kg)",
            Metric::Repetitions => "Repetitions",
            Metric::Sets => "Sets",
            Metric::Time => "Time (min)",
            Metric::Distance => "Distance (km)",
        }
    }

    #[must_use]
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Metric::Weight => Some("kg"),
            Metric::Repetitions | Metric::Sets => None,
            Metric::Time => Some("min"),
            Metric::Distance => Some("km"),
        }
    }

    /// Smallest valid value, as used for the `min` attribute of an input field.
    #[must_use]
    pub fn min_value(self) -> &'static str {
        match self {
            Metric::Repetitions | Metric::Sets => "1",
            Metric::Weight | Metric::Time | Metric::Distance => "0",
        }
    }

    #[must_use]
    pub fn step(self) -> &'static str {
        match self {
            Metric::Weight => "0.5",
            Metric::Repetitions | Metric::Sets | Metric::Time => "1",
            Metric::Distance => "0.1",
        }
    }

    pub fn parse(self, input: &str) -> Result<MetricValue, MetricError> {
        Ok(match self {
            Metric::Weight => MetricValue::Weight(Weight::parse(input)?),
            Metric::Repetitions => MetricValue::Reps(Reps::parse(input)?),
            Metric::Sets => MetricValue::Sets(Sets::parse(input)?),
            Metric::Time => MetricValue::Time(Time::parse(input)?),
            Metric::Distance => MetricValue::Distance(Distance::parse(input)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Weight(Weight),
    Reps(Reps),
    Sets(Sets),
    Time(Time),
    Distance(Distance),
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub sets: Option<Sets>,
    pub time: Option<Time>,
    pub distance: Option<Distance>,
}

impl Metrics {
    pub fn set(&mut self, value: MetricValue) {
        match value {
            MetricValue::Weight(weight) => self.weight = Some(weight),
            MetricValue::Reps(reps) => self.reps = Some(reps),
            MetricValue::Sets(sets) => self.sets = Some(sets),
            MetricValue::Time(time) => self.time = Some(time),
            MetricValue::Distance(distance) => self.distance = Some(distance),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, metric: Metric) -> Option<f32> {
        match metric {
            Metric::Weight => self.weight.map(f32::from),
            Metric::Repetitions => self.reps.map(|r| u32::from(r) as f32),
            Metric::Sets => self.sets.map(|s| u32::from(s) as f32),
            Metric::Time => self.time.map(f32::from),
            Metric::Distance => self.distance.map(f32::from),
        }
    }

    /// Value formatted for an input field, empty if absent.
    #[must_use]
    pub fn input(&self, metric: Metric) -> String {
        match metric {
            Metric::Weight => self.weight.map(|v| v.to_string()),
            Metric::Repetitions => self.reps.map(|v| v.to_string()),
            Metric::Sets => self.sets.map(|v| v.to_string()),
            Metric::Time => self.time.map(|v| v.to_string()),
            Metric::Distance => self.distance.map(|v| v.to_string()),
        }
        .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Metrics::default()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum MetricError {
    #[error("{} is required", .0.label())]
    Missing(Metric),
    #[error("{} must be a number", .0.label())]
    ParseError(Metric),
    #[error("{} must not be negative", .0.label())]
    Negative(Metric),
    #[error("{} must be a whole number", .0.label())]
    NotWhole(Metric),
    #[error("{} must be at least 1", .0.label())]
    BelowOne(Metric),
    #[error("{} must be less than {}", .0.label(), .1)]
    TooLarge(Metric, u32),
}

fn parse_number(metric: Metric, input: &str) -> Result<f32, MetricError> {
    let input = input.trim().replace(',', ".");
    if input.is_empty() {
        return Err(MetricError::Missing(metric));
    }
    match input.parse::<f32>() {
        Ok(value) if value.is_finite() => {
            if value < 0.0 {
                Err(MetricError::Negative(metric))
            } else {
                // -0 is not negative
                Ok(value.abs())
            }
        }
        _ => Err(MetricError::ParseError(metric)),
    }
}

fn check_decimal(metric: Metric, value: f32, limit: u32) -> Result<f32, MetricError> {
    let value = check_stored_decimal(metric, value)?;
    if f64::from(value) >= f64::from(limit) {
        return Err(MetricError::TooLarge(metric, limit));
    }
    Ok(value)
}

fn check_stored_decimal(metric: Metric, value: f32) -> Result<f32, MetricError> {
    if !value.is_finite() {
        return Err(MetricError::ParseError(metric));
    }
    if value < 0.0 {
        return Err(MetricError::Negative(metric));
    }
    Ok(value.abs())
}

fn check_count(metric: Metric, value: u32, limit: u32) -> Result<u32, MetricError> {
    if value < 1 {
        return Err(MetricError::BelowOne(metric));
    }
    if value >= limit {
        return Err(MetricError::TooLarge(metric, limit));
    }
    Ok(value)
}

fn parse_count(metric: Metric, input: &str, limit: u32) -> Result<u32, MetricError> {
    let value = parse_number(metric, input)?;
    if value.fract() != 0.0 {
        return Err(MetricError::NotWhole(metric));
    }
    if f64::from(value) >= f64::from(limit) {
        return Err(MetricError::TooLarge(metric, limit));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value as u32;
    check_count(metric, count, limit)
}

macro_rules! decimal_metric {
    ($name: ident, $metric: expr, $limit: literal) => {
        #[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
        pub struct $name(f32);

        impl $name {
            pub fn new(value: f32) -> Result<Self, MetricError> {
                Ok(Self(check_decimal($metric, value, $limit)?))
            }

            /// Accept a value recorded earlier, which is not subject to the upper input limit.
            pub fn from_stored(value: f32) -> Result<Self, MetricError> {
                Ok(Self(check_stored_decimal($metric, value)?))
            }

            pub fn parse(input: &str) -> Result<Self, MetricError> {
                Self::new(parse_number($metric, input)?)
            }
        }
    };
}

macro_rules! count_metric {
    ($name: ident, $metric: expr, $limit: literal) => {
        #[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn new(value: u32) -> Result<Self, MetricError> {
                Ok(Self(check_count($metric, value, $limit)?))
            }

            /// Accept a value recorded earlier, which is not subject to the input limits.
            #[must_use]
            pub fn from_stored(value: u32) -> Self {
                Self(value)
            }

            pub fn parse(input: &str) -> Result<Self, MetricError> {
                Ok(Self(parse_count($metric, input, $limit)?))
            }
        }
    };
}

decimal_metric!(Weight, Metric::Weight, 1000);
decimal_metric!(Time, Metric::Time, 10000);
decimal_metric!(Distance, Metric::Distance, 1000);
count_metric!(Reps, Metric::Repetitions, 1000);
count_metric!(Sets, Metric::Sets, 100);
