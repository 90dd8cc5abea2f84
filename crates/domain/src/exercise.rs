use std::{
    collections::{BTreeMap, HashSet},
    slice::Iter,
};

use derive_more::{Deref, Display};

use crate::{CreateError, MetricSchema, Name, ReadError, UserID, ValidationError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        muscle_group: MuscleGroup,
        description: Option<String>,
    ) -> Result<Exercise, CreateError>;

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.get_exercises()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(ReadError::NotFound)
    }

    async fn validate_exercise_name(&self, name: &str) -> Result<Name, ValidationError> {
        match Name::new(name) {
            Ok(name) => match self.get_exercises().await {
                Ok(exercises) => {
                    if exercises.iter().all(|e| !e.name.matches(&name)) {
                        Ok(name)
                    } else {
                        Err(ValidationError::Conflict("name".to_string()))
                    }
                }
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }

    fn validate_exercise_muscle_group(
        &self,
        muscle_group: &str,
    ) -> Result<MuscleGroup, ValidationError> {
        muscle_group
            .trim()
            .parse::<MuscleGroup>()
            .map_err(|_| ValidationError::Other("Select a muscle group".into()))
    }

    #[must_use]
    fn validate_exercise_description(&self, description: &str) -> Option<String> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn create_exercise(
        &self,
        name: Name,
        muscle_group: MuscleGroup,
        description: Option<String>,
    ) -> Result<Exercise, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle_group: MuscleGroup,
    pub description: Option<String>,
    pub owner: Option<UserID>,
}

impl Exercise {
    /// Exercises without an owner are predefined and shared by all users.
    #[must_use]
    pub fn is_personal(&self) -> bool {
        self.owner.is_some()
    }

    #[must_use]
    pub fn metric_schema(&self) -> MetricSchema {
        MetricSchema::for_muscle_group(self.muscle_group)
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(u32);

impl From<u32> for ExerciseID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum MuscleGroup {
    #[strum(to_string = "Chest", serialize = "Pecho")]
    Chest,
    #[strum(to_string = "Back", serialize = "Espalda")]
    Back,
    #[strum(to_string = "Legs", serialize = "Piernas")]
    Legs,
    #[strum(to_string = "Glutes", serialize = "Glúteos", serialize = "Gluteos")]
    Glutes,
    #[strum(to_string = "Shoulders", serialize = "Hombros")]
    Shoulders,
    #[strum(to_string = "Arms", serialize = "Brazos")]
    Arms,
    Abdomen,
    Cardio,
    #[strum(to_string = "Functional", serialize = "Funcional")]
    Functional,
    #[strum(to_string = "Other", serialize = "Otro")]
    Other,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 10] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Legs,
            MuscleGroup::Glutes,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Abdomen,
            MuscleGroup::Cardio,
            MuscleGroup::Functional,
            MuscleGroup::Other,
        ];
        MUSCLE_GROUPS.iter()
    }

    fn name(self) -> &'static str {
        self.into()
    }
}

/// Group exercises by muscle group.
///
/// Groups follow the order of `MuscleGroup::iter`, exercises inside a group are sorted by name.
/// Muscle groups without exercises are omitted.
#[must_use]
pub fn group_by_muscle_group<'a>(
    exercises: impl Iterator<Item = &'a Exercise>,
) -> Vec<(MuscleGroup, Vec<&'a Exercise>)> {
    let mut groups: BTreeMap<MuscleGroup, Vec<&'a Exercise>> = BTreeMap::new();

    for exercise in exercises {
        groups.entry(exercise.muscle_group).or_default().push(exercise);
    }

    MuscleGroup::iter()
        .filter_map(|muscle_group| {
            groups.remove(muscle_group).map(|mut exercises| {
                exercises.sort_by_key(|e| e.name.as_ref().to_lowercase());
                (*muscle_group, exercises)
            })
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub muscle_groups: HashSet<MuscleGroup>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        exercises
            .filter(|e| {
                e.name
                    .as_ref()
                    .to_lowercase()
                    .contains(self.name.to_lowercase().trim())
                    && (self.muscle_groups.is_empty()
                        || self.muscle_groups.contains(&e.muscle_group))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.muscle_groups.is_empty()
    }

    #[must_use]
    pub fn muscle_group_list(&self) -> Vec<(MuscleGroup, bool)> {
        MuscleGroup::iter_filter()
            .map(|m| (*m, self.muscle_groups.contains(m)))
            .collect::<Vec<_>>()
    }

    pub fn toggle_muscle_group(&mut self, muscle_group: MuscleGroup) {
        if self.muscle_groups.contains(&muscle_group) {
            self.muscle_groups.remove(&muscle_group);
        } else {
            self.muscle_groups.insert(muscle_group);
        }
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn iter_filter() -> Iter<'static, Self> {
        Self::iter()
    }
    fn name(self) -> &'static str;
}
