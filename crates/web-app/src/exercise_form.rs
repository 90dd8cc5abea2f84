use gymlog_domain::{Exercise, ExerciseService, MuscleGroup, Name, Property};

use crate::{
    ActionError,
    form::{FieldValue, FieldValueState},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseForm {
    pub name: FieldValue<Name>,
    pub muscle_group: FieldValue<MuscleGroup>,
    pub description: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ExerciseForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Muscle groups available for selection and whether they are selected.
    #[must_use]
    pub fn muscle_groups(&self) -> Vec<(MuscleGroup, bool)> {
        MuscleGroup::iter()
            .map(|m| (*m, self.muscle_group.validated.as_ref() == Ok(m)))
            .collect()
    }

    /// Set and validate the name, which must not match the name of an existing exercise.
    pub async fn set_name(&mut self, input: &str, service: &impl ExerciseService) {
        self.name.input = input.to_string();
        self.name.validated = service
            .validate_exercise_name(input)
            .await
            .map_err(|err| err.to_string());
    }

    pub fn set_muscle_group(&mut self, input: &str, service: &impl ExerciseService) {
        self.muscle_group.input = input.to_string();
        self.muscle_group.validated = service
            .validate_exercise_muscle_group(input)
            .map_err(|err| err.to_string());
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    #[must_use]
    pub fn is_submittable(&self) -> bool {
        FieldValue::has_valid_changes(&[
            &self.name as &dyn FieldValueState,
            &self.muscle_group,
        ])
    }

    pub async fn submit(&mut self, service: &impl ExerciseService) -> Result<Exercise, ActionError> {
        self.error = None;
        let (Ok(name), Ok(muscle_group)) = (
            self.name.validated.clone(),
            self.muscle_group.validated.clone(),
        ) else {
            if self.name.validated.is_err() && self.name.error().is_none() {
                if let Err(err) = Name::new(&self.name.input) {
                    self.name.validated = Err(err.to_string());
                }
            }
            if self.muscle_group.validated.is_err() && self.muscle_group.error().is_none() {
                self.muscle_group.validated = Err("Select a muscle group".to_string());
            }
            return Err(ActionError::Validation(
                "Check the highlighted fields".to_string(),
            ));
        };
        let description = service.validate_exercise_description(&self.description);

        self.is_loading = true;
        let result = service
            .create_exercise(name, muscle_group, description)
            .await;
        self.is_loading = false;

        match result {
            Ok(exercise) => {
                *self = Self::default();
                Ok(exercise)
            }
            Err(err) => {
                let err = ActionError::from(err);
                if err != ActionError::Unauthorized {
                    self.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::tests::{Call, Failure, FakeService};

    use super::*;

    #[rstest]
    #[case("Deadlift", None)]
    #[case("  Deadlift ", None)]
    #[case("bench press", Some("name already exists"))]
    #[case("D", Some("Name must be 2 characters or more (1 < 2)"))]
    #[case(" ", Some("Name must not be empty"))]
    #[tokio::test]
    async fn test_set_name(#[case] input: &str, #[case] error: Option<&str>) {
        let service = FakeService::new();
        let mut form = ExerciseForm::new();

        form.set_name(input, &service).await;

        assert_eq!(form.name.error(), error);
        assert_eq!(form.name.input, input);
    }

    #[test]
    fn test_set_muscle_group() {
        let service = FakeService::new();
        let mut form = ExerciseForm::new();

        form.set_muscle_group("legs", &service);
        assert_eq!(form.muscle_group.validated, Ok(MuscleGroup::Legs));
        assert_eq!(
            form.muscle_groups()
                .iter()
                .filter(|(_, selected)| *selected)
                .collect::<Vec<_>>(),
            vec![&(MuscleGroup::Legs, true)]
        );

        form.set_muscle_group("", &service);
        assert_eq!(form.muscle_group.error(), Some("Select a muscle group"));
    }

    #[tokio::test]
    async fn test_submit() {
        let service = FakeService::new();
        let mut form = ExerciseForm::new();
        assert!(!form.is_submittable());

        form.set_name("Deadlift", &service).await;
        form.set_muscle_group("Back", &service);
        form.set_description("  ");
        assert!(form.is_submittable());

        let exercise = form.submit(&service).await.unwrap();

        assert_eq!(exercise.name.as_ref(), "Deadlift");
        assert_eq!(exercise.muscle_group, MuscleGroup::Back);
        assert_eq!(exercise.description, None);
        assert!(exercise.is_personal());
        assert_eq!(form, ExerciseForm::default());
        assert_eq!(
            service.calls().last(),
            Some(&Call::CreateExercise("Deadlift".to_string()))
        );
    }

    #[tokio::test]
    async fn test_submit_incomplete_sends_nothing() {
        let service = FakeService::new();
        let mut form = ExerciseForm::new();

        assert_eq!(
            form.submit(&service).await,
            Err(ActionError::Validation(
                "Check the highlighted fields".to_string()
            ))
        );
        assert_eq!(form.name.error(), Some("Name must not be empty"));
        assert_eq!(form.muscle_group.error(), Some("Select a muscle group"));
        assert_eq!(service.calls(), vec![]);
    }

    #[tokio::test]
    async fn test_submit_failure() {
        let service = FakeService::new();
        let mut form = ExerciseForm::new();
        form.set_name("Deadlift", &service).await;
        form.set_muscle_group("Back", &service);
        *service.failure.borrow_mut() = Some(Failure::NoConnection);

        assert_eq!(
            form.submit(&service).await,
            Err(ActionError::Request("No connection to server".to_string()))
        );
        assert_eq!(form.error.as_deref(), Some("No connection to server"));
        assert_eq!(form.name.input, "Deadlift");
    }
}
