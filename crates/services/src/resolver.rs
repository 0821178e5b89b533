use std::sync::Arc;

use quiz_core::model::{Quiz, QuizId, UserData, UserId};
use quiz_core::{Catalog, Clock};

/// Role names that get a badge in the quiz list. Nothing is enforced.
const SPECIAL_USERS: [&str; 3] = ["admin", "teacher", "instructor"];

/// Summary of what a user was assigned, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentInfo {
    pub user_id: UserId,
    pub total_available: usize,
    pub total_possible: usize,
    pub assigned_titles: Vec<String>,
    pub is_directly_assigned: bool,
}

impl AssignmentInfo {
    /// `"available/possible"`, e.g. `"2/4"`.
    #[must_use]
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.total_available, self.total_possible)
    }
}

/// Computes which catalog quizzes a user may take.
///
/// A user sees the quizzes tagged for them; a user with no tagged quizzes
/// sees the whole catalog. The same rule backs [`Resolver::can_user_access_quiz`].
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<Catalog>,
    clock: Clock,
}

impl Resolver {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, clock: Clock) -> Self {
        Self { catalog, clock }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn directly_assigned(&self, user: &UserId) -> Vec<QuizId> {
        self.catalog
            .iter()
            .filter(|quiz| quiz.access_policy().is_assigned_to(user))
            .map(Quiz::id)
            .collect()
    }

    /// Quiz ids assigned to `user`, in catalog order.
    #[must_use]
    pub fn user_quizzes(&self, user: &UserId) -> Vec<QuizId> {
        let assigned = self.directly_assigned(user);
        if assigned.is_empty() {
            self.catalog.ids()
        } else {
            assigned
        }
    }

    /// Fresh profile for a first login.
    #[must_use]
    pub fn initialize_user_data(&self, user: &UserId) -> UserData {
        UserData::new(user.clone(), self.user_quizzes(user), self.clock.now())
    }

    /// Recompute assignments for a returning user and stamp the login time.
    ///
    /// Creation time is kept. Progress is kept unless its quiz is still in
    /// the catalog but no longer matches the stored record.
    #[must_use]
    pub fn refresh_user_data(&self, existing: &UserData) -> UserData {
        let mut data = existing.clone();
        data.set_available_quizzes(self.user_quizzes(existing.user_id()));
        data.set_last_login_at(self.clock.now());
        data.retain_progress(|progress| {
            self.catalog
                .get(progress.quiz_id())
                .is_none_or(|quiz| progress.fits(quiz))
        });
        data
    }

    /// Catalog entries listed in `data`, in catalog order. Unknown ids are dropped.
    #[must_use]
    pub fn available_quizzes(&self, data: &UserData) -> Vec<&Quiz> {
        self.catalog
            .iter()
            .filter(|quiz| data.is_available(quiz.id()))
            .collect()
    }

    #[must_use]
    pub fn can_user_access_quiz(&self, user: &UserId, quiz_id: QuizId) -> bool {
        self.catalog.get(quiz_id).is_some() && self.user_quizzes(user).contains(&quiz_id)
    }

    #[must_use]
    pub fn is_special_user(user: &UserId) -> bool {
        SPECIAL_USERS.contains(&user.match_key().as_str())
    }

    #[must_use]
    pub fn assignment_info(&self, user: &UserId) -> AssignmentInfo {
        let available = self.user_quizzes(user);
        let assigned_titles = self
            .catalog
            .iter()
            .filter(|quiz| available.contains(&quiz.id()))
            .map(|quiz| quiz.title().to_string())
            .collect();
        AssignmentInfo {
            user_id: user.clone(),
            total_available: available.len(),
            total_possible: self.catalog.len(),
            assigned_titles,
            is_directly_assigned: !self.directly_assigned(user).is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::UserProgress;
    use quiz_core::time::fixed_now;

    const TAGGED: &str = r#"[
        { "id": 1, "title": "Alice quiz", "description": "", "difficulty": "beginner", "userId": "alice",
          "questions": [
            { "id": 1, "type": "true_false", "question": "Q1", "options": ["True", "False"], "correct": 0, "explanation": "" },
            { "id": 2, "type": "true_false", "question": "Q2", "options": ["True", "False"], "correct": 1, "explanation": "" }
          ] },
        { "id": 2, "title": "Bob quiz", "description": "", "difficulty": "advanced", "userId": "bob",
          "questions": [
            { "id": 1, "type": "multiple_choice", "question": "Q", "options": ["a", "b"], "correct": 0, "explanation": "" }
          ] }
    ]"#;

    fn resolver() -> Resolver {
        Resolver::new(
            Arc::new(Catalog::from_json(TAGGED).unwrap()),
            Clock::fixed(fixed_now()),
        )
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn tagged_user_gets_only_their_quizzes() {
        assert_eq!(resolver().user_quizzes(&user("alice")), vec![QuizId::new(1)]);
        assert_eq!(resolver().user_quizzes(&user("Alice")), vec![QuizId::new(1)]);
    }

    #[test]
    fn untagged_user_falls_back_to_whole_catalog() {
        assert_eq!(
            resolver().user_quizzes(&user("carol")),
            vec![QuizId::new(1), QuizId::new(2)]
        );
    }

    #[test]
    fn initialize_is_idempotent_for_untagged_admin() {
        let resolver = Resolver::new(Arc::new(Catalog::bundled().unwrap()), Clock::fixed(fixed_now()));
        let first = resolver.initialize_user_data(&user("admin"));
        let second = resolver.initialize_user_data(&user("admin"));
        assert_eq!(first.available_quizzes(), resolver.catalog().ids().as_slice());
        assert_eq!(first, second);
        assert!(first.progress().is_empty());
        assert_eq!(first.created_at(), first.last_login_at());
    }

    #[test]
    fn refresh_restores_subset_and_keeps_created_at() {
        let resolver = Resolver::new(
            Arc::new(Catalog::from_json(TAGGED).unwrap()),
            Clock::fixed(fixed_now() + Duration::days(1)),
        );
        let stale = UserData::new(
            user("bob"),
            vec![QuizId::new(1), QuizId::new(99)],
            fixed_now(),
        );
        let fresh = resolver.refresh_user_data(&stale);
        assert_eq!(fresh.available_quizzes(), &[QuizId::new(2)]);
        assert_eq!(fresh.created_at(), fixed_now());
        assert_eq!(fresh.last_login_at(), fixed_now() + Duration::days(1));
    }

    #[test]
    fn refresh_drops_progress_that_no_longer_fits_its_quiz() {
        const SHRUNK: &str = r#"[
            { "id": 1, "title": "Alice quiz", "description": "", "difficulty": "beginner", "userId": "alice",
              "questions": [
                { "id": 1, "type": "true_false", "question": "Q1", "options": ["True", "False"], "correct": 0, "explanation": "" }
              ] }
        ]"#;
        let before = resolver();
        let mut data = before.initialize_user_data(&user("alice"));
        let quiz = before.catalog().get(QuizId::new(1)).unwrap();
        data.record_progress(UserProgress::completed(quiz, 2, fixed_now()).unwrap());
        let orphan = UserProgress::completed(
            before.catalog().get(QuizId::new(2)).unwrap(),
            1,
            fixed_now(),
        )
        .unwrap();
        data.record_progress(orphan);

        let after = Resolver::new(
            Arc::new(Catalog::from_json(SHRUNK).unwrap()),
            Clock::fixed(fixed_now()),
        );
        let fresh = after.refresh_user_data(&data);
        assert!(fresh.progress_for(QuizId::new(1)).is_none());
        assert!(fresh.progress_for(QuizId::new(2)).is_some());
    }

    #[test]
    fn available_quizzes_keep_catalog_order_and_drop_unknown_ids() {
        let data = UserData::new(
            user("x"),
            vec![QuizId::new(2), QuizId::new(42), QuizId::new(1)],
            fixed_now(),
        );
        let resolver = resolver();
        let ids: Vec<QuizId> = resolver
            .available_quizzes(&data)
            .into_iter()
            .map(Quiz::id)
            .collect();
        assert_eq!(ids, vec![QuizId::new(1), QuizId::new(2)]);
    }

    #[test]
    fn access_check_follows_list_policy() {
        let resolver = resolver();
        assert!(resolver.can_user_access_quiz(&user("alice"), QuizId::new(1)));
        assert!(!resolver.can_user_access_quiz(&user("alice"), QuizId::new(2)));
        assert!(resolver.can_user_access_quiz(&user("carol"), QuizId::new(2)));
        assert!(!resolver.can_user_access_quiz(&user("carol"), QuizId::new(7)));
    }

    #[test]
    fn special_users_are_case_insensitive() {
        assert!(Resolver::is_special_user(&user("Teacher")));
        assert!(Resolver::is_special_user(&user("admin")));
        assert!(!Resolver::is_special_user(&user("student")));
    }

    #[test]
    fn assignment_info_reports_ratio_and_direct_flag() {
        let resolver = resolver();
        let bob = resolver.assignment_info(&user("bob"));
        assert_eq!(bob.ratio(), "1/2");
        assert_eq!(bob.assigned_titles, vec!["Bob quiz".to_string()]);
        assert!(bob.is_directly_assigned);

        let carol = resolver.assignment_info(&user("carol"));
        assert_eq!(carol.ratio(), "2/2");
        assert!(!carol.is_directly_assigned);
    }
}
