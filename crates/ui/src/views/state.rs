use services::FlowError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    EmptyUserId,
    Unavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::EmptyUserId => "Please enter a user id.",
            ViewError::Unavailable => "That action is not available right now.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&FlowError> for ViewError {
    fn from(err: &FlowError) -> Self {
        match err {
            FlowError::EmptyUserId => ViewError::EmptyUserId,
            FlowError::InvalidTransition { .. } | FlowError::NoActiveUser => {
                ViewError::Unavailable
            }
            _ => ViewError::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::Screen;

    #[test]
    fn flow_errors_map_to_user_messages() {
        assert_eq!(ViewError::from(&FlowError::EmptyUserId), ViewError::EmptyUserId);
        let invalid = FlowError::InvalidTransition {
            action: "retry",
            screen: Screen::List,
        };
        assert_eq!(ViewError::from(&invalid), ViewError::Unavailable);
        assert!(ViewError::Unknown.message().contains("try again"));
    }
}
