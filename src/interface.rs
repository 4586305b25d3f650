//! The five fixed sub-channels of an action.
//!
//! An action is composed of three request/response service channels (goal
//! submission, cancellation, result retrieval) and two continuous topics
//! (feedback and status). Every record printed by the tool is tagged with
//! the interface it arrived on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the five fixed sub-channels of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionInterface {
    /// Goal submission service events.
    GoalService,
    /// Cancellation service events.
    CancelService,
    /// Result retrieval service events.
    ResultService,
    /// Continuous feedback topic.
    FeedbackTopic,
    /// Goal status topic.
    StatusTopic,
}

impl ActionInterface {
    /// All five interfaces in canonical order.
    pub const ALL: [Self; 5] = [
        Self::GoalService,
        Self::CancelService,
        Self::ResultService,
        Self::FeedbackTopic,
        Self::StatusTopic,
    ];

    /// The label embedded in every printed record.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GoalService => "GOAL_SERVICE",
            Self::CancelService => "CANCEL_SERVICE",
            Self::ResultService => "RESULT_SERVICE",
            Self::FeedbackTopic => "FEEDBACK_TOPIC",
            Self::StatusTopic => "STATUS_TOPIC",
        }
    }

    /// The lowercase spelling accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GoalService => "goal_service",
            Self::CancelService => "cancel_service",
            Self::ResultService => "result_service",
            Self::FeedbackTopic => "feedback_topic",
            Self::StatusTopic => "status_topic",
        }
    }

    /// Returns true for the three channels that carry service-event
    /// envelopes; the remaining two carry plain topic messages.
    #[must_use]
    pub const fn is_service_event(self) -> bool {
        matches!(
            self,
            Self::GoalService | Self::CancelService | Self::ResultService
        )
    }

    /// The concrete channel name for this interface of the named action.
    #[must_use]
    pub fn channel_name(self, action_name: &str) -> String {
        match self {
            Self::GoalService => format!("{action_name}/_action/send_goal/_service_event"),
            Self::CancelService => format!("{action_name}/_action/cancel_goal/_service_event"),
            Self::ResultService => format!("{action_name}/_action/get_result/_service_event"),
            Self::FeedbackTopic => format!("{action_name}/_action/feedback"),
            Self::StatusTopic => format!("{action_name}/_action/status"),
        }
    }
}

impl fmt::Display for ActionInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionInterface {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal_service" => Ok(Self::GoalService),
            "cancel_service" => Ok(Self::CancelService),
            "result_service" => Ok(Self::ResultService),
            "feedback_topic" => Ok(Self::FeedbackTopic),
            "status_topic" => Ok(Self::StatusTopic),
            other => Err(ConfigError::InvalidInterface {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_interfaces() {
        for interface in ActionInterface::ALL {
            let parsed: ActionInterface = interface.name().parse().unwrap();
            assert_eq!(parsed, interface);
        }
    }

    #[test]
    fn test_parse_rejects_bogus_name() {
        let err = "bogus".parse::<ActionInterface>().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("bogus"));
    }

    #[test]
    fn test_parse_rejects_label_spelling() {
        // Only the lowercase spelling is accepted on the command line.
        assert!("GOAL_SERVICE".parse::<ActionInterface>().is_err());
    }

    #[test]
    fn test_labels_are_uppercase_names() {
        for interface in ActionInterface::ALL {
            assert_eq!(interface.label(), interface.name().to_uppercase());
        }
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(
            ActionInterface::GoalService.channel_name("/fibonacci"),
            "/fibonacci/_action/send_goal/_service_event"
        );
        assert_eq!(
            ActionInterface::CancelService.channel_name("/fibonacci"),
            "/fibonacci/_action/cancel_goal/_service_event"
        );
        assert_eq!(
            ActionInterface::ResultService.channel_name("/fibonacci"),
            "/fibonacci/_action/get_result/_service_event"
        );
        assert_eq!(
            ActionInterface::FeedbackTopic.channel_name("/fibonacci"),
            "/fibonacci/_action/feedback"
        );
        assert_eq!(
            ActionInterface::StatusTopic.channel_name("/fibonacci"),
            "/fibonacci/_action/status"
        );
    }

    #[test]
    fn test_service_event_split() {
        assert!(ActionInterface::GoalService.is_service_event());
        assert!(ActionInterface::CancelService.is_service_event());
        assert!(ActionInterface::ResultService.is_service_event());
        assert!(!ActionInterface::FeedbackTopic.is_service_event());
        assert!(!ActionInterface::StatusTopic.is_service_event());
    }
}
