//! Run configuration.
//!
//! All knobs are validated up front; nothing is subscribed and no thread is
//! spawned until the whole configuration is known good.

use std::time::Duration;

use crate::error::ConfigError;
use crate::format::FormatOptions;
use crate::interface::ActionInterface;

/// Default record queue capacity.
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// Configuration for one echo run.
#[derive(Debug, Clone)]
pub struct EchoConfig {
    /// Name of the action to echo, e.g. `/fibonacci`.
    pub action_name: String,
    /// Explicit action type identifier; skips name discovery when set.
    pub action_type: Option<String>,
    /// Interfaces to subscribe to; empty means all five.
    pub interfaces: Vec<ActionInterface>,
    /// Record queue capacity.
    pub queue_size: usize,
    /// Rendering options.
    pub format: FormatOptions,
    /// How long a stream callback waits for queue capacity.
    pub push_timeout: Duration,
    /// How long the printer waits for a record before re-checking the
    /// stop flag.
    pub pop_timeout: Duration,
    /// How long shutdown waits for the printer before abandoning queued
    /// records.
    pub join_window: Duration,
    /// Event-loop wait interval; bounds cancellation latency.
    pub spin_interval: Duration,
}

impl EchoConfig {
    /// Creates a configuration with defaults for the named action.
    #[must_use]
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            action_type: None,
            interfaces: Vec::new(),
            queue_size: DEFAULT_QUEUE_SIZE,
            format: FormatOptions::default(),
            push_timeout: Duration::from_millis(500),
            pop_timeout: Duration::from_millis(500),
            join_window: Duration::from_secs(1),
            spin_interval: Duration::from_millis(100),
        }
    }

    /// Parses a list of interface names into the subscription subset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInterface`] naming the first offender.
    pub fn parse_interfaces(names: &[String]) -> Result<Vec<ActionInterface>, ConfigError> {
        names.iter().map(|name| name.parse()).collect()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// The first applicable [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.action_name.is_empty() {
            return Err(ConfigError::MissingActionName);
        }
        if self.queue_size == 0 {
            return Err(ConfigError::InvalidQueueSize { size: 0 });
        }
        if self.format.truncate_length == Some(0) {
            return Err(ConfigError::InvalidTruncateLength { length: 0 });
        }
        Ok(())
    }

    /// The interfaces this run subscribes to, deduplicated in request
    /// order; all five when none were requested. At most one stream source
    /// exists per interface.
    #[must_use]
    pub fn selected_interfaces(&self) -> Vec<ActionInterface> {
        if self.interfaces.is_empty() {
            return ActionInterface::ALL.to_vec();
        }
        let mut selected = Vec::with_capacity(self.interfaces.len());
        for interface in &self.interfaces {
            if !selected.contains(interface) {
                selected.push(*interface);
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EchoConfig::new("/fibonacci");
        assert_eq!(config.queue_size, DEFAULT_QUEUE_SIZE);
        assert!(config.action_type.is_none());
        assert_eq!(config.format.truncate_length, Some(128));
        assert_eq!(config.push_timeout, Duration::from_millis(500));
        assert_eq!(config.pop_timeout, Duration::from_millis(500));
        assert_eq!(config.join_window, Duration::from_secs(1));
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_interfaces_select_all() {
        let config = EchoConfig::new("/fibonacci");
        assert_eq!(config.selected_interfaces(), ActionInterface::ALL.to_vec());
    }

    #[test]
    fn test_selected_interfaces_dedup_in_order() {
        let mut config = EchoConfig::new("/fibonacci");
        config.interfaces = vec![
            ActionInterface::StatusTopic,
            ActionInterface::GoalService,
            ActionInterface::StatusTopic,
        ];
        assert_eq!(
            config.selected_interfaces(),
            vec![ActionInterface::StatusTopic, ActionInterface::GoalService]
        );
    }

    #[test]
    fn test_parse_interfaces() {
        let names = vec!["goal_service".to_string(), "feedback_topic".to_string()];
        let parsed = EchoConfig::parse_interfaces(&names).unwrap();
        assert_eq!(
            parsed,
            vec![ActionInterface::GoalService, ActionInterface::FeedbackTopic]
        );

        let err =
            EchoConfig::parse_interfaces(&["bogus".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterface { name } if name == "bogus"));
    }

    #[test]
    fn test_zero_queue_size_rejected() {
        let mut config = EchoConfig::new("/fibonacci");
        config.queue_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueSize { size: 0 })
        ));
    }

    #[test]
    fn test_zero_truncate_length_rejected() {
        let mut config = EchoConfig::new("/fibonacci");
        config.format.truncate_length = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTruncateLength { length: 0 })
        ));
    }

    #[test]
    fn test_full_length_passes_validation() {
        let mut config = EchoConfig::new("/fibonacci");
        config.format.truncate_length = None;
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_action_name_rejected() {
        let config = EchoConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingActionName)
        ));
    }
}
