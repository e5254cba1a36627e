// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use probewatch::config::settings::MonitorSettings;
    use probewatch::utils::retry_policy::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn test_policy_from_default_settings() {
        let policy = RetryPolicy::from_settings(&MonitorSettings::default());

        assert_eq!(policy.attempts(), 3);
        assert_eq!(
            policy.schedule(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[test]
    fn test_large_retry_count_is_capped() {
        let policy = RetryPolicy::from_settings(&MonitorSettings {
            max_retry: 64,
            ..MonitorSettings::default()
        });

        let schedule = policy.schedule();
        assert_eq!(schedule.len(), 63);
        assert!(schedule.iter().all(|d| *d <= Duration::from_secs(10)));
        assert_eq!(schedule.last(), Some(&Duration::from_secs(10)));
    }
}
