//! In-memory mock data source resolved after an artificial delay

use anyhow::anyhow;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use super::payload::SectionPayload;
use crate::config::MockConfig;
use crate::loader::FetchOperation;

/// How a mock section behaves when fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Succeed,
    Fail,
    Hang,
}

impl MockBehavior {
    pub fn for_section(config: &MockConfig, section: &str) -> Self {
        if config.fail_sections.iter().any(|id| id == section) {
            MockBehavior::Fail
        } else if config.hang_sections.iter().any(|id| id == section) {
            MockBehavior::Hang
        } else {
            MockBehavior::Succeed
        }
    }
}

/// Fetch operation returning canned data after `latency` (plus jitter)
pub struct MockSource {
    section: &'static str,
    latency: Duration,
    jitter: Duration,
    behavior: MockBehavior,
    build: fn() -> SectionPayload,
}

impl MockSource {
    pub fn new(section: &'static str, build: fn() -> SectionPayload) -> Self {
        Self {
            section,
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            behavior: MockBehavior::Succeed,
            build,
        }
    }

    pub fn from_config(
        config: &MockConfig,
        section: &'static str,
        build: fn() -> SectionPayload,
    ) -> Self {
        Self::new(section, build)
            .with_latency(Duration::from_millis(config.latency_ms))
            .with_jitter(Duration::from_millis(config.jitter_ms))
            .with_behavior(MockBehavior::for_section(config, section))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let extra = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        self.latency + Duration::from_millis(extra)
    }
}

#[async_trait]
impl FetchOperation<SectionPayload> for MockSource {
    async fn fetch(&self) -> anyhow::Result<SectionPayload> {
        let delay = self.delay();
        debug!(section = self.section, delay_ms = delay.as_millis() as u64, behavior = ?self.behavior, "mock fetch");

        match self.behavior {
            MockBehavior::Hang => std::future::pending().await,
            MockBehavior::Fail => {
                tokio::time::sleep(delay).await;
                Err(anyhow!("mock backend refused {} request", self.section))
            }
            MockBehavior::Succeed => {
                tokio::time::sleep(delay).await;
                Ok((self.build)())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::payload::{Cell, Metric, Trend};

    fn sample() -> SectionPayload {
        SectionPayload::metrics(vec![Metric::new("Count", Cell::Count(3), Trend::Flat)])
    }

    #[test]
    fn behavior_follows_config_lists() {
        let config = MockConfig {
            fail_sections: vec!["cards".into()],
            hang_sections: vec!["reports".into()],
            ..MockConfig::default()
        };
        assert_eq!(MockBehavior::for_section(&config, "cards"), MockBehavior::Fail);
        assert_eq!(MockBehavior::for_section(&config, "reports"), MockBehavior::Hang);
        assert_eq!(MockBehavior::for_section(&config, "overview"), MockBehavior::Succeed);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_latency() {
        let source = MockSource::new("overview", sample).with_latency(Duration::from_millis(1200));
        let started = tokio::time::Instant::now();
        let payload = source.fetch().await.unwrap();
        assert_eq!(payload, sample());
        assert_eq!(started.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_source_reports_the_section() {
        let source = MockSource::new("cards", sample).with_behavior(MockBehavior::Fail);
        let error = source.fetch().await.unwrap_err();
        assert_eq!(error.to_string(), "mock backend refused cards request");
    }

    #[tokio::test(start_paused = true)]
    async fn jitter_stays_within_bounds() {
        let source = MockSource::new("overview", sample)
            .with_latency(Duration::from_millis(100))
            .with_jitter(Duration::from_millis(50));
        for _ in 0..20 {
            let delay = source.delay();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }
}
