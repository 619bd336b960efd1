//! Scripted fetcher for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::layered::ConfigMap;
use crate::vault::fetcher::SecretFetcher;
use crate::vault::types::FetchError;

/// What the next fetch does.
#[derive(Debug, Clone)]
pub enum Step {
    Data(ConfigMap),
    Status(u16),
    Missing,
    Panic,
    /// Wait for cancellation, then report it.
    Block,
}

/// Replays a script of steps, then repeats the fallback.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(steps: impl IntoIterator<Item = Step>, fallback: Step) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretFetcher for ScriptedFetcher {
    async fn fetch(&self, cancel: &CancellationToken) -> Result<ConfigMap, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Data(map) => Ok(map),
            Step::Status(code) => Err(FetchError::Status(StatusCode::from_u16(code).unwrap())),
            Step::Missing => Err(FetchError::MissingData),
            Step::Panic => panic!("scripted fetch panic"),
            Step::Block => {
                cancel.cancelled().await;
                Err(FetchError::Cancelled)
            }
        }
    }
}

pub fn map(entries: &[(&str, Option<&str>)]) -> ConfigMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}
