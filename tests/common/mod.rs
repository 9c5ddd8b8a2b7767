//! Shared utilities for supervisor integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use ads_router_service::config::{
    validate_ams_options, AmsConfiguration, AmsConfigurationOptions, SupervisorSettings,
};
use ads_router_service::engine::{
    EngineError, EngineFactory, EngineParams, RouterEngine, RouterStatus, StatusReporter,
};
use ads_router_service::routing::Route;
use ads_router_service::supervisor::LifecycleRecord;
use ads_router_service::SupervisorState;

/// One scripted action of a mock engine's `start`.
#[derive(Debug, Clone)]
pub enum Step {
    Emit(RouterStatus),
    EmitWith(RouterStatus, &'static str),
    Sleep(Duration),
    /// Wait for cancellation, report Stopping/Stopped and return.
    AwaitStop,
    /// Wait for cancellation, then never acknowledge it.
    IgnoreStop,
    /// Wait for cancellation, report Stopping/Stopped, then return an error.
    StopThenFail(&'static str),
    Fail(&'static str),
}

/// Counters shared between a factory and every engine it builds.
#[derive(Debug, Default)]
pub struct Calls {
    pub constructed: AtomicUsize,
    pub routes_added: AtomicUsize,
    pub started: AtomicUsize,
    pub dropped: AtomicUsize,
}

impl Calls {
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn routes_added(&self) -> usize {
        self.routes_added.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Engine factory driven by scripts. Each construction takes the next script;
/// the last one is reused.
pub struct MockEngineFactory {
    pub calls: Arc<Calls>,
    scripts: Mutex<VecDeque<Vec<Step>>>,
    construct_error: Option<&'static str>,
    reject_routes: bool,
}

impl MockEngineFactory {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            scripts: Mutex::new(VecDeque::from([script])),
            construct_error: None,
            reject_routes: false,
        }
    }

    /// Engine that comes up and stops cleanly on request.
    pub fn healthy() -> Self {
        Self::new(vec![Step::Emit(RouterStatus::Running), Step::AwaitStop])
    }

    pub fn then(self, script: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().push_back(script);
        self
    }

    pub fn failing_construct(mut self, message: &'static str) -> Self {
        self.construct_error = Some(message);
        self
    }

    pub fn rejecting_routes(mut self) -> Self {
        self.reject_routes = true;
        self
    }

    fn next_script(&self) -> Vec<Step> {
        let mut scripts = self.scripts.lock().unwrap();
        if scripts.len() > 1 {
            scripts.pop_front().unwrap()
        } else {
            scripts.front().cloned().unwrap_or_default()
        }
    }
}

impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    fn construct(
        &self,
        _params: EngineParams,
        status: StatusReporter,
    ) -> Result<MockEngine, EngineError> {
        self.calls.constructed.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.construct_error {
            return Err(EngineError::Bind {
                addr: "127.0.0.1:48898".into(),
                source: std::io::Error::new(std::io::ErrorKind::AddrInUse, message),
            });
        }
        Ok(MockEngine {
            script: self.next_script(),
            status,
            reject_routes: self.reject_routes,
            routes: Vec::new(),
            calls: self.calls.clone(),
        })
    }
}

pub struct MockEngine {
    script: Vec<Step>,
    status: StatusReporter,
    reject_routes: bool,
    routes: Vec<Route>,
    calls: Arc<Calls>,
}

#[async_trait]
impl RouterEngine for MockEngine {
    fn add_route(&mut self, route: &Route) -> Result<(), EngineError> {
        self.calls.routes_added.fetch_add(1, Ordering::SeqCst);
        if self.reject_routes {
            return Err(EngineError::DuplicateRoute(route.name.clone()));
        }
        self.routes.push(route.clone());
        Ok(())
    }

    async fn start(&mut self, cancel: CancellationToken) -> Result<(), EngineError> {
        self.calls.started.fetch_add(1, Ordering::SeqCst);
        for step in self.script.clone() {
            match step {
                Step::Emit(status) => {
                    self.status.report(status, None);
                }
                Step::EmitWith(status, detail) => {
                    self.status.report(status, Some(detail.to_string()));
                }
                Step::Sleep(duration) => tokio::time::sleep(duration).await,
                Step::AwaitStop => {
                    cancel.cancelled().await;
                    self.status.report(RouterStatus::Stopping, None);
                    self.status.report(RouterStatus::Stopped, None);
                    return Ok(());
                }
                Step::IgnoreStop => {
                    cancel.cancelled().await;
                    std::future::pending::<()>().await;
                }
                Step::StopThenFail(message) => {
                    cancel.cancelled().await;
                    self.status.report(RouterStatus::Stopping, None);
                    self.status.report(RouterStatus::Stopped, None);
                    return Err(EngineError::Fault(message.to_string()));
                }
                Step::Fail(message) => return Err(EngineError::Fault(message.to_string())),
            }
        }
        Ok(())
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.calls.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn options(local: &str, target: &str, ip: &str) -> AmsConfigurationOptions {
    AmsConfigurationOptions {
        local_ams_net_id: local.into(),
        target_ams_net_id: target.into(),
        target_ip_address: ip.into(),
    }
}

pub fn ams(local: &str, target: &str, ip: &str) -> AmsConfiguration {
    validate_ams_options(&options(local, target, ip)).unwrap()
}

/// The configuration of the first example scenario.
pub fn default_ams() -> AmsConfiguration {
    ams("1.2.3.4.1.1", "5.6.7.8.1.1", "10.0.0.5")
}

pub fn settings(shutdown_timeout_ms: u64) -> SupervisorSettings {
    SupervisorSettings {
        shutdown_timeout_ms,
        ..SupervisorSettings::default()
    }
}

/// Drain every record published so far.
pub fn drain(rx: &mut broadcast::Receiver<LifecycleRecord>) -> Vec<LifecycleRecord> {
    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    records
}

pub fn statuses(records: &[LifecycleRecord]) -> Vec<RouterStatus> {
    records
        .iter()
        .filter_map(|r| match r {
            LifecycleRecord::Status(event) => Some(event.status),
            _ => None,
        })
        .collect()
}

/// Target states of every transition, in order.
pub fn transitions(records: &[LifecycleRecord]) -> Vec<SupervisorState> {
    records
        .iter()
        .filter_map(|r| match r {
            LifecycleRecord::Transition { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

/// Poll `condition` until it holds or `limit` elapses.
pub async fn eventually<F: Fn() -> bool>(limit: Duration, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
