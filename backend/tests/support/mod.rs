//! Shared fakes for pipeline, relay and route tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chat_relay_backend::application::{DeliveryPipeline, PipelineTimings, RelayService};
use chat_relay_backend::domain::delivery::DeliveryReport;
use chat_relay_backend::domain::ports::{
    CapabilityError, CapabilityResult, ChatCapability, ReportSinkPort,
};
use chat_relay_backend::interface::api::AppState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const FOCUS: &str = "focus_chat";
pub const SUBMIT: &str = "submit_to_chat";
pub const COPY: &str = "copy_to_clipboard";
pub const PASTE: &str = "paste_from_clipboard";
pub const SUBMIT_INPUT: &str = "submit_current_input";
pub const KEYSTROKE: &str = "send_raw_keystroke";
pub const QUICK_NEXT: &str = "select_next_quick_pick";
pub const QUICK_ACCEPT: &str = "accept_quick_pick";

#[derive(Clone, Copy, Debug)]
enum Behavior {
    Fail,
    FailFirst(usize),
    Panic,
    Hang,
}

// ---------------------------------------------------------------------------
// ScriptedCapability
// ---------------------------------------------------------------------------

/// Fake host: every operation succeeds unless scripted otherwise. Records
/// each call (operation name) and every text argument in call order.
#[derive(Default)]
pub struct ScriptedCapability {
    behaviors: HashMap<&'static str, Behavior>,
    calls: Mutex<Vec<&'static str>>,
    texts: Mutex<Vec<(&'static str, String)>>,
}

impl ScriptedCapability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, operation: &'static str) -> Self {
        self.behaviors.insert(operation, Behavior::Fail);
        self
    }

    pub fn fail_first(mut self, operation: &'static str, times: usize) -> Self {
        self.behaviors.insert(operation, Behavior::FailFirst(times));
        self
    }

    pub fn panic_on(mut self, operation: &'static str) -> Self {
        self.behaviors.insert(operation, Behavior::Panic);
        self
    }

    pub fn hang_on(mut self, operation: &'static str) -> Self {
        self.behaviors.insert(operation, Behavior::Hang);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<(&'static str, String)> {
        self.texts.lock().unwrap().clone()
    }

    async fn call(&self, operation: &'static str, text: Option<&str>) -> CapabilityResult {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            let previous = calls.iter().filter(|name| **name == operation).count();
            calls.push(operation);
            previous
        };
        if let Some(text) = text {
            self.texts.lock().unwrap().push((operation, text.to_string()));
        }

        match self.behaviors.get(operation).copied() {
            None => Ok(()),
            Some(Behavior::Fail) => Err(CapabilityError::Unavailable(format!(
                "{operation} scripted to fail"
            ))),
            Some(Behavior::FailFirst(times)) if previous < times => Err(
                CapabilityError::Unavailable(format!("{operation} scripted to fail once")),
            ),
            Some(Behavior::FailFirst(_)) => Ok(()),
            Some(Behavior::Panic) => panic!("{operation} exploded"),
            Some(Behavior::Hang) => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ChatCapability for ScriptedCapability {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn focus_chat(&self) -> CapabilityResult {
        self.call(FOCUS, None).await
    }

    async fn submit_to_chat(&self, text: &str) -> CapabilityResult {
        self.call(SUBMIT, Some(text)).await
    }

    async fn copy_to_clipboard(&self, text: &str) -> CapabilityResult {
        self.call(COPY, Some(text)).await
    }

    async fn paste_from_clipboard(&self) -> CapabilityResult {
        self.call(PASTE, None).await
    }

    async fn submit_current_input(&self) -> CapabilityResult {
        self.call(SUBMIT_INPUT, None).await
    }

    async fn send_raw_keystroke(&self, text: &str) -> CapabilityResult {
        self.call(KEYSTROKE, Some(text)).await
    }

    async fn select_next_quick_pick(&self) -> CapabilityResult {
        self.call(QUICK_NEXT, None).await
    }

    async fn accept_quick_pick(&self) -> CapabilityResult {
        self.call(QUICK_ACCEPT, None).await
    }
}

// ---------------------------------------------------------------------------
// Report sinks
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<DeliveryReport>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<DeliveryReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSinkPort for RecordingSink {
    fn sink(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, report: &DeliveryReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl ReportSinkPort for FailingSink {
    fn sink(&self) -> &'static str {
        "failing"
    }

    async fn publish(&self, _report: &DeliveryReport) -> Result<()> {
        Err(anyhow!("sink offline"))
    }
}

// ---------------------------------------------------------------------------
// Wiring helpers
// ---------------------------------------------------------------------------

pub fn immediate_pipeline() -> DeliveryPipeline {
    DeliveryPipeline::new(PipelineTimings::immediate())
}

pub fn relay_with(capability: Arc<dyn ChatCapability>, sink: Arc<dyn ReportSinkPort>) -> RelayService {
    RelayService::new(capability, immediate_pipeline(), sink)
}

pub fn app_state_with(capability: Arc<dyn ChatCapability>) -> (AppState, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let relay = relay_with(capability, sink.clone());
    (AppState::new(relay), sink)
}
