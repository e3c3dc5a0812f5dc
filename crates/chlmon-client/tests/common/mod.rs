//! Shared fakes for client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chlmon_core::error::{ChlmonError, Result};
use chlmon_core::models::Geometry;
use chlmon_core::ports::{ApiRequest, Transport};
use chlmon_core::state::{MemoryChart, MemoryMap};
use chlmon_client::Dashboard;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A scripted reply: optional delay, then the result
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Value>,
}

impl Reply {
    pub fn ok(value: Value) -> Self {
        Self { delay: Duration::ZERO, result: Ok(value) }
    }

    pub fn api_error(status: u16, body: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ChlmonError::Api { status, body: body.to_string() }),
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

/// Transport that records every request and answers from a script
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, request: &ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::api_error(500, "no scripted reply"));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

pub type TestDashboard = Dashboard<RecordingTransport, MemoryMap, MemoryChart>;

pub fn dashboard(replies: Vec<Reply>) -> TestDashboard {
    Dashboard::new(RecordingTransport::new(replies), MemoryMap::new(), MemoryChart::new())
}

pub fn dashboard_with_aoi(replies: Vec<Reply>) -> TestDashboard {
    let dashboard = dashboard(replies);
    dashboard.capture_aoi(Geometry::rectangle(-122.6, 37.0, -122.3, 37.3));
    dashboard
}
