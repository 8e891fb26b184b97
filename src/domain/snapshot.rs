// Snapshot domain model - immutable view of the window handed to renderers
use super::error::{FetchError, FetchErrorKind};
use super::sample::Sample;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowState {
    Empty,
    Filling,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSnapshot {
    pub name: String,
    pub values: Vec<f64>,
}

/// Last fetch failure, kept alongside the latest good data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStatus {
    pub kind: FetchErrorKind,
    pub message: String,
    pub at: DateTime<Local>,
    pub consecutive_failures: u32,
}

impl ErrorStatus {
    pub fn new(error: &FetchError, at: DateTime<Local>, consecutive_failures: u32) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            at,
            consecutive_failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    pub state: WindowState,
    pub capacity: usize,
    pub time_axis: Vec<String>,
    pub series: Vec<SeriesSnapshot>,
    pub latest: Option<Sample>,
    pub error: Option<ErrorStatus>,
    pub stale: bool,
}

impl Snapshot {
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.time_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty()
    }
}
