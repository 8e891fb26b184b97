// Sliding window domain model - time axis plus aligned series
use super::error::WindowError;
use super::sample::Sample;
use super::snapshot::{SeriesSnapshot, WindowState};
use std::collections::VecDeque;

/// Bounded struct-of-arrays window.
///
/// The time axis and every series always have the same length: a push
/// appends to all of them and, once past capacity, evicts the oldest entry
/// from all of them.
#[derive(Debug, Clone)]
pub struct Window {
    capacity: usize,
    time_axis: VecDeque<String>,
    series: Vec<Series>,
}

#[derive(Debug, Clone)]
struct Series {
    name: String,
    values: VecDeque<f64>,
}

impl Window {
    /// A capacity of zero is treated as one.
    pub fn new(series_names: &[String], capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            time_axis: VecDeque::with_capacity(capacity + 1),
            series: series_names
                .iter()
                .map(|name| Series {
                    name: name.clone(),
                    values: VecDeque::with_capacity(capacity + 1),
                })
                .collect(),
        }
    }

    /// Append one sample across the axis and all series.
    ///
    /// Nothing is mutated if the sample lacks a configured series.
    pub fn push(&mut self, sample: &Sample) -> Result<(), WindowError> {
        let values = self
            .series
            .iter()
            .map(|s| {
                sample
                    .value(&s.name)
                    .ok_or_else(|| WindowError::MissingSeries(s.name.clone()))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        self.time_axis.push_back(sample.label());
        for (series, value) in self.series.iter_mut().zip(values) {
            series.values.push_back(value);
        }

        if self.time_axis.len() > self.capacity {
            self.time_axis.pop_front();
            for series in &mut self.series {
                series.values.pop_front();
            }
        }

        Ok(())
    }

    pub fn clear(&mut self) {
        self.time_axis.clear();
        for series in &mut self.series {
            series.values.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.time_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> WindowState {
        if self.is_empty() {
            WindowState::Empty
        } else if self.len() < self.capacity {
            WindowState::Filling
        } else {
            WindowState::Full
        }
    }

    pub fn time_axis(&self) -> Vec<String> {
        self.time_axis.iter().cloned().collect()
    }

    pub fn series(&self) -> Vec<SeriesSnapshot> {
        self.series
            .iter()
            .map(|s| SeriesSnapshot {
                name: s.name.clone(),
                values: s.values.iter().copied().collect(),
            })
            .collect()
    }
}
