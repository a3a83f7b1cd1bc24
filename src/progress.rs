//! Progress notifications for a conversion.

/// Pipeline stage a [`Progress`] event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the workbook into a grid
    Loading,
    /// Building the element tree
    Transforming,
    /// Writing markup text
    Serializing,
    /// Conversion finished
    Done,
}

impl Stage {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Loading => "Reading workbook",
            Stage::Transforming => "Building rows",
            Stage::Serializing => "Writing XML",
            Stage::Done => "Done",
        }
    }
}

/// A single progress event.
///
/// `completed` and `total` count rows while transforming and bytes once done;
/// both are zero when a stage has no meaningful measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Event for a stage without a measure.
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage,
            completed: 0,
            total: 0,
        }
    }

    /// Completed fraction in `0.0..=1.0`; stages without a measure report 0.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
