#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 80.0 {
            Self::High
        } else if confidence >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatedEffort {
    OneToTwoHours,
    HalfDay,
    OneToTwoDays,
    Unknown,
}

impl EstimatedEffort {
    #[must_use]
    pub fn from_complexity(complexity: Option<ai::FixComplexity>) -> Self {
        match complexity {
            Some(ai::FixComplexity::Simple) => Self::OneToTwoHours,
            Some(ai::FixComplexity::Moderate) => Self::HalfDay,
            Some(ai::FixComplexity::Complex) => Self::OneToTwoDays,
            None => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneToTwoHours => "1-2 hours",
            Self::HalfDay => "half day",
            Self::OneToTwoDays => "1-2 days",
            Self::Unknown => "unknown",
        }
    }
}

/// A ranked candidate assignee: summed expertise across affected files plus
/// current workload, before loop-prevention filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub email: String,
    pub expertise_score: f64,
    pub active_assignments: i64,
    pub workload_score: f64,
    pub combined_score: f64,
}

/// Outcome of `AssignmentEngine::decide`.
#[derive(Debug, Clone)]
pub struct AssignmentDecision {
    pub assignee: Option<String>,
    pub route_to_human: bool,
    pub confidence: f64,
    pub priority: Priority,
    pub estimated_effort: EstimatedEffort,
    pub reasoning: String,
    pub fallbacks: Vec<Candidate>,
}
