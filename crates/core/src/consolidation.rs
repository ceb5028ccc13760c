//! Final-submit state machine.
//!
//! `Incomplete -> Ready -> Consolidated`, with `Consolidated` terminal. The
//! repository layer enforces at-most-once consolidation with a UNIQUE
//! constraint; the guards here give callers the precise error first.

use serde::Serialize;

use crate::error::CoreError;
use crate::sections::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingState {
    Incomplete,
    Ready,
    Consolidated,
}

impl OnboardingState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Ready => "ready",
            Self::Consolidated => "consolidated",
        }
    }
}

/// First section of the canonical order not contained in `present`.
pub fn first_missing(present: &[Section]) -> Option<Section> {
    Section::ALL.into_iter().find(|s| !present.contains(s))
}

pub fn evaluate(present: &[Section], consolidated: bool) -> OnboardingState {
    if consolidated {
        OnboardingState::Consolidated
    } else if first_missing(present).is_none() {
        OnboardingState::Ready
    } else {
        OnboardingState::Incomplete
    }
}

/// Guard 1 (already consolidated) then Guard 2 (all five sections saved).
pub fn ensure_ready(draft_id: &str, present: &[Section], consolidated: bool) -> Result<(), CoreError> {
    if consolidated {
        return Err(CoreError::AlreadySubmitted {
            draft_id: draft_id.to_string(),
        });
    }
    if let Some(missing_section) = first_missing(present) {
        return Err(CoreError::IncompleteOnboarding { missing_section });
    }
    Ok(())
}

/// Per-section presence report for the progress endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingProgress {
    pub draft_id: String,
    pub state: OnboardingState,
    pub sections: Vec<SectionProgress>,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionProgress {
    pub section: Section,
    pub saved: bool,
}

impl OnboardingProgress {
    pub fn build(draft_id: &str, present: &[Section], consolidated: bool) -> Self {
        let sections: Vec<SectionProgress> = Section::ALL
            .into_iter()
            .map(|section| SectionProgress {
                section,
                saved: present.contains(&section),
            })
            .collect();
        Self {
            draft_id: draft_id.to_string(),
            state: evaluate(present, consolidated),
            completed: sections.iter().filter(|s| s.saved).count(),
            total: sections.len(),
            sections,
        }
    }
}
