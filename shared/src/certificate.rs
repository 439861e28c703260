use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    #[default]
    NotApplied,
    Pending,
    Approved,
    Rejected,
}

impl CertificateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplied => "Not applied",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateEvent {
    Apply { progress: u8 },
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("course is only {0}% complete")]
    Incomplete(u8),
    #[error("cannot {event:?} from {from:?}")]
    Invalid {
        from: CertificateStatus,
        event: CertificateEvent,
    },
}

impl CertificateStatus {
    /// Local mirror of the server's rules, applied after a request succeeds.
    pub fn apply(self, event: CertificateEvent) -> Result<Self, TransitionError> {
        use CertificateEvent::*;
        use CertificateStatus::*;

        match (self, event) {
            (NotApplied, Apply { progress }) if clamp_progress(progress) < 100 => {
                Err(TransitionError::Incomplete(progress))
            }
            (NotApplied, Apply { .. }) => Ok(Pending),
            (Pending, Approve) => Ok(Approved),
            (Pending, Reject) => Ok(Rejected),
            (from, event) => Err(TransitionError::Invalid { from, event }),
        }
    }
}

/// Reviewer decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateReview {
    Approve,
    Reject,
}

pub fn clamp_progress(progress: u8) -> u8 {
    progress.min(100)
}

/// What the course page shows in the certificate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificatePanel {
    Hidden,
    InProgress { progress: u8 },
    Apply,
    Pending,
    Approved { download: Option<String> },
    Rejected,
}

impl CertificatePanel {
    pub fn resolve(
        enrolled: bool,
        progress: u8,
        status: CertificateStatus,
        pdf: Option<&str>,
    ) -> Self {
        if !enrolled {
            return Self::Hidden;
        }
        let progress = clamp_progress(progress);
        match status {
            CertificateStatus::Approved => Self::Approved {
                download: pdf.filter(|p| !p.is_empty()).map(str::to_string),
            },
            CertificateStatus::Pending => Self::Pending,
            CertificateStatus::Rejected => Self::Rejected,
            CertificateStatus::NotApplied if progress == 100 => Self::Apply,
            CertificateStatus::NotApplied => Self::InProgress { progress },
        }
    }

    pub const fn shows_apply(&self) -> bool {
        matches!(self, Self::Apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_needs_full_progress() {
        let s = CertificateStatus::NotApplied;
        assert_eq!(
            s.apply(CertificateEvent::Apply { progress: 99 }),
            Err(TransitionError::Incomplete(99))
        );
        assert_eq!(
            s.apply(CertificateEvent::Apply { progress: 100 }),
            Ok(CertificateStatus::Pending)
        );
    }

    #[test]
    fn only_pending_is_reviewed() {
        let pending = CertificateStatus::Pending;
        assert_eq!(pending.apply(CertificateEvent::Approve), Ok(CertificateStatus::Approved));
        assert_eq!(pending.apply(CertificateEvent::Reject), Ok(CertificateStatus::Rejected));
        assert!(CertificateStatus::Approved.apply(CertificateEvent::Reject).is_err());
        assert!(CertificateStatus::NotApplied.apply(CertificateEvent::Approve).is_err());
        assert!(CertificateStatus::Rejected
            .apply(CertificateEvent::Apply { progress: 100 })
            .is_err());
    }

    #[test]
    fn apply_control_only_at_full_progress_and_not_applied() {
        use CertificateStatus::*;

        assert!(CertificatePanel::resolve(true, 100, NotApplied, None).shows_apply());
        assert!(!CertificatePanel::resolve(true, 99, NotApplied, None).shows_apply());
        assert!(!CertificatePanel::resolve(true, 100, Pending, None).shows_apply());
        assert!(!CertificatePanel::resolve(false, 100, NotApplied, None).shows_apply());
        assert_eq!(
            CertificatePanel::resolve(true, 60, NotApplied, None),
            CertificatePanel::InProgress { progress: 60 }
        );
    }

    #[test]
    fn approved_links_pdf() {
        assert_eq!(
            CertificatePanel::resolve(true, 100, CertificateStatus::Approved, Some("/media/c.pdf")),
            CertificatePanel::Approved {
                download: Some("/media/c.pdf".into())
            }
        );
        assert_eq!(
            CertificatePanel::resolve(true, 100, CertificateStatus::Approved, Some("")),
            CertificatePanel::Approved { download: None }
        );
    }

    #[test]
    fn progress_over_100_is_clamped() {
        assert_eq!(clamp_progress(140), 100);
        assert!(CertificatePanel::resolve(true, 140, CertificateStatus::NotApplied, None).shows_apply());
    }

    #[test]
    fn decodes_snake_case() {
        let s: CertificateStatus = serde_json::from_str(r#""not_applied""#).unwrap();
        assert_eq!(s, CertificateStatus::NotApplied);
    }
}
