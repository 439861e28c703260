use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    OnHold,
    Approved,
    Rejected,
}

/// A move an admin can make on a teacher application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationAction {
    pub target: ApplicationStatus,
    pub label: &'static str,
}

const APPROVE: ApplicationAction = ApplicationAction {
    target: ApplicationStatus::Approved,
    label: "Approve",
};
const REJECT: ApplicationAction = ApplicationAction {
    target: ApplicationStatus::Rejected,
    label: "Reject",
};
const HOLD: ApplicationAction = ApplicationAction {
    target: ApplicationStatus::OnHold,
    label: "Hold",
};

impl ApplicationStatus {
    pub const fn actions(self) -> &'static [ApplicationAction] {
        match self {
            Self::Pending => &[APPROVE, REJECT, HOLD],
            Self::OnHold => &[APPROVE, REJECT],
            Self::Rejected => &[APPROVE, HOLD],
            Self::Approved => &[],
        }
    }

    pub fn can_move_to(self, target: Self) -> bool {
        self.actions().iter().any(|a| a.target == target)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnHold => "on_hold",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::OnHold => "On hold",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Users,
    TeacherApplications,
    Students,
    Courses,
}

impl AdminTab {
    pub const ALL: [Self; 4] = [
        Self::Users,
        Self::TeacherApplications,
        Self::Students,
        Self::Courses,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::TeacherApplications => "Teacher Applications",
            Self::Students => "Students",
            Self::Courses => "Courses",
        }
    }
}

/// Id of the row whose request is running. At most one per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight<K>(Option<K>);

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self(None)
    }
}

impl<K: PartialEq> InFlight<K> {
    /// False when another request already holds the slot.
    pub fn begin(&mut self, key: K) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(key);
        true
    }

    pub fn finish(&mut self) {
        self.0 = None;
    }

    pub fn is_busy(&self, key: &K) -> bool {
        self.0.as_ref() == Some(key)
    }

    pub const fn is_idle(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(s: ApplicationStatus) -> Vec<ApplicationStatus> {
        s.actions().iter().map(|a| a.target).collect()
    }

    #[test]
    fn actions_per_status() {
        use ApplicationStatus::*;
        assert_eq!(targets(Pending), [Approved, Rejected, OnHold]);
        assert_eq!(targets(OnHold), [Approved, Rejected]);
        assert_eq!(targets(Rejected), [Approved, OnHold]);
        assert!(targets(Approved).is_empty());
        assert!(!Approved.can_move_to(Rejected));
        assert!(OnHold.can_move_to(Approved));
    }

    #[test]
    fn wire_names() {
        let s: ApplicationStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(s, ApplicationStatus::OnHold);
        assert_eq!(serde_json::to_string(&ApplicationStatus::OnHold).unwrap(), r#""on_hold""#);
    }

    #[test]
    fn in_flight_blocks_second_row() {
        let mut slot = InFlight::default();
        assert!(slot.begin(3));
        assert!(!slot.begin(4));
        assert!(slot.is_busy(&3));
        assert!(!slot.is_busy(&4));
        slot.finish();
        assert!(slot.is_idle());
    }
}
