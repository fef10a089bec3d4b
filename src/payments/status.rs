//! Vendor payment lifecycle and its display metadata
//!
//! A payment moves strictly forward:
//!
//! ```text
//! pending_advance -> advance_paid -> hub_pending -> hub_verified -> completed
//!                                        |               |
//!                                        +---> rejected <+
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a vendor payment currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    PendingAdvance,
    AdvancePaid,
    HubPending,
    HubVerified,
    Completed,
    Rejected,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 6] = [
        PaymentStatus::PendingAdvance,
        PaymentStatus::AdvancePaid,
        PaymentStatus::HubPending,
        PaymentStatus::HubVerified,
        PaymentStatus::Completed,
        PaymentStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::PendingAdvance => "pending_advance",
            PaymentStatus::AdvancePaid => "advance_paid",
            PaymentStatus::HubPending => "hub_pending",
            PaymentStatus::HubVerified => "hub_verified",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status, treating anything unknown as `pending_advance`
    pub fn parse_lossy(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Whether a payment in this state may move to `next`
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (PendingAdvance, AdvancePaid)
                | (AdvancePaid, HubPending)
                | (HubPending, HubVerified)
                | (HubVerified, Completed)
                | (HubPending, Rejected)
                | (HubVerified, Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Rejected)
    }

    pub fn meta(&self) -> &'static StatusMeta {
        status_meta(*self)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six known statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Badge metadata for a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMeta {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

static PENDING_ADVANCE: StatusMeta = StatusMeta {
    label: "Advance Pending",
    color: "#f59e0b",
    icon: "PEND",
    description: "Waiting for 40% advance payment",
};
static ADVANCE_PAID: StatusMeta = StatusMeta {
    label: "Advance Paid",
    color: "#3b82f6",
    icon: "ADV",
    description: "Advance paid, awaiting hub delivery",
};
static HUB_PENDING: StatusMeta = StatusMeta {
    label: "At Hub",
    color: "#8b5cf6",
    icon: "HUB",
    description: "Item at hub, awaiting verification",
};
static HUB_VERIFIED: StatusMeta = StatusMeta {
    label: "Hub Verified",
    color: "#06b6d4",
    icon: "VER",
    description: "Item verified, balance payment ready",
};
static COMPLETED: StatusMeta = StatusMeta {
    label: "Completed",
    color: "#10b981",
    icon: "DONE",
    description: "Fully paid",
};
static REJECTED: StatusMeta = StatusMeta {
    label: "Rejected",
    color: "#ef4444",
    icon: "REJ",
    description: "Item rejected at hub",
};

pub fn status_meta(status: PaymentStatus) -> &'static StatusMeta {
    match status {
        PaymentStatus::PendingAdvance => &PENDING_ADVANCE,
        PaymentStatus::AdvancePaid => &ADVANCE_PAID,
        PaymentStatus::HubPending => &HUB_PENDING,
        PaymentStatus::HubVerified => &HUB_VERIFIED,
        PaymentStatus::Completed => &COMPLETED,
        PaymentStatus::Rejected => &REJECTED,
    }
}

/// Metadata for a raw status string as stored in the row store
pub fn status_meta_for(raw: &str) -> &'static StatusMeta {
    status_meta(PaymentStatus::parse_lossy(raw))
}

/// What an operator can do next with a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    PayAdvance,
    MarkHubReceived,
    VerifyItem,
    PayBalance,
    ViewOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextAction {
    pub action: Action,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn next_action(status: PaymentStatus) -> NextAction {
    let (action, label, color) = match status {
        PaymentStatus::PendingAdvance => (Action::PayAdvance, "Pay Advance", "#f59e0b"),
        PaymentStatus::AdvancePaid => (Action::MarkHubReceived, "Mark Hub Received", "#3b82f6"),
        PaymentStatus::HubPending => (Action::VerifyItem, "Verify Item", "#8b5cf6"),
        PaymentStatus::HubVerified => (Action::PayBalance, "Pay Balance", "#10b981"),
        PaymentStatus::Completed => (Action::ViewOnly, "View Details", "#6b7280"),
        PaymentStatus::Rejected => (Action::ViewOnly, "View Details", "#ef4444"),
    };
    NextAction {
        action,
        label,
        color,
    }
}

/// Progress bar percentage for a payment
///
/// A balance that has already been paid counts as 80% even if the status
/// has not caught up yet.
pub fn payment_progress(status: PaymentStatus, balance_paid: bool) -> u8 {
    match status {
        PaymentStatus::Completed => 100,
        PaymentStatus::HubVerified => 80,
        _ if balance_paid => 80,
        PaymentStatus::HubPending => 60,
        PaymentStatus::AdvancePaid => 40,
        PaymentStatus::PendingAdvance | PaymentStatus::Rejected => 20,
    }
}
