//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an order.
///
/// Transitions:
/// ```text
/// Pending ──► Received ──► InPreparation ──► Ready ──► Finished
///    │            │              │
///    └────────────┴──────────────┴──► Cancelled
/// ```
///
/// `Finished` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Received,
    InPreparation,
    Ready,
    Finished,
    Cancelled,
}

/// An operation requested against the state machine.
///
/// Each action has exactly one state it is defined for; requesting it from
/// any other state is rejected with [`InvalidTransition`] rather than
/// silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Receive,
    Init,
    Ready,
    Finish,
    Cancel,
}

/// Rejection produced when the current state does not define the requested
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} an order in status {from}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub action: StatusAction,
}

impl OrderStatus {
    /// Applies `action` to the current state, returning the successor state.
    ///
    /// This is the single source of truth for the edge table; callers
    /// replace their stored status with the returned value and must not
    /// assign statuses directly.
    pub fn apply(self, action: StatusAction) -> Result<OrderStatus, InvalidTransition> {
        match (self, action) {
            (OrderStatus::Pending, StatusAction::Receive) => Ok(OrderStatus::Received),
            (OrderStatus::Pending, StatusAction::Cancel) => Ok(OrderStatus::Cancelled),
            (OrderStatus::Received, StatusAction::Init) => Ok(OrderStatus::InPreparation),
            (OrderStatus::Received, StatusAction::Cancel) => Ok(OrderStatus::Cancelled),
            (OrderStatus::InPreparation, StatusAction::Ready) => Ok(OrderStatus::Ready),
            (OrderStatus::InPreparation, StatusAction::Cancel) => Ok(OrderStatus::Cancelled),
            (OrderStatus::Ready, StatusAction::Finish) => Ok(OrderStatus::Finished),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }

    /// True when no further transitions are defined for this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Finished | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "RECEIVED" => Ok(OrderStatus::Received),
            "IN_PREPARATION" => Ok(OrderStatus::InPreparation),
            "READY" => Ok(OrderStatus::Ready),
            "FINISHED" => Ok(OrderStatus::Finished),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl StatusAction {
    /// Maps a requested target status to the action that reaches it.
    ///
    /// Returns `None` for `Pending`: nothing transitions into the initial
    /// state, it exists only at creation.
    pub fn for_target(target: OrderStatus) -> Option<StatusAction> {
        match target {
            OrderStatus::Pending => None,
            OrderStatus::Received => Some(StatusAction::Receive),
            OrderStatus::InPreparation => Some(StatusAction::Init),
            OrderStatus::Ready => Some(StatusAction::Ready),
            OrderStatus::Finished => Some(StatusAction::Finish),
            OrderStatus::Cancelled => Some(StatusAction::Cancel),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            StatusAction::Receive => "receive",
            StatusAction::Init => "start preparing",
            StatusAction::Ready => "ready",
            StatusAction::Finish => "finish",
            StatusAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for StatusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Received,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::Finished,
        OrderStatus::Cancelled,
    ];

    const ALL_ACTIONS: [StatusAction; 5] = [
        StatusAction::Receive,
        StatusAction::Init,
        StatusAction::Ready,
        StatusAction::Finish,
        StatusAction::Cancel,
    ];

    fn defined_edge(from: OrderStatus, action: StatusAction) -> Option<OrderStatus> {
        match (from, action) {
            (OrderStatus::Pending, StatusAction::Receive) => Some(OrderStatus::Received),
            (OrderStatus::Pending, StatusAction::Cancel) => Some(OrderStatus::Cancelled),
            (OrderStatus::Received, StatusAction::Init) => Some(OrderStatus::InPreparation),
            (OrderStatus::Received, StatusAction::Cancel) => Some(OrderStatus::Cancelled),
            (OrderStatus::InPreparation, StatusAction::Ready) => Some(OrderStatus::Ready),
            (OrderStatus::InPreparation, StatusAction::Cancel) => Some(OrderStatus::Cancelled),
            (OrderStatus::Ready, StatusAction::Finish) => Some(OrderStatus::Finished),
            _ => None,
        }
    }

    #[test]
    fn apply_matches_the_edge_table_exhaustively() {
        for from in ALL_STATUSES {
            for action in ALL_ACTIONS {
                match defined_edge(from, action) {
                    Some(expected) => {
                        assert_eq!(from.apply(action), Ok(expected), "{from} + {action}")
                    }
                    None => assert_eq!(
                        from.apply(action),
                        Err(InvalidTransition { from, action }),
                        "{from} + {action} should be rejected"
                    ),
                }
            }
        }
    }

    #[test]
    fn terminal_states_reject_every_action() {
        for from in [OrderStatus::Finished, OrderStatus::Cancelled] {
            for action in ALL_ACTIONS {
                assert!(from.apply(action).is_err());
            }
        }
    }

    #[test]
    fn ready_cannot_be_cancelled() {
        assert!(OrderStatus::Ready.apply(StatusAction::Cancel).is_err());
    }

    #[test]
    fn is_terminal_only_for_finished_and_cancelled() {
        for status in ALL_STATUSES {
            assert_eq!(
                status.is_terminal(),
                matches!(status, OrderStatus::Finished | OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("EM_PREPARO".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::InPreparation).unwrap();
        assert_eq!(json, "\"IN_PREPARATION\"");
        let back: OrderStatus = serde_json::from_str("\"READY\"").unwrap();
        assert_eq!(back, OrderStatus::Ready);
    }

    #[test]
    fn no_action_targets_pending() {
        assert_eq!(StatusAction::for_target(OrderStatus::Pending), None);
    }

    #[test]
    fn every_other_status_is_a_reachable_target() {
        for target in ALL_STATUSES {
            if target == OrderStatus::Pending {
                continue;
            }
            let action = StatusAction::for_target(target).expect("target must map to an action");
            // The mapped action, applied from the right predecessor, lands on the target.
            let reached = ALL_STATUSES
                .iter()
                .any(|&from| from.apply(action) == Ok(target));
            assert!(reached, "{target} unreachable via {action}");
        }
    }

    #[test]
    fn rejection_names_state_and_action() {
        let err = OrderStatus::Ready
            .apply(StatusAction::Receive)
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot receive an order in status READY");
    }
}
