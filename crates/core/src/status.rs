//! Lifecycle status enums.
//!
//! Every status is stored and transmitted as its snake_case wire string;
//! `as_str`/`parse` round-trip exactly so a reloaded entity always carries
//! the same status it was written with.

use crate::error::CoreError;

macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident, $entity:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Entity name used in error and log messages.
            pub const ENTITY: &'static str = $entity;

            /// The wire/database representation.
            pub fn as_str(self) -> &'static str {
                match self { $( Self::$variant => $wire ),+ }
            }

            /// Parse the wire/database representation.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} status '{other}'", $entity
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_status! {
    /// Project lifecycle status.
    ProjectStatus, "project" {
        PendingApproval => "pending_approval",
        Approved => "approved",
        Rejected => "rejected",
        Active => "active",
        PendingReturn => "pending_return",
        Completed => "completed",
        Closed => "closed",
    }
}

impl ProjectStatus {
    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Closed)
    }
}

define_status! {
    /// Procurement bucket lifecycle status.
    BucketStatus, "bucket" {
        Open => "open",
        Closed => "closed",
        Ordered => "ordered",
        Received => "received",
    }
}

impl BucketStatus {
    /// `received` is the only terminal bucket status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Received)
    }
}

define_status! {
    /// Status of an item request inside a procurement bucket.
    ///
    /// One-directional: pending -> approved|rejected, then approved items
    /// advance to ordered/received in lockstep with the bucket.
    ItemRequestStatus, "item request" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Ordered => "ordered",
        Received => "received",
    }
}

define_status! {
    /// Status of an inventory request tied to a project.
    InventoryRequestStatus, "inventory request" {
        Pending => "pending",
        Fulfilled => "fulfilled",
        Rejected => "rejected",
        PendingReturn => "pending_return",
        Returned => "returned",
    }
}

define_status! {
    /// Reimbursement lifecycle status.
    ReimbursementStatus, "reimbursement" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Paid => "paid",
    }
}
