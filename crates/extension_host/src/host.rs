//! Shared host-bundle and capability models for composing extension contexts.

use std::rc::Rc;

use crate::{
    AlarmService, BadgeService, MessageBus, NotificationService, StorageArea, TaskSpawner,
    WindowService,
};

/// Host runtime shape detected for the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// `chrome` namespace with callback-style APIs.
    Chromium,
    /// `browser` namespace with promise-style APIs.
    WebExt,
    /// Neither runtime global found; the primary shape with inert capabilities.
    Fallback,
}

impl HostKind {
    /// Returns a stable string token for diagnostics and runtime inspection.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::WebExt => "webext",
            Self::Fallback => "fallback",
        }
    }
}

/// Host availability state for one capability domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    /// The host exposes the namespace and calls reach it.
    Available,
    /// The namespace is missing; calls resolve to inert defaults.
    Unavailable,
}

impl CapabilityStatus {
    /// Returns whether the capability reaches a real host namespace.
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Maps a probe result onto a status.
    pub const fn from_present(present: bool) -> Self {
        if present {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

/// Per-capability availability snapshot taken when the host was resolved.
///
/// The snapshot is intentionally coarse so console code can branch on
/// capability posture without importing adapter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCompatibility {
    /// Detected runtime shape.
    pub kind: HostKind,
    /// `storage.local` availability.
    pub storage: CapabilityStatus,
    /// Notification namespace availability.
    pub notifications: CapabilityStatus,
    /// Alarm namespace availability.
    pub alarms: CapabilityStatus,
    /// Runtime messaging availability.
    pub messaging: CapabilityStatus,
    /// Action-badge availability.
    pub badge: CapabilityStatus,
    /// Window management availability.
    pub windows: CapabilityStatus,
    /// Manifest version reported by the host; `0` when no manifest exists.
    pub manifest_version: u32,
}

impl HostCompatibility {
    /// Posture for a host exposing every namespace this console uses.
    pub const fn full(kind: HostKind) -> Self {
        Self {
            kind,
            storage: CapabilityStatus::Available,
            notifications: CapabilityStatus::Available,
            alarms: CapabilityStatus::Available,
            messaging: CapabilityStatus::Available,
            badge: CapabilityStatus::Available,
            windows: CapabilityStatus::Available,
            manifest_version: 3,
        }
    }

    /// Posture for the inert fallback host.
    pub const fn inert() -> Self {
        Self {
            kind: HostKind::Fallback,
            storage: CapabilityStatus::Unavailable,
            notifications: CapabilityStatus::Unavailable,
            alarms: CapabilityStatus::Unavailable,
            messaging: CapabilityStatus::Unavailable,
            badge: CapabilityStatus::Unavailable,
            windows: CapabilityStatus::Unavailable,
            manifest_version: 0,
        }
    }
}

/// Resolved host service bundle injected into console contexts.
///
/// Environment-specific adapter selection happens once, where this bundle is
/// built; everything downstream depends only on the capability traits. The
/// badge and window namespaces are optional and absent on hosts without them.
#[derive(Clone)]
pub struct HostServices {
    /// Durable extension storage area.
    pub storage: Rc<dyn StorageArea>,
    /// Notification delivery service.
    pub notifications: Rc<dyn NotificationService>,
    /// Recurring alarm service.
    pub alarms: Rc<dyn AlarmService>,
    /// Inter-context message transport.
    pub messaging: Rc<dyn MessageBus>,
    /// Optional action-badge surface.
    pub badge: Option<Rc<dyn BadgeService>>,
    /// Optional window management surface.
    pub windows: Option<Rc<dyn WindowService>>,
    /// Fire-and-forget task spawner for this context.
    pub spawner: Rc<dyn TaskSpawner>,
    /// Availability snapshot taken at resolution time.
    pub compatibility: HostCompatibility,
    /// Detected runtime shape.
    pub kind: HostKind,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn host_kind_tokens_are_stable() {
        assert_eq!(HostKind::Chromium.as_str(), "chromium");
        assert_eq!(HostKind::WebExt.as_str(), "webext");
        assert_eq!(HostKind::Fallback.as_str(), "fallback");
    }

    #[test]
    fn full_posture_marks_every_domain_available() {
        let compat = HostCompatibility::full(HostKind::Chromium);
        assert!(compat.storage.is_available());
        assert!(compat.notifications.is_available());
        assert!(compat.alarms.is_available());
        assert!(compat.messaging.is_available());
        assert!(compat.badge.is_available());
        assert!(compat.windows.is_available());
        assert_eq!(compat.manifest_version, 3);
    }

    #[test]
    fn inert_posture_marks_every_domain_unavailable() {
        let compat = HostCompatibility::inert();
        assert_eq!(compat.kind, HostKind::Fallback);
        assert!(!compat.storage.is_available());
        assert!(!compat.messaging.is_available());
        assert_eq!(compat.manifest_version, 0);
    }

    #[test]
    fn capability_status_maps_probe_results() {
        assert_eq!(
            CapabilityStatus::from_present(true),
            CapabilityStatus::Available
        );
        assert_eq!(
            CapabilityStatus::from_present(false),
            CapabilityStatus::Unavailable
        );
    }
}
