//! Desktop notifications for interval completion

use notify_rust::Notification;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Whether the user allowed notifications to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Undetermined,
    Granted,
    Denied,
}

/// Capability to display a system notification.
///
/// Both methods may block on the platform notification service; callers run
/// them off the async runtime.
pub trait Notifier: Send + Sync {
    /// Ask the platform whether notifications may be shown
    fn request_permission(&self) -> Permission;

    /// Display a notification. Callers check permission first.
    fn notify(&self, title: &str, body: &str) -> Result<(), String>;
}

/// Notifier backed by the platform notification service
#[derive(Debug)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    #[cfg(all(unix, not(target_os = "macos")))]
    fn request_permission(&self) -> Permission {
        match notify_rust::get_server_information() {
            Ok(server) => {
                info!("Notification server available: {} {}", server.name, server.version);
                Permission::Granted
            }
            Err(e) => {
                tracing::warn!("No notification server reachable: {}", e);
                Permission::Denied
            }
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn request_permission(&self) -> Permission {
        info!("Notifications need no server check on this platform");
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(body)
            .show()
            .map_err(|e| format!("Failed to show notification: {}", e))?;

        debug!("Notification shown: {}", title);
        Ok(())
    }
}
