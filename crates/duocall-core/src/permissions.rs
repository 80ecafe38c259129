use futures_util::future::BoxFuture;

use crate::errors::CallError;

/// Outcome of a device-capability prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGrants {
    pub camera: bool,
    pub microphone: bool,
}

impl DeviceGrants {
    pub fn all_granted(self) -> bool {
        self.camera && self.microphone
    }
}

/// Platform permission collaborator.
///
/// Shells with explicit grant prompts (Android) implement this over the
/// native API; elsewhere use [`AlwaysGranted`]. Denial is advisory: the
/// session logs it and proceeds, and the engine degrades to a black or
/// silent local feed.
pub trait PermissionProvider: Send + Sync {
    /// Prompt for (or look up) camera and microphone grants.
    fn request_device_grants(&self) -> BoxFuture<'static, Result<DeviceGrants, CallError>>;
}

/// Provider for platforms where capability grants are implicit.
pub struct AlwaysGranted;

impl PermissionProvider for AlwaysGranted {
    fn request_device_grants(&self) -> BoxFuture<'static, Result<DeviceGrants, CallError>> {
        Box::pin(async {
            Ok(DeviceGrants {
                camera: true,
                microphone: true,
            })
        })
    }
}
