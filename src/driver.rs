//! Frame clock for hosts built on a calloop event loop.
//!
//! Settle animations only advance when [`StackedController::tick`] is called.
//! [`insert_frame_clock`] registers a repeating timer that does this on the
//! loop's own thread, so completions are processed between dispatches and
//! never from inside a host callback.

use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use crate::controller::StackedController;
use crate::host::Host;

/// Roughly 60 frames per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Tick the controller returned by `access` every `interval` on `handle`'s loop.
///
/// The timer keeps running for the lifetime of the registration; remove it
/// with [`LoopHandle::remove`] and the returned token.
pub fn insert_frame_clock<'l, D, H>(
    handle: &LoopHandle<'l, D>,
    interval: Duration,
    access: fn(&mut D) -> &mut StackedController<H>,
) -> Result<RegistrationToken, calloop::Error>
where
    D: 'l,
    H: Host + 'l,
{
    let token = handle
        .insert_source(Timer::from_duration(interval), move |deadline, _, data| {
            let controller = access(data);
            let changes = controller.tick(deadline);
            if !changes.is_empty() {
                log::trace!("Frame at {:?} changed {:?}", deadline, changes);
            }
            TimeoutAction::ToDuration(interval)
        })
        .map_err(|err| err.error)?;
    log::debug!("Frame clock registered every {:?}", interval);
    Ok(token)
}
