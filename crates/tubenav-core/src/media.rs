#![forbid(unsafe_code)]

//! Play/pause and seek over the page's media element.

/// The subset of `HTMLMediaElement` the agent drives.
pub trait MediaElement {
    fn paused(&self) -> bool;
    fn play(&self);
    fn pause(&self);
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// Length in seconds; `NaN` until metadata loads, infinite for live streams.
    fn duration(&self) -> f64;
}

/// What [`toggle_play`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackChange {
    Played,
    Paused,
}

/// Resume a paused element, pause a playing one.
pub fn toggle_play<M: MediaElement + ?Sized>(media: &M) -> PlaybackChange {
    if media.paused() {
        media.play();
        PlaybackChange::Played
    } else {
        media.pause();
        PlaybackChange::Paused
    }
}

/// Move the playhead by `delta` seconds, clamped to `[0, duration]`.
///
/// Returns the new position, or `None` when the duration is unknown.
pub fn seek<M: MediaElement + ?Sized>(media: &M, delta: f64) -> Option<f64> {
    let duration = media.duration();
    if duration.is_nan() {
        return None;
    }
    let target = (media.current_time() + delta).min(duration).max(0.0);
    media.set_current_time(target);
    Some(target)
}
