//=========================================================================
// Headless Platform
//=========================================================================
//
// Window-less backend for tests, tools and servers.
//
// Architecture:
//   EventInjector (any thread) → crossbeam channel → poll_events() → loop
//
// Scripted batches take precedence: poll N returns script[N] (if any)
// followed by whatever was injected through the channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{Platform, SystemEvent};
use crate::core::config::WindowConfig;
use crate::core::input::InputEvent;
use crate::core::render::SoftwareRenderer;
use crate::error::PlatformError;

//=== EventInjector =======================================================

/// Thread-safe sender feeding a [`HeadlessPlatform`].
#[derive(Debug, Clone)]
pub struct EventInjector {
    sender: Sender<SystemEvent>,
}

impl EventInjector {
    /// Queues an event for the next poll. Returns `false` once the
    /// platform is gone.
    pub fn send(&self, event: SystemEvent) -> bool {
        if self.sender.send(event).is_err() {
            warn!(target: "platform", "Headless platform dropped, event discarded");
            return false;
        }
        true
    }

    pub fn input(&self, event: InputEvent) -> bool {
        self.send(SystemEvent::Input(event))
    }

    pub fn quit(&self) -> bool {
        self.send(SystemEvent::Quit)
    }
}

//=== HeadlessPlatform ====================================================

#[derive(Debug)]
pub struct HeadlessPlatform {
    sender: Sender<SystemEvent>,
    receiver: Receiver<SystemEvent>,
    script: VecDeque<Vec<SystemEvent>>,
    open_failure: Option<String>,
    open: bool,
    polls: usize,
    shutdowns: Arc<AtomicUsize>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            script: VecDeque::new(),
            open_failure: None,
            open: false,
            polls: 0,
            shutdowns: Arc::new(AtomicUsize::new(0)),
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Appends one batch to be returned by a future poll (one per poll).
    pub fn with_poll(mut self, batch: Vec<SystemEvent>) -> Self {
        self.script.push_back(batch);
        self
    }

    /// Makes `open` fail, simulating a missing display.
    pub fn failing_open(mut self, reason: impl Into<String>) -> Self {
        self.open_failure = Some(reason.into());
        self
    }

    pub fn injector(&self) -> EventInjector {
        EventInjector {
            sender: self.sender.clone(),
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn poll_count(&self) -> usize {
        self.polls
    }

    /// Shared count of `shutdown` calls; outlives the platform.
    pub fn shutdown_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.shutdowns)
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    type Surface = SoftwareRenderer;

    fn open(&mut self, window: &WindowConfig) -> Result<SoftwareRenderer, PlatformError> {
        if self.open {
            return Err(PlatformError::AlreadyOpen);
        }
        if let Some(reason) = &self.open_failure {
            return Err(PlatformError::SurfaceCreation(reason.clone()));
        }

        let surface = SoftwareRenderer::new(window.width, window.height)
            .map_err(|err| PlatformError::SurfaceCreation(err.to_string()))?;

        self.open = true;
        info!(
            target: "platform",
            "Headless surface \"{}\" opened: {}x{}",
            window.title,
            window.width,
            window.height
        );
        Ok(surface)
    }

    fn poll_events(&mut self, events: &mut Vec<SystemEvent>) {
        self.polls += 1;

        if let Some(batch) = self.script.pop_front() {
            events.extend(batch);
        }

        // The platform holds a sender, so the channel never disconnects;
        // try_iter stops once it is empty.
        let before = events.len();
        events.extend(self.receiver.try_iter());
        trace!(target: "platform", "Drained {} injected events", events.len() - before);
    }

    fn shutdown(&mut self) {
        self.open = false;
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        info!(target: "platform", "Headless platform shut down");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
