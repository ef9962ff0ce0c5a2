use std::fmt;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use crate::{Error, Result};

/// A native window or surface identifier.
///
/// An X11 window id on the synchronous backend, a `wl_surface` pointer on Wayland.
/// Zero means "not realized yet" and cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(NonZeroUsize);

impl WindowHandle {
	pub fn new(raw: usize) -> Option<Self> {
		NonZeroUsize::new(raw).map(Self)
	}

	pub fn get(self) -> usize {
		self.0.get()
	}
}

impl fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// A display connection identifier, the `wl_display` pointer on Wayland.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(NonZeroUsize);

impl DisplayHandle {
	pub fn new(raw: usize) -> Option<Self> {
		NonZeroUsize::new(raw).map(Self)
	}

	pub fn get(self) -> usize {
		self.0.get()
	}
}

impl fmt::Display for DisplayHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// The handles captured when the video surface was realized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handles {
	pub window: WindowHandle,

	/// Only present on asynchronous backends.
	pub display: Option<DisplayHandle>,
}

impl Handles {
	pub fn synchronous(window: WindowHandle) -> Self {
		Self { window, display: None }
	}

	pub fn asynchronous(display: DisplayHandle, surface: WindowHandle) -> Self {
		Self {
			window: surface,
			display: Some(display),
		}
	}
}

/// Write-once storage for the native handles.
///
/// Written on the UI thread when the surface is realized, read from the bus thread.
/// The player starts the pipeline only after [HandleRegistry::set] returns,
/// so every reader either sees the handles or knows realization has not happened.
#[derive(Debug, Default)]
pub struct HandleRegistry {
	handles: OnceLock<Handles>,
}

impl HandleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&self, handles: Handles) -> Result<()> {
		self.handles.set(handles).map_err(|_| Error::AlreadyRealized)?;
		tracing::debug!(window = %handles.window, display = ?handles.display.map(|d| d.to_string()), "surface realized");
		Ok(())
	}

	pub fn get(&self) -> Option<Handles> {
		self.handles.get().copied()
	}

	pub fn window(&self) -> Option<WindowHandle> {
		self.get().map(|handles| handles.window)
	}

	pub fn display(&self) -> Option<DisplayHandle> {
		self.get().and_then(|handles| handles.display)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn zero_is_not_a_handle() {
		assert!(WindowHandle::new(0).is_none());
		assert!(DisplayHandle::new(0).is_none());
		assert_eq!(WindowHandle::new(0x1234).unwrap().get(), 0x1234);
	}

	#[test]
	fn set_once() {
		let registry = HandleRegistry::new();
		assert_eq!(registry.get(), None);
		assert_eq!(registry.window(), None);

		let first = Handles::synchronous(WindowHandle::new(0x1234).unwrap());
		registry.set(first).unwrap();

		let second = Handles::synchronous(WindowHandle::new(0x5678).unwrap());
		assert!(matches!(registry.set(second), Err(Error::AlreadyRealized)));

		// The first value sticks.
		assert_eq!(registry.get(), Some(first));
		assert_eq!(registry.display(), None);
	}

	#[test]
	fn asynchronous_handles() {
		let registry = HandleRegistry::new();
		let display = DisplayHandle::new(0xd15).unwrap();
		let surface = WindowHandle::new(0x5e7f).unwrap();

		registry.set(Handles::asynchronous(display, surface)).unwrap();
		assert_eq!(registry.display(), Some(display));
		assert_eq!(registry.window(), Some(surface));
	}

	#[test]
	fn visible_across_threads() {
		let registry = std::sync::Arc::new(HandleRegistry::new());
		let handle = WindowHandle::new(0xabc).unwrap();
		registry.set(Handles::synchronous(handle)).unwrap();

		let reader = registry.clone();
		let seen = std::thread::spawn(move || reader.window()).join().unwrap();
		assert_eq!(seen, Some(handle));
	}

	#[test]
	fn display_format() {
		assert_eq!(WindowHandle::new(0x1234).unwrap().to_string(), "0x1234");
	}
}
