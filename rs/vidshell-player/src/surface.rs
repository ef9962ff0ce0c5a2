use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use vidshell::{Backend, DisplayHandle, Handles, Rect, WindowHandle};
use winit::dpi::PhysicalSize;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
	#[error("window system handle unavailable: {0}")]
	Unavailable(#[from] raw_window_handle::HandleError),

	#[error("unsupported window system: {0}")]
	Unsupported(&'static str),

	#[error("window system returned a null handle")]
	Null,
}

/// Read the native handles of a realized window.
pub fn realize<W>(window: &W) -> Result<(Backend, Handles), SurfaceError>
where
	W: HasWindowHandle + HasDisplayHandle + ?Sized,
{
	let raw_window = window.window_handle()?.as_raw();
	let raw_display = window.display_handle()?.as_raw();
	classify(raw_window, raw_display)
}

fn classify(window: RawWindowHandle, display: RawDisplayHandle) -> Result<(Backend, Handles), SurfaceError> {
	match (window, display) {
		(RawWindowHandle::Xlib(window), _) => {
			let window = WindowHandle::new(window.window as usize).ok_or(SurfaceError::Null)?;
			Ok((Backend::X11, Handles::synchronous(window)))
		}
		(RawWindowHandle::Xcb(window), _) => {
			let window = WindowHandle::new(window.window.get() as usize).ok_or(SurfaceError::Null)?;
			Ok((Backend::X11, Handles::synchronous(window)))
		}
		(RawWindowHandle::Wayland(window), RawDisplayHandle::Wayland(display)) => {
			let surface = WindowHandle::new(window.surface.as_ptr() as usize).ok_or(SurfaceError::Null)?;
			let display = DisplayHandle::new(display.display.as_ptr() as usize).ok_or(SurfaceError::Null)?;
			Ok((Backend::Wayland, Handles::asynchronous(display, surface)))
		}
		(RawWindowHandle::Wayland(_), _) => Err(SurfaceError::Unsupported("Wayland surface without a Wayland display")),
		_ => Err(SurfaceError::Unsupported("only X11 and Wayland windows can host video")),
	}
}

/// The whole window is the video area.
pub fn allocation(size: PhysicalSize<u32>) -> Rect {
	let width = i32::try_from(size.width).unwrap_or(i32::MAX);
	let height = i32::try_from(size.height).unwrap_or(i32::MAX);
	Rect::new(0, 0, width, height)
}

#[cfg(test)]
mod test {
	use super::*;
	use raw_window_handle::{
		WaylandDisplayHandle, WaylandWindowHandle, XcbDisplayHandle, XcbWindowHandle, XlibDisplayHandle,
		XlibWindowHandle,
	};
	use std::ffi::c_void;
	use std::num::NonZeroU32;
	use std::ptr::NonNull;

	fn fake_ptr(addr: usize) -> NonNull<c_void> {
		NonNull::new(addr as *mut c_void).unwrap()
	}

	#[test]
	fn xlib_is_synchronous() {
		let window = RawWindowHandle::Xlib(XlibWindowHandle::new(0x4a0_0007));
		let display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));

		let (backend, handles) = classify(window, display).unwrap();
		assert_eq!(backend, Backend::X11);
		assert_eq!(handles.window.get(), 0x4a0_0007);
		assert_eq!(handles.display, None);
	}

	#[test]
	fn xcb_is_synchronous() {
		let window = RawWindowHandle::Xcb(XcbWindowHandle::new(NonZeroU32::new(0x60_0001).unwrap()));
		let display = RawDisplayHandle::Xcb(XcbDisplayHandle::new(None, 0));

		let (backend, handles) = classify(window, display).unwrap();
		assert_eq!(backend, Backend::X11);
		assert_eq!(handles.window.get(), 0x60_0001);
	}

	#[test]
	fn wayland_is_asynchronous() {
		let window = RawWindowHandle::Wayland(WaylandWindowHandle::new(fake_ptr(0x1000)));
		let display = RawDisplayHandle::Wayland(WaylandDisplayHandle::new(fake_ptr(0x2000)));

		let (backend, handles) = classify(window, display).unwrap();
		assert_eq!(backend, Backend::Wayland);
		assert_eq!(handles.window.get(), 0x1000);
		assert_eq!(handles.display.map(DisplayHandle::get), Some(0x2000));
	}

	#[test]
	fn zero_xlib_window() {
		let window = RawWindowHandle::Xlib(XlibWindowHandle::new(0));
		let display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
		assert!(matches!(classify(window, display), Err(SurfaceError::Null)));
	}

	#[test]
	fn mismatched_display() {
		let window = RawWindowHandle::Wayland(WaylandWindowHandle::new(fake_ptr(0x1000)));
		let display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
		assert!(matches!(classify(window, display), Err(SurfaceError::Unsupported(_))));
	}

	#[test]
	fn allocation_covers_window() {
		assert_eq!(allocation(PhysicalSize::new(640, 480)), Rect::new(0, 0, 640, 480));
		assert_eq!(allocation(PhysicalSize::new(u32::MAX, 1)).width, i32::MAX);
	}
}
