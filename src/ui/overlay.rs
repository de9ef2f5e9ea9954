//! Overlay window for grid selection
//!
//! A borderless, override-redirect ARGB window placed exactly over the grid
//! area. It grabs keyboard and pointer for the duration of the session so
//! input reaches it regardless of focus, and releases everything in `Drop`.

use tiny_skia::Pixmap;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    AtomEnum, ColormapAlloc, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask,
    Gcontext, GrabMode, GrabStatus, ImageFormat, ImageOrder, NotifyDetail, PropMode, Screen,
    Visualid, VisualClass, Window, WindowClass,
};
use x11rb::wrapper::ConnectionExt as _;

use crate::domain::core::PixelRect;
use crate::input::{InputError, InputEvent, InputSource, KeyboardMap, PointerButton};
use crate::input::keyboard::KeyAction;
use crate::platform::Display;

/// Depth of the ARGB visual the overlay needs for per-pixel alpha
const ARGB_DEPTH: u8 = 32;
/// Fixed part of a PutImage request
const PUT_IMAGE_HEADER_BYTES: usize = 24;
const WM_CLASS: &[u8] = b"grid_resize\0Grid_resize\0";

/// Overlay errors
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("The X server offers no 32-bit TrueColor visual")]
    NoArgbVisual,

    #[error("Grid area {0} does not fit an X window")]
    InvalidArea(PixelRect),

    #[error("Failed to create the overlay window: {0}")]
    SurfaceCreationFailed(#[from] ReplyOrIdError),

    #[error("Frame is {frame_width}x{frame_height} but the overlay is {width}x{height}")]
    FrameSizeMismatch {
        frame_width: u32,
        frame_height: u32,
        width: u16,
        height: u16,
    },

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),
}

/// Something a finished frame can be shown on
pub trait OverlaySurface {
    /// Replaces the visible overlay contents with `frame`
    ///
    /// `frame` is premultiplied RGBA in overlay-local coordinates.
    fn present(&mut self, frame: &Pixmap) -> Result<(), OverlayError>;
}

/// Finds a 32-bit TrueColor visual on the screen
pub fn find_argb_visual(screen: &Screen) -> Option<Visualid> {
    screen
        .allowed_depths
        .iter()
        .filter(|depth| depth.depth == ARGB_DEPTH)
        .flat_map(|depth| depth.visuals.iter())
        .find(|visual| visual.class == VisualClass::TRUE_COLOR)
        .map(|visual| visual.visual_id)
}

/// Converts premultiplied RGBA to the server's 32-bit pixel byte layout
///
/// ARGB pixels are stored as one 32-bit word, so the byte order of the
/// image decides whether blue or alpha comes first.
pub fn to_x_pixels(rgba: &[u8], byte_order: ImageOrder) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if byte_order == ImageOrder::MSB_FIRST {
            pixels.extend_from_slice(&[a, r, g, b]);
        } else {
            pixels.extend_from_slice(&[b, g, r, a]);
        }
    }
    pixels
}

/// Rows per PutImage request that stay under `max_request_bytes`
///
/// Always at least one row; a single row of a sane overlay width fits any
/// server's minimum request size.
pub fn rows_per_request(stride: usize, max_request_bytes: usize) -> usize {
    if stride == 0 {
        return 1;
    }
    (max_request_bytes.saturating_sub(PUT_IMAGE_HEADER_BYTES) / stride).max(1)
}

/// Maps a FocusOut detail to whether the overlay really lost input
fn is_focus_lost(detail: NotifyDetail) -> bool {
    detail != NotifyDetail::POINTER && detail != NotifyDetail::INFERIOR
}

/// Translates one X event arriving on the overlay `window`
///
/// # Returns
/// The input event, None for events the session ignores, or
/// InputError::Protocol for an error the server reported asynchronously
fn translate_event(
    event: Event,
    window: Window,
    keyboard: &KeyboardMap,
) -> Result<Option<InputEvent>, InputError> {
    let input = match event {
        Event::MotionNotify(event) => Some(InputEvent::PointerMoved {
            x: event.root_x.into(),
            y: event.root_y.into(),
        }),
        Event::ButtonPress(event) => Some(InputEvent::ButtonPressed {
            button: PointerButton::from_x11(event.detail),
            x: event.root_x.into(),
            y: event.root_y.into(),
        }),
        Event::ButtonRelease(event) => Some(InputEvent::ButtonReleased {
            button: PointerButton::from_x11(event.detail),
            x: event.root_x.into(),
            y: event.root_y.into(),
        }),
        Event::KeyPress(event) => match keyboard.action(event.detail) {
            KeyAction::Ignored => None,
            action => Some(InputEvent::Key(action)),
        },
        Event::FocusOut(event) if event.event == window && is_focus_lost(event.detail) => {
            Some(InputEvent::FocusLost)
        }
        // Only the last of a series of exposures triggers a redraw
        Event::Expose(event) if event.window == window && event.count == 0 => Some(InputEvent::Exposed),
        Event::Error(error) => return Err(InputError::Protocol(error)),
        _ => None,
    };
    Ok(input)
}

/// The on-screen overlay and its input grabs
pub struct X11Overlay<'a> {
    display: &'a Display,
    window: Window,
    colormap: u32,
    gc: Gcontext,
    width: u16,
    height: u16,
    keyboard: KeyboardMap,
}

impl<'a> X11Overlay<'a> {
    /// Creates, maps and grabs an overlay covering `area`
    ///
    /// # Arguments
    /// * `display` - Open display connection
    /// * `area` - Screen rectangle of the grid
    /// * `keyboard` - Keycode table used to translate key presses
    pub fn new(display: &'a Display, area: PixelRect, keyboard: KeyboardMap) -> Result<Self, OverlayError> {
        let x = i16::try_from(area.x).map_err(|_| OverlayError::InvalidArea(area))?;
        let y = i16::try_from(area.y).map_err(|_| OverlayError::InvalidArea(area))?;
        let width = u16::try_from(area.width).map_err(|_| OverlayError::InvalidArea(area))?;
        let height = u16::try_from(area.height).map_err(|_| OverlayError::InvalidArea(area))?;

        let conn = display.conn();
        let screen = display.screen();
        let visual = find_argb_visual(screen).ok_or(OverlayError::NoArgbVisual)?;

        let colormap = conn.generate_id()?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, screen.root, visual)?;

        let window = conn.generate_id()?;
        let event_mask = EventMask::EXPOSURE
            | EventMask::KEY_PRESS
            | EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::POINTER_MOTION
            | EventMask::FOCUS_CHANGE;

        conn.create_window(
            ARGB_DEPTH,
            window,
            screen.root,
            x,
            y,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &CreateWindowAux::new()
                .override_redirect(1u32)
                .background_pixel(0)
                .border_pixel(0)
                .colormap(colormap)
                .save_under(1u32)
                .event_mask(event_mask),
        )?;

        conn.change_property32(
            PropMode::REPLACE,
            window,
            display.atoms()._NET_WM_WINDOW_TYPE,
            AtomEnum::ATOM,
            &[display.atoms()._NET_WM_WINDOW_TYPE_DESKTOP],
        )?;
        conn.change_property8(PropMode::REPLACE, window, AtomEnum::WM_CLASS, AtomEnum::STRING, WM_CLASS)?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            b"grid-resize",
        )?;

        let gc = conn.generate_id()?;
        conn.create_gc(gc, window, &CreateGCAux::new())?;

        conn.map_window(window)?;
        conn.flush()?;

        let overlay = Self {
            display,
            window,
            colormap,
            gc,
            width,
            height,
            keyboard,
        };
        overlay.grab_input()?;

        log::info!("Overlay 0x{:x} mapped at {}", window, area);
        Ok(overlay)
    }

    /// Takes the keyboard and pointer
    ///
    /// A refused grab only degrades the session: input then depends on the
    /// window under the pointer.
    fn grab_input(&self) -> Result<(), OverlayError> {
        let conn = self.display.conn();

        let keyboard = conn
            .grab_keyboard(true, self.window, x11rb::CURRENT_TIME, GrabMode::ASYNC, GrabMode::ASYNC)?
            .reply()?;
        if keyboard.status != GrabStatus::SUCCESS {
            log::warn!("Keyboard grab refused: {:?}", keyboard.status);
        }

        let pointer_mask =
            EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION;
        let pointer = conn
            .grab_pointer(
                false,
                self.window,
                pointer_mask,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                x11rb::CURRENT_TIME,
            )?
            .reply()?;
        if pointer.status != GrabStatus::SUCCESS {
            log::warn!("Pointer grab refused: {:?}", pointer.status);
        }

        Ok(())
    }
}

impl OverlaySurface for X11Overlay<'_> {
    fn present(&mut self, frame: &Pixmap) -> Result<(), OverlayError> {
        if frame.width() != u32::from(self.width) || frame.height() != u32::from(self.height) {
            return Err(OverlayError::FrameSizeMismatch {
                frame_width: frame.width(),
                frame_height: frame.height(),
                width: self.width,
                height: self.height,
            });
        }

        let conn = self.display.conn();
        let pixels = to_x_pixels(frame.data(), conn.setup().image_byte_order);

        let stride = usize::from(self.width) * 4;
        let band_rows = rows_per_request(stride, conn.maximum_request_bytes());

        for (band, chunk) in pixels.chunks(stride * band_rows).enumerate() {
            let top = band * band_rows;
            let rows = (chunk.len() / stride) as u16;
            conn.put_image(
                ImageFormat::Z_PIXMAP,
                self.window,
                self.gc,
                self.width,
                rows,
                0,
                top as i16,
                0,
                ARGB_DEPTH,
                chunk,
            )?;
        }

        conn.flush()?;
        Ok(())
    }
}

impl InputSource for X11Overlay<'_> {
    fn next_event(&mut self) -> Result<InputEvent, InputError> {
        loop {
            let event = self.display.conn().wait_for_event()?;
            if let Some(input) = translate_event(event, self.window, &self.keyboard)? {
                return Ok(input);
            }
        }
    }
}

impl Drop for X11Overlay<'_> {
    fn drop(&mut self) {
        let conn = self.display.conn();
        let _ = conn.ungrab_pointer(x11rb::CURRENT_TIME);
        let _ = conn.ungrab_keyboard(x11rb::CURRENT_TIME);
        let _ = conn.free_gc(self.gc);
        let _ = conn.destroy_window(self.window);
        let _ = conn.free_colormap(self.colormap);
        let _ = conn.flush();
        log::debug!("Overlay 0x{:x} destroyed", self.window);
    }
}
