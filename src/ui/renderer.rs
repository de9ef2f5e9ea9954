//! Overlay rendering
//!
//! Draws the selection, the focused cell and the grid lines with tiny-skia.
//! Layout math lives in [`FrameLayout`] and works in overlay-local pixels
//! (the overlay window sits exactly on the grid area), so it can be tested
//! without a display.

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};

use crate::config::{Rgb, SessionConfig};
use crate::domain::core::PixelRect;
use crate::domain::grid::{GridError, GridSpec};
use crate::domain::selection::Selection;

const SELECTION_ALPHA: f32 = 0.3;
const FOCUS_ALPHA: f32 = 0.5;
/// How far the focused cell is blended toward light gray
const FOCUS_BLEND: f32 = 0.5;
const LINE_ALPHA: f32 = 0.9;
const LINE_WIDTH: f32 = 3.0;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Frame is {frame_width}x{frame_height} but the canvas is {canvas_width}x{canvas_height}")]
    SizeMismatch {
        frame_width: u32,
        frame_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Colors and toggles for the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub color: Rgb,
    pub grid_lines: bool,
}

impl OverlayStyle {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            color: config.color,
            grid_lines: config.grid_lines,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: Rgb::default(),
            grid_lines: true,
        }
    }
}

/// A single grid line segment
#[derive(Debug, Clone)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width: f32,
    pub color: Color,
}

/// A solid rectangle fill
#[derive(Debug, Clone)]
pub struct Fill {
    pub rect: PixelRect,
    pub color: Color,
}

/// Everything needed to draw one frame, in overlay-local coordinates
#[derive(Debug, Clone)]
pub struct FrameLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// The normalized selection rectangle
    pub selection: Fill,
    /// The cell under the pointer or keyboard cursor
    pub focused_cell: Fill,
    /// Cell boundaries including the outer border; empty when lines are off
    pub lines: Vec<Line>,
}

impl FrameLayout {
    /// Computes the frame for a selection on a grid
    ///
    /// # Returns
    /// The layout, or RendererError::Grid if the selection leaves the grid
    pub fn from_selection(
        grid: &GridSpec,
        selection: &Selection,
        style: &OverlayStyle,
    ) -> Result<Self, RendererError> {
        let area = grid.area();
        let to_local = |rect: PixelRect| rect.translate(-area.x, -area.y);

        let selection_rect = to_local(grid.pixel_rect(selection)?);
        let focused_rect = to_local(grid.cell_rect(selection.current())?);

        let mut layout = Self {
            canvas_width: area.width,
            canvas_height: area.height,
            selection: Fill {
                rect: selection_rect,
                color: to_color(style.color, SELECTION_ALPHA),
            },
            focused_cell: Fill {
                rect: focused_rect,
                color: to_color(style.color.lerp(Rgb::HIGHLIGHT, FOCUS_BLEND), FOCUS_ALPHA),
            },
            lines: Vec::new(),
        };

        if style.grid_lines {
            layout.calculate_grid_lines(grid, to_color(style.color, LINE_ALPHA));
        }

        Ok(layout)
    }

    /// Vertical and horizontal boundaries, outer border included
    fn calculate_grid_lines(&mut self, grid: &GridSpec, color: Color) {
        let area = grid.area();
        let (columns, rows) = grid.dimensions();
        let width = area.width as f32;
        let height = area.height as f32;

        for col in 0..=columns {
            let x = (grid.column_edge(col) - area.x) as f32;
            self.lines.push(Line {
                x1: x,
                y1: 0.0,
                x2: x,
                y2: height,
                width: LINE_WIDTH,
                color,
            });
        }

        for row in 0..=rows {
            let y = (grid.row_edge(row) - area.y) as f32;
            self.lines.push(Line {
                x1: 0.0,
                y1: y,
                x2: width,
                y2: y,
                width: LINE_WIDTH,
                color,
            });
        }
    }
}

/// Converts an RGB color plus alpha to a tiny-skia color
fn to_color(rgb: Rgb, alpha: f32) -> Color {
    let channel = |value: f32| (value * 255.0).round() as u8;
    Color::from_rgba8(channel(rgb.r), channel(rgb.g), channel(rgb.b), channel(alpha))
}

/// Redraws the whole overlay into one reused pixmap
#[derive(Debug)]
pub struct OverlayRenderer {
    pixmap: Pixmap,
}

impl OverlayRenderer {
    /// Creates a renderer with a transparent canvas of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, RendererError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RendererError::PixmapCreationFailed { width, height })?;
        Ok(Self { pixmap })
    }

    /// Returns the canvas size as (width, height)
    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Draws a frame from scratch
    ///
    /// # Returns
    /// The finished pixmap (premultiplied RGBA), or
    /// RendererError::SizeMismatch if the layout was made for another canvas
    pub fn render(&mut self, layout: &FrameLayout) -> Result<&Pixmap, RendererError> {
        let (canvas_width, canvas_height) = self.size();
        if layout.canvas_width != canvas_width || layout.canvas_height != canvas_height {
            return Err(RendererError::SizeMismatch {
                frame_width: layout.canvas_width,
                frame_height: layout.canvas_height,
                canvas_width,
                canvas_height,
            });
        }

        self.pixmap.fill(Color::TRANSPARENT);
        self.render_fill(&layout.selection);
        self.render_fill(&layout.focused_cell);
        self.render_lines(&layout.lines);

        Ok(&self.pixmap)
    }

    fn render_fill(&mut self, fill: &Fill) {
        let rect = SkiaRect::from_xywh(
            fill.rect.x as f32,
            fill.rect.y as f32,
            fill.rect.width as f32,
            fill.rect.height as f32,
        );

        if let Some(rect) = rect {
            let mut paint = Paint::default();
            paint.set_color(fill.color);
            paint.anti_alias = false;
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn render_lines(&mut self, lines: &[Line]) {
        for line in lines {
            let mut path_builder = PathBuilder::new();
            path_builder.move_to(line.x1, line.y1);
            path_builder.line_to(line.x2, line.y2);

            if let Some(path) = path_builder.finish() {
                let mut paint = Paint::default();
                paint.set_color(line.color);

                let stroke = Stroke {
                    width: line.width,
                    ..Stroke::default()
                };

                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::CellCoord;

    /// 10x10 pixel cells on an 80x60 canvas placed at (100, 200)
    fn small_grid() -> GridSpec {
        GridSpec::new(PixelRect::new(100, 200, 80, 60), 8, 6).unwrap()
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn layout_is_overlay_local() {
        let selection = Selection::spanning(CellCoord::new(3, 2), CellCoord::new(1, 1));
        let layout =
            FrameLayout::from_selection(&small_grid(), &selection, &OverlayStyle::default()).unwrap();

        assert_eq!(layout.canvas_width, 80);
        assert_eq!(layout.canvas_height, 60);
        assert_eq!(layout.selection.rect, PixelRect::new(10, 10, 30, 20));
        assert_eq!(layout.focused_cell.rect, PixelRect::new(10, 10, 10, 10));
    }

    #[test]
    fn grid_lines_include_border() {
        let selection = Selection::single(CellCoord::new(0, 0));

        let layout =
            FrameLayout::from_selection(&small_grid(), &selection, &OverlayStyle::default()).unwrap();
        assert_eq!(layout.lines.len(), 9 + 7);
        assert_eq!(layout.lines.first().map(|line| line.x1), Some(0.0));
        assert!(layout.lines.iter().any(|line| line.x1 == 80.0 && line.x2 == 80.0));
        assert!(layout.lines.iter().any(|line| line.y1 == 60.0 && line.y2 == 60.0));

        let style = OverlayStyle {
            grid_lines: false,
            ..OverlayStyle::default()
        };
        let layout = FrameLayout::from_selection(&small_grid(), &selection, &style).unwrap();
        assert!(layout.lines.is_empty());
    }

    #[test]
    fn focused_cell_is_lighter_than_selection() {
        let style = OverlayStyle {
            color: Rgb::new(0.0, 0.0, 1.0),
            grid_lines: true,
        };
        let selection = Selection::spanning(CellCoord::new(0, 0), CellCoord::new(2, 2));
        let layout = FrameLayout::from_selection(&small_grid(), &selection, &style).unwrap();

        assert!(layout.focused_cell.color.red() > 0.4);
        assert!(layout.selection.color.red() < 0.01);
        assert!((layout.selection.color.alpha() - SELECTION_ALPHA).abs() < 0.01);
        assert!((layout.focused_cell.color.alpha() - FOCUS_ALPHA).abs() < 0.01);
    }

    #[test]
    fn selection_outside_grid_is_rejected() {
        let selection = Selection::single(CellCoord::new(8, 0));
        let result = FrameLayout::from_selection(&small_grid(), &selection, &OverlayStyle::default());
        assert!(matches!(result, Err(RendererError::Grid(GridError::MalformedSelection { .. }))));
    }

    #[test]
    fn render_paints_selection_focus_and_lines() {
        let grid = small_grid();
        let selection = Selection::spanning(CellCoord::new(1, 1), CellCoord::new(2, 2));
        let layout = FrameLayout::from_selection(&grid, &selection, &OverlayStyle::default()).unwrap();

        let mut renderer = OverlayRenderer::new(80, 60).unwrap();
        let pixmap = renderer.render(&layout).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (80, 60));

        // Inside the selection, away from lines and the focused cell
        let selected = alpha_at(pixmap, 15, 15);
        assert!((70..=84).contains(&selected), "selection alpha {selected}");

        // Focused cell is drawn over the selection
        let focused = alpha_at(pixmap, 25, 25);
        assert!(focused > selected, "focused alpha {focused}");

        // On a grid line
        assert!(alpha_at(pixmap, 40, 45) > 200);

        // Empty cell
        assert_eq!(alpha_at(pixmap, 65, 45), 0);
    }

    #[test]
    fn render_clears_previous_frame() {
        let grid = small_grid();
        let style = OverlayStyle {
            grid_lines: false,
            ..OverlayStyle::default()
        };
        let mut renderer = OverlayRenderer::new(80, 60).unwrap();

        let first = FrameLayout::from_selection(&grid, &Selection::single(CellCoord::new(0, 0)), &style)
            .unwrap();
        renderer.render(&first).unwrap();

        let second = FrameLayout::from_selection(&grid, &Selection::single(CellCoord::new(7, 5)), &style)
            .unwrap();
        let pixmap = renderer.render(&second).unwrap();

        assert_eq!(alpha_at(pixmap, 5, 5), 0);
        assert!(alpha_at(pixmap, 75, 55) > 0);
    }

    #[test]
    fn render_rejects_wrong_canvas() {
        let layout = FrameLayout::from_selection(
            &small_grid(),
            &Selection::single(CellCoord::new(0, 0)),
            &OverlayStyle::default(),
        )
        .unwrap();

        let mut renderer = OverlayRenderer::new(40, 30).unwrap();
        assert!(matches!(renderer.render(&layout), Err(RendererError::SizeMismatch { .. })));
    }

    #[test]
    fn empty_canvas_is_an_error() {
        assert!(matches!(
            OverlayRenderer::new(0, 10),
            Err(RendererError::PixmapCreationFailed { width: 0, height: 10 })
        ));
    }
}
