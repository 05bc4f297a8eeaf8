use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

// --- Poster Widget ---

/// Draws an image that has already been sized with [`fit_poster`].
pub struct PosterWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

const ASCII_CHARS: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

impl Widget for PosterWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_direct(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
      DisplayMode::Off => {}
    }
  }
}

/// Scale a poster to fit `area` while keeping its aspect ratio.
///
/// A terminal cell is roughly twice as tall as it is wide, so the image is
/// fitted into `width x 2*height` pixels. Half-block rendering consumes two
/// pixel rows per cell; ASCII rendering gets the rows halved again.
pub fn fit_poster(image: &DynamicImage, area: Rect, mode: DisplayMode) -> DynamicImage {
  let w = u32::from(area.width).max(1);
  let h = u32::from(area.height).max(1) * 2;
  let fitted = image.resize(w, h, FilterType::Triangle);
  match mode {
    DisplayMode::Ascii => {
      let rows = fitted.height().div_ceil(2).max(1);
      fitted.resize_exact(fitted.width().max(1), rows, FilterType::Triangle)
    }
    _ => fitted,
  }
}

fn cell_offset(outer: u16, inner: u32) -> u16 {
  (u32::from(outer).saturating_sub(inner) / 2).min(u32::from(u16::MAX)) as u16
}

fn render_direct(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  let img_w = rgb.width().min(u32::from(area.width));
  let img_h = rgb.height();
  let cell_h = img_h.div_ceil(2).min(u32::from(area.height));
  let offset_x = cell_offset(area.width, img_w);
  let offset_y = cell_offset(area.height, cell_h);

  for y in 0..cell_h {
    for x in 0..img_w {
      let upper = rgb.get_pixel(x, y * 2);
      let lower_y = y * 2 + 1;
      let fg = Color::Rgb(upper[0], upper[1], upper[2]);
      let bg = if lower_y < img_h {
        let lower = rgb.get_pixel(x, lower_y);
        Color::Rgb(lower[0], lower[1], lower[2])
      } else {
        Color::Reset
      };
      buf.set_string(
        area.x.saturating_add(offset_x).saturating_add(x as u16),
        area.y.saturating_add(offset_y).saturating_add(y as u16),
        "▀",
        Style::default().fg(fg).bg(bg),
      );
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let img_w = luma.width().min(u32::from(area.width));
  let img_h = luma.height().min(u32::from(area.height));
  let offset_x = cell_offset(area.width, img_w);
  let offset_y = cell_offset(area.height, img_h);

  for y in 0..img_h {
    for x in 0..img_w {
      let pixel = luma.get_pixel(x, y)[0];
      let idx = ((f32::from(pixel) / 255.0) * (ASCII_CHARS.len() - 1) as f32).round() as usize;
      buf.set_string(
        area.x.saturating_add(offset_x).saturating_add(x as u16),
        area.y.saturating_add(offset_y).saturating_add(y as u16),
        ASCII_CHARS[idx.min(ASCII_CHARS.len() - 1)],
        Style::default(),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  fn solid(w: u32, h: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(color)))
  }

  #[test]
  fn ascii_white_is_densest_glyph() {
    let image = solid(4, 2, [255, 255, 255]);
    let area = Rect::new(0, 0, 4, 2);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &image, display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), "@");
    assert_eq!(buf[(3, 1)].symbol(), "@");
  }

  #[test]
  fn direct_uses_upper_half_blocks_with_both_colours() {
    let image = solid(2, 2, [200, 10, 10]);
    let area = Rect::new(0, 0, 2, 1);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &image, display_mode: DisplayMode::Direct }.render(area, &mut buf);
    let cell = &buf[(1, 0)];
    assert_eq!(cell.symbol(), "▀");
    assert_eq!(cell.fg, Color::Rgb(200, 10, 10));
    assert_eq!(cell.bg, Color::Rgb(200, 10, 10));
  }

  #[test]
  fn off_draws_nothing() {
    let image = solid(2, 2, [255, 255, 255]);
    let area = Rect::new(0, 0, 2, 1);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &image, display_mode: DisplayMode::Off }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), " ");
  }

  #[test]
  fn fit_keeps_portrait_inside_area() {
    // 2:3 poster into a 20x15 cell area (20x30 pixel box)
    let image = solid(300, 450, [0, 0, 0]);
    let area = Rect::new(0, 0, 20, 15);
    let direct = fit_poster(&image, area, DisplayMode::Direct);
    assert_eq!((direct.width(), direct.height()), (20, 30));
    let ascii = fit_poster(&image, area, DisplayMode::Ascii);
    assert_eq!((ascii.width(), ascii.height()), (20, 15));
  }

  #[test]
  fn small_image_is_centred() {
    let image = solid(2, 2, [255, 255, 255]);
    let area = Rect::new(0, 0, 6, 4);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &image, display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), " ");
    assert_eq!(buf[(2, 1)].symbol(), "@");
    assert_eq!(buf[(3, 2)].symbol(), "@");
  }
}
