//! Plotting a city and its districts to a PNG image
//!
//! A [`Canvas`] is an owned list of plot elements. Plotting only reads houses
//! and districts; nothing is drawn until [`Canvas::render`] or
//! [`Canvas::save`] maps the elements into image space.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::error::Result;
use crate::model::{District, House};
use crate::parse::City;

/// Padding around a district's bounding box, in grid units
const BOUNDS_PADDING: f64 = 0.5;

/// Margin around the plot area, in pixels
const MARGIN: f64 = 20.0;

/// Tavern marker radius, in pixels
const TAVERN_RADIUS: i32 = 3;

/// Half size of a house marker, in pixels
const MARKER_SIZE: f32 = 3.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const STREET_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const HOUSE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const TAVERN_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const DISTRICT_COLOR: Rgb<u8> = Rgb([169, 169, 169]);

/// Axis-aligned bounding box of a district's houses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i64,
    pub right: i64,
    pub down: i64,
    pub up: i64,
}

impl Bounds {
    pub fn of(district: &District) -> Self {
        let first = district.representative();
        let start = Self {
            left: first.x(),
            right: first.x(),
            down: first.y(),
            up: first.y(),
        };

        district.houses().iter().fold(start, |b, h| Self {
            left: b.left.min(h.x()),
            right: b.right.max(h.x()),
            down: b.down.min(h.y()),
            up: b.up.max(h.y()),
        })
    }
}

#[derive(Debug, Clone)]
enum Element {
    Street(Vec<(f64, f64)>),
    Taverns(Vec<(f64, f64)>),
    /// (left, down, right, up) in data space
    Rectangle(f64, f64, f64, f64),
}

/// Plot surface owned by the caller
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    elements: Vec<Element>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of plotted elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Line through the houses in order, with a marker on each house
    pub fn plot_street(&mut self, houses: &[House]) {
        self.elements.push(Element::Street(points(houses)));
    }

    /// Filled circle on each tavern
    pub fn plot_taverns(&mut self, taverns: &[House]) {
        self.elements.push(Element::Taverns(points(taverns)));
    }

    /// Rectangle around the district's houses
    pub fn plot_district(&mut self, district: &District) {
        let b = Bounds::of(district);
        self.elements.push(Element::Rectangle(
            b.left as f64 - BOUNDS_PADDING,
            b.down as f64 - BOUNDS_PADDING,
            b.right as f64 + BOUNDS_PADDING,
            b.up as f64 + BOUNDS_PADDING,
        ));
    }

    /// Every street of the city, then its taverns
    pub fn plot_city(&mut self, city: &City) {
        for houses in city.streets.values() {
            let houses: Vec<House> = houses.values().cloned().collect();
            self.plot_street(&houses);
        }
        self.plot_taverns(&city.taverns);
    }

    pub fn plot_districts(&mut self, districts: &[District]) {
        for district in districts {
            self.plot_district(district);
        }
    }

    /// Draw every element, in plotting order, onto a white image.
    ///
    /// Zero dimensions are raised to one pixel.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let (width, height) = (width.max(1), height.max(1));
        let view = Viewport::fit(&self.elements, f64::from(width), f64::from(height));
        let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

        for element in &self.elements {
            match element {
                Element::Street(pts) => {
                    let pixels: Vec<(f32, f32)> = pts.iter().map(|&p| view.pixel(p)).collect();
                    for pair in pixels.windows(2) {
                        draw_line_segment_mut(&mut img, pair[0], pair[1], STREET_COLOR);
                    }
                    for &center in &pixels {
                        draw_marker(&mut img, center);
                    }
                }
                Element::Taverns(pts) => {
                    for &p in pts {
                        let (x, y) = view.pixel(p);
                        draw_filled_circle_mut(
                            &mut img,
                            (x.round() as i32, y.round() as i32),
                            TAVERN_RADIUS,
                            TAVERN_COLOR,
                        );
                    }
                }
                Element::Rectangle(left, down, right, up) => {
                    let (x0, y0) = view.pixel((*left, *up));
                    let (x1, y1) = view.pixel((*right, *down));
                    let w = ((x1 - x0).round() as u32).max(1);
                    let h = ((y1 - y0).round() as u32).max(1);
                    let rect = Rect::at(x0.round() as i32, y0.round() as i32).of_size(w, h);
                    draw_hollow_rect_mut(&mut img, rect, DISTRICT_COLOR);
                }
            }
        }

        img
    }

    /// Render and write a PNG to `path`
    pub fn save(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        self.render(width, height)
            .save_with_format(path, ImageFormat::Png)?;
        tracing::debug!("Saved plot with {} elements to {}", self.len(), path.display());
        Ok(())
    }
}

fn points(houses: &[House]) -> Vec<(f64, f64)> {
    houses.iter().map(|h| (h.x() as f64, h.y() as f64)).collect()
}

/// Upward triangle outline around a house
fn draw_marker(img: &mut RgbImage, (x, y): (f32, f32)) {
    let top = (x, y - MARKER_SIZE);
    let left = (x - MARKER_SIZE, y + MARKER_SIZE);
    let right = (x + MARKER_SIZE, y + MARKER_SIZE);

    draw_line_segment_mut(img, top, left, HOUSE_COLOR);
    draw_line_segment_mut(img, left, right, HOUSE_COLOR);
    draw_line_segment_mut(img, right, top, HOUSE_COLOR);
}

/// Data-to-pixel transform with Y pointing up
struct Viewport {
    min_x: f64,
    max_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    fn fit(elements: &[Element], width: f64, height: f64) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let mut extend = |(x, y): (f64, f64)| {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        };

        for element in elements {
            match element {
                Element::Street(pts) | Element::Taverns(pts) => {
                    pts.iter().copied().for_each(&mut extend);
                }
                Element::Rectangle(left, down, right, up) => {
                    extend((*left, *down));
                    extend((*right, *up));
                }
            }
        }

        if !min_x.is_finite() {
            (min_x, max_x, min_y, max_y) = (0.0, 1.0, 0.0, 1.0);
        }

        let span_x = (max_x - min_x).max(1.0);
        let span_y = (max_y - min_y).max(1.0);

        Self {
            min_x,
            max_y,
            scale_x: (width - 2.0 * MARGIN).max(1.0) / span_x,
            scale_y: (height - 2.0 * MARGIN).max(1.0) / span_y,
        }
    }

    fn map(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            MARGIN + (x - self.min_x) * self.scale_x,
            MARGIN + (self.max_y - y) * self.scale_y,
        )
    }

    fn pixel(&self, p: (f64, f64)) -> (f32, f32) {
        let (x, y) = self.map(p);
        (x as f32, y as f32)
    }
}
