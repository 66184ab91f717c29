//! Canvas sketch of two panel rows, the winter-solstice sun ray and the
//! resulting spacing.

use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Theme};

use calc_core::calculations::shading::{ShadingInput, ShadingResult};
use calc_core::format::fmt2;

use crate::Message;

/// Values needed to draw the sketch
pub struct RowDiagramData {
    pub b_m: f64,
    pub beta_deg: f64,
    pub gama_deg: f64,
    pub d1_m: f64,
    pub d_m: f64,
}

impl RowDiagramData {
    pub fn from_calc(input: &ShadingInput, result: &ShadingResult) -> Self {
        Self {
            b_m: input.b_m,
            beta_deg: input.beta_deg,
            gama_deg: result.gama_deg,
            d1_m: result.d1_m,
            d_m: result.d_m,
        }
    }
}

pub struct RowDiagram {
    data: RowDiagramData,
}

impl RowDiagram {
    pub fn new(data: RowDiagramData) -> Self {
        Self { data }
    }

    fn draw_panel(&self, frame: &mut Frame, foot: Point, scale: f32, color: Color) -> Point {
        let beta = self.data.beta_deg.to_radians();
        let run = (self.data.b_m * beta.cos()) as f32 * scale;
        let rise = (self.data.b_m * beta.sin()) as f32 * scale;
        let top = Point::new(foot.x + run, foot.y - rise);
        frame.stroke(
            &Path::line(foot, top),
            Stroke::default().with_color(color).with_width(4.0),
        );
        top
    }

    fn label(frame: &mut Frame, content: String, position: Point, color: Color) {
        frame.fill_text(Text {
            content,
            position,
            color,
            size: iced::Pixels(10.0),
            align_x: iced::alignment::Horizontal::Center.into(),
            ..Text::default()
        });
    }
}

impl canvas::Program<Message> for RowDiagram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let margin = 24.0;
        let ground_y = bounds.height - margin;
        let panel_color = Color::from_rgb(0.2, 0.35, 0.6);
        let ground_color = Color::from_rgb(0.45, 0.45, 0.45);
        let sun_color = Color::from_rgb(0.9, 0.6, 0.1);
        let dim_color = Color::from_rgb(0.3, 0.3, 0.3);

        frame.stroke(
            &Path::line(Point::new(0.0, ground_y), Point::new(bounds.width, ground_y)),
            Stroke::default().with_color(ground_color).with_width(1.0),
        );

        if !(self.data.d_m.is_finite() && self.data.d_m > 0.0) {
            Self::label(
                &mut frame,
                "Spacing undefined for this geometry".to_string(),
                Point::new(bounds.width / 2.0, bounds.height / 2.0),
                dim_color,
            );
            return vec![frame.into_geometry()];
        }

        // Two pitches plus the second panel's footprint fit the width
        let footprint = self.data.d_m - self.data.d1_m;
        let span_m = self.data.d_m + footprint.max(0.0);
        let scale = ((bounds.width - 2.0 * margin) as f64 / span_m.max(1e-6)) as f32;
        let height_px = (self.data.b_m * self.data.beta_deg.to_radians().sin()) as f32 * scale;
        let scale = if height_px > ground_y - margin && height_px > 0.0 {
            scale * (ground_y - margin) / height_px
        } else {
            scale
        };

        let first_foot = Point::new(margin, ground_y);
        let first_top = self.draw_panel(&mut frame, first_foot, scale, panel_color);
        let second_foot = Point::new(margin + self.data.d_m as f32 * scale, ground_y);
        self.draw_panel(&mut frame, second_foot, scale, panel_color);

        // Sun ray grazing the top of the front row
        let shadow = (self.data.d1_m - 0.2).max(0.0) as f32;
        let shadow_end = Point::new(first_top.x + shadow * scale, ground_y);
        frame.stroke(
            &Path::line(first_top, shadow_end),
            Stroke::default().with_color(sun_color).with_width(1.5),
        );
        Self::label(
            &mut frame,
            format!("γ = {}°", fmt2(self.data.gama_deg)),
            Point::new(shadow_end.x - 24.0, ground_y - 16.0),
            sun_color,
        );

        // Dimension lines below the ground
        let d1_start = Point::new(first_top.x, ground_y + 8.0);
        let d1_end = Point::new(second_foot.x, ground_y + 8.0);
        frame.stroke(
            &Path::line(d1_start, d1_end),
            Stroke::default().with_color(dim_color).with_width(1.0),
        );
        Self::label(
            &mut frame,
            format!("d1 = {} m", fmt2(self.data.d1_m)),
            Point::new((d1_start.x + d1_end.x) / 2.0, ground_y + 10.0),
            dim_color,
        );
        Self::label(
            &mut frame,
            format!("d = {} m", fmt2(self.data.d_m)),
            Point::new((first_foot.x + second_foot.x) / 2.0, 4.0),
            dim_color,
        );

        vec![frame.into_geometry()]
    }
}
