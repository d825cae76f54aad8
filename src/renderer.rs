use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph,
        canvas::{Canvas, Points},
    },
};

use crate::config::Field;
use crate::entities::{EnemyId, GamePhase};
use crate::pixel_art::{DrawCommand, DrawList, Shade};

/// Width of the hit log panel in terminal cells
const HIT_LOG_WIDTH: u16 = 28;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub phase: GamePhase,
    pub score: u32,
    pub field: Field,
    /// Last committed frame
    pub frame: &'a DrawList,
    /// Destroyed enemies, newest first
    pub hit_log: &'a VecDeque<EnemyId>,
    pub fps: u32,
}

/// Filled blocks flattened to canvas points, one layer per shade
#[derive(Debug, Default, PartialEq)]
pub struct Raster {
    pub layers: Vec<(Shade, Vec<(f64, f64)>)>,
    pub labels: Vec<(f64, f64, String, Shade)>,
}

impl Raster {
    fn layer_mut(&mut self, shade: Shade) -> &mut Vec<(f64, f64)> {
        let idx = match self.layers.iter().position(|(s, _)| *s == shade) {
            Some(idx) => idx,
            None => {
                self.layers.push((shade, Vec::new()));
                self.layers.len() - 1
            }
        };
        &mut self.layers[idx].1
    }
}

/// Converts field-space draw commands into canvas space (y grows upwards).
/// Each rectangle is sampled on a grid no coarser than `step` units, with at
/// least one sample per rectangle.
pub fn rasterize(list: &DrawList, field: Field, step: f32) -> Raster {
    let mut raster = Raster::default();
    let height = field.height as f64;

    for command in list.commands() {
        match command {
            DrawCommand::FillRect {
                x,
                y,
                width,
                height: rect_height,
                shade,
            } => {
                let cols = (width / step).ceil().max(1.0) as usize;
                let rows = (rect_height / step).ceil().max(1.0) as usize;
                let layer = raster.layer_mut(*shade);
                for row in 0..rows {
                    let py = *y as f64 + (row as f64 + 0.5) * *rect_height as f64 / rows as f64;
                    for col in 0..cols {
                        let px = *x as f64 + (col as f64 + 0.5) * *width as f64 / cols as f64;
                        layer.push((px, height - py));
                    }
                }
            }
            DrawCommand::Text { x, y, text, shade } => {
                raster
                    .labels
                    .push((*x as f64, height - *y as f64, text.clone(), *shade));
            }
        }
    }

    raster
}

fn shade_color(shade: Shade) -> Color {
    match shade {
        Shade::Player => Color::Green,
        Shade::Laser => Color::Red,
        Shade::Enemy => Color::Blue,
        Shade::Text => Color::White,
    }
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {
    /// Sampling step for filled blocks, in field units
    sample_step: f32,
}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self { sample_step: 2.0 }
    }

    /// Main render method: field, hit log, then the phase overlay
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let [field_area, log_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(HIT_LOG_WIDTH)])
                .areas(frame.area());

        self.render_field(frame, field_area, view);
        self.render_hit_log(frame, log_area, view);

        match view.phase {
            GamePhase::NotStarted => self.render_title(frame, field_area),
            GamePhase::Running => {}
            GamePhase::GameOver => self.render_game_over(frame, field_area, view),
        }
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        // Nothing is drawn before the first start
        let raster = if view.phase == GamePhase::NotStarted {
            Raster::default()
        } else {
            rasterize(view.frame, view.field, self.sample_step)
        };

        let title = Line::from(vec![
            Span::styled(" Mini Galaga ", Style::default().fg(Color::Cyan).bold()),
            Span::styled(format!(" FPS: {} ", view.fps), Style::default().fg(Color::DarkGray)),
        ]);

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            )
            .background_color(Color::Black)
            .marker(Marker::Braille)
            .x_bounds([0.0, view.field.width as f64])
            .y_bounds([0.0, view.field.height as f64])
            .paint(|ctx| {
                for (shade, coords) in &raster.layers {
                    ctx.draw(&Points {
                        coords,
                        color: shade_color(*shade),
                    });
                }
                for (x, y, text, shade) in &raster.labels {
                    ctx.print(
                        *x,
                        *y,
                        Line::styled(text.clone(), Style::default().fg(shade_color(*shade)).bold()),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }

    fn render_hit_log(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Line::from(" Hit Log ").centered().cyan().bold());

        let lines: Vec<Line> = if view.hit_log.is_empty() {
            vec![
                Line::from(""),
                Line::from("No hits yet").centered().dark_gray().italic(),
            ]
        } else {
            view.hit_log
                .iter()
                .take(area.height.saturating_sub(2) as usize)
                .map(|id| {
                    Line::from(vec![
                        Span::styled("enemy ", Style::default().fg(Color::DarkGray)),
                        Span::styled(
                            format!("#{id}"),
                            Style::default()
                                .fg(Color::LightGreen)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(" destroyed", Style::default().fg(Color::DarkGray)),
                    ])
                })
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// Title overlay shown before the first game
    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from("MINI GALAGA").centered().bold().cyan(),
            Line::from(""),
            Line::from("Press Enter to start").centered().white(),
            Line::from(""),
            Line::from("[Arrows/AD: Move] [Space: Fire]")
                .centered()
                .dark_gray(),
            Line::from("[Q: Quit]").centered().dark_gray(),
        ];

        Self::render_popup(frame, area, text, Color::Cyan);
    }

    /// Renders the game over overlay on top of the frozen field
    fn render_game_over(&self, frame: &mut Frame, area: Rect, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from("GAME OVER").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        Self::render_popup(frame, area, text, Color::Red);
    }

    fn render_popup(frame: &mut Frame, area: Rect, text: Vec<Line>, border: Color) {
        let height = text.len() as u16 + 2;
        let popup = centered_rect(area, 36, height);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .alignment(Alignment::Center),
            popup,
        );
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
